use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML input file (by extension) into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let value: T = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    tracing::debug!(path = %canonical.display(), "loaded input file");
    Ok(value)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve the path against the working directory and check it is a file.
pub fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_detection() {
        assert!(is_yaml(Path::new("scenario.yaml")));
        assert!(is_yaml(Path::new("/tmp/x.yml")));
        assert!(!is_yaml(Path::new("scenario.json")));
        assert!(!is_yaml(Path::new("scenario")));
    }

    #[test]
    fn test_missing_file() {
        let err = read_input::<serde_json::Value>("/no/such/input.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
