use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON or YAML document from stdin.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(json_err) => serde_yaml::from_str::<Value>(trimmed)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {json_err}"))?,
    };
    tracing::debug!("read input document from stdin");
    Ok(Some(value))
}
