pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar JSON value for a table cell or CSV field.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Header row and body rows of a sensitivity matrix, if `result` holds one.
pub(crate) fn matrix_rows(result: &Value) -> Option<Vec<Vec<String>>> {
    let matrix = result.get("matrix")?.as_array()?;
    let row_values = result.get("variable_1_values")?.as_array()?;
    let col_values = result.get("variable_2_values")?.as_array()?;
    let corner = format!(
        "{} \\ {}",
        result.get("variable_1_name").map(cell_text).unwrap_or_default(),
        result.get("variable_2_name").map(cell_text).unwrap_or_default()
    );

    let mut rows = Vec::with_capacity(matrix.len() + 1);
    let mut header = vec![corner];
    header.extend(col_values.iter().map(cell_text));
    rows.push(header);

    for (label, row) in row_values.iter().zip(matrix) {
        let mut line = vec![cell_text(label)];
        if let Some(cells) = row.as_array() {
            line.extend(cells.iter().map(|c| match c {
                Value::Null => "n/a".to_string(),
                other => cell_text(other),
            }));
        }
        rows.push(line);
    }
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matrix_rows() {
        let result = json!({
            "variable_1_name": "vacancy_pct",
            "variable_2_name": "loan_term_years",
            "variable_1_values": ["0", "5"],
            "variable_2_values": ["20", "25"],
            "matrix": [["-100.5", "-50.1"], [null, "-75"]],
        });
        let rows = matrix_rows(&result).unwrap();
        assert_eq!(rows[0], vec!["vacancy_pct \\ loan_term_years", "20", "25"]);
        assert_eq!(rows[2], vec!["5", "n/a", "-75"]);
    }

    #[test]
    fn test_no_matrix() {
        assert!(matrix_rows(&json!({"monthly_payment": "1"})).is_none());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!([1, "a"])), "1, a");
    }
}
