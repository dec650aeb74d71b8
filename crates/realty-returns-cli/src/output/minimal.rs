use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known metric fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "net_monthly_cash_flow",
        "monthly_payment",
        "base_case_value",
        "display",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_null()) {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_cash_flow() {
        let v = json!({"result": {"monthly_payment": "12450.65", "net_monthly_cash_flow": "-1372.52"}});
        assert_eq!(minimal_line(&v), "-1372.52");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let v = json!({"result": {"currency": "USD"}});
        assert_eq!(minimal_line(&v), "currency: USD");
    }

    #[test]
    fn test_skips_null_priority() {
        let v = json!({"result": {"base_case_value": null, "output_metric": "cash_on_cash_pct"}});
        assert_eq!(minimal_line(&v), "output_metric: cash_on_cash_pct");
    }
}
