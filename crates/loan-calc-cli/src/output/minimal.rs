use serde_json::Value;

/// Result fields that answer the question each command was asked, in
/// priority order.
const PRIORITY_KEYS: [&str; 4] = [
    "monthly_installment",
    "best_scheme",
    "total_payment",
    "total_interest",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
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
    fn test_emi_is_the_answer() {
        let out = json!({"result": {"monthly_rate": "0.01", "monthly_installment": "8885"}});
        assert_eq!(minimal_answer(&out), "8885");
    }

    #[test]
    fn test_null_best_scheme_skipped() {
        let out = json!({"result": {"best_scheme": null, "eligible_count": 0}});
        assert_eq!(minimal_answer(&out), "eligible_count: 0");
    }
}
