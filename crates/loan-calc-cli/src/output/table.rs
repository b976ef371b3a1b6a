use serde_json::{Map, Value};
use tabled::{Table, builder::Builder};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in a Field/Value table; array fields such as the
/// repayment schedule or scheme quotes get a table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_tables(result, map),
            _ => println!("{}", field_value_table(map)),
        },
        Value::Array(arr) => println!("{}", array_table(arr)),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let (rows, scalars): (Vec<_>, Vec<_>) = result
        .iter()
        .partition(|(_, v)| matches!(v, Value::Array(a) if a.first().is_some_and(Value::is_object)));

    let scalars: Map<String, Value> = scalars
        .into_iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    println!("{}", field_value_table(&scalars));

    for (key, val) in rows {
        if let Value::Array(arr) = val {
            println!("\n{}:", key);
            println!("{}", array_table(arr));
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn field_value_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    builder.build()
}

fn array_table(arr: &[Value]) -> Table {
    let mut builder = Builder::default();

    match arr.first() {
        Some(Value::Object(first)) => {
            let headers: Vec<String> = first.keys().cloned().collect();
            builder.push_record(headers.clone());
            for item in arr {
                if let Value::Object(map) = item {
                    let row: Vec<String> = headers
                        .iter()
                        .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                        .collect();
                    builder.push_record(row);
                }
            }
        }
        Some(_) => {
            for item in arr {
                builder.push_record([format_value(item)]);
            }
        }
        None => builder.push_record(["(empty)"]),
    }

    builder.build()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_table_has_header_row() {
        let rows = json!([{"index": 1, "installment": "5000"}]);
        let rendered = array_table(rows.as_array().unwrap()).to_string();
        assert!(rendered.contains("installment"));
        assert!(rendered.contains("5000"));
    }

    #[test]
    fn test_null_rendered_as_dash() {
        assert_eq!(format_value(&Value::Null), "-");
    }
}
