use serde_json::Value;
use std::io;

/// Array fields rendered as one CSV row per element.
const ROW_KEYS: [&str; 2] = ["schedule", "quotes"];

/// Write output as CSV to stdout.
///
/// A schedule or scheme comparison becomes a row-per-period (or
/// row-per-scheme) table; anything else is written as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                if let Some(Value::Array(arr)) = ROW_KEYS.iter().find_map(|k| result.get(*k)) {
                    write_array_csv(wtr, arr);
                    return;
                }
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
