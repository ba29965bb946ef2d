pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted keys (`metrics.monthly_payment`).
///
/// Arrays of objects are not flattened; they are returned separately so the
/// caller can render them as their own table.
pub fn flatten_object(map: &Map<String, Value>) -> (Vec<(String, Value)>, Vec<(String, Vec<Value>)>) {
    let mut fields = Vec::new();
    let mut arrays = Vec::new();
    flatten_into("", map, &mut fields, &mut arrays);
    (fields, arrays)
}

fn flatten_into(
    prefix: &str,
    map: &Map<String, Value>,
    fields: &mut Vec<(String, Value)>,
    arrays: &mut Vec<(String, Vec<Value>)>,
) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&path, inner, fields, arrays),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                arrays.push((path, items.clone()));
            }
            _ => fields.push((path, val.clone())),
        }
    }
}

/// Render a scalar (or a list of scalars) as a cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
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
    fn test_flatten_nested_and_arrays() {
        let value = json!({
            "metrics": { "monthly_payment": "26426.08", "cap_rate_pct": "10" },
            "ltv": "0.8",
            "chart_labels": ["Hoy", "Año 0.5"],
            "equity_curve": [{ "period_index": 0 }, { "period_index": 6 }],
        });
        let (fields, arrays) = flatten_object(value.as_object().unwrap());

        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"metrics.monthly_payment"));
        assert!(keys.contains(&"metrics.cap_rate_pct"));
        assert!(keys.contains(&"ltv"));
        assert!(keys.contains(&"chart_labels"));

        assert_eq!(arrays.len(), 1);
        assert_eq!(arrays[0].0, "equity_curve");
        assert_eq!(arrays[0].1.len(), 2);
    }

    #[test]
    fn test_format_value_scalars() {
        assert_eq!(format_value(&json!("Hoy")), "Hoy");
        assert_eq!(format_value(&json!(240)), "240");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(["a", "b"])), "a, b");
    }
}
