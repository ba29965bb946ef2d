use serde_json::{Map, Value};

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_payment",
    "balance",
    "monthly_cash_flow",
    "cap_rate_pct",
    "cash_on_cash_return_pct",
    "equity",
];

/// Print just the key answer value from the output.
///
/// Looks through the result envelope (and its `metrics` block for a full
/// analysis) for the priority fields, then falls back to the first field.
/// For a series, prints the answer from its last item.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let target = match result_obj {
        Value::Array(items) => items.last().unwrap_or(result_obj),
        other => other,
    };

    if let Value::Object(map) = target {
        if let Some(answer) = find_priority(map) {
            println!("{}", format_minimal(answer));
            return;
        }
        if let Some(Value::Object(metrics)) = map.get("metrics") {
            if let Some(answer) = find_priority(metrics) {
                println!("{}", format_minimal(answer));
                return;
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(target));
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null())
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
    fn test_priority_prefers_payment() {
        let map = json!({ "loan_amount": "1", "monthly_payment": "2" });
        let found = find_priority(map.as_object().unwrap()).unwrap();
        assert_eq!(found, &json!("2"));
    }

    #[test]
    fn test_priority_skips_null() {
        let map = json!({ "cap_rate_pct": null, "monthly_cash_flow": "-1426" });
        let found = find_priority(map.as_object().unwrap()).unwrap();
        assert_eq!(found, &json!("-1426"));
    }
}
