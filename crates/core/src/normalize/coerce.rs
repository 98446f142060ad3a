use serde_json::Value;

/// Returns the trimmed contents of `value` when it is a string with visible text.
pub fn non_blank_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim()),
        _ => None,
    }
}

/// First element of `items` that is a non-blank string, trimmed.
pub fn first_non_blank(items: &[Value]) -> Option<&str> {
    items.iter().find_map(non_blank_str)
}

/// Concatenates array elements with no separator.
///
/// Strings are taken verbatim, numbers and booleans by their JSON text and
/// `null` contributes nothing. Nested arrays are flattened with `,` between
/// their elements; objects carry no text and are skipped.
pub fn join_values(items: &[Value]) -> String {
    items.iter().map(|item| value_text(item, ",")).collect()
}

fn value_text(value: &Value, nested_sep: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| value_text(item, nested_sep))
            .collect::<Vec<_>>()
            .join(nested_sep),
        Value::Null | Value::Object(_) => String::new(),
    }
}
