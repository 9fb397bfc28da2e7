//! List-valued wire fields.

use serde_json::Value;

/// Child nodes of a list-valued field nested one level down.
///
/// Accepts both `{container: {item: [..]}}` (SOAP) and `{container: [..]}`
/// (REST). Absence at either level gives an empty list.
pub fn child_list<'a>(node: &'a Value, container: &str, item: &str) -> Vec<&'a Value> {
    match node.get(container) {
        Some(Value::Object(inner)) => as_list(inner.get(item)),
        Some(list @ Value::Array(_)) => as_list(Some(list)),
        _ => Vec::new(),
    }
}

/// Child nodes of a list-valued field held directly on `node`.
pub fn list_field<'a>(node: &'a Value, name: &str) -> Vec<&'a Value> {
    as_list(node.get(name))
}

/// Strings from a list-valued field, e.g. NRCC messages.
///
/// SOAP decodes each element to a plain string; REST wraps it as
/// `{"Value": "..."}`. Text is passed through untouched, markup included.
pub fn text_list(node: &Value, container: &str, item: &str) -> Vec<String> {
    child_list(node, container, item)
        .into_iter()
        .filter_map(|element| match element {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj
                .get("Value")
                .or_else(|| obj.get("value"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        })
        .collect()
}

/// XML decoders collapse one-element lists to the element itself.
fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).collect(),
        Some(single) => vec![single],
    }
}
