pub mod batch;
pub mod input;
pub mod list;
pub mod remove;

/// Collect every value posted under `key`, in posting order.
///
/// Forms post repeated keys (`student=001&student=002`), so handlers take
/// the raw pairs instead of a struct.
pub(crate) fn form_values(fields: Vec<(String, String)>, key: &str) -> Vec<String> {
  fields
    .into_iter()
    .filter(|(k, _)| k == key)
    .map(|(_, v)| v)
    .collect()
}

/// First value posted under `key`, if any.
pub(crate) fn form_value<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
  fields
    .iter()
    .find(|(k, _)| k == key)
    .map(|(_, v)| v.as_str())
}
