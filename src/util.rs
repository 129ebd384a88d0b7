/// Horizontal offset in `[-40, 40)` derived from the id's UTF-16 code units.
/// Keeps same-depth nodes from stacking in a perfectly vertical column.
pub fn id_jitter(id: &str) -> f32 {
    let sum = id
        .encode_utf16()
        .fold(0u64, |acc, unit| acc.wrapping_add(u64::from(unit)));
    (sum % 80) as f32 - 40.0
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
