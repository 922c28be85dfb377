use std::borrow::Cow;

/// Escape text placed between XML tags.
pub fn text(raw: &str) -> Cow<'_, str> {
    html_escape::encode_text(raw)
}

/// Escape a value placed inside a double-quoted XML attribute.
pub fn attribute(raw: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(raw)
}
