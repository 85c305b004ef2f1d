/// Escapes the characters that are significant in HTML text and attribute values.
///
/// Artist and release names come straight from the catalog and may contain
/// `&`, quotes or angle brackets.
///
/// # Examples
///
/// ```
/// use newmusic::foundation::utils::escape_html;
///
/// assert_eq!(escape_html("Simon & Garfunkel"), "Simon &amp; Garfunkel");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
