//! Escaping for interpolated markup.

/// Escape text for element content or a double-quoted attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value used as a single-quoted JS string argument inside a
/// double-quoted inline handler, e.g. `onclick="f('<here>')"`.
///
/// Quotes and backslashes get a backslash first; the result is then
/// attribute-escaped, which leaves the backslashes alone.
pub fn escape_js_arg(value: &str) -> String {
    let mut js = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => js.push_str("\\\\"),
            '\'' => js.push_str("\\'"),
            '\n' => js.push_str("\\n"),
            '\r' => js.push_str("\\r"),
            _ => js.push(c),
        }
    }
    escape_html(&js)
}
