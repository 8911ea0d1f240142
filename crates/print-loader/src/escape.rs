//! ECMAScript string literal escaping.

/// Appends `value` to `out` as a double-quoted ECMAScript string literal.
///
/// Quotes, backslashes, line terminators and other control characters are
/// escaped, so the literal evaluates back to exactly `value`.
pub fn push_js_string(out: &mut String, value: &str) {
    out.reserve(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Line terminators inside a literal in older engines
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Returns `value` as a double-quoted ECMAScript string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::new();
    push_js_string(&mut out, value);
    out
}
