/// Escape text for interpolation into HTML element content or attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape and turn newlines into `<br>` for free-text messages
pub fn paragraphs(input: &str) -> String {
    escape(input).replace("\r\n", "\n").replace('\n', "<br>")
}
