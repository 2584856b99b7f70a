/// Escape a string for use inside an N-Quads IRI or literal.
///
/// C0 controls (except `\t`, `\n`, `\r`), DEL and the C1/NBSP range up to
/// U+00A0 become `\uXXXX`. `\n`, `\t`, `\r`, `"` and `\` get their
/// two-character escapes. Everything else, including characters outside the
/// Basic Multilingual Plane, is emitted unchanged.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'..='\u{A0}' => {
                out.push_str(&format!("\\u{:04X}", ch as u32));
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

/// Unescape an N-Quads string value.
///
/// Handles: `\t`, `\b`, `\n`, `\r`, `\f`, `\"`, `\'`, `\\`, `\uXXXX` (with
/// surrogate pairs) and `\UXXXXXXXX`.
pub fn unescape(s: &str) -> Result<String, String> {
    if !s.contains('\\') {
        return Ok(s.to_string());
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{08}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{0C}'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let cp = read_hex(&mut chars, 4, 'u')?;
                if (0xD800..=0xDBFF).contains(&cp) {
                    // high surrogate, a \uXXXX low surrogate must follow
                    match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => {}
                        _ => return Err(format!("expected low surrogate after \\u{cp:04X}")),
                    }
                    let low = read_hex(&mut chars, 4, 'u')?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(format!("invalid low surrogate: \\u{low:04X}"));
                    }
                    let combined = 0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00);
                    out.push(to_char(combined)?);
                } else {
                    out.push(to_char(cp)?);
                }
            }
            Some('U') => {
                let cp = read_hex(&mut chars, 8, 'U')?;
                out.push(to_char(cp)?);
            }
            Some(other) => return Err(format!("unknown escape sequence: \\{other}")),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(out)
}

fn read_hex(chars: &mut std::str::Chars<'_>, len: usize, marker: char) -> Result<u32, String> {
    let hex: String = chars.by_ref().take(len).collect();
    if hex.len() != len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid \\{marker} escape: \\{marker}{hex}"));
    }
    u32::from_str_radix(&hex, 16).map_err(|_| format!("invalid \\{marker} escape: \\{marker}{hex}"))
}

fn to_char(cp: u32) -> Result<char, String> {
    char::from_u32(cp).ok_or_else(|| format!("invalid unicode codepoint: U+{cp:X}"))
}
