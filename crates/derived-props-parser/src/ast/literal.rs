//! Literal decoding.
//!
//! Turns the lexeme of a string, character or numeric token into its
//! value. Escape errors are reported with the byte offset of the bad
//! escape inside the lexeme.

/// A malformed escape sequence at the given byte offset in the lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct EscapeError {
    pub offset: usize,
}

/// Strip a trailing `u8`/`U8` suffix.
fn strip_utf8_suffix(lexeme: &str) -> &str {
    lexeme
        .strip_suffix("u8")
        .or_else(|| lexeme.strip_suffix("U8"))
        .unwrap_or(lexeme)
}

/// Decode a regular string literal `"..."`.
pub(super) fn decode_string(lexeme: &str) -> Result<String, EscapeError> {
    let lexeme = strip_utf8_suffix(lexeme);
    let body = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    unescape(body, 1)
}

/// Decode a verbatim string literal `@"..."`.
pub(super) fn decode_verbatim(lexeme: &str) -> String {
    let lexeme = strip_utf8_suffix(lexeme);
    let body = lexeme
        .strip_prefix("@\"")
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    body.replace("\"\"", "\"")
}

/// Decode a character literal `'a'`.
pub(super) fn decode_char(lexeme: &str) -> Result<char, EscapeError> {
    let body = lexeme
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(lexeme);
    let decoded = unescape(body, 1)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(EscapeError { offset: 0 }),
    }
}

/// Decode an interpolated string. Returns `Ok(None)` when the string
/// contains interpolation holes.
pub(super) fn decode_interpolated(lexeme: &str) -> Result<Option<String>, EscapeError> {
    let mut prefix_len = 0;
    let mut verbatim = false;
    for c in lexeme.chars() {
        match c {
            '$' => prefix_len += 1,
            '@' => {
                verbatim = true;
                prefix_len += 1;
            }
            _ => break,
        }
    }
    let body = lexeme[prefix_len..]
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or("");

    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' | '}' if chars.peek() == Some(&c) => {
                chars.next();
                text.push(c);
            }
            '{' => return Ok(None),
            _ => text.push(c),
        }
    }

    if verbatim {
        Ok(Some(text.replace("\"\"", "\"")))
    } else {
        unescape(&text, prefix_len + 1).map(Some)
    }
}

/// Decode a raw string literal `"""..."""`, optionally interpolated.
///
/// Multi-line raw strings drop the first and last line breaks and strip
/// the closing line's indentation from every content line.
pub(super) fn decode_raw(lexeme: &str) -> Option<String> {
    let lexeme = strip_utf8_suffix(lexeme);
    let dollars = lexeme.chars().take_while(|&c| c == '$').count();
    let quoted = &lexeme[dollars..];
    let quotes = quoted.chars().take_while(|&c| c == '"').count();
    let body = quoted.get(quotes..quoted.len().saturating_sub(quotes))?;

    if dollars > 0 && body.contains(&"{".repeat(dollars)) {
        return None;
    }

    let Some(rest) = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n')) else {
        return Some(body.to_string());
    };

    let (content, last_line) = match rest.rfind('\n') {
        Some(i) => (&rest[..i], &rest[i + 1..]),
        None => ("", rest),
    };
    let content = content.strip_suffix('\r').unwrap_or(content);
    let indent = last_line;

    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_prefix(indent).unwrap_or(line.trim_start()))
        .collect();
    Some(lines.join("\n"))
}

/// Decode an integer literal. Returns `None` on overflow.
pub(super) fn decode_int(lexeme: &str) -> Option<i64> {
    let digits: String = lexeme
        .trim_end_matches(['u', 'U', 'l', 'L'])
        .chars()
        .filter(|&c| c != '_')
        .collect();
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok().map(|v| v as i64)
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).ok().map(|v| v as i64)
    } else {
        digits.parse::<i64>().ok()
    }
}

/// Decode a real literal.
pub(super) fn decode_real(lexeme: &str) -> Option<f64> {
    let digits: String = lexeme
        .trim_end_matches(['f', 'F', 'd', 'D', 'm', 'M'])
        .chars()
        .filter(|&c| c != '_')
        .collect();
    digits.parse::<f64>().ok()
}

/// Process backslash escapes. `base` is the lexeme offset of `body`.
fn unescape(body: &str, base: usize) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let error = EscapeError { offset: base + i };
        let (_, escape) = chars.next().ok_or(error)?;
        let decoded = match escape {
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'e' => '\u{1b}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' => hex_escape(&mut chars, 4, 4).ok_or(error)?,
            'U' => hex_escape(&mut chars, 8, 8).ok_or(error)?,
            'x' => hex_escape(&mut chars, 1, 4).ok_or(error)?,
            _ => return Err(error),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn hex_escape(chars: &mut std::str::CharIndices<'_>, min: usize, max: usize) -> Option<char> {
    let mut value = 0u32;
    let mut count = 0;
    while count < max {
        let mut lookahead = chars.clone();
        match lookahead.next() {
            Some((_, c)) if c.is_ascii_hexdigit() => {
                value = value * 16 + c.to_digit(16)?;
                *chars = lookahead;
                count += 1;
            }
            _ => break,
        }
    }
    if count < min {
        return None;
    }
    char::from_u32(value)
}
