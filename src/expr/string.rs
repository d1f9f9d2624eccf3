use crate::error::{SyntaxError, SyntaxErrorKind};

/// Lex a single- or double-quoted string literal starting at `bytes[pos]` (which must
/// point at the opening quote). `allow_newlines` controls whether raw newlines may
/// appear inside the body verbatim — tag/output bodies permit multiline strings,
/// `liquid` line statements do not (spec.md §4.2.1).
///
/// Returns the cooked (escape-resolved) value and the end offset (exclusive, past the
/// closing quote).
pub fn lex_string(
    bytes: &[u8],
    pos: usize,
    allow_newlines: bool,
) -> Result<(String, usize), SyntaxError> {
    let quote = bytes[pos];
    debug_assert!(quote == b'\'' || quote == b'"');
    let body_start = pos + 1;
    let mut i = body_start;
    let mut cooked = String::new();

    loop {
        match bytes.get(i) {
            None => {
                return Err(SyntaxError::at(
                    pos,
                    SyntaxErrorKind::UnterminatedString,
                    "unterminated string literal",
                ))
            }
            Some(&c) if c == quote => {
                return Ok((cooked, i + 1));
            }
            Some(b'\n') | Some(b'\r') if !allow_newlines => {
                return Err(SyntaxError::at(
                    pos,
                    SyntaxErrorKind::UnterminatedString,
                    "string literal may not cross a newline here",
                ));
            }
            Some(b'\\') => {
                let (ch, next) = lex_escape(bytes, i)?;
                cooked.push(ch);
                i = next;
            }
            Some(_) => {
                let rest = std::str::from_utf8(&bytes[i..]).map_err(|_| {
                    SyntaxError::at(i, SyntaxErrorKind::InvalidEscape, "invalid utf-8 in string")
                })?;
                let ch = rest.chars().next().unwrap();
                cooked.push(ch);
                i += ch.len_utf8();
            }
        }
    }
}

fn lex_escape(bytes: &[u8], backslash_pos: usize) -> Result<(char, usize), SyntaxError> {
    let esc = bytes.get(backslash_pos + 1).copied();
    match esc {
        Some(b'b') => Ok(('\u{0008}', backslash_pos + 2)),
        Some(b'f') => Ok(('\u{000C}', backslash_pos + 2)),
        Some(b'n') => Ok(('\n', backslash_pos + 2)),
        Some(b'r') => Ok(('\r', backslash_pos + 2)),
        Some(b't') => Ok(('\t', backslash_pos + 2)),
        Some(b'/') => Ok(('/', backslash_pos + 2)),
        Some(b'\\') => Ok(('\\', backslash_pos + 2)),
        Some(b'"') => Ok(('"', backslash_pos + 2)),
        Some(b'\'') => Ok(('\'', backslash_pos + 2)),
        Some(b'u') => lex_unicode_escape(bytes, backslash_pos),
        _ => Err(SyntaxError::at(
            backslash_pos,
            SyntaxErrorKind::InvalidEscape,
            "unrecognized escape sequence",
        )),
    }
}

fn lex_hex4(bytes: &[u8], pos: usize) -> Result<u32, SyntaxError> {
    let slice = bytes.get(pos..pos + 4).ok_or_else(|| {
        SyntaxError::at(
            pos,
            SyntaxErrorKind::InvalidEscape,
            "incomplete \\u escape sequence",
        )
    })?;
    let text = std::str::from_utf8(slice).map_err(|_| {
        SyntaxError::at(
            pos,
            SyntaxErrorKind::InvalidEscape,
            "invalid \\u escape sequence",
        )
    })?;
    u32::from_str_radix(text, 16).map_err(|_| {
        SyntaxError::at(
            pos,
            SyntaxErrorKind::InvalidEscape,
            "invalid \\u escape sequence",
        )
    })
}

fn lex_unicode_escape(bytes: &[u8], backslash_pos: usize) -> Result<(char, usize), SyntaxError> {
    let digits_start = backslash_pos + 2;
    let hi = lex_hex4(bytes, digits_start)?;
    let after_hi = digits_start + 4;

    if (0xD800..=0xDBFF).contains(&hi) {
        // High surrogate: must be followed by a low surrogate escape.
        if bytes.get(after_hi) == Some(&b'\\') && bytes.get(after_hi + 1) == Some(&b'u') {
            let lo = lex_hex4(bytes, after_hi + 2)?;
            if (0xDC00..=0xDFFF).contains(&lo) {
                let c = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                let ch = char::from_u32(c).ok_or_else(|| {
                    SyntaxError::at(
                        backslash_pos,
                        SyntaxErrorKind::InvalidEscape,
                        "invalid surrogate pair",
                    )
                })?;
                return Ok((ch, after_hi + 6));
            }
        }
        return Err(SyntaxError::at(
            backslash_pos,
            SyntaxErrorKind::InvalidEscape,
            "unpaired high surrogate in \\u escape",
        ));
    }
    if (0xDC00..=0xDFFF).contains(&hi) {
        return Err(SyntaxError::at(
            backslash_pos,
            SyntaxErrorKind::InvalidEscape,
            "unpaired low surrogate in \\u escape",
        ));
    }

    let ch = char::from_u32(hi).ok_or_else(|| {
        SyntaxError::at(
            backslash_pos,
            SyntaxErrorKind::InvalidEscape,
            "invalid code point in \\u escape",
        )
    })?;
    Ok((ch, after_hi))
}

/// Public entry point: cook a string that may carry its surrounding quotes. Escape
/// decoding is single-pass — calling this again on already-cooked output is a misuse,
/// not an operation this crate supports (spec.md §8, Idempotence).
pub fn unescape_string(s: &str) -> Result<String, SyntaxError> {
    let bytes = s.as_bytes();
    let quoted = bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0];
    if quoted {
        let (cooked, end) = lex_string(bytes, 0, true)?;
        if end != bytes.len() {
            return Err(SyntaxError::at(
                end,
                SyntaxErrorKind::TrailingInput,
                "trailing input after string literal",
            ));
        }
        Ok(cooked)
    } else {
        // Raw escaped body with no surrounding quotes: cook it the same way, using a
        // sentinel quote character that cannot occur in the input to terminate at EOF.
        let mut wrapped = Vec::with_capacity(bytes.len() + 2);
        wrapped.push(b'"');
        wrapped.extend_from_slice(bytes);
        wrapped.push(b'"');
        let (cooked, end) = lex_string(&wrapped, 0, true)?;
        debug_assert_eq!(end, wrapped.len());
        Ok(cooked)
    }
}
