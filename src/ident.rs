//! Shared identifier/name character classes (spec.md §4.2.5, §4.3 "Shorthand names").
//!
//! Both the expression tokenizer's bare *Word* and the query grammar's shorthand
//! member names share one character class: first character ASCII letter, `_`, or a
//! non-ASCII printable scalar value; continuation characters add digits, `_` and,
//! outside strict JSONPath mode, `-`.

pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && !c.is_control())
}

pub fn is_name_continue(c: char, allow_hyphen: bool) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (allow_hyphen && c == '-') || (!c.is_ascii() && !c.is_control())
}

/// Lex a name at `bytes[pos]`. Returns `None` if `bytes[pos]` does not start a name.
/// `allow_hyphen` distinguishes this grammar's extension (hyphenated shorthand names)
/// from strict JSONPath, which does not permit hyphens in shorthand names.
pub fn lex_name(bytes: &[u8], pos: usize, allow_hyphen: bool) -> Option<(String, usize)> {
    let s = std::str::from_utf8(&bytes[pos..]).ok()?;
    let mut chars = s.char_indices();
    let (_, first) = chars.next()?;
    if !is_name_start(first) {
        return None;
    }
    let mut end = pos + first.len_utf8();
    for (idx, c) in chars {
        if is_name_continue(c, allow_hyphen) {
            end = pos + idx + c.len_utf8();
        } else {
            break;
        }
    }
    Some((s[..end - pos].to_string(), end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_plain_identifier() {
        assert_eq!(
            lex_name(b"hello_world 1", 0, true),
            Some(("hello_world".to_string(), 11))
        );
    }

    #[test]
    fn allows_hyphen_in_extended_mode() {
        assert_eq!(
            lex_name(b"data-value.x", 0, true),
            Some(("data-value".to_string(), 10))
        );
    }

    #[test]
    fn rejects_hyphen_continuation_in_strict_mode() {
        assert_eq!(
            lex_name(b"data-value", 0, false),
            Some(("data".to_string(), 4))
        );
    }

    #[test]
    fn rejects_digit_start() {
        assert_eq!(lex_name(b"1abc", 0, true), None);
    }
}
