use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::span::Span;

/// A lexed number, classified per spec.md §4.2.2: integral only when no fractional or
/// exponent part is present and the digits fit in an `i64`; otherwise a float.
///
/// `Float` carries whether the literal used exponent notation (`1e2`, `1.5e-3`, ...):
/// only an exponent-derived float whose value is mathematically integral renders
/// without a trailing `.0` (spec.md §8 property 6); a plain decimal like `100.0`
/// always round-trips its own digits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64, bool),
}

/// Lex a number literal starting at `bytes[pos]`. `pos` must point at `-` or a digit.
/// Returns the number and the end offset (exclusive).
pub fn lex_number(bytes: &[u8], pos: usize) -> Result<(Number, usize), SyntaxError> {
    let start = pos;
    let mut i = pos;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }
    let int_start = i;
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(c) if c.is_ascii_digit() => {
            while matches!(bytes.get(i), Some(c) if c.is_ascii_digit()) {
                i += 1;
            }
        }
        _ => {
            return Err(SyntaxError::at(
                start,
                SyntaxErrorKind::Other,
                "expected a digit",
            ))
        }
    }
    if i == int_start {
        return Err(SyntaxError::at(
            start,
            SyntaxErrorKind::Other,
            "expected a digit",
        ));
    }

    let mut is_float = false;
    let mut has_exponent = false;
    if bytes.get(i) == Some(&b'.') && matches!(bytes.get(i + 1), Some(c) if c.is_ascii_digit()) {
        is_float = true;
        i += 1;
        while matches!(bytes.get(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
    }
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        if matches!(bytes.get(j), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            has_exponent = true;
            j += 1;
            while matches!(bytes.get(j), Some(c) if c.is_ascii_digit()) {
                j += 1;
            }
            i = j;
        }
    }

    let text = std::str::from_utf8(&bytes[start..i]).expect("ascii number literal");
    if is_float {
        let value: f64 = text.parse().map_err(|_| {
            SyntaxError::new(
                Span::new(start, i),
                SyntaxErrorKind::NumericOverflow,
                format!("invalid numeric literal '{}'", text),
            )
        })?;
        Ok((Number::Float(value, has_exponent), i))
    } else {
        let value: i64 = text.parse().map_err(|_| {
            SyntaxError::new(
                Span::new(start, i),
                SyntaxErrorKind::NumericOverflow,
                format!("integer literal '{}' overflows a 64-bit integer", text),
            )
        })?;
        Ok((Number::Int(value), i))
    }
}

/// Render a float the way downstream token printing wants it (spec.md §8, property 6):
/// a scientific literal (`is_exponent == true`) whose value is mathematically integral
/// renders without a trailing `.0` (`1e2` -> `"100"`); every other float, including a
/// plain decimal like `100.0`, always renders with one, so its printed value equals
/// the literal input.
pub fn format_float(value: f64, is_exponent: bool) -> String {
    if is_exponent && value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let mut s = format!("{}", value);
        if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("NaN") {
            s.push_str(".0");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_plain_integer() {
        let (n, end) = lex_number(b"123abc", 0).unwrap();
        assert_eq!(n, Number::Int(123));
        assert_eq!(end, 3);
    }

    #[test]
    fn lexes_negative_integer() {
        let (n, end) = lex_number(b"-42", 0).unwrap();
        assert_eq!(n, Number::Int(-42));
        assert_eq!(end, 3);
    }

    #[test]
    fn lexes_float_with_fraction() {
        let (n, end) = lex_number(b"3.14159", 0).unwrap();
        assert_eq!(n, Number::Float(3.14159, false));
        assert_eq!(end, 7);
    }

    #[test]
    fn scientific_notation_is_float() {
        let (n, end) = lex_number(b"1e2", 0).unwrap();
        assert_eq!(n, Number::Float(100.0, true));
        assert_eq!(end, 3);
        assert_eq!(format_float(100.0, true), "100");
    }

    #[test]
    fn scientific_with_sign_is_float() {
        let (n, _) = lex_number(b"1e+2", 0).unwrap();
        assert_eq!(n, Number::Float(100.0, true));
        let (n2, _) = lex_number(b"1e-2", 0).unwrap();
        assert_eq!(n2, Number::Float(0.01, true));
        assert_eq!(format_float(0.01, true), "0.01");
    }

    #[test]
    fn plain_decimal_keeps_trailing_zero() {
        let (n, _) = lex_number(b"100.0", 0).unwrap();
        assert_eq!(n, Number::Float(100.0, false));
        assert_eq!(format_float(100.0, false), "100.0");
    }

    #[test]
    fn overflowing_integer_is_an_error() {
        let err = lex_number(b"99999999999999999999999", 0).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::NumericOverflow);
    }
}
