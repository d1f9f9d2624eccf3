use super::number::{lex_number, Number};
use super::string::lex_string;
use super::token::{ExpressionToken, ExpressionTokenKind, RangeEndpoint, RangeLiteral};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::ident::lex_name;
use crate::query::parse_query_at;
use crate::span::{Span, WhitespaceControl};

/// Tokenize a tag/output/liquid-line body starting at `start`, stopping as soon as
/// the closing delimiter `closer` (optionally preceded by a whitespace-control
/// marker) is recognized, or, if `newline_terminated`, at the first unescaped
/// newline (spec.md §4.2, "Lexical priority at each position").
///
/// Returns the token list and the offset at which scanning stopped (just before the
/// optional marker + `closer`, or at the terminating newline/EOF).
pub(crate) fn tokenize_expression(
    src: &[u8],
    start: usize,
    closer: &[u8],
    newline_terminated: bool,
    max_depth: usize,
    unterminated_kind: SyntaxErrorKind,
    opening_span: Span,
) -> Result<(Vec<ExpressionToken>, usize), SyntaxError> {
    let mut pos = start;
    let mut tokens = Vec::new();

    loop {
        // Whitespace: liquid line statements only treat horizontal whitespace as a
        // separator and let an unescaped newline terminate the statement; standard
        // bodies treat all of space/tab/CR/LF as insignificant separators.
        loop {
            match src.get(pos) {
                Some(b' ') | Some(b'\t') => pos += 1,
                Some(b'\r') | Some(b'\n') if !newline_terminated => pos += 1,
                _ => break,
            }
        }

        if newline_terminated {
            match src.get(pos) {
                None => return Ok((tokens, pos)),
                Some(b'\n') => return Ok((tokens, pos)),
                Some(b'\r') if src.get(pos + 1) == Some(&b'\n') => return Ok((tokens, pos)),
                _ => {}
            }
        }

        let (_, marker_len) = WhitespaceControl::consume(src, pos);
        if !closer.is_empty() && src[pos + marker_len..].starts_with(closer) {
            return Ok((tokens, pos));
        }

        if pos >= src.len() {
            if closer.is_empty() {
                return Ok((tokens, pos));
            }
            return Err(SyntaxError::new(
                opening_span,
                unterminated_kind,
                "reached end of input while scanning an expression body",
            ));
        }

        let (token, next) = lex_one(src, pos, max_depth)?;
        tokens.push(token);
        pos = next;
    }
}

fn lex_one(src: &[u8], pos: usize, max_depth: usize) -> Result<(ExpressionToken, usize), SyntaxError> {
    match src[pos] {
        b'\'' | b'"' => {
            let (value, end) = lex_string(src, pos, true)?;
            Ok((
                ExpressionToken::new(Span::new(pos, end), ExpressionTokenKind::String(value)),
                end,
            ))
        }
        c if c == b'-' && matches!(src.get(pos + 1), Some(d) if d.is_ascii_digit())
            || c.is_ascii_digit() =>
        {
            let (number, end) = lex_number(src, pos)?;
            let kind = match number {
                Number::Int(v) => ExpressionTokenKind::Integer(v),
                Number::Float(v, is_exponent) => ExpressionTokenKind::Float(v, is_exponent),
            };
            Ok((ExpressionToken::new(Span::new(pos, end), kind), end))
        }
        b'(' => lex_paren_or_range(src, pos, max_depth),
        b'$' | b'[' => {
            let (query, end) = parse_query_at(src, pos, max_depth)?;
            Ok((
                ExpressionToken::new(Span::new(pos, end), ExpressionTokenKind::Query(Box::new(query))),
                end,
            ))
        }
        _ => {
            if let Some((name, end)) = lex_name(src, pos, true) {
                if let Some(kind) = reserved_word(&name) {
                    return Ok((ExpressionToken::new(Span::new(pos, end), kind), end));
                }
                match src.get(end) {
                    Some(b'.') | Some(b'[') => {
                        let (query, query_end) = parse_query_at(src, pos, max_depth)?;
                        Ok((
                            ExpressionToken::new(
                                Span::new(pos, query_end),
                                ExpressionTokenKind::Query(Box::new(query)),
                            ),
                            query_end,
                        ))
                    }
                    _ => Ok((
                        ExpressionToken::new(Span::new(pos, end), ExpressionTokenKind::Word(name)),
                        end,
                    )),
                }
            } else {
                lex_symbol(src, pos)
            }
        }
    }
}

fn reserved_word(name: &str) -> Option<ExpressionTokenKind> {
    use ExpressionTokenKind::*;
    Some(match name {
        "true" => True,
        "false" => False,
        "nil" | "null" => Null,
        "and" => And,
        "or" => Or,
        "not" => Not,
        "in" => In,
        "contains" => Contains,
        "if" => If,
        "else" => Else,
        "with" => With,
        "as" => As,
        "for" => For,
        "required" => Required,
        _ => return None,
    })
}

fn lex_symbol(src: &[u8], pos: usize) -> Result<(ExpressionToken, usize), SyntaxError> {
    use ExpressionTokenKind::*;
    let rest = &src[pos..];
    let two = |s: &str| rest.starts_with(s.as_bytes());
    let (kind, len) = if two("==") {
        (Eq, 2)
    } else if two("!=") {
        (Ne, 2)
    } else if two("<>") {
        (Diamond, 2)
    } else if two(">=") {
        (Ge, 2)
    } else if two("<=") {
        (Le, 2)
    } else if two("||") {
        (DoublePipe, 2)
    } else {
        match src[pos] {
            b'>' => (Gt, 1),
            b'<' => (Lt, 1),
            b'|' => (Pipe, 1),
            b':' => (Colon, 1),
            b',' => (Comma, 1),
            b'(' => (LParen, 1),
            b')' => (RParen, 1),
            b'=' => (Assign, 1),
            other => {
                return Err(SyntaxError::at(
                    pos,
                    SyntaxErrorKind::Other,
                    format!("unrecognized character '{}'", other as char),
                ))
            }
        }
    };
    Ok((ExpressionToken::new(Span::new(pos, pos + len), kind), pos + len))
}

/// `(` *arg* `..` *arg* `)` with only horizontal whitespace between tokens and no
/// newlines crossed (spec.md §4.2.3). If the pattern doesn't hold before any
/// committing token (`..`) is seen, this falls back to a plain `LParen` token and
/// lets the caller continue tokenizing normally from just past the `(`.
fn lex_paren_or_range(
    src: &[u8],
    pos: usize,
    max_depth: usize,
) -> Result<(ExpressionToken, usize), SyntaxError> {
    match try_lex_range(src, pos, max_depth) {
        Ok(Some((literal, end))) => Ok((
            ExpressionToken::new(Span::new(pos, end), ExpressionTokenKind::Range(literal)),
            end,
        )),
        Ok(None) => Ok((
            ExpressionToken::new(Span::new(pos, pos + 1), ExpressionTokenKind::LParen),
            pos + 1,
        )),
        Err(err) => Err(err),
    }
}

fn skip_horizontal_ws(src: &[u8], mut pos: usize) -> usize {
    while matches!(src.get(pos), Some(b' ') | Some(b'\t')) {
        pos += 1;
    }
    pos
}

fn try_lex_range_endpoint(
    src: &[u8],
    pos: usize,
    max_depth: usize,
) -> Result<Option<(RangeEndpoint, usize)>, SyntaxError> {
    match src.get(pos) {
        Some(b'\'') | Some(b'"') => {
            let (value, end) = lex_string(src, pos, false)?;
            Ok(Some((RangeEndpoint::Str(value), end)))
        }
        Some(b'$') | Some(b'[') => {
            let (query, end) = parse_query_at(src, pos, max_depth)?;
            Ok(Some((RangeEndpoint::Query(Box::new(query)), end)))
        }
        Some(c) if c.is_ascii_digit() || *c == b'-' => {
            let (number, end) = lex_number(src, pos)?;
            match number {
                Number::Int(v) => Ok(Some((RangeEndpoint::Int(v), end))),
                Number::Float(_, _) => Err(SyntaxError::at(
                    pos,
                    SyntaxErrorKind::Other,
                    "range endpoint must be an integer, string literal, or query",
                )),
            }
        }
        Some(_) => {
            if let Some((name, end)) = lex_name(src, pos, true) {
                let (query, query_end) = parse_query_at(src, pos, max_depth)?;
                debug_assert!(query_end >= end || name.is_empty());
                Ok(Some((RangeEndpoint::Query(Box::new(query)), query_end)))
            } else {
                Ok(None)
            }
        }
        None => Ok(None),
    }
}

fn try_lex_range(
    src: &[u8],
    open_pos: usize,
    max_depth: usize,
) -> Result<Option<(RangeLiteral, usize)>, SyntaxError> {
    let mut pos = skip_horizontal_ws(src, open_pos + 1);
    if matches!(src.get(pos), Some(b'\n') | Some(b'\r')) {
        return Ok(None);
    }
    let start = match try_lex_range_endpoint(src, pos, max_depth)? {
        Some((endpoint, end)) => {
            pos = end;
            endpoint
        }
        None => return Ok(None),
    };

    pos = skip_horizontal_ws(src, pos);
    if !src[pos..].starts_with(b"..") {
        // Not a range after all (e.g. a parenthesized logical group); the caller
        // falls back to a plain LParen and reprocesses from scratch.
        return Ok(None);
    }
    pos += 2;
    pos = skip_horizontal_ws(src, pos);

    // Past this point the `..` has committed us to a range literal: any failure
    // below is a real syntax error, not a cue to fall back to LParen.
    if matches!(src.get(pos), Some(b'\n') | Some(b'\r')) || pos >= src.len() {
        return Err(SyntaxError::at(
            open_pos,
            SyntaxErrorKind::Other,
            "range literal may not cross a newline",
        ));
    }
    let (stop, end) = try_lex_range_endpoint(src, pos, max_depth)?.ok_or_else(|| {
        SyntaxError::at(
            pos,
            SyntaxErrorKind::Other,
            "range endpoint must be an integer, string literal, or query",
        )
    })?;
    pos = skip_horizontal_ws(src, end);
    if src.get(pos) != Some(&b')') {
        return Err(SyntaxError::at(
            open_pos,
            SyntaxErrorKind::UnbalancedParens,
            "unterminated range literal, expected ')'",
        ));
    }
    pos += 1;

    Ok(Some((RangeLiteral { start, stop }, pos)))
}
