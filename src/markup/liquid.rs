use super::node::LiquidStatement;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::expr::tokenize_expression;
use crate::ident::lex_name;
use crate::span::{Span, WhitespaceControl};

/// Parse the body of a `{% liquid ... %}` block starting just past the `liquid`
/// name (spec.md §4.1). Returns the statements, the whitespace marker on the closing
/// `%}`, and the byte offset just past that `%}`.
pub(crate) fn parse_liquid_body(
    src: &[u8],
    mut pos: usize,
    max_depth: usize,
    opening_span: Span,
) -> Result<(Vec<LiquidStatement>, WhitespaceControl, usize), SyntaxError> {
    let mut statements = Vec::new();

    loop {
        while matches!(src.get(pos), Some(b' ') | Some(b'\t')) {
            pos += 1;
        }

        match src.get(pos) {
            None => return Err(unterminated(opening_span)),
            Some(b'\r') if src.get(pos + 1) == Some(&b'\n') => {
                pos += 2;
                continue;
            }
            Some(b'\n') => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let (marker, mlen) = WhitespaceControl::consume(src, pos);
        if src[pos + mlen..].starts_with(b"%}") {
            return Ok((statements, marker, pos + mlen + 2));
        }

        if src[pos] == b'#' {
            let start = pos;
            while !matches!(src.get(pos), None | Some(b'\n') | Some(b'\r')) {
                pos += 1;
            }
            statements.push(LiquidStatement::Comment(Span::new(start, pos)));
            continue;
        }

        let start = pos;
        let (name, name_end) = lex_name(src, pos, true).ok_or_else(|| {
            SyntaxError::at(
                pos,
                SyntaxErrorKind::Other,
                "expected a liquid statement name, a '#' line comment, or the closing '%}'",
            )
        })?;
        let name_span = Span::new(pos, name_end);
        pos = name_end;
        while matches!(src.get(pos), Some(b' ') | Some(b'\t')) {
            pos += 1;
        }

        let (tokens, end) = tokenize_expression(
            src,
            pos,
            b"%}",
            true,
            max_depth,
            SyntaxErrorKind::UnterminatedTag,
            opening_span,
        )?;
        pos = end;
        statements.push(LiquidStatement::Tag {
            span: Span::new(start, pos),
            name,
            name_span,
            tokens,
        });

        let (marker, mlen) = WhitespaceControl::consume(src, pos);
        if src[pos + mlen..].starts_with(b"%}") {
            return Ok((statements, marker, pos + mlen + 2));
        }

        match src.get(pos) {
            Some(b'\r') if src.get(pos + 1) == Some(&b'\n') => pos += 2,
            Some(b'\n') => pos += 1,
            _ => return Err(unterminated(opening_span)),
        }
    }
}

fn unterminated(opening_span: Span) -> SyntaxError {
    SyntaxError::new(
        opening_span,
        SyntaxErrorKind::UnterminatedTag,
        "unterminated '{% liquid %}' block",
    )
}
