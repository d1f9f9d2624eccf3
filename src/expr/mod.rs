//! Expression tokenizer (component B, spec.md §4.2).
//!
//! An output body (`{{ ... }}`), a tag body (`{% ... %}`), and each line of a
//! `{% liquid %}` block are all lexed by the same [ExpressionToken] grammar; only the
//! terminating condition differs (a closing delimiter vs. an unescaped newline),
//! which is why [tokenize_expression] takes the closer and newline sensitivity as
//! parameters rather than being three separate scanners.

pub(crate) mod number;
pub(crate) mod string;
mod token;
mod tokenizer;

pub use number::Number;
pub use string::unescape_string;
pub use token::{ExpressionToken, ExpressionTokenKind, RangeEndpoint, RangeLiteral};
pub(crate) use tokenizer::tokenize_expression;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxErrorKind;
    use crate::span::Span;

    fn tokenize(body: &str) -> Vec<ExpressionToken> {
        let src = body.as_bytes();
        let (tokens, end) = tokenize_expression(
            src,
            0,
            b"",
            false,
            crate::query::DEFAULT_MAX_DEPTH,
            SyntaxErrorKind::UnterminatedOutput,
            Span::new(0, 0),
        )
        .unwrap();
        assert_eq!(end, src.len());
        tokens
    }

    #[test]
    fn string_literal() {
        let tokens = tokenize("'a'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, ExpressionTokenKind::String("a".into()));
    }

    #[test]
    fn integer_and_float() {
        let tokens = tokenize("1 1.5");
        assert_eq!(tokens[0].kind, ExpressionTokenKind::Integer(1));
        assert_eq!(tokens[1].kind, ExpressionTokenKind::Float(1.5, false));
    }

    #[test]
    fn range_literal() {
        let tokens = tokenize("(1..3)");
        assert_eq!(tokens.len(), 1);
        match &tokens[0].kind {
            ExpressionTokenKind::Range(r) => {
                assert_eq!(r.start, RangeEndpoint::Int(1));
                assert_eq!(r.stop, RangeEndpoint::Int(3));
            }
            other => panic!("expected range, got {:?}", other),
        }
    }

    #[test]
    fn parenthesized_group_is_not_a_range() {
        let tokens = tokenize("(a and b)");
        assert_eq!(tokens[0].kind, ExpressionTokenKind::LParen);
        assert!(matches!(tokens[1].kind, ExpressionTokenKind::Word(_)));
        assert_eq!(tokens[2].kind, ExpressionTokenKind::And);
        assert!(matches!(tokens[3].kind, ExpressionTokenKind::Word(_)));
        assert_eq!(tokens[4].kind, ExpressionTokenKind::RParen);
    }

    #[test]
    fn word_vs_query_lookahead() {
        let tokens = tokenize("a");
        assert_eq!(tokens[0].kind, ExpressionTokenKind::Word("a".into()));

        let tokens = tokenize("a.b[0]");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, ExpressionTokenKind::Query(_)));
    }

    #[test]
    fn bracket_starts_a_query_even_without_a_leading_word() {
        let tokens = tokenize("['a b c']");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0].kind, ExpressionTokenKind::Query(_)));
    }

    #[test]
    fn reserved_word_boundary() {
        let tokens = tokenize("iftrue");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, ExpressionTokenKind::Word("iftrue".into()));

        let tokens = tokenize("if");
        assert_eq!(tokens[0].kind, ExpressionTokenKind::If);
    }

    #[test]
    fn symbols_longest_match_first() {
        let tokens = tokenize("<> <= >= == != || |");
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                ExpressionTokenKind::Diamond,
                ExpressionTokenKind::Le,
                ExpressionTokenKind::Ge,
                ExpressionTokenKind::Eq,
                ExpressionTokenKind::Ne,
                ExpressionTokenKind::DoublePipe,
                ExpressionTokenKind::Pipe,
            ]
        );
    }

    #[test]
    fn contains_tag_body() {
        let tokens = tokenize("a contains 5");
        assert_eq!(tokens[0].kind, ExpressionTokenKind::Word("a".into()));
        assert_eq!(tokens[1].kind, ExpressionTokenKind::Contains);
        assert_eq!(tokens[2].kind, ExpressionTokenKind::Integer(5));
    }

    #[test]
    fn stops_at_closer_without_consuming_it() {
        let src = b"a }}";
        let (tokens, end) = tokenize_expression(
            src,
            0,
            b"}}",
            false,
            crate::query::DEFAULT_MAX_DEPTH,
            SyntaxErrorKind::UnterminatedOutput,
            Span::new(0, 0),
        )
        .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(&src[end..], b"}}");
    }

    #[test]
    fn string_containing_closer_lookalike_does_not_end_the_body() {
        let src = b"'}}' }}";
        let (tokens, end) = tokenize_expression(
            src,
            0,
            b"}}",
            false,
            crate::query::DEFAULT_MAX_DEPTH,
            SyntaxErrorKind::UnterminatedOutput,
            Span::new(0, 0),
        )
        .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, ExpressionTokenKind::String("}}".into()));
        assert_eq!(&src[end..], b"}}");
    }

    #[test]
    fn newline_terminated_liquid_line() {
        let src = b"a = 1\nb = 2";
        let (tokens, end) = tokenize_expression(
            src,
            0,
            b"",
            true,
            crate::query::DEFAULT_MAX_DEPTH,
            SyntaxErrorKind::UnterminatedTag,
            Span::new(0, 0),
        )
        .unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                ExpressionTokenKind::Word("a".into()),
                ExpressionTokenKind::Assign,
                ExpressionTokenKind::Integer(1),
            ]
        );
        assert_eq!(&src[end..], b"\nb = 2");
    }

    #[test]
    fn unterminated_output_body_is_an_error() {
        let err = tokenize_expression(
            b"a",
            0,
            b"}}",
            false,
            crate::query::DEFAULT_MAX_DEPTH,
            SyntaxErrorKind::UnterminatedOutput,
            Span::new(0, 1),
        )
        .unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedOutput);
    }
}
