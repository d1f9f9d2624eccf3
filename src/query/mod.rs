//! JSONPath-derived query parser (component B, spec.md §4.3).
//!
//! A [Query] is an ordered sequence of [Segment]s, each carrying one or more
//! [Selector]s. This parser is reentrant: it is invoked directly via [parse_query]
//! and [parse_jsonpath_query], and internally by the [expr](crate::expr) tokenizer
//! whenever a bare word's lookahead turns out to be `.` or `[`.

pub mod ast;
mod filter;
pub(crate) mod parser;
pub mod singular;

pub use ast::{
    ComparisonOp, FilterExpression, FilterSelector, IndexSelector, LogicalOp, NameSelector, Query,
    Root, Segment, SegmentKind, Selector, SingularQuerySelector, SliceSelector,
};
pub use parser::{parse_jsonpath_query, parse_query, QueryParser, DEFAULT_MAX_DEPTH};
pub(crate) use parser::parse_query_at;
pub use singular::{is_singular, validate_singular};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_selector_relative_comparison() {
        let q = parse_query("$[?@.x == 1]").unwrap();
        match &q.segments[0].selectors[0] {
            Selector::Filter(f) => match &f.expr {
                FilterExpression::Comparison(_, left, ComparisonOp::Eq, right) => {
                    assert!(matches!(**left, FilterExpression::RelativeQuery(..)));
                    assert!(matches!(**right, FilterExpression::Int(_, 1)));
                }
                other => panic!("expected comparison, got {:?}", other),
            },
            other => panic!("expected filter selector, got {:?}", other),
        }
    }

    #[test]
    fn filter_existence_query_need_not_be_singular() {
        // @.x is already singular here, but the key property under test is that a
        // bare filter query (no comparison) is accepted without invoking the
        // singular-query check at all.
        let q = parse_query("$[?@.x]").unwrap();
        assert!(matches!(q.segments[0].selectors[0], Selector::Filter(_)));
    }

    #[test]
    fn filter_rejects_non_singular_comparison_operand() {
        let err = parse_query("$[?@.* == 1]").unwrap_err();
        assert_eq!(err.kind, crate::error::SyntaxErrorKind::NonSingularQuery);
    }

    #[test]
    fn filter_function_call_with_args() {
        let q = parse_query("$[?length(@.a) > 0]").unwrap();
        match &q.segments[0].selectors[0] {
            Selector::Filter(f) => match &f.expr {
                FilterExpression::Comparison(_, left, ComparisonOp::Gt, _) => {
                    assert!(matches!(**left, FilterExpression::Function(_, ref name, _) if name == "length"));
                }
                other => panic!("expected comparison, got {:?}", other),
            },
            other => panic!("expected filter selector, got {:?}", other),
        }
    }

    #[test]
    fn filter_logical_precedence() {
        // `!a == b && c` should parse as `(!(a == b)) && c` per spec.md §4.3's
        // stated precedence (comparison binds tighter than unary `!`).
        let q = parse_query("$[?!@.a == 1 && @.b == 2]").unwrap();
        match &q.segments[0].selectors[0] {
            Selector::Filter(f) => match &f.expr {
                FilterExpression::Logical(_, left, LogicalOp::And, _) => {
                    assert!(matches!(**left, FilterExpression::Not(..)));
                }
                other => panic!("expected logical-and, got {:?}", other),
            },
            other => panic!("expected filter selector, got {:?}", other),
        }
    }

    #[test]
    fn unknown_function_name_is_not_a_parse_error() {
        assert!(parse_query("$[?totally_unregistered_fn(@.a) == 1]").is_ok());
    }
}
