//! Markup scanner (component D, spec.md §4.1).
//!
//! Partitions raw template source into a flat [MarkupNode] list terminated by
//! [MarkupNode::Eoi], delegating output/tag/liquid-statement bodies to
//! [crate::expr::tokenize_expression].

mod liquid;
mod node;
mod scanner;

pub use node::{
    CommentNode, ContentNode, LinesNode, LiquidStatement, MarkupNode, OutputNode, RawNode, TagNode,
};
pub use scanner::Scanner;

use crate::error::SyntaxError;

/// Scan `source` into its markup nodes, ending in [MarkupNode::Eoi] (spec.md §4.5).
pub fn tokenize(source: &str) -> Result<Vec<MarkupNode>, SyntaxError> {
    Scanner::new(source).scan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExpressionTokenKind;
    use crate::query::{Root, Selector};

    #[test]
    fn content_run_up_to_delimiter() {
        let nodes = tokenize("hello {{ x }}").unwrap();
        match &nodes[0] {
            MarkupNode::Content(c) => assert_eq!(c.span.slice("hello {{ x }}"), "hello "),
            other => panic!("expected content, got {:?}", other),
        }
        assert!(matches!(nodes[1], MarkupNode::Output(_)));
        assert!(matches!(nodes[2], MarkupNode::Eoi(_)));
    }

    #[test]
    fn output_string_literal() {
        let nodes = tokenize("{{ 'a' }}").unwrap();
        match &nodes[0] {
            MarkupNode::Output(o) => {
                assert_eq!(o.tokens.len(), 1);
                assert_eq!(o.tokens[0].kind, ExpressionTokenKind::String("a".into()));
            }
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn output_range_literal() {
        let nodes = tokenize("{{ (1..3) }}").unwrap();
        match &nodes[0] {
            MarkupNode::Output(o) => assert_eq!(o.tokens.len(), 1),
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn output_query_with_index() {
        let nodes = tokenize("{{ a.b[0] }}").unwrap();
        match &nodes[0] {
            MarkupNode::Output(o) => {
                assert_eq!(o.tokens.len(), 1);
                match &o.tokens[0].kind {
                    ExpressionTokenKind::Query(q) => {
                        assert_eq!(q.root, Root::Implicit);
                        assert_eq!(q.segments.len(), 3);
                        assert!(matches!(q.segments[2].selectors[0], Selector::Index(_)));
                    }
                    other => panic!("expected query token, got {:?}", other),
                }
            }
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn output_bracket_only_query() {
        let nodes = tokenize("{{ ['a b c'] }}").unwrap();
        match &nodes[0] {
            MarkupNode::Output(o) => match &o.tokens[0].kind {
                ExpressionTokenKind::Query(q) => {
                    assert_eq!(q.root, Root::Implicit);
                    assert_eq!(q.segments.len(), 1);
                    match &q.segments[0].selectors[0] {
                        Selector::Name(n) => assert_eq!(n.value, "a b c"),
                        other => panic!("expected name selector, got {:?}", other),
                    }
                }
                other => panic!("expected query token, got {:?}", other),
            },
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn if_contains_tag_pair() {
        let nodes = tokenize("{% if a contains 5 %}x{% endif %}").unwrap();
        match &nodes[0] {
            MarkupNode::Tag(t) => {
                assert_eq!(t.name, "if");
                assert_eq!(
                    t.tokens.iter().map(|tk| tk.kind.clone()).collect::<Vec<_>>(),
                    vec![
                        ExpressionTokenKind::Word("a".into()),
                        ExpressionTokenKind::Contains,
                        ExpressionTokenKind::Integer(5),
                    ]
                );
            }
            other => panic!("expected tag, got {:?}", other),
        }
        assert!(matches!(nodes[1], MarkupNode::Content(_)));
        match &nodes[2] {
            MarkupNode::Tag(t) => assert_eq!(t.name, "endif"),
            other => panic!("expected endif tag, got {:?}", other),
        }
    }

    #[test]
    fn comment_with_different_length_inner_fence() {
        let nodes = tokenize("{# a {# nested #} b #}").unwrap();
        match &nodes[0] {
            MarkupNode::Comment(c) => {
                assert_eq!(c.fence_len, 1);
                assert_eq!(
                    c.body.slice("{# a {# nested #} b #}"),
                    " a {# nested "
                );
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn comment_fence_length_matching_skips_shorter_inner_fence() {
        let nodes = tokenize("{## a #} b ##}").unwrap();
        match &nodes[0] {
            MarkupNode::Comment(c) => {
                assert_eq!(c.fence_len, 2);
                assert_eq!(c.body.slice("{## a #} b ##}"), " a #} b ");
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn raw_block_is_not_interpreted() {
        let src = "{% raw %}{{ x }}{% endraw %}";
        let nodes = tokenize(src).unwrap();
        match &nodes[0] {
            MarkupNode::Raw(r) => assert_eq!(r.body.slice(src), "{{ x }}"),
            other => panic!("expected raw, got {:?}", other),
        }
        assert!(matches!(nodes[1], MarkupNode::Eoi(_)));
    }

    #[test]
    fn liquid_block_has_newline_terminated_statements() {
        let src = "{% liquid\n assign x = 1 \n echo x %}";
        let nodes = tokenize(src).unwrap();
        match &nodes[0] {
            MarkupNode::Lines(l) => {
                assert_eq!(l.statements.len(), 2);
                match &l.statements[0] {
                    LiquidStatement::Tag { name, tokens, .. } => {
                        assert_eq!(name, "assign");
                        assert_eq!(
                            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
                            vec![
                                ExpressionTokenKind::Word("x".into()),
                                ExpressionTokenKind::Assign,
                                ExpressionTokenKind::Integer(1),
                            ]
                        );
                    }
                    other => panic!("expected tag statement, got {:?}", other),
                }
                match &l.statements[1] {
                    LiquidStatement::Tag { name, tokens, .. } => {
                        assert_eq!(name, "echo");
                        assert_eq!(tokens.len(), 1);
                    }
                    other => panic!("expected tag statement, got {:?}", other),
                }
            }
            other => panic!("expected liquid lines, got {:?}", other),
        }
    }

    #[test]
    fn liquid_line_comment() {
        let src = "{% liquid\n # a note\n echo 1 %}";
        let nodes = tokenize(src).unwrap();
        match &nodes[0] {
            MarkupNode::Lines(l) => {
                assert_eq!(l.statements.len(), 2);
                assert!(matches!(l.statements[0], LiquidStatement::Comment(_)));
            }
            other => panic!("expected liquid lines, got {:?}", other),
        }
    }

    #[test]
    fn string_containing_closer_lookalike_does_not_close_output() {
        let nodes = tokenize("{{ '}}' }}").unwrap();
        match &nodes[0] {
            MarkupNode::Output(o) => {
                assert_eq!(o.tokens.len(), 1);
                assert_eq!(o.tokens[0].kind, ExpressionTokenKind::String("}}".into()));
            }
            other => panic!("expected output, got {:?}", other),
        }
        assert!(matches!(nodes[1], MarkupNode::Eoi(_)));
    }

    #[test]
    fn unterminated_raw_is_an_error() {
        let err = tokenize("{% raw %}abc").unwrap_err();
        assert_eq!(err.kind, crate::error::SyntaxErrorKind::UnterminatedRaw);
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let err = tokenize("{# abc").unwrap_err();
        assert_eq!(err.kind, crate::error::SyntaxErrorKind::UnterminatedComment);
    }

    #[test]
    fn whitespace_control_markers_are_captured() {
        let nodes = tokenize("{{- a -}}").unwrap();
        match &nodes[0] {
            MarkupNode::Output(o) => {
                assert_eq!(o.open_marker, crate::span::WhitespaceControl::Minus);
                assert_eq!(o.close_marker, crate::span::WhitespaceControl::Minus);
            }
            other => panic!("expected output, got {:?}", other),
        }
    }
}
