//! Advisory tree dump for debugging the front-end in isolation (spec.md §4.5, §6
//! "Diagnostic/dump format"). Not part of the stable contract.

use crate::error::SyntaxError;
use crate::expr::{ExpressionToken, ExpressionTokenKind, RangeEndpoint};
use crate::markup::{LiquidStatement, MarkupNode};
use crate::query::{ComparisonOp, FilterExpression, LogicalOp, Query, Root, Segment, SegmentKind, Selector};
use ptree::TreeItem;
use std::borrow::Cow;
use std::io;

/// A uniform, read-only tree view adapting this crate's several AST shapes
/// (`MarkupNode`, `ExpressionToken`, `Query`, ...) to `ptree::TreeItem`, the way the
/// teacher's `ASTNode<TNode>` does for its single generic node type.
#[derive(Clone)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl Tree {
    fn leaf(label: impl Into<String>) -> Self {
        Tree {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn node(label: impl Into<String>, children: Vec<Tree>) -> Self {
        Tree {
            label: label.into(),
            children,
        }
    }
}

impl TreeItem for Tree {
    type Child = Tree;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(&self.children)
    }
}

fn render(root: &Tree) -> String {
    let mut buf = Vec::new();
    ptree::write_tree(root, &mut buf).expect("writing to an in-memory Vec<u8> cannot fail");
    String::from_utf8(buf).expect("ptree only ever writes the UTF-8 labels we gave it")
}

/// Scan `src` and render its markup nodes as a tree (spec.md §4.5).
pub fn dump(src: &str) -> Result<String, SyntaxError> {
    let nodes = crate::markup::tokenize(src)?;
    let root = Tree::node(
        format!("Template #0-{}", src.len()),
        nodes.iter().map(markup_tree).collect(),
    );
    Ok(render(&root))
}

/// Parse `path` and render its query AST as a tree (spec.md §4.5).
pub fn dump_query(path: &str) -> Result<String, SyntaxError> {
    let query = crate::query::parse_query(path)?;
    Ok(render(&query_tree(&query)))
}

fn markup_tree(node: &MarkupNode) -> Tree {
    match node {
        MarkupNode::Content(c) => Tree::leaf(format!("Content #{}", c.span)),
        MarkupNode::Raw(r) => Tree::node(
            format!(
                "Raw #{} open=({:?},{:?}) close=({:?},{:?})",
                r.span, r.open_raw_left, r.open_raw_right, r.close_endraw_left, r.close_endraw_right
            ),
            vec![Tree::leaf(format!("body #{}", r.body))],
        ),
        MarkupNode::Comment(c) => Tree::leaf(format!(
            "Comment #{} fence={} body=#{}",
            c.span, c.fence_len, c.body
        )),
        MarkupNode::Output(o) => Tree::node(
            format!(
                "Output #{} open={:?} close={:?}",
                o.span, o.open_marker, o.close_marker
            ),
            o.tokens.iter().map(expr_token_tree).collect(),
        ),
        MarkupNode::Tag(t) => Tree::node(
            format!(
                "Tag({}) #{} open={:?} close={:?}",
                t.name, t.span, t.open_marker, t.close_marker
            ),
            t.tokens.iter().map(expr_token_tree).collect(),
        ),
        MarkupNode::Lines(l) => Tree::node(
            format!(
                "Lines #{} open={:?} close={:?}",
                l.span, l.open_marker, l.close_marker
            ),
            l.statements.iter().map(liquid_statement_tree).collect(),
        ),
        MarkupNode::Eoi(span) => Tree::leaf(format!("EOI #{}", span)),
    }
}

fn liquid_statement_tree(stmt: &LiquidStatement) -> Tree {
    match stmt {
        LiquidStatement::Comment(span) => Tree::leaf(format!("Comment #{}", span)),
        LiquidStatement::Tag {
            span,
            name,
            tokens,
            ..
        } => Tree::node(
            format!("Tag({}) #{}", name, span),
            tokens.iter().map(expr_token_tree).collect(),
        ),
    }
}

fn expr_token_tree(token: &ExpressionToken) -> Tree {
    let span = token.span;
    match &token.kind {
        ExpressionTokenKind::Query(q) => query_tree_labeled(q, span),
        ExpressionTokenKind::Range(r) => Tree::node(
            format!("Range #{}", span),
            vec![range_endpoint_tree("start", &r.start), range_endpoint_tree("stop", &r.stop)],
        ),
        kind => Tree::leaf(format!("{} #{}", describe_token_kind(kind), span)),
    }
}

fn range_endpoint_tree(label: &str, endpoint: &RangeEndpoint) -> Tree {
    match endpoint {
        RangeEndpoint::Int(v) => Tree::leaf(format!("{}: Int({})", label, v)),
        RangeEndpoint::Str(s) => Tree::leaf(format!("{}: Str({:?})", label, s)),
        RangeEndpoint::Query(q) => query_tree_labeled(q, q.span),
    }
}

fn describe_token_kind(kind: &ExpressionTokenKind) -> String {
    match kind {
        ExpressionTokenKind::True => "True".into(),
        ExpressionTokenKind::False => "False".into(),
        ExpressionTokenKind::Null => "Null".into(),
        ExpressionTokenKind::Integer(v) => format!("Integer({})", v),
        ExpressionTokenKind::Float(v, is_exponent) => {
            format!("Float({})", crate::expr::number::format_float(*v, *is_exponent))
        }
        ExpressionTokenKind::String(s) => format!("String({:?})", s),
        ExpressionTokenKind::Range(_) => "Range".into(),
        ExpressionTokenKind::Pipe => "Pipe".into(),
        ExpressionTokenKind::DoublePipe => "DoublePipe".into(),
        ExpressionTokenKind::Colon => "Colon".into(),
        ExpressionTokenKind::Comma => "Comma".into(),
        ExpressionTokenKind::Assign => "Assign".into(),
        ExpressionTokenKind::LParen => "LParen".into(),
        ExpressionTokenKind::RParen => "RParen".into(),
        ExpressionTokenKind::And => "And".into(),
        ExpressionTokenKind::Or => "Or".into(),
        ExpressionTokenKind::Not => "Not".into(),
        ExpressionTokenKind::In => "In".into(),
        ExpressionTokenKind::Contains => "Contains".into(),
        ExpressionTokenKind::Eq => "Eq".into(),
        ExpressionTokenKind::Ne => "Ne".into(),
        ExpressionTokenKind::Diamond => "Diamond".into(),
        ExpressionTokenKind::Lt => "Lt".into(),
        ExpressionTokenKind::Le => "Le".into(),
        ExpressionTokenKind::Gt => "Gt".into(),
        ExpressionTokenKind::Ge => "Ge".into(),
        ExpressionTokenKind::If => "If".into(),
        ExpressionTokenKind::Else => "Else".into(),
        ExpressionTokenKind::With => "With".into(),
        ExpressionTokenKind::As => "As".into(),
        ExpressionTokenKind::For => "For".into(),
        ExpressionTokenKind::Required => "Required".into(),
        ExpressionTokenKind::Word(w) => format!("Word({:?})", w),
        ExpressionTokenKind::Query(_) => "Query".into(),
    }
}

fn query_tree_labeled(query: &Query, span: crate::span::Span) -> Tree {
    let root = match query.root {
        Root::Explicit => "$",
        Root::Current => "@",
        Root::Implicit => "<implicit>",
    };
    Tree::node(
        format!("Query({}) #{}", root, span),
        query.segments.iter().map(segment_tree).collect(),
    )
}

fn query_tree(query: &Query) -> Tree {
    query_tree_labeled(query, query.span)
}

fn segment_tree(segment: &Segment) -> Tree {
    let kind = match segment.kind {
        SegmentKind::Child => "Child",
        SegmentKind::Recursive => "Recursive",
    };
    Tree::node(
        format!("{} #{}", kind, segment.span),
        segment.selectors.iter().map(selector_tree).collect(),
    )
}

fn selector_tree(selector: &Selector) -> Tree {
    match selector {
        Selector::Name(n) => Tree::leaf(format!("Name({:?}) #{}", n.value, n.span)),
        Selector::Index(i) => Tree::leaf(format!("Index({}) #{}", i.value, i.span)),
        Selector::Slice(s) => Tree::leaf(format!(
            "Slice({:?}, {:?}, {:?}) #{}",
            s.start, s.stop, s.step, s.span
        )),
        Selector::Wild(span) => Tree::leaf(format!("Wild #{}", span)),
        Selector::Filter(f) => Tree::node(format!("Filter #{}", f.span), vec![filter_tree(&f.expr)]),
        Selector::SingularQuery(s) => Tree::node(
            format!("SingularQuery #{}", s.span),
            vec![query_tree(&s.query)],
        ),
    }
}

fn filter_tree(expr: &FilterExpression) -> Tree {
    match expr {
        FilterExpression::True(span) => Tree::leaf(format!("True #{}", span)),
        FilterExpression::False(span) => Tree::leaf(format!("False #{}", span)),
        FilterExpression::Null(span) => Tree::leaf(format!("Null #{}", span)),
        FilterExpression::Int(span, v) => Tree::leaf(format!("Int({}) #{}", v, span)),
        FilterExpression::Float(span, v, is_exponent) => Tree::leaf(format!(
            "Float({}) #{}",
            crate::expr::number::format_float(*v, *is_exponent),
            span
        )),
        FilterExpression::Str(span, s) => Tree::leaf(format!("Str({:?}) #{}", s, span)),
        FilterExpression::Not(span, inner) => {
            Tree::node(format!("Not #{}", span), vec![filter_tree(inner)])
        }
        FilterExpression::Logical(span, l, op, r) => {
            let op = match op {
                LogicalOp::And => "And",
                LogicalOp::Or => "Or",
            };
            Tree::node(format!("Logical({}) #{}", op, span), vec![filter_tree(l), filter_tree(r)])
        }
        FilterExpression::Comparison(span, l, op, r) => {
            let op = match op {
                ComparisonOp::Eq => "Eq",
                ComparisonOp::Ne => "Ne",
                ComparisonOp::Ge => "Ge",
                ComparisonOp::Gt => "Gt",
                ComparisonOp::Le => "Le",
                ComparisonOp::Lt => "Lt",
            };
            Tree::node(
                format!("Comparison({}) #{}", op, span),
                vec![filter_tree(l), filter_tree(r)],
            )
        }
        FilterExpression::RelativeQuery(span, q) => {
            Tree::node(format!("RelativeQuery #{}", span), vec![query_tree(q)])
        }
        FilterExpression::RootQuery(span, q) => {
            Tree::node(format!("RootQuery #{}", span), vec![query_tree(q)])
        }
        FilterExpression::Function(span, name, args) => Tree::node(
            format!("Function({}) #{}", name, span),
            args.iter().map(filter_tree).collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_renders_a_tree_with_spans() {
        let text = dump("{{ a.b[0] }}").unwrap();
        assert!(text.contains("Template"));
        assert!(text.contains("Output"));
        assert!(text.contains("Query"));
    }

    #[test]
    fn dump_query_renders_segments_and_selectors() {
        let text = dump_query("$.a.b[-1]").unwrap();
        assert!(text.contains("Query($)"));
        assert!(text.contains("Name(\"a\")"));
        assert!(text.contains("Index(-1)"));
    }

    #[test]
    fn dump_propagates_syntax_errors() {
        assert!(dump("{{ unterminated").is_err());
        assert!(dump_query("$[::0]").is_err());
    }
}
