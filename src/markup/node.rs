use crate::expr::ExpressionToken;
use crate::span::{Span, WhitespaceControl};

/// One top-level template syntactic unit (spec.md §3 "Markup node").
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Content(ContentNode),
    Raw(RawNode),
    Comment(CommentNode),
    Output(OutputNode),
    Tag(TagNode),
    Lines(LinesNode),
    Eoi(Span),
}

impl MarkupNode {
    pub fn span(&self) -> Span {
        match self {
            MarkupNode::Content(n) => n.span,
            MarkupNode::Raw(n) => n.span,
            MarkupNode::Comment(n) => n.span,
            MarkupNode::Output(n) => n.span,
            MarkupNode::Tag(n) => n.span,
            MarkupNode::Lines(n) => n.span,
            MarkupNode::Eoi(s) => *s,
        }
    }
}

/// Raw text between template constructs. Always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    pub span: Span,
}

/// `{% raw %} ... {% endraw %}`. Four whitespace-control markers, one per
/// delimiter edge (spec.md §5 of SPEC_FULL.md, supplementing spec.md §3's "two" with
/// the original's four-edge behavior).
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub span: Span,
    /// Verbatim body between the opening `%}` and the `{%` that starts `endraw`.
    /// No nested templating is recognized inside it.
    pub body: Span,
    pub open_raw_left: WhitespaceControl,
    pub open_raw_right: WhitespaceControl,
    pub close_endraw_left: WhitespaceControl,
    pub close_endraw_right: WhitespaceControl,
}

/// `{#...#}` with a fence length equal to the run of `#` characters after `{`.
/// The closing edge may carry a whitespace-control marker (spec.md §4.1); the
/// opening edge has none, since the opening delimiter is the fence itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub span: Span,
    pub body: Span,
    pub fence_len: usize,
    pub close_marker: WhitespaceControl,
}

/// `{{ ... }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNode {
    pub span: Span,
    pub open_marker: WhitespaceControl,
    pub close_marker: WhitespaceControl,
    pub tokens: Vec<ExpressionToken>,
}

/// `{% name ... %}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TagNode {
    pub span: Span,
    pub open_marker: WhitespaceControl,
    pub close_marker: WhitespaceControl,
    pub name: String,
    pub name_span: Span,
    pub tokens: Vec<ExpressionToken>,
}

/// One sub-statement of a `{% liquid %}` block (spec.md §4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum LiquidStatement {
    /// A `# ...` line, consumed verbatim to end of line.
    Comment(Span),
    /// A name plus an optional space-separated expression, scanned with newline
    /// sensitivity — tokens on one statement may not straddle a line break.
    Tag {
        span: Span,
        name: String,
        name_span: Span,
        tokens: Vec<ExpressionToken>,
    },
}

/// `{% liquid ... %}`, a sequence of line-oriented sub-statements.
#[derive(Debug, Clone, PartialEq)]
pub struct LinesNode {
    pub span: Span,
    pub open_marker: WhitespaceControl,
    pub close_marker: WhitespaceControl,
    pub statements: Vec<LiquidStatement>,
}
