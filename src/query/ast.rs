use crate::span::Span;

/// How a query's first segment is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// `$` — the document root.
    Explicit,
    /// `@` — the current filter context; only produced inside filter expressions.
    Current,
    /// No root marker consumed: the first segment is itself the implicit root
    /// segment (a bare shorthand name or a bracketed selection), per spec.md §4.3.
    Implicit,
}

/// A parsed JSONPath-derived path expression (spec.md §3/§4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub span: Span,
    pub root: Root,
    pub segments: Vec<Segment>,
}

impl Query {
    pub fn new(span: Span, root: Root, segments: Vec<Segment>) -> Self {
        Self {
            span,
            root,
            segments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Child,
    Recursive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub span: Span,
    pub kind: SegmentKind,
    pub selectors: Vec<Selector>,
}

impl Segment {
    pub fn new(span: Span, kind: SegmentKind, selectors: Vec<Selector>) -> Self {
        Self {
            span,
            kind,
            selectors,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Name(NameSelector),
    Index(IndexSelector),
    Slice(SliceSelector),
    Wild(Span),
    Filter(FilterSelector),
    SingularQuery(SingularQuerySelector),
}

impl Selector {
    pub fn span(&self) -> Span {
        match self {
            Selector::Name(n) => n.span,
            Selector::Index(i) => i.span,
            Selector::Slice(s) => s.span,
            Selector::Wild(s) => *s,
            Selector::Filter(f) => f.span,
            Selector::SingularQuery(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameSelector {
    pub span: Span,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelector {
    pub span: Span,
    pub value: i64,
}

/// `start? : stop? ( : step? )?`. Missing bounds are `None`, never coerced to `0`
/// (spec.md §4.3, "Negative indices and slice bounds").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSelector {
    pub span: Span,
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelector {
    pub span: Span,
    pub expr: FilterExpression,
}

/// `SingularQuery` bracket selector: a nested path used as a dynamic key/index into
/// another (spec.md §4.3). Structural validity (only `Name`/`Index` child segments)
/// is checked post-parse by [crate::query::singular::validate_singular].
#[derive(Debug, Clone, PartialEq)]
pub struct SingularQuerySelector {
    pub span: Span,
    pub query: Box<Query>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    True(Span),
    False(Span),
    Null(Span),
    Int(Span, i64),
    /// The trailing `bool` records whether the literal used exponent notation, the
    /// same distinction [crate::expr::token::ExpressionTokenKind::Float] carries.
    Float(Span, f64, bool),
    Str(Span, String),
    Not(Span, Box<FilterExpression>),
    Logical(Span, Box<FilterExpression>, LogicalOp, Box<FilterExpression>),
    Comparison(
        Span,
        Box<FilterExpression>,
        ComparisonOp,
        Box<FilterExpression>,
    ),
    /// A query rooted at the current filter context (`@...`).
    RelativeQuery(Span, Box<Query>),
    /// A query rooted at the document root, used inside a filter (`$...`).
    RootQuery(Span, Box<Query>),
    Function(Span, String, Vec<FilterExpression>),
}

impl FilterExpression {
    pub fn span(&self) -> Span {
        match self {
            FilterExpression::True(s)
            | FilterExpression::False(s)
            | FilterExpression::Null(s)
            | FilterExpression::Int(s, _)
            | FilterExpression::Float(s, ..)
            | FilterExpression::Str(s, _)
            | FilterExpression::Not(s, _)
            | FilterExpression::Logical(s, ..)
            | FilterExpression::Comparison(s, ..)
            | FilterExpression::RelativeQuery(s, _)
            | FilterExpression::RootQuery(s, _)
            | FilterExpression::Function(s, ..) => *s,
        }
    }
}
