use crate::query::Query;
use crate::span::Span;

/// One lexical unit inside an output or tag body (spec.md §3 "Expression token").
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionToken {
    pub span: Span,
    pub kind: ExpressionTokenKind,
}

impl ExpressionToken {
    pub fn new(span: Span, kind: ExpressionTokenKind) -> Self {
        Self { span, kind }
    }
}

/// A range literal endpoint: integer, string, or query (spec.md §3 invariant on
/// range-literal endpoints — deliberately narrower than a general numeric literal,
/// since strings are "intended to coerce to integers downstream").
#[derive(Debug, Clone, PartialEq)]
pub enum RangeEndpoint {
    Int(i64),
    Str(String),
    Query(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeLiteral {
    pub start: RangeEndpoint,
    pub stop: RangeEndpoint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionTokenKind {
    True,
    False,
    Null,
    Integer(i64),
    /// The `bool` records whether the literal used exponent notation (`1e2`); see
    /// [crate::expr::number::format_float] for why that distinction matters.
    Float(f64, bool),
    String(String),
    Range(RangeLiteral),

    Pipe,
    DoublePipe,
    Colon,
    Comma,
    Assign,
    LParen,
    RParen,

    And,
    Or,
    Not,

    In,
    Contains,

    Eq,
    Ne,
    /// `<>`, a secondary inequality spelling (spec.md §3/§6).
    Diamond,
    Lt,
    Le,
    Gt,
    Ge,

    If,
    Else,
    With,
    As,
    For,
    Required,

    Word(String),
    Query(Box<Query>),
}
