use crate::span::Span;
use std::fmt::{Display, Formatter};

/// The kind of grammar violation a [SyntaxError] reports.
///
/// `TypeError`, `NameError` and `ExtensionError` are declared here, unconstructed, so
/// that a downstream evaluator sharing this error type does not need a parallel enum
/// of its own (see spec.md §7); this front-end never returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnterminatedRaw,
    UnterminatedComment,
    UnterminatedTag,
    UnterminatedOutput,
    UnterminatedString,
    InvalidEscape,
    UnknownWhitespaceMarker,
    UnterminatedBracket,
    MissingSelector,
    EmptySelectorList,
    UnbalancedParens,
    ZeroStep,
    NonSingularQuery,
    NumericOverflow,
    TrailingInput,
    NestingTooDeep,
    /// Reserved for downstream collaborators; never emitted by this crate.
    TypeError,
    /// Reserved for downstream collaborators; never emitted by this crate.
    NameError,
    /// Reserved for downstream collaborators; never emitted by this crate.
    ExtensionError,
    Other,
}

/// A single grammar violation surfaced with its span and a human-readable message.
///
/// Parsing in this crate is fail-fast: the first [SyntaxError] encountered aborts the
/// pass and is returned to the caller. No partial AST is ever returned alongside it.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub span: Span,
    pub kind: SyntaxErrorKind,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, kind: SyntaxErrorKind, message: impl Into<String>) -> Self {
        Self {
            span,
            kind,
            message: message.into(),
        }
    }

    pub fn at(pos: usize, kind: SyntaxErrorKind, message: impl Into<String>) -> Self {
        Self::new(Span::new(pos, pos), kind, message)
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SyntaxError: {} (at {}-{})",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for SyntaxError {}

pub type Result<T> = std::result::Result<T, SyntaxError>;
