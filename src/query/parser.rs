use super::ast::{
    IndexSelector, NameSelector, Query, Root, Segment, SegmentKind, Selector, SingularQuerySelector,
    SliceSelector,
};
use super::singular::validate_singular;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::expr::number::{lex_number, Number};
use crate::expr::string::lex_string;
use crate::ident::lex_name;
use crate::span::Span;

/// Default maximum nesting depth for delimited constructs (spec.md §5).
pub const DEFAULT_MAX_DEPTH: usize = 256;

pub(crate) struct Parser<'a> {
    pub(crate) src: &'a [u8],
    pub(crate) strict: bool,
    pub(crate) max_depth: usize,
    pub(crate) pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a [u8], start: usize, strict: bool, max_depth: usize) -> Self {
        Self {
            src,
            strict,
            max_depth,
            pos: start,
        }
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    pub(crate) fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')) {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_str(&mut self, s: &str) -> bool {
        let bytes = s.as_bytes();
        if self.src[self.pos..].starts_with(bytes) {
            self.pos += bytes.len();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(
        &mut self,
        byte: u8,
        kind: SyntaxErrorKind,
        message: &str,
    ) -> Result<(), SyntaxError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(SyntaxError::at(self.pos, kind, message))
        }
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), SyntaxError> {
        if depth > self.max_depth {
            Err(SyntaxError::at(
                self.pos,
                SyntaxErrorKind::NestingTooDeep,
                format!(
                    "nesting exceeds the maximum supported depth ({})",
                    self.max_depth
                ),
            ))
        } else {
            Ok(())
        }
    }

    /// Parse a full query starting at `self.pos`, returning once no further segment
    /// can be recognized. Does not require the rest of the input to be consumed —
    /// callers needing "whole input consumed" semantics (the public `parse_query`
    /// entry) check `self.pos == self.src.len()` themselves.
    pub(crate) fn parse_query(&mut self, depth: usize) -> Result<Query, SyntaxError> {
        self.check_depth(depth)?;
        let start = self.pos;
        let root = if self.eat(b'$') {
            Root::Explicit
        } else if self.eat(b'@') {
            Root::Current
        } else {
            Root::Implicit
        };

        let mut segments = Vec::new();
        if root == Root::Implicit {
            segments.push(self.parse_implicit_root_segment(depth)?);
        }
        self.parse_segments(depth, &mut segments)?;

        let end = self.pos;
        Ok(Query::new(Span::new(start, end), root, segments))
    }

    /// The first segment of an implicit-root query: either a bare shorthand member
    /// name or a bracketed selection (spec.md §4.3).
    fn parse_implicit_root_segment(&mut self, depth: usize) -> Result<Segment, SyntaxError> {
        let start = self.pos;
        if self.peek() == Some(b'[') {
            let selectors = self.parse_bracket_selection(depth)?;
            Ok(Segment::new(
                Span::new(start, self.pos),
                SegmentKind::Child,
                selectors,
            ))
        } else if let Some((name, end)) = lex_name(self.src, self.pos, !self.strict) {
            self.pos = end;
            Ok(Segment::new(
                Span::new(start, end),
                SegmentKind::Child,
                vec![Selector::Name(NameSelector {
                    span: Span::new(start, end),
                    value: name,
                })],
            ))
        } else {
            Err(SyntaxError::at(
                self.pos,
                SyntaxErrorKind::MissingSelector,
                "expected a member name or a bracketed selection",
            ))
        }
    }

    /// Parse zero or more trailing segments: `.name`, `.*`, `[...]` (child) and
    /// `..name`, `..*`, `..[...]` (recursive).
    fn parse_segments(
        &mut self,
        depth: usize,
        segments: &mut Vec<Segment>,
    ) -> Result<(), SyntaxError> {
        loop {
            let start = self.pos;
            if self.eat_str("..") {
                let kind = SegmentKind::Recursive;
                if self.eat(b'*') {
                    segments.push(Segment::new(
                        Span::new(start, self.pos),
                        kind,
                        vec![Selector::Wild(Span::new(self.pos - 1, self.pos))],
                    ));
                } else if self.peek() == Some(b'[') {
                    let selectors = self.parse_bracket_selection(depth)?;
                    segments.push(Segment::new(Span::new(start, self.pos), kind, selectors));
                } else if let Some((name, end)) = lex_name(self.src, self.pos, !self.strict) {
                    let name_span = Span::new(self.pos, end);
                    self.pos = end;
                    segments.push(Segment::new(
                        Span::new(start, end),
                        kind,
                        vec![Selector::Name(NameSelector {
                            span: name_span,
                            value: name,
                        })],
                    ));
                } else {
                    return Err(SyntaxError::at(
                        self.pos,
                        SyntaxErrorKind::MissingSelector,
                        "expected a name, '*', or '[' after '..'",
                    ));
                }
            } else if self.eat(b'.') {
                let kind = SegmentKind::Child;
                if self.eat(b'*') {
                    segments.push(Segment::new(
                        Span::new(start, self.pos),
                        kind,
                        vec![Selector::Wild(Span::new(self.pos - 1, self.pos))],
                    ));
                } else if let Some((name, end)) = lex_name(self.src, self.pos, !self.strict) {
                    let name_span = Span::new(self.pos, end);
                    self.pos = end;
                    segments.push(Segment::new(
                        Span::new(start, end),
                        kind,
                        vec![Selector::Name(NameSelector {
                            span: name_span,
                            value: name,
                        })],
                    ));
                } else {
                    return Err(SyntaxError::at(
                        self.pos,
                        SyntaxErrorKind::MissingSelector,
                        "expected a name or '*' after '.'",
                    ));
                }
            } else if self.peek() == Some(b'[') {
                let selectors = self.parse_bracket_selection(depth)?;
                segments.push(Segment::new(
                    Span::new(start, self.pos),
                    SegmentKind::Child,
                    selectors,
                ));
            } else {
                break;
            }
        }
        Ok(())
    }

    fn parse_bracket_selection(&mut self, depth: usize) -> Result<Vec<Selector>, SyntaxError> {
        self.check_depth(depth + 1)?;
        let open = self.pos;
        self.expect(
            b'[',
            SyntaxErrorKind::UnterminatedBracket,
            "expected '['",
        )?;
        self.skip_ws();
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_selector(depth + 1)?);
            self.skip_ws();
            if self.eat(b',') {
                self.skip_ws();
                continue;
            }
            break;
        }
        if selectors.is_empty() {
            return Err(SyntaxError::at(
                open,
                SyntaxErrorKind::EmptySelectorList,
                "bracketed selection must contain at least one selector",
            ));
        }
        self.expect(
            b']',
            SyntaxErrorKind::UnterminatedBracket,
            "unterminated bracketed selection, expected ']'",
        )?;
        Ok(selectors)
    }

    fn parse_selector(&mut self, depth: usize) -> Result<Selector, SyntaxError> {
        let start = self.pos;
        match self.peek() {
            Some(b'\'') | Some(b'"') => {
                let (value, end) = lex_string(self.src, self.pos, true)?;
                self.pos = end;
                Ok(Selector::Name(NameSelector {
                    span: Span::new(start, end),
                    value,
                }))
            }
            Some(b'*') => {
                self.pos += 1;
                Ok(Selector::Wild(Span::new(start, self.pos)))
            }
            Some(b'?') => {
                self.pos += 1;
                self.skip_ws();
                let expr = self.parse_filter_or(depth + 1)?;
                Ok(Selector::Filter(super::ast::FilterSelector {
                    span: Span::new(start, self.pos),
                    expr,
                }))
            }
            Some(b'$') | Some(b'@') if !self.strict => {
                let nested = self.parse_query(depth + 1)?;
                validate_singular(&nested)?;
                Ok(Selector::SingularQuery(SingularQuerySelector {
                    span: Span::new(start, self.pos),
                    query: Box::new(nested),
                }))
            }
            Some(c) if c == b'-' || c.is_ascii_digit() => self.parse_index_or_slice(start),
            Some(b':') => self.parse_slice_from_colon(start),
            _ if !self.strict && lex_name(self.src, self.pos, true).is_some() => {
                let nested = self.parse_query(depth + 1)?;
                validate_singular(&nested)?;
                Ok(Selector::SingularQuery(SingularQuerySelector {
                    span: Span::new(start, self.pos),
                    query: Box::new(nested),
                }))
            }
            _ => Err(SyntaxError::at(
                self.pos,
                SyntaxErrorKind::MissingSelector,
                "expected a selector (name, index, slice, '*', '?filter', or a nested query)",
            )),
        }
    }

    fn parse_index_or_slice(&mut self, start: usize) -> Result<Selector, SyntaxError> {
        let (number, end) = lex_number(self.src, self.pos)?;
        let value = match number {
            Number::Int(v) => v,
            Number::Float(_, _) => {
                return Err(SyntaxError::at(
                    start,
                    SyntaxErrorKind::Other,
                    "index/slice bounds must be integers",
                ))
            }
        };
        self.pos = end;
        self.skip_ws();
        if self.peek() == Some(b':') {
            self.finish_slice(start, Some(value))
        } else {
            Ok(Selector::Index(IndexSelector {
                span: Span::new(start, end),
                value,
            }))
        }
    }

    fn parse_slice_from_colon(&mut self, start: usize) -> Result<Selector, SyntaxError> {
        self.finish_slice(start, None)
    }

    fn parse_optional_slice_int(&mut self) -> Result<Option<i64>, SyntaxError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == b'-' || c.is_ascii_digit() => {
                let (number, end) = lex_number(self.src, self.pos)?;
                self.pos = end;
                match number {
                    Number::Int(v) => Ok(Some(v)),
                    Number::Float(_, _) => Err(SyntaxError::at(
                        self.pos,
                        SyntaxErrorKind::Other,
                        "slice bounds must be integers",
                    )),
                }
            }
            _ => Ok(None),
        }
    }

    /// `start` is already consumed by the caller when it is `Some`; parses `: stop? (
    /// : step? )?` from the current position.
    fn finish_slice(&mut self, span_start: usize, start: Option<i64>) -> Result<Selector, SyntaxError> {
        self.skip_ws();
        self.expect(b':', SyntaxErrorKind::Other, "expected ':' in slice")?;
        let stop = self.parse_optional_slice_int()?;
        self.skip_ws();
        let step = if self.eat(b':') {
            self.parse_optional_slice_int()?
        } else {
            None
        };
        if step == Some(0) {
            return Err(SyntaxError::at(
                self.pos,
                SyntaxErrorKind::ZeroStep,
                "slice step must not be zero",
            ));
        }
        Ok(Selector::Slice(SliceSelector {
            span: Span::new(span_start, self.pos),
            start,
            stop,
            step,
        }))
    }
}

/// Parse a query string, requiring the full input to be consumed (spec.md §4.5).
pub fn parse_query(path: &str) -> Result<Query, SyntaxError> {
    QueryParser::new().parse(path)
}

/// Parse a query string restricted to strict JSONPath: no `SingularQuery` selector,
/// no hyphens in shorthand names (spec.md §4.5).
pub fn parse_jsonpath_query(path: &str) -> Result<Query, SyntaxError> {
    QueryParser::new().strict(true).parse(path)
}

/// A reusable, configurable entry point into the query grammar, mirroring the
/// `Scanner::with_*` builder pattern (SPEC_FULL.md §4.3 "Configuration surface"): the
/// free functions [parse_query] / [parse_jsonpath_query] cover the default-depth,
/// non-strict/strict cases; this builder is for callers that need a non-default
/// nesting-depth limit (spec.md §5).
#[derive(Debug, Clone, Copy)]
pub struct QueryParser {
    strict: bool,
    max_depth: usize,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParser {
    pub fn new() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Restrict to strict JSONPath: no `SingularQuery` selector, no hyphens in
    /// shorthand names (spec.md §4.5's `parse_jsonpath_query`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse `path`, requiring the full input to be consumed.
    pub fn parse(&self, path: &str) -> Result<Query, SyntaxError> {
        let bytes = path.as_bytes();
        let mut parser = Parser::new(bytes, 0, self.strict, self.max_depth);
        let query = parser.parse_query(0)?;
        if parser.pos != bytes.len() {
            return Err(SyntaxError::at(
                parser.pos,
                SyntaxErrorKind::TrailingInput,
                "trailing input after query",
            ));
        }
        Ok(query)
    }
}

/// Reentrant parse used by the expression tokenizer: parse a query embedded in `src`
/// at absolute byte offset `offset`, returning the query (with absolute spans) and
/// the byte offset just past the consumed query. Does not clone the source.
pub(crate) fn parse_query_at(
    src: &[u8],
    offset: usize,
    max_depth: usize,
) -> Result<(Query, usize), SyntaxError> {
    let mut parser = Parser::new(src, offset, false, max_depth);
    let query = parser.parse_query(0)?;
    Ok((query, parser.pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::{Root, SegmentKind, Selector};

    #[test]
    fn parses_simple_child_chain() {
        let q = parse_query("$.a.b[-1]").unwrap();
        assert_eq!(q.root, Root::Explicit);
        assert_eq!(q.segments.len(), 3);
        assert_eq!(q.segments[2].kind, SegmentKind::Child);
        match &q.segments[2].selectors[0] {
            Selector::Index(i) => assert_eq!(i.value, -1),
            other => panic!("expected index selector, got {:?}", other),
        }
    }

    #[test]
    fn parses_recursive_wildcard() {
        let q = parse_query("$..*").unwrap();
        assert_eq!(q.segments.len(), 1);
        assert_eq!(q.segments[0].kind, SegmentKind::Recursive);
        assert!(matches!(q.segments[0].selectors[0], Selector::Wild(_)));
    }

    #[test]
    fn parses_slice_with_step() {
        let q = parse_query("$[0:10:2]").unwrap();
        match &q.segments[0].selectors[0] {
            Selector::Slice(s) => {
                assert_eq!(s.start, Some(0));
                assert_eq!(s.stop, Some(10));
                assert_eq!(s.step, Some(2));
            }
            other => panic!("expected slice selector, got {:?}", other),
        }
    }

    #[test]
    fn zero_step_is_an_error() {
        let err = parse_query("$[::0]").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::ZeroStep);
    }

    #[test]
    fn implicit_root_bare_name() {
        let q = parse_query("a.b.c").unwrap();
        assert_eq!(q.root, Root::Implicit);
        assert_eq!(q.segments.len(), 3);
    }

    #[test]
    fn implicit_root_bracketed_name_with_spaces() {
        let q = parse_query("['a b c']").unwrap();
        assert_eq!(q.segments.len(), 1);
        match &q.segments[0].selectors[0] {
            Selector::Name(n) => assert_eq!(n.value, "a b c"),
            other => panic!("expected name selector, got {:?}", other),
        }
    }

    #[test]
    fn trailing_input_is_an_error() {
        let err = parse_query("$.a extra").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::TrailingInput);
    }

    #[test]
    fn jsonpath_mode_rejects_hyphenated_shorthand() {
        // In strict mode the hyphen isn't part of the name; ".data-value" lexes the
        // name as "data" and leaves "-value" unconsumed, tripping the trailing-input
        // check on the outer full-consume entry point.
        let err = parse_jsonpath_query("$.data-value").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::TrailingInput);
    }

    #[test]
    fn extended_mode_allows_hyphenated_shorthand() {
        let q = parse_query("$.data-value").unwrap();
        match &q.segments[0].selectors[0] {
            Selector::Name(n) => assert_eq!(n.value, "data-value"),
            other => panic!("expected name selector, got {:?}", other),
        }
    }

    #[test]
    fn singular_query_selector_extension() {
        let q = parse_query("a[a.b.c]").unwrap();
        assert_eq!(q.segments.len(), 2);
        match &q.segments[1].selectors[0] {
            Selector::SingularQuery(sq) => {
                assert_eq!(sq.query.segments.len(), 3);
            }
            other => panic!("expected singular query selector, got {:?}", other),
        }
    }

    #[test]
    fn jsonpath_mode_rejects_singular_query_selector() {
        let err = parse_jsonpath_query("a[a.b.c]").unwrap_err();
        // 'a' alone is the implicit root segment, then '[a.b.c]' can't be parsed as
        // a selector at all in strict mode (no bare-name selector extension), so the
        // bracket parse itself fails looking for a recognized selector form.
        assert_eq!(err.kind, SyntaxErrorKind::MissingSelector);
    }

    #[test]
    fn query_parser_builder_matches_free_functions() {
        let via_builder = QueryParser::new().parse("$.a.b[-1]").unwrap();
        let via_free_fn = parse_query("$.a.b[-1]").unwrap();
        assert_eq!(via_builder, via_free_fn);

        let strict_err = QueryParser::new().strict(true).parse("$.data-value").unwrap_err();
        assert_eq!(strict_err.kind, SyntaxErrorKind::TrailingInput);
    }

    #[test]
    fn query_parser_builder_enforces_custom_max_depth() {
        // Each parenthesis nesting level inside a filter expression recurses through
        // `parse_filter_primary`, genuinely growing the call stack (unlike a flat
        // chain of segments, which loops rather than recurses) - this is the shape
        // spec.md §5's nesting-depth limit is meant to bound.
        let opens: String = std::iter::repeat('(').take(8).collect();
        let closes: String = std::iter::repeat(')').take(8).collect();
        let path = format!("$[?{}1{}]", opens, closes);
        assert!(QueryParser::new().with_max_depth(256).parse(&path).is_ok());
        let err = QueryParser::new().with_max_depth(4).parse(&path).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep);
    }
}
