use super::liquid::parse_liquid_body;
use super::node::{CommentNode, ContentNode, LinesNode, MarkupNode, OutputNode, RawNode, TagNode};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::expr::tokenize_expression;
use crate::ident::lex_name;
use crate::query::DEFAULT_MAX_DEPTH;
use crate::span::{Span, WhitespaceControl};
use crate::util::{Code, Log};

/// Partitions template source into [MarkupNode]s (spec.md §4.1). Like the teacher's
/// lexeme/production objects, a `Scanner` is assembled once via its `with_*` builder
/// methods and then driven to completion; the free function [super::tokenize] covers
/// the common case of default depth and no tracing.
pub struct Scanner<'s> {
    src: &'s [u8],
    code: Code<'s>,
    max_depth: usize,
    log: Log<&'static str>,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            src: source.as_bytes(),
            code: Code::new(source.as_bytes()),
            max_depth: DEFAULT_MAX_DEPTH,
            log: Log::None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_log(mut self, log: Log<&'static str>) -> Self {
        self.log = log;
        self
    }

    pub fn scan(mut self) -> Result<Vec<MarkupNode>, SyntaxError> {
        let mut nodes = Vec::new();
        let mut pos = 0usize;
        let len = self.src.len();

        while pos < len {
            if self.src[pos..].starts_with(b"{%") {
                self.log.trace_enter(pos, &self.code);
                let (node, next) = self.scan_percent_construct(pos)?;
                self.log.trace_success(pos, &node, &self.code);
                nodes.push(node);
                pos = next;
            } else if self.src[pos..].starts_with(b"{#") {
                self.log.trace_enter(pos, &self.code);
                let (node, next) = self.scan_comment(pos)?;
                self.log.trace_success(pos, &node, &self.code);
                nodes.push(MarkupNode::Comment(node));
                pos = next;
            } else if self.src[pos..].starts_with(b"{{") {
                self.log.trace_enter(pos, &self.code);
                let (node, next) = self.scan_output(pos)?;
                self.log.trace_success(pos, &node, &self.code);
                nodes.push(MarkupNode::Output(node));
                pos = next;
            } else {
                let start = pos;
                while pos < len
                    && !self.src[pos..].starts_with(b"{{")
                    && !self.src[pos..].starts_with(b"{%")
                    && !self.src[pos..].starts_with(b"{#")
                {
                    pos += 1;
                }
                nodes.push(MarkupNode::Content(ContentNode {
                    span: Span::new(start, pos),
                }));
            }
        }

        nodes.push(MarkupNode::Eoi(Span::new(len, len)));
        Ok(nodes)
    }

    /// Dispatch on what follows `{%`: `raw`, `liquid`, or a plain tag (spec.md §4.1
    /// recognition rules 1, 3, 4 — all three share the same opening delimiter, so the
    /// tag name is what actually discriminates them).
    fn scan_percent_construct(&self, start: usize) -> Result<(MarkupNode, usize), SyntaxError> {
        let mut pos = start + 2;
        let (open_marker, mlen) = WhitespaceControl::consume(self.src, pos);
        pos += mlen;
        pos = skip_ws(self.src, pos);
        let (name, name_end) = lex_name(self.src, pos, true).ok_or_else(|| {
            SyntaxError::new(
                Span::new(start, pos),
                SyntaxErrorKind::Other,
                "expected a tag name after '{%'",
            )
        })?;
        let name_span = Span::new(pos, name_end);
        pos = name_end;

        match name.as_str() {
            "raw" => self
                .scan_raw(start, open_marker, pos)
                .map(|(node, end)| (MarkupNode::Raw(node), end)),
            "liquid" => {
                let opening_span = Span::new(start, pos);
                let (statements, close_marker, end) =
                    parse_liquid_body(self.src, pos, self.max_depth, opening_span)?;
                Ok((
                    MarkupNode::Lines(LinesNode {
                        span: Span::new(start, end),
                        open_marker,
                        close_marker,
                        statements,
                    }),
                    end,
                ))
            }
            _ => {
                let opening_span = Span::new(start, pos);
                pos = skip_ws(self.src, pos);
                let (tokens, end) = tokenize_expression(
                    self.src,
                    pos,
                    b"%}",
                    false,
                    self.max_depth,
                    SyntaxErrorKind::UnterminatedTag,
                    opening_span,
                )?;
                let (close_marker, mlen) = WhitespaceControl::consume(self.src, end);
                let after_marker = end + mlen;
                if !self.src[after_marker..].starts_with(b"%}") {
                    return Err(SyntaxError::new(
                        opening_span,
                        SyntaxErrorKind::UnterminatedTag,
                        "unterminated tag, expected '%}'",
                    ));
                }
                let close = after_marker + 2;
                Ok((
                    MarkupNode::Tag(TagNode {
                        span: Span::new(start, close),
                        open_marker,
                        close_marker,
                        name,
                        name_span,
                        tokens,
                    }),
                    close,
                ))
            }
        }
    }

    fn scan_raw(
        &self,
        start: usize,
        open_raw_left: WhitespaceControl,
        mut pos: usize,
    ) -> Result<(RawNode, usize), SyntaxError> {
        let opening_span = Span::new(start, pos);
        pos = skip_ws(self.src, pos);
        let (open_raw_right, mlen) = WhitespaceControl::consume(self.src, pos);
        pos += mlen;
        if !self.src[pos..].starts_with(b"%}") {
            return Err(SyntaxError::new(
                opening_span,
                SyntaxErrorKind::UnterminatedTag,
                "unterminated 'raw' tag, expected '%}'",
            ));
        }
        let body_start = pos + 2;

        let (body_end, close_endraw_left, close_endraw_right, end) =
            find_endraw(self.src, body_start).ok_or_else(|| {
                SyntaxError::new(
                    Span::new(start, body_start),
                    SyntaxErrorKind::UnterminatedRaw,
                    "unterminated 'raw' block, no matching '{% endraw %}'",
                )
            })?;

        Ok((
            RawNode {
                span: Span::new(start, end),
                body: Span::new(body_start, body_end),
                open_raw_left,
                open_raw_right,
                close_endraw_left,
                close_endraw_right,
            },
            end,
        ))
    }

    fn scan_comment(&self, start: usize) -> Result<(CommentNode, usize), SyntaxError> {
        let mut pos = start + 2;
        let fence_start = pos;
        while self.src.get(pos) == Some(&b'#') {
            pos += 1;
        }
        let fence = &self.src[fence_start..pos];
        let body_start = pos;

        let (body_end, close_marker, end) =
            find_comment_close(self.src, body_start, fence).ok_or_else(|| {
                SyntaxError::new(
                    Span::new(start, body_start),
                    SyntaxErrorKind::UnterminatedComment,
                    "unterminated comment, no matching fence before end of input",
                )
            })?;

        Ok((
            CommentNode {
                span: Span::new(start, end),
                body: Span::new(body_start, body_end),
                fence_len: fence.len(),
                close_marker,
            },
            end,
        ))
    }

    fn scan_output(&self, start: usize) -> Result<(OutputNode, usize), SyntaxError> {
        let mut pos = start + 2;
        let (open_marker, mlen) = WhitespaceControl::consume(self.src, pos);
        pos += mlen;
        let opening_span = Span::new(start, pos);

        let (tokens, end) = tokenize_expression(
            self.src,
            pos,
            b"}}",
            false,
            self.max_depth,
            SyntaxErrorKind::UnterminatedOutput,
            opening_span,
        )?;
        let (close_marker, mlen) = WhitespaceControl::consume(self.src, end);
        let after_marker = end + mlen;
        if !self.src[after_marker..].starts_with(b"}}") {
            return Err(SyntaxError::new(
                opening_span,
                SyntaxErrorKind::UnterminatedOutput,
                "unterminated output, expected '}}'",
            ));
        }
        let close = after_marker + 2;
        Ok((
            OutputNode {
                span: Span::new(start, close),
                open_marker,
                close_marker,
                tokens,
            },
            close,
        ))
    }
}

fn skip_ws(src: &[u8], mut pos: usize) -> usize {
    while matches!(
        src.get(pos),
        Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n')
    ) {
        pos += 1;
    }
    pos
}

/// Scan forward from `from` for the `{% endraw %}` delimiter, ignoring everything
/// else as opaque raw body text (spec.md §4.1, "no nested templating is recognized").
fn find_endraw(
    src: &[u8],
    from: usize,
) -> Option<(usize, WhitespaceControl, WhitespaceControl, usize)> {
    let mut i = from;
    while i + 2 <= src.len() {
        if &src[i..i + 2] == b"{%" {
            let mut p = i + 2;
            let (left_marker, mlen) = WhitespaceControl::consume(src, p);
            p += mlen;
            p = skip_ws(src, p);
            if let Some((name, name_end)) = lex_name(src, p, true) {
                if name == "endraw" {
                    let mut q = skip_ws(src, name_end);
                    let (right_marker, rlen) = WhitespaceControl::consume(src, q);
                    q += rlen;
                    if src[q..].starts_with(b"%}") {
                        return Some((i, left_marker, right_marker, q + 2));
                    }
                }
            }
        }
        i += 1;
    }
    None
}

/// Scan forward from `from` for `fence` followed by an optional whitespace marker
/// and `}` (spec.md §4.1). Fences of a different length than the opener are body
/// text, which is what gives this crate's fence-length matching (see SPEC_FULL.md §9
/// / spec.md §9 design note on comment nesting).
fn find_comment_close(
    src: &[u8],
    from: usize,
    fence: &[u8],
) -> Option<(usize, WhitespaceControl, usize)> {
    let mut i = from;
    while i < src.len() {
        if src[i..].starts_with(fence) {
            let mut p = i + fence.len();
            let (marker, mlen) = WhitespaceControl::consume(src, p);
            p += mlen;
            if src.get(p) == Some(&b'}') {
                return Some((i, marker, p + 1));
            }
        }
        i += 1;
    }
    None
}
