use super::ast::{ComparisonOp, FilterExpression, LogicalOp};
use super::parser::Parser;
use super::singular::validate_singular;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::expr::number::{lex_number, Number};
use crate::expr::string::lex_string;
use crate::ident::lex_name;
use crate::span::Span;

/// Filter expression grammar (spec.md §4.3), precedence low to high:
/// `||` < `&&` < unary `!` < comparison < primary.
impl<'a> Parser<'a> {
    pub(crate) fn parse_filter_or(&mut self, depth: usize) -> Result<FilterExpression, SyntaxError> {
        self.check_depth(depth)?;
        let start = self.pos;
        let mut left = self.parse_filter_and(depth)?;
        loop {
            self.skip_ws();
            if self.eat_str("||") {
                self.skip_ws();
                let right = self.parse_filter_and(depth)?;
                left = FilterExpression::Logical(
                    Span::new(start, self.pos),
                    Box::new(left),
                    LogicalOp::Or,
                    Box::new(right),
                );
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_filter_and(&mut self, depth: usize) -> Result<FilterExpression, SyntaxError> {
        let start = self.pos;
        let mut left = self.parse_filter_not(depth)?;
        loop {
            self.skip_ws();
            if self.eat_str("&&") {
                self.skip_ws();
                let right = self.parse_filter_not(depth)?;
                left = FilterExpression::Logical(
                    Span::new(start, self.pos),
                    Box::new(left),
                    LogicalOp::And,
                    Box::new(right),
                );
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_filter_not(&mut self, depth: usize) -> Result<FilterExpression, SyntaxError> {
        let start = self.pos;
        if self.eat(b'!') {
            self.skip_ws();
            let inner = self.parse_filter_not(depth)?;
            Ok(FilterExpression::Not(
                Span::new(start, self.pos),
                Box::new(inner),
            ))
        } else {
            self.parse_filter_comparison(depth)
        }
    }

    fn parse_filter_comparison(&mut self, depth: usize) -> Result<FilterExpression, SyntaxError> {
        let start = self.pos;
        let left = self.parse_filter_primary(depth)?;
        self.skip_ws();
        let op = if self.eat_str("==") {
            Some(ComparisonOp::Eq)
        } else if self.eat_str("!=") {
            Some(ComparisonOp::Ne)
        } else if self.eat_str(">=") {
            Some(ComparisonOp::Ge)
        } else if self.eat_str("<=") {
            Some(ComparisonOp::Le)
        } else if self.peek() == Some(b'>') {
            self.pos += 1;
            Some(ComparisonOp::Gt)
        } else if self.peek() == Some(b'<') {
            self.pos += 1;
            Some(ComparisonOp::Lt)
        } else {
            None
        };
        match op {
            Some(op) => {
                self.skip_ws();
                let right = self.parse_filter_primary(depth)?;
                // Comparison operands that are queries must be provably singular
                // (spec.md §4.3, "Singular-query detection").
                require_singular_if_query(&left)?;
                require_singular_if_query(&right)?;
                Ok(FilterExpression::Comparison(
                    Span::new(start, self.pos),
                    Box::new(left),
                    op,
                    Box::new(right),
                ))
            }
            None => Ok(left),
        }
    }

    fn parse_filter_primary(&mut self, depth: usize) -> Result<FilterExpression, SyntaxError> {
        self.check_depth(depth + 1)?;
        let start = self.pos;
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.skip_ws();
                let inner = self.parse_filter_or(depth + 1)?;
                self.skip_ws();
                self.expect(
                    b')',
                    SyntaxErrorKind::UnbalancedParens,
                    "unbalanced parentheses in filter expression",
                )?;
                Ok(inner)
            }
            Some(b'\'') | Some(b'"') => {
                let (value, end) = lex_string(self.src, self.pos, true)?;
                self.pos = end;
                Ok(FilterExpression::Str(Span::new(start, end), value))
            }
            Some(c) if c == b'-' || c.is_ascii_digit() => {
                let (number, end) = lex_number(self.src, self.pos)?;
                self.pos = end;
                let span = Span::new(start, end);
                Ok(match number {
                    Number::Int(v) => FilterExpression::Int(span, v),
                    Number::Float(v, is_exponent) => FilterExpression::Float(span, v, is_exponent),
                })
            }
            Some(b'$') => {
                let query = self.parse_query(depth + 1)?;
                Ok(FilterExpression::RootQuery(
                    Span::new(start, self.pos),
                    Box::new(query),
                ))
            }
            Some(b'@') => {
                let query = self.parse_query(depth + 1)?;
                Ok(FilterExpression::RelativeQuery(
                    Span::new(start, self.pos),
                    Box::new(query),
                ))
            }
            _ => {
                // Lex the maximal name first, then check it against the reserved
                // words exactly — otherwise "truest" would wrongly lex as `true`
                // followed by a stray "st" (the same boundary problem the
                // expression tokenizer's reserved-word matching avoids).
                if let Some((name, end)) = lex_name(self.src, self.pos, false) {
                    self.pos = end;
                    match name.as_str() {
                        "true" => Ok(FilterExpression::True(Span::new(start, end))),
                        "false" => Ok(FilterExpression::False(Span::new(start, end))),
                        "null" => Ok(FilterExpression::Null(Span::new(start, end))),
                        _ => {
                            self.skip_ws();
                            let args = self.parse_function_args(depth + 1)?;
                            Ok(FilterExpression::Function(
                                Span::new(start, self.pos),
                                name,
                                args,
                            ))
                        }
                    }
                } else {
                    Err(SyntaxError::at(
                        self.pos,
                        SyntaxErrorKind::MissingSelector,
                        "expected a literal, query, parenthesized expression, or function call",
                    ))
                }
            }
        }
    }

    fn parse_function_args(&mut self, depth: usize) -> Result<Vec<FilterExpression>, SyntaxError> {
        self.expect(
            b'(',
            SyntaxErrorKind::UnbalancedParens,
            "expected '(' after function name",
        )?;
        self.skip_ws();
        let mut args = Vec::new();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_filter_or(depth)?);
            self.skip_ws();
            if self.eat(b',') {
                self.skip_ws();
                continue;
            }
            break;
        }
        self.expect(
            b')',
            SyntaxErrorKind::UnbalancedParens,
            "unbalanced parentheses in function call",
        )?;
        Ok(args)
    }
}

/// A bare filter query (`{? @.x }`) need not be singular — only a query used as a
/// comparison operand does (spec.md §8, boundary scenario for `$[?@.x]`).
fn require_singular_if_query(expr: &FilterExpression) -> Result<(), SyntaxError> {
    match expr {
        FilterExpression::RelativeQuery(_, q) | FilterExpression::RootQuery(_, q) => {
            validate_singular(q)
        }
        _ => Ok(()),
    }
}
