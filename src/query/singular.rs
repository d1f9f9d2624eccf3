use super::ast::{Query, SegmentKind, Selector};
use crate::error::{SyntaxError, SyntaxErrorKind};

/// Validate that `query` is a singular query: every segment is a [SegmentKind::Child]
/// with exactly one selector, which must be [Selector::Name] or [Selector::Index]
/// (spec.md §4.3 "Singular-query detection", implemented as a post-parse pass over
/// the already-parsed path per spec.md §9's design note, rather than a separate
/// grammar rule, so singular and general queries share one parser).
///
/// Any [Root] kind may be singular — root anchoring doesn't affect cardinality, only
/// the segment/selector shape does.
pub fn validate_singular(query: &Query) -> Result<(), SyntaxError> {
    for segment in &query.segments {
        if segment.kind != SegmentKind::Child || segment.selectors.len() != 1 {
            return Err(SyntaxError::new(
                segment.span,
                SyntaxErrorKind::NonSingularQuery,
                "non-singular query used where a singular query is required",
            ));
        }
        match &segment.selectors[0] {
            Selector::Name(_) | Selector::Index(_) => {}
            other => {
                return Err(SyntaxError::new(
                    other.span(),
                    SyntaxErrorKind::NonSingularQuery,
                    "non-singular query used where a singular query is required",
                ))
            }
        }
    }
    Ok(())
}

pub fn is_singular(query: &Query) -> bool {
    validate_singular(query).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_query;

    #[test]
    fn name_index_chain_is_singular() {
        let q = parse_query("$.a.b[-1]").unwrap();
        assert!(is_singular(&q));
    }

    #[test]
    fn wildcard_is_not_singular() {
        let q = parse_query("$..*").unwrap();
        assert!(!is_singular(&q));
    }

    #[test]
    fn slice_is_not_singular() {
        let q = parse_query("$[0:10:2]").unwrap();
        assert!(!is_singular(&q));
    }
}
