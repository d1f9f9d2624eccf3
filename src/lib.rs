//! `liquidpath` is a library implementing the front-end of a Liquid-style template
//! language: a markup scanner, an expression tokenizer, and a JSONPath-derived query
//! parser. It produces token streams and ASTs only — evaluation, rendering, the
//! filter function registry, template loading/I/O, and whitespace-stripping
//! execution are all left to downstream collaborators.
//!
//! # Overview
//!
//! Three components, leaves first:
//!
//! - [query] parses a path expression (`$.a.b[-1]`, `$[?@.x == 1]`, ...) into a
//!   [Query](query::Query) AST. It is reentrant: the expression tokenizer calls back
//!   into it whenever a bare word's lookahead turns out to be `.` or `[`.
//! - [expr] tokenizes the body of an output (`{{ ... }}`) or tag (`{% ... %}`)
//!   construct into a flat [ExpressionToken](expr::ExpressionToken) list, calling
//!   [query] for any embedded query.
//! - [markup] partitions a whole template source into [MarkupNode](markup::MarkupNode)s
//!   — content runs, raw blocks, comments, output/tag constructs, and the
//!   line-oriented `{% liquid %}` block — calling [expr] for each construct's body.
//!
//! [span] and [error] underpin all three: every AST node carries a [Span], and every
//! fallible operation returns a [SyntaxError].
//!
//! # Example
//!
//! ```
//! use liquidpath::markup::MarkupNode;
//!
//! let nodes = liquidpath::tokenize("Hello {{ user.name | upcase }}!").unwrap();
//! match &nodes[1] {
//!     MarkupNode::Output(output) => assert_eq!(output.tokens.len(), 3),
//!     other => panic!("expected an output construct, got {:?}", other),
//! }
//! assert!(matches!(nodes.last(), Some(MarkupNode::Eoi(_))));
//! ```
//!
//! Parsing a path directly:
//!
//! ```
//! use liquidpath::query::{Root, Selector};
//!
//! let query = liquidpath::parse_query("$.items[-1].name").unwrap();
//! assert_eq!(query.root, Root::Explicit);
//! assert!(matches!(query.segments[2].selectors[0], Selector::Name(_)));
//! ```

pub mod dump;
pub mod error;
mod ident;
pub mod expr;
pub mod markup;
pub mod query;
pub mod span;
mod util;

pub use dump::{dump, dump_query};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use expr::unescape_string;
pub use markup::tokenize;
pub use query::{parse_jsonpath_query, parse_query};
pub use span::Span;
pub use util::Log;
