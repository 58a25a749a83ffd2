//! Placeholder syntax for dynamic stylesheets.
//!
//! A dynamic stylesheet is ordinary CSS in which values are written as
//! placeholders:
//!
//! ```text
//! body { color: $body_color; }
//! .card { border-color: $palette[accent]|default('#ccc'); }
//! .hero { padding: $spacing['hero']|multiply(2)|append('px'); }
//! ```
//!
//! This crate is purely syntactic. The [`Scanner`] splits source text into
//! [`Segment`]s of literal text and [`Placeholder`]s, and [`coerce`] turns raw
//! filter arguments into typed [`Literal`]s. Nothing here looks at variable
//! values or filter implementations; that is `dcss-compiler`'s job.
//!
//! ## Grammar
//!
//! ```text
//! placeholder := '$' name subscript* ('|' filtercall)*
//! name        := [A-Za-z0-9_-]+
//! subscript   := '[' key ']'           key is bare, 'quoted' or "quoted"
//! filtercall  := name ('(' arg (',' arg)* ')')?
//! ```
//!
//! A `$` that does not begin a valid placeholder is left in the text.

mod literal;
mod quotes;
mod scanner;
mod tokens;

pub use literal::coerce;
pub use literal::Literal;
pub use scanner::Scanner;
pub use tokens::FilterCall;
pub use tokens::Placeholder;
pub use tokens::Segment;

/// Scan `source` into text and placeholder segments.
#[must_use]
pub fn scan(source: &str) -> Scanner<'_> {
    Scanner::new(source)
}
