use dcss_source::Span;
use serde::Serialize;

use crate::literal::Literal;

/// One `|name(args)` step of a placeholder's filter chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<Literal>,
    /// Covers the filter name and argument list, without the leading `|`.
    pub span: Span,
}

impl FilterCall {
    #[must_use]
    pub fn new(name: String, args: Vec<Literal>, span: Span) -> Self {
        Self { name, args, span }
    }
}

/// A `$name[key]...|filter(...)...` occurrence in source text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Placeholder {
    pub name: String,
    pub subscripts: Vec<String>,
    pub filters: Vec<FilterCall>,
    /// Covers the whole placeholder, `$` included.
    pub span: Span,
}

impl Placeholder {
    /// The variable and subscripts as written, normalised to bare keys
    /// (`var3[index2][subindex1]`).
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = self.name.clone();
        for key in &self.subscripts {
            path.push('[');
            path.push_str(key);
            path.push(']');
        }
        path
    }
}

/// An item yielded by the [`Scanner`](crate::Scanner).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Segment<'a> {
    /// Source text copied to the output verbatim.
    Text { text: &'a str, span: Span },
    Placeholder(Placeholder),
}

impl Segment<'_> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Segment::Text { span, .. } => *span,
            Segment::Placeholder(placeholder) => placeholder.span,
        }
    }
}
