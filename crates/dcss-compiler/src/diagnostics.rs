use dcss_source::Span;
use serde::Serialize;
use thiserror::Error;

/// A non-fatal problem with one placeholder. The placeholder degrades to an
/// empty string or a passed-through value and compilation continues.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
pub enum CompileDiagnostic {
    #[error("Undefined variable '{path}'")]
    UndefinedVariable { path: String, span: Span },

    #[error("Cannot resolve '{path}': {reason}")]
    SubscriptTraversal {
        path: String,
        reason: String,
        span: Span,
    },

    #[error("Unknown filter '{name}'")]
    FilterNotFound { name: String, span: Span },

    #[error("Filter '{name}' failed: {reason}")]
    FilterFailed {
        name: String,
        reason: String,
        span: Span,
    },

    #[error("'{path}' is a {kind} and cannot be written as text")]
    NonScalarValue {
        path: String,
        kind: &'static str,
        span: Span,
    },
}

impl CompileDiagnostic {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CompileDiagnostic::UndefinedVariable { .. } => "D100",
            CompileDiagnostic::SubscriptTraversal { .. } => "D101",
            CompileDiagnostic::FilterNotFound { .. } => "D102",
            CompileDiagnostic::FilterFailed { .. } => "D103",
            CompileDiagnostic::NonScalarValue { .. } => "D104",
        }
    }

    /// The placeholder, or the single filter call, the diagnostic is about.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            CompileDiagnostic::UndefinedVariable { span, .. }
            | CompileDiagnostic::SubscriptTraversal { span, .. }
            | CompileDiagnostic::FilterNotFound { span, .. }
            | CompileDiagnostic::FilterFailed { span, .. }
            | CompileDiagnostic::NonScalarValue { span, .. } => *span,
        }
    }

    /// Short label for the underlined source span.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CompileDiagnostic::UndefinedVariable { .. } => "substituted with an empty string",
            CompileDiagnostic::SubscriptTraversal { .. } => "subscript cannot be followed",
            CompileDiagnostic::FilterNotFound { .. } => "filter skipped",
            CompileDiagnostic::FilterFailed { .. } => "value passed through unchanged",
            CompileDiagnostic::NonScalarValue { .. } => "substituted with an empty string",
        }
    }

    /// How to make the diagnostic go away, where there is a general answer.
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            CompileDiagnostic::UndefinedVariable { .. } => {
                Some("define it under [variables] or in a values file, or add |default(...)")
            }
            CompileDiagnostic::SubscriptTraversal { .. } => {
                Some("only mappings and sequences can be subscripted")
            }
            CompileDiagnostic::FilterNotFound { .. } => {
                Some("register the filter globally or for this stylesheet")
            }
            CompileDiagnostic::FilterFailed { .. } => None,
            CompileDiagnostic::NonScalarValue { .. } => {
                Some("add a subscript to select a single value")
            }
        }
    }
}
