mod render;
mod span;

pub use render::Diagnostic;
pub use render::DiagnosticRenderer;
pub use render::Severity;
pub use span::Span;
