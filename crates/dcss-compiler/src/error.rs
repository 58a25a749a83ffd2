use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures that stop one stylesheet from being compiled at all.
///
/// Problems with individual placeholders are not errors; they are reported
/// as [`CompileDiagnostic`](crate::CompileDiagnostic)s.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no value provider is registered for stylesheet '{handle}'")]
    UnresolvedProvider { handle: String },

    #[error("no stylesheet is enqueued with handle '{handle}'")]
    UnknownStylesheet { handle: String },

    #[error("failed to read stylesheet '{handle}' from {path}")]
    Io {
        handle: String,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// The stylesheet handle the error belongs to.
    #[must_use]
    pub fn handle(&self) -> &str {
        match self {
            CompileError::UnresolvedProvider { handle }
            | CompileError::UnknownStylesheet { handle }
            | CompileError::Io { handle, .. } => handle,
        }
    }
}
