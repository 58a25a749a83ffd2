use std::borrow::Cow;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Serialize;

use crate::diagnostics::CompileDiagnostic;
use crate::error::CompileError;

/// Where a stylesheet's raw text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
enum StylesheetSource {
    Path(Utf8PathBuf),
    Inline(String),
}

/// How the host delivers a compiled stylesheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Written inline into the page.
    Printed,
    /// Served as a separate resource.
    External,
}

/// A dynamic stylesheet registered on an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stylesheet {
    handle: String,
    source: StylesheetSource,
    print: bool,
    minify: bool,
    cache: bool,
}

impl Stylesheet {
    fn new(handle: impl Into<String>, source: StylesheetSource) -> Self {
        Self {
            handle: handle.into(),
            source,
            print: true,
            minify: false,
            cache: false,
        }
    }

    #[must_use]
    pub fn from_path(handle: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Self {
        Self::new(handle, StylesheetSource::Path(path.into()))
    }

    #[must_use]
    pub fn inline(handle: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(handle, StylesheetSource::Inline(text.into()))
    }

    #[must_use]
    pub fn with_print(mut self, print: bool) -> Self {
        self.print = print;
        self
    }

    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match &self.source {
            StylesheetSource::Path(path) => Some(path),
            StylesheetSource::Inline(_) => None,
        }
    }

    #[must_use]
    pub fn delivery(&self) -> Delivery {
        if self.print {
            Delivery::Printed
        } else {
            Delivery::External
        }
    }

    #[must_use]
    pub fn minifies(&self) -> bool {
        self.minify
    }

    #[must_use]
    pub fn caches(&self) -> bool {
        self.cache
    }

    /// The raw, uncompiled text.
    pub fn read_source(&self) -> Result<Cow<'_, str>, CompileError> {
        match &self.source {
            StylesheetSource::Inline(text) => Ok(Cow::Borrowed(text)),
            StylesheetSource::Path(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| CompileError::Io {
                    handle: self.handle.clone(),
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// The result of rendering one stylesheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompiledArtifact {
    pub handle: String,
    pub body: String,
    /// Empty when the body came from the cache.
    pub diagnostics: Vec<CompileDiagnostic>,
    pub from_cache: bool,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_follow_enqueue_behaviour() {
        let sheet = Stylesheet::inline("theme", "a{}");
        assert_eq!(sheet.delivery(), Delivery::Printed);
        assert!(!sheet.minifies());
        assert!(!sheet.caches());
        assert_eq!(sheet.path(), None);
    }

    #[test]
    fn external_when_not_printed() {
        let sheet = Stylesheet::inline("theme", "a{}").with_print(false);
        assert_eq!(sheet.delivery(), Delivery::External);
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a {{ color: $c; }}").unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let sheet = Stylesheet::from_path("theme", path);
        assert_eq!(sheet.read_source().unwrap(), "a { color: $c; }");
    }

    #[test]
    fn missing_file_names_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("gone.dcss")).unwrap();

        let err = Stylesheet::from_path("theme", path.clone())
            .read_source()
            .unwrap_err();
        assert_eq!(err.handle(), "theme");
        assert_eq!(
            err.to_string(),
            format!("failed to read stylesheet 'theme' from {path}")
        );
    }
}
