mod diagnostics;

use std::collections::BTreeMap;
use std::path::Path;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

pub use crate::diagnostics::DiagnosticSeverity;
pub use crate::diagnostics::DiagnosticsConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Duplicate stylesheet handle '{0}'")]
    DuplicateHandle(String),
}

fn default_out_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("dist")
}

fn default_true() -> bool {
    true
}

/// One `[[stylesheets]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StylesheetConfig {
    pub handle: String,
    pub path: Utf8PathBuf,
    /// Inline into the page (`true`) or write to `out_dir` (`false`).
    #[serde(default = "default_true")]
    pub print: bool,
    #[serde(default)]
    pub minify: bool,
    #[serde(default)]
    pub cache: bool,
    /// JSON or TOML file whose values are merged over `[variables]`.
    #[serde(default)]
    pub values: Option<Utf8PathBuf>,
}

impl StylesheetConfig {
    /// `path` resolved against the project root.
    #[must_use]
    pub fn source_path(&self, project_root: &Utf8Path) -> Utf8PathBuf {
        project_root.join(&self.path)
    }

    #[must_use]
    pub fn values_path(&self, project_root: &Utf8Path) -> Option<Utf8PathBuf> {
        self.values.as_ref().map(|values| project_root.join(values))
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    debug: bool,
    out_dir: Utf8PathBuf,
    variables: BTreeMap<String, toml::Value>,
    stylesheets: Vec<StylesheetConfig>,
    diagnostics: DiagnosticsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            out_dir: default_out_dir(),
            variables: BTreeMap::new(),
            stylesheets: Vec::new(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings for the project at `project_root`.
    ///
    /// Sources, lowest precedence first: the user's `dcss/dcss.toml` in the
    /// platform config directory, the project's `.dcss.toml`, and the
    /// project's `dcss.toml`.
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file =
            ProjectDirs::from("", "", "dcss").map(|dirs| dirs.config_dir().join("dcss.toml"));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        for name in [".dcss.toml", "dcss.toml"] {
            builder = builder.add_source(
                File::from(project_root.join(name))
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            stylesheets = settings.stylesheets.len(),
            variables = settings.variables.len(),
            "loaded settings"
        );
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for stylesheet in &self.stylesheets {
            if !seen.insert(stylesheet.handle.as_str()) {
                return Err(ConfigError::DuplicateHandle(stylesheet.handle.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn out_dir(&self) -> &Utf8Path {
        &self.out_dir
    }

    /// Values every stylesheet can reference.
    #[must_use]
    pub fn variables(&self) -> &BTreeMap<String, toml::Value> {
        &self.variables
    }

    #[must_use]
    pub fn stylesheets(&self) -> &[StylesheetConfig] {
        &self.stylesheets
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsConfig {
        &self.diagnostics
    }
}
