use std::collections::HashMap;

use serde::Deserialize;

/// Configured severity for a compile diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Off,
    Error,
    Warning,
    Info,
    Hint,
}

/// Severity overrides for compile diagnostics.
///
/// Every diagnostic is reported as an error unless configured otherwise.
/// Keys are either full codes or code prefixes; an exact code beats a
/// prefix, and a longer prefix beats a shorter one.
///
/// ```toml
/// [diagnostics.severity]
/// D = "warning"     # every compile diagnostic
/// D102 = "off"      # except unknown filters, which are silenced
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub severity: HashMap<String, DiagnosticSeverity>,
}

impl DiagnosticsConfig {
    /// Resolve the severity for `code`.
    ///
    /// ```
    /// # use dcss_conf::{DiagnosticsConfig, DiagnosticSeverity};
    /// let mut config = DiagnosticsConfig::default();
    /// config.set_severity("D", DiagnosticSeverity::Warning);
    /// config.set_severity("D10", DiagnosticSeverity::Hint);
    /// config.set_severity("D102", DiagnosticSeverity::Off);
    ///
    /// assert_eq!(config.get_severity("D102"), DiagnosticSeverity::Off);
    /// assert_eq!(config.get_severity("D100"), DiagnosticSeverity::Hint);
    /// assert_eq!(config.get_severity("D200"), DiagnosticSeverity::Warning);
    /// assert_eq!(config.get_severity("X100"), DiagnosticSeverity::Error);
    /// ```
    #[must_use]
    pub fn get_severity(&self, code: &str) -> DiagnosticSeverity {
        if let Some(&severity) = self.severity.get(code) {
            return severity;
        }

        self.severity
            .iter()
            .filter(|(pattern, _)| code.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map_or(DiagnosticSeverity::Error, |(_, &severity)| severity)
    }

    #[must_use]
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_severity(code) != DiagnosticSeverity::Off
    }

    /// Override the severity for a code or prefix.
    pub fn set_severity(&mut self, pattern: impl Into<String>, severity: DiagnosticSeverity) {
        self.severity.insert(pattern.into(), severity);
    }
}
