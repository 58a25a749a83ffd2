use std::io::IsTerminal;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use dcss_compiler::CompileDiagnostic;
use dcss_compiler::FilterRegistry;
use dcss_compiler::ValueResolver;
use dcss_conf::DiagnosticSeverity;
use dcss_conf::DiagnosticsConfig;
use dcss_conf::Settings;
use dcss_source::Diagnostic;
use dcss_source::DiagnosticRenderer;
use dcss_source::Severity;

use crate::args::GlobalArgs;
use crate::commands::Command;
use crate::exit::Exit;
use crate::project;
use crate::walk::is_stylesheet;
use crate::walk::walk_files;

#[derive(Debug, Parser)]
pub struct Check {
    /// Files or directories to check. If omitted, checks the configured
    /// stylesheets, or every stylesheet under the current directory when
    /// none are configured.
    paths: Vec<Utf8PathBuf>,

    /// JSON or TOML file of variable values, merged over configured values.
    #[arg(long)]
    values: Option<Utf8PathBuf>,

    /// Select specific diagnostic codes to report as errors (e.g. D100,D102).
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Ignore specific diagnostic codes (e.g. D104).
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,
}

/// A file to check and the values files layered over `[variables]` for it.
struct Target {
    path: Utf8PathBuf,
    layers: Vec<Utf8PathBuf>,
}

impl Command for Check {
    fn execute(&self, _args: &GlobalArgs) -> Result<Exit> {
        let project_root = project::resolve_project_root()?;
        let settings = project::load_settings(&project_root)?;

        let config = build_diagnostics_config(&settings, &self.select, &self.ignore);
        let fmt = pick_renderer();
        let filters = dcss_compiler::builtins();

        let targets = self.discover_targets(&settings, &project_root);
        if targets.is_empty() {
            return Ok(Exit::success().with_message("No stylesheets to check."));
        }

        let mut error_count = 0usize;
        let mut file_count = 0usize;

        for target in &targets {
            let source = std::fs::read_to_string(&target.path)
                .with_context(|| format!("Failed to read {}", target.path))?;
            let resolver = project::build_resolver(&settings, &target.layers)?;
            let diagnostics = check_source(&source, &resolver, &filters);

            let display_path = target
                .path
                .strip_prefix(&project_root)
                .unwrap_or(target.path.as_path());
            let mut file_errors = 0usize;
            for diagnostic in &diagnostics {
                let severity = config.get_severity(diagnostic.code());
                let Some(output) =
                    render_diagnostic(&source, display_path.as_str(), diagnostic, severity, &fmt)
                else {
                    continue;
                };
                println!("{output}\n");
                if severity == DiagnosticSeverity::Error {
                    file_errors += 1;
                }
            }

            if file_errors > 0 {
                file_count += 1;
                error_count += file_errors;
            }
        }

        if error_count > 0 {
            let file_word = if file_count == 1 { "file" } else { "files" };
            let error_word = if error_count == 1 { "error" } else { "errors" };
            Ok(Exit::error().with_message(format!(
                "Found {error_count} {error_word} in {file_count} {file_word}."
            )))
        } else {
            Ok(Exit::success())
        }
    }
}

impl Check {
    fn discover_targets(&self, settings: &Settings, project_root: &Utf8Path) -> Vec<Target> {
        let cli_layer: Vec<Utf8PathBuf> = self
            .values
            .as_ref()
            .map(|values| project::absolutize(project_root, values))
            .into_iter()
            .collect();

        if self.paths.is_empty() && !settings.stylesheets().is_empty() {
            return settings
                .stylesheets()
                .iter()
                .map(|config| {
                    let mut layers: Vec<Utf8PathBuf> =
                        config.values_path(project_root).into_iter().collect();
                    layers.extend(cli_layer.iter().cloned());
                    Target {
                        path: config.source_path(project_root),
                        layers,
                    }
                })
                .collect();
        }

        let roots: Vec<Utf8PathBuf> = if self.paths.is_empty() {
            vec![project_root.to_owned()]
        } else {
            self.paths
                .iter()
                .map(|path| project::absolutize(project_root, path))
                .collect()
        };

        walk_files(&roots, is_stylesheet)
            .into_iter()
            .map(|path| Target {
                path,
                layers: cli_layer.clone(),
            })
            .collect()
    }
}

/// Compile `source` and keep only the diagnostics, sorted by position.
fn check_source(
    source: &str,
    resolver: &ValueResolver,
    filters: &FilterRegistry,
) -> Vec<CompileDiagnostic> {
    let mut diagnostics = dcss_compiler::compile(source, resolver, filters).diagnostics;
    diagnostics.sort_by_key(|diagnostic| diagnostic.span().start);
    diagnostics
}

fn render_diagnostic(
    source: &str,
    path: &str,
    diagnostic: &CompileDiagnostic,
    severity: DiagnosticSeverity,
    fmt: &DiagnosticRenderer,
) -> Option<String> {
    let severity = match severity {
        DiagnosticSeverity::Off => return None,
        DiagnosticSeverity::Error => Severity::Error,
        DiagnosticSeverity::Warning => Severity::Warning,
        DiagnosticSeverity::Info => Severity::Info,
        DiagnosticSeverity::Hint => Severity::Hint,
    };
    let message = diagnostic.to_string();
    let mut rendered = Diagnostic::new(
        source,
        path,
        diagnostic.code(),
        &message,
        severity,
        diagnostic.span(),
        diagnostic.label(),
    );
    if let Some(help) = diagnostic.help() {
        rendered = rendered.note(help);
    }
    Some(fmt.render(&rendered))
}

fn build_diagnostics_config(
    settings: &Settings,
    select: &[String],
    ignore: &[String],
) -> DiagnosticsConfig {
    let mut config = settings.diagnostics().clone();

    for code in select {
        config.set_severity(code.as_str(), DiagnosticSeverity::Error);
    }

    for code in ignore {
        config.set_severity(code.as_str(), DiagnosticSeverity::Off);
    }

    config
}

fn pick_renderer() -> DiagnosticRenderer {
    if std::io::stdout().is_terminal() {
        DiagnosticRenderer::styled()
    } else {
        DiagnosticRenderer::plain()
    }
}
