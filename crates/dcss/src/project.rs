use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use dcss_compiler::Value;
use dcss_compiler::ValueResolver;
use dcss_conf::Settings;

pub fn resolve_project_root() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| anyhow::anyhow!("Current directory is not valid UTF-8"))
}

pub fn load_settings(project_root: &Utf8Path) -> Result<Settings> {
    Settings::new(project_root.as_std_path()).context("Failed to load settings")
}

/// Relative paths are taken from the project root.
pub fn absolutize(project_root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_relative() {
        project_root.join(path)
    } else {
        path.to_owned()
    }
}

/// Read a JSON or TOML values file (chosen by extension).
pub fn load_values_file(path: &Utf8Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;

    if path.extension() == Some("toml") {
        let table: toml::Table =
            toml::from_str(&content).with_context(|| format!("Failed to parse {path} as TOML"))?;
        Ok(Value::from(toml::Value::Table(table)))
    } else {
        let json: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {path} as JSON"))?;
        Ok(Value::from(json))
    }
}

/// Layered variable values: `[variables]` from the settings, then each
/// extra file in order, later layers deep-merged over earlier ones.
pub fn build_resolver(settings: &Settings, layers: &[Utf8PathBuf]) -> Result<ValueResolver> {
    let mut values: Value = settings
        .variables()
        .iter()
        .map(|(name, value)| (name.clone(), Value::from(value.clone())))
        .collect();

    for path in layers {
        let layer = load_values_file(path)?;
        if !matches!(layer, Value::Mapping(_)) {
            anyhow::bail!("{path} must contain a table of values, found {}", layer.kind());
        }
        values.merge(layer);
    }

    Ok(ValueResolver::from_value(values))
}

/// Stylesheet handle for a file given on the command line.
pub fn handle_for(path: &Utf8Path) -> String {
    path.file_stem().unwrap_or(path.as_str()).to_string()
}
