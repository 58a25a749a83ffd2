use std::io::Write as _;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use dcss_compiler::CompiledArtifact;
use dcss_compiler::Delivery;
use dcss_compiler::Engine;
use dcss_compiler::Stylesheet;
use dcss_conf::Settings;

use crate::args::GlobalArgs;
use crate::commands::Command;
use crate::exit::Exit;
use crate::project;
use crate::walk::is_stylesheet;
use crate::walk::walk_files;

#[derive(Debug, Parser)]
pub struct Compile {
    /// Files or directories to compile. If omitted, compiles the stylesheets
    /// listed in the project configuration.
    paths: Vec<Utf8PathBuf>,

    /// JSON or TOML file of variable values, merged over configured values.
    #[arg(long)]
    values: Option<Utf8PathBuf>,

    /// Minify every compiled stylesheet.
    #[arg(long)]
    minify: bool,

    /// Write `<handle>.css` files here instead of printing to stdout.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

impl Command for Compile {
    fn execute(&self, _args: &GlobalArgs) -> Result<Exit> {
        let project_root = project::resolve_project_root()?;
        let settings = project::load_settings(&project_root)?;

        let engine = if self.paths.is_empty() {
            self.configured_engine(&settings, &project_root)?
        } else {
            self.engine_for_paths(&settings, &project_root)?
        };

        let out_dir = self.out_dir.as_ref().map_or_else(
            || project::absolutize(&project_root, settings.out_dir()),
            |dir| project::absolutize(&project_root, dir),
        );

        let mut compiled = 0usize;
        let mut failed = 0usize;
        let mut stdout = std::io::stdout().lock();

        for delivery in [Delivery::Printed, Delivery::External] {
            for result in engine.render_all(delivery) {
                match result {
                    Ok(artifact) => {
                        compiled += 1;
                        match delivery {
                            Delivery::Printed => writeln!(stdout, "{}", artifact.body)
                                .context("Failed to write to stdout")?,
                            Delivery::External => write_artifact(&out_dir, &artifact)?,
                        }
                    }
                    Err(_) => failed += 1,
                }
            }
        }

        if failed > 0 {
            let word = if failed == 1 { "stylesheet" } else { "stylesheets" };
            return Ok(Exit::error().with_message(format!("Failed to compile {failed} {word}.")));
        }
        if compiled == 0 {
            return Ok(Exit::success().with_message("No stylesheets to compile."));
        }
        Ok(Exit::success())
    }
}

impl Compile {
    /// One stylesheet per `[[stylesheets]]` entry.
    fn configured_engine(&self, settings: &Settings, project_root: &Utf8Path) -> Result<Engine> {
        let mut engine = Engine::with_builtins();

        for config in settings.stylesheets() {
            let mut layers: Vec<Utf8PathBuf> =
                config.values_path(project_root).into_iter().collect();
            layers.extend(self.values_layer(project_root));

            let resolver = project::build_resolver(settings, &layers)?;
            let print = config.print && self.out_dir.is_none();
            engine
                .set_resolver(config.handle.clone(), resolver)
                .enqueue(
                    Stylesheet::from_path(config.handle.clone(), config.source_path(project_root))
                        .with_print(print)
                        .with_minify(config.minify || self.minify)
                        .with_cache(config.cache),
                );
        }

        Ok(engine)
    }

    /// One stylesheet per file found under the given paths, keyed by file
    /// stem.
    fn engine_for_paths(&self, settings: &Settings, project_root: &Utf8Path) -> Result<Engine> {
        let paths: Vec<Utf8PathBuf> = self
            .paths
            .iter()
            .map(|path| project::absolutize(project_root, path))
            .collect();
        let layers: Vec<Utf8PathBuf> = self.values_layer(project_root).into_iter().collect();
        let resolver = project::build_resolver(settings, &layers)?;
        let mut engine = Engine::with_builtins();

        for path in walk_files(&paths, is_stylesheet) {
            let handle = project::handle_for(&path);
            if let Some(existing) = engine.stylesheet(&handle).and_then(Stylesheet::path) {
                tracing::warn!("Skipping {path}: {existing} already compiles to '{handle}'");
                continue;
            }
            engine.set_resolver(handle.clone(), resolver.clone()).enqueue(
                Stylesheet::from_path(handle, path)
                    .with_print(self.out_dir.is_none())
                    .with_minify(self.minify),
            );
        }

        Ok(engine)
    }

    fn values_layer(&self, project_root: &Utf8Path) -> Option<Utf8PathBuf> {
        self.values
            .as_ref()
            .map(|values| project::absolutize(project_root, values))
    }
}

fn write_artifact(out_dir: &Utf8Path, artifact: &CompiledArtifact) -> Result<()> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("Failed to create {out_dir}"))?;
    let path = out_dir.join(format!("{}.css", artifact.handle));
    std::fs::write(&path, &artifact.body).with_context(|| format!("Failed to write {path}"))?;
    tracing::info!("Wrote {path}");
    Ok(())
}
