use std::sync::Arc;

use dcss_templates::scan;
use dcss_templates::Segment;
use rustc_hash::FxHashMap;

use crate::builtins::builtins;
use crate::cache::Cache;
use crate::compiler;
use crate::compiler::Compilation;
use crate::error::CompileError;
use crate::filters::FilterError;
use crate::filters::FilterRegistry;
use crate::minify::minify;
use crate::resolver::FnResolver;
use crate::resolver::Resolver;
use crate::stylesheet::CompiledArtifact;
use crate::stylesheet::Delivery;
use crate::stylesheet::Stylesheet;
use crate::value::Value;

/// Everything needed to compile registered stylesheets: one resolver per
/// handle, global and per-handle filters, the enqueued stylesheets, and the
/// compiled-output cache.
///
/// Registration takes `&mut self`; compiling and rendering take `&self`, so
/// a fully configured engine can be shared between threads.
#[derive(Default)]
pub struct Engine {
    resolvers: FxHashMap<String, Arc<dyn Resolver>>,
    filters: FxHashMap<String, FilterRegistry>,
    global_filters: FilterRegistry,
    stylesheets: Vec<Stylesheet>,
    cache: Cache,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose global filters are the built-in set.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self {
            global_filters: builtins(),
            ..Self::default()
        }
    }

    /// Bind the value provider for `handle`, replacing any previous one.
    pub fn set_resolver(
        &mut self,
        handle: impl Into<String>,
        resolver: impl Resolver + 'static,
    ) -> &mut Self {
        self.resolvers.insert(handle.into(), Arc::new(resolver));
        self
    }

    /// Bind a plain callback as the value provider for `handle`.
    pub fn set_callback<F>(&mut self, handle: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&str, &[String]) -> Value + Send + Sync + 'static,
    {
        self.set_resolver(handle, FnResolver::new(callback))
    }

    /// Register a filter visible only to `handle`. It shadows a global
    /// filter of the same name.
    pub fn register_filter<F>(
        &mut self,
        handle: impl Into<String>,
        name: impl Into<String>,
        filter: F,
    ) -> &mut Self
    where
        F: Fn(Value, &[Value]) -> Result<Value, FilterError> + Send + Sync + 'static,
    {
        self.filters
            .entry(handle.into())
            .or_default()
            .register(name, filter);
        self
    }

    pub fn register_global_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(Value, &[Value]) -> Result<Value, FilterError> + Send + Sync + 'static,
    {
        self.global_filters.register(name, filter);
        self
    }

    /// Add a stylesheet. Enqueueing a handle that is already present replaces
    /// the earlier registration in place.
    pub fn enqueue(&mut self, stylesheet: Stylesheet) -> &mut Self {
        match self
            .stylesheets
            .iter_mut()
            .find(|existing| existing.handle() == stylesheet.handle())
        {
            Some(existing) => *existing = stylesheet,
            None => self.stylesheets.push(stylesheet),
        }
        self
    }

    #[must_use]
    pub fn stylesheet(&self, handle: &str) -> Option<&Stylesheet> {
        self.stylesheets
            .iter()
            .find(|stylesheet| stylesheet.handle() == handle)
    }

    /// Enqueued stylesheets with the given delivery, in enqueue order.
    pub fn stylesheets(&self, delivery: Delivery) -> impl Iterator<Item = &Stylesheet> {
        self.stylesheets
            .iter()
            .filter(move |stylesheet| stylesheet.delivery() == delivery)
    }

    /// Global filters overlaid with the filters registered for `handle`.
    #[must_use]
    pub fn filters_for(&self, handle: &str) -> FilterRegistry {
        FilterRegistry::layered(&self.global_filters, self.filters.get(handle))
    }

    /// Compile `source` with the resolver and filters bound to `handle`.
    ///
    /// Fails only when `source` contains a placeholder and no resolver is
    /// bound to `handle`.
    pub fn compile(&self, handle: &str, source: &str) -> Result<Compilation, CompileError> {
        let Some(resolver) = self.resolvers.get(handle) else {
            if scan(source).any(|segment| matches!(segment, Segment::Placeholder(_))) {
                return Err(CompileError::UnresolvedProvider {
                    handle: handle.to_string(),
                });
            }
            return Ok(Compilation {
                output: source.to_string(),
                diagnostics: Vec::new(),
            });
        };

        tracing::debug!(handle, "compiling stylesheet");
        Ok(compiler::compile(
            source,
            resolver.as_ref(),
            &self.filters_for(handle),
        ))
    }

    /// Produce the body for an enqueued stylesheet, honouring its cache and
    /// minify settings.
    pub fn render(&self, handle: &str) -> Result<CompiledArtifact, CompileError> {
        let stylesheet = self
            .stylesheet(handle)
            .ok_or_else(|| CompileError::UnknownStylesheet {
                handle: handle.to_string(),
            })?;

        if stylesheet.caches() {
            if let Some(body) = self.cache.get(handle) {
                return Ok(CompiledArtifact {
                    handle: handle.to_string(),
                    body,
                    diagnostics: Vec::new(),
                    from_cache: true,
                });
            }
        }

        let source = stylesheet.read_source()?;
        let compilation = self.compile(handle, &source)?;
        let body = if stylesheet.minifies() {
            minify(&compilation.output)
        } else {
            compilation.output
        };

        if stylesheet.caches() {
            self.cache.update(handle, body.clone());
        }

        Ok(CompiledArtifact {
            handle: handle.to_string(),
            body,
            diagnostics: compilation.diagnostics,
            from_cache: false,
        })
    }

    /// Render every stylesheet with the given delivery. Each handle succeeds
    /// or fails on its own.
    #[must_use]
    pub fn render_all(&self, delivery: Delivery) -> Vec<Result<CompiledArtifact, CompileError>> {
        self.stylesheets(delivery)
            .map(|stylesheet| {
                let result = self.render(stylesheet.handle());
                if let Err(err) = &result {
                    tracing::error!(handle = stylesheet.handle(), "{err}");
                }
                result
            })
            .collect()
    }

    #[must_use]
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Forget the cached body for `handle` so the next render recompiles.
    pub fn clear_cache(&self, handle: &str) -> bool {
        self.cache.clear(handle)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut resolvers: Vec<&str> = self.resolvers.keys().map(String::as_str).collect();
        resolvers.sort_unstable();
        f.debug_struct("Engine")
            .field("resolvers", &resolvers)
            .field("global_filters", &self.global_filters)
            .field("stylesheets", &self.stylesheets)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
