//! Compiles dynamic stylesheets into plain CSS.
//!
//! Placeholders found by `dcss-templates` are resolved through a
//! [`Resolver`], run through a chain of [`Filter`]s, and substituted back
//! into the text. The [`Engine`] ties this together per stylesheet handle
//! and keeps compiled bodies in a [`Cache`].
//!
//! ```
//! use dcss_compiler::{Engine, Stylesheet, ValueResolver};
//!
//! let mut engine = Engine::with_builtins();
//! engine
//!     .set_resolver("theme", [("gap", 8_i64)].into_iter().collect::<ValueResolver>())
//!     .enqueue(Stylesheet::inline("theme", ".card { padding: $gap|append('px'); }"));
//!
//! let artifact = engine.render("theme").unwrap();
//! assert_eq!(artifact.body, ".card { padding: 8px; }");
//! ```

mod builtins;
mod cache;
mod collections;
mod compiler;
mod diagnostics;
mod engine;
mod error;
mod filters;
mod minify;
pub mod pipeline;
mod resolver;
mod stylesheet;
mod value;

pub use builtins::builtins;
pub use cache::Cache;
pub use compiler::compile;
pub use compiler::evaluate;
pub use compiler::Compilation;
pub use diagnostics::CompileDiagnostic;
pub use engine::Engine;
pub use error::CompileError;
pub use filters::required_arg;
pub use filters::Filter;
pub use filters::FilterError;
pub use filters::FilterRegistry;
pub use minify::minify;
pub use resolver::FnResolver;
pub use resolver::ResolveError;
pub use resolver::Resolver;
pub use resolver::ValueResolver;
pub use stylesheet::CompiledArtifact;
pub use stylesheet::Delivery;
pub use stylesheet::Stylesheet;
pub use value::Value;
