use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::value::Value;

/// A named transformation applied to a placeholder's value.
///
/// Implemented for every `Fn(Value, &[Value]) -> Result<Value, FilterError>`,
/// so plain functions and closures can be registered directly.
pub trait Filter: Send + Sync {
    fn apply(&self, value: Value, args: &[Value]) -> Result<Value, FilterError>;
}

impl<F> Filter for F
where
    F: Fn(Value, &[Value]) -> Result<Value, FilterError> + Send + Sync,
{
    fn apply(&self, value: Value, args: &[Value]) -> Result<Value, FilterError> {
        self(value, args)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilterError {
    #[error("missing argument {position}")]
    MissingArgument { position: usize },
    #[error("argument {position} must be {expected}, found {found}")]
    InvalidArgument {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected a {expected} value, found {found}")]
    InvalidValue {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0}")]
    Custom(String),
}

impl FilterError {
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/// The argument at zero-based `index`, or a [`FilterError::MissingArgument`]
/// naming its one-based position.
pub fn required_arg(args: &[Value], index: usize) -> Result<&Value, FilterError> {
    args.get(index)
        .ok_or(FilterError::MissingArgument { position: index + 1 })
}

/// Filters available to a compilation, looked up by exact name.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: FxHashMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(Value, &[Value]) -> Result<Value, FilterError> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    /// Builder form of [`FilterRegistry::register`].
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(Value, &[Value]) -> Result<Value, FilterError> + Send + Sync + 'static,
    {
        self.register(name, filter);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Filter> {
        self.filters.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Copy `base` and add `overlay` on top; overlay filters shadow base
    /// filters of the same name.
    #[must_use]
    pub fn layered(base: &FilterRegistry, overlay: Option<&FilterRegistry>) -> Self {
        let mut merged = base.clone();
        if let Some(overlay) = overlay {
            merged.filters.extend(
                overlay
                    .filters
                    .iter()
                    .map(|(name, filter)| (name.clone(), Arc::clone(filter))),
            );
        }
        merged
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(value: Value, _args: &[Value]) -> Result<Value, FilterError> {
        Ok(value.concat(&Value::from("bar")))
    }

    #[test]
    fn register_and_apply() {
        let registry = FilterRegistry::new().with("suffix", suffix);
        let filter = registry.get("suffix").unwrap();
        assert_eq!(filter.apply(Value::from("foo"), &[]), Ok(Value::from("foobar")));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = FilterRegistry::new().with("simpleFilter", suffix);
        assert!(registry.contains("simpleFilter"));
        assert!(!registry.contains("simplefilter"));
    }

    #[test]
    fn closures_register_without_annotations() {
        let mut registry = FilterRegistry::new();
        registry.register("first_arg", |_, args| Ok(required_arg(args, 0)?.clone()));

        let filter = registry.get("first_arg").unwrap();
        assert_eq!(
            filter.apply(Value::Undefined, &[Value::Integer(7)]),
            Ok(Value::Integer(7))
        );
        assert_eq!(
            filter.apply(Value::Undefined, &[]),
            Err(FilterError::MissingArgument { position: 1 })
        );
    }

    #[test]
    fn layered_overlay_shadows_base() {
        let base = FilterRegistry::new()
            .with("shared", |_, _| Ok(Value::from("base")))
            .with("only_base", suffix);
        let overlay = FilterRegistry::new().with("shared", |_, _| Ok(Value::from("overlay")));

        let merged = FilterRegistry::layered(&base, Some(&overlay));
        assert_eq!(merged.names(), vec!["only_base", "shared"]);
        assert_eq!(
            merged.get("shared").unwrap().apply(Value::Undefined, &[]),
            Ok(Value::from("overlay"))
        );

        let untouched = FilterRegistry::layered(&base, None);
        assert_eq!(
            untouched.get("shared").unwrap().apply(Value::Undefined, &[]),
            Ok(Value::from("base"))
        );
    }

    #[test]
    fn debug_lists_names() {
        let registry = FilterRegistry::new().with("b", suffix).with("a", suffix);
        assert_eq!(format!("{registry:?}"), r#"FilterRegistry { filters: ["a", "b"] }"#);
    }
}
