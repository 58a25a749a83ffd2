use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Supplies the value of a placeholder's variable.
///
/// The full subscript path is handed over so the provider owns subscript
/// semantics; it may be backed by plain data, a settings store, or values
/// computed on demand. An unknown variable resolves to [`Value::Undefined`].
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &str, subscripts: &[String]) -> Result<Value, ResolveError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot index into {} {kind} with key '{key}'", article(.kind))]
    Traversal { key: String, kind: &'static str },
}

impl ResolveError {
    pub(crate) fn traversal(key: &str, value: &Value) -> Self {
        Self::Traversal {
            key: key.to_string(),
            kind: value.kind(),
        }
    }
}

fn article(kind: &str) -> &'static str {
    match kind.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Adapts a plain callback into a [`Resolver`].
///
/// Traversal failures cannot be reported through a callback; it signals a
/// missing value by returning [`Value::Undefined`].
pub struct FnResolver<F>(F);

impl<F> FnResolver<F>
where
    F: Fn(&str, &[String]) -> Value + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> Resolver for FnResolver<F>
where
    F: Fn(&str, &[String]) -> Value + Send + Sync,
{
    fn resolve(&self, name: &str, subscripts: &[String]) -> Result<Value, ResolveError> {
        Ok((self.0)(name, subscripts))
    }
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

/// Resolves variables from an in-memory table, following subscripts with
/// [`Value::traverse`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueResolver {
    variables: BTreeMap<String, Value>,
}

impl ValueResolver {
    #[must_use]
    pub fn new(variables: BTreeMap<String, Value>) -> Self {
        Self { variables }
    }

    /// Variables are the entries of `value` when it is a mapping; any other
    /// value yields an empty resolver.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Mapping(variables) => Self::new(variables),
            _ => Self::default(),
        }
    }

}

impl Resolver for ValueResolver {
    fn resolve(&self, name: &str, subscripts: &[String]) -> Result<Value, ResolveError> {
        let Some(root) = self.variables.get(name) else {
            return Ok(Value::Undefined);
        };
        root.traverse(subscripts).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for ValueResolver
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscripts(keys: &[&str]) -> Vec<String> {
        keys.iter().map(ToString::to_string).collect()
    }

    fn resolver() -> ValueResolver {
        let var3: Value = [
            ("index1", Value::from("value3")),
            (
                "index2",
                [("subindex1", "value4")].into_iter().collect::<Value>(),
            ),
        ]
        .into_iter()
        .collect();

        [("var1", Value::from("value1")), ("var3", var3)]
            .into_iter()
            .collect()
    }

    #[test]
    fn resolves_without_subscripts() {
        assert_eq!(
            resolver().resolve("var1", &[]),
            Ok(Value::from("value1"))
        );
    }

    #[test]
    fn resolves_nested_subscripts() {
        assert_eq!(
            resolver().resolve("var3", &subscripts(&["index2", "subindex1"])),
            Ok(Value::from("value4"))
        );
    }

    #[test]
    fn unknown_variable_is_undefined() {
        assert_eq!(resolver().resolve("nope", &[]), Ok(Value::Undefined));
    }

    #[test]
    fn traversal_failure_is_reported() {
        let err = resolver()
            .resolve("var1", &subscripts(&["index1"]))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Traversal {
                key: "index1".to_string(),
                kind: "string",
            }
        );
    }

    #[test]
    fn article_follows_kind() {
        let err = Value::Integer(1).get("x").unwrap_err();
        assert_eq!(err.to_string(), "cannot index into an integer with key 'x'");
    }

    #[test]
    fn callback_resolver() {
        let resolver = FnResolver::new(|name: &str, subscripts: &[String]| {
            Value::from(format!("{name}:{}", subscripts.join(".")))
        });
        assert_eq!(
            resolver.resolve("grid", &subscripts(&["cols", "wide"])),
            Ok(Value::from("grid:cols.wide"))
        );
    }

    #[test]
    fn from_value_takes_mapping_entries() {
        let values: Value = [("gap", 8_i64)].into_iter().collect();
        let resolver = ValueResolver::from_value(values);
        assert_eq!(resolver.resolve("gap", &[]), Ok(Value::Integer(8)));

        let scalar = ValueResolver::from_value(Value::Integer(3));
        assert_eq!(scalar.resolve("gap", &[]), Ok(Value::Undefined));
    }
}
