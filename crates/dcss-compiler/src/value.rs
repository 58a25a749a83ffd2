use std::borrow::Cow;
use std::collections::BTreeMap;

use dcss_templates::Literal;

use crate::resolver::ResolveError;

static UNDEFINED: Value = Value::Undefined;

/// Any value that flows through resolution and the filter pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Undefined or the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Undefined => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Index into this value with one subscript key.
    ///
    /// Mappings are indexed by key and sequences by decimal position. Missing
    /// entries and anything below `Undefined` resolve to `Undefined`; indexing
    /// into a scalar is an error.
    pub fn get(&self, key: &str) -> Result<&Value, ResolveError> {
        match self {
            Value::Undefined => Ok(&UNDEFINED),
            Value::Mapping(entries) => Ok(entries.get(key).unwrap_or(&UNDEFINED)),
            Value::Sequence(items) => key
                .parse::<usize>()
                .map(|index| items.get(index).unwrap_or(&UNDEFINED))
                .map_err(|_| ResolveError::traversal(key, self)),
            _ => Err(ResolveError::traversal(key, self)),
        }
    }

    /// Follow a whole subscript path, left to right.
    pub fn traverse(&self, path: &[String]) -> Result<&Value, ResolveError> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Text written to the stylesheet for this value.
    ///
    /// Booleans render as `true`/`false` and floats without a trailing `.0`.
    /// Sequences and mappings have no text form.
    #[must_use]
    pub fn render(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Undefined => Some(Cow::Borrowed("")),
            Value::Boolean(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Integer(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(n) => Some(Cow::Owned(n.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    /// Concatenate the rendered text of `self` and `other` into a string.
    #[must_use]
    pub fn concat(&self, other: &Value) -> Value {
        let mut text = self.render().unwrap_or_default().into_owned();
        text.push_str(&other.render().unwrap_or_default());
        Value::String(text)
    }

    /// Whether this value can take part in arithmetic.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.numeric().is_some()
    }

    /// The integer this value denotes, if it is an integer or an integer
    /// numeral string.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.numeric()? {
            Numeric::Integer(n) => Some(n),
            Numeric::Float(_) => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.numeric().map(Numeric::as_f64)
    }

    /// `self + rhs`, or `None` when either side is not numeric.
    ///
    /// Two integers add as an integer (a float on overflow); anything
    /// involving a float yields a float.
    #[must_use]
    pub fn add(&self, rhs: &Value) -> Option<Value> {
        arithmetic(self, rhs, i64::checked_add, |a, b| a + b)
    }

    /// `self * rhs`, with the same promotion rules as [`Value::add`].
    #[must_use]
    pub fn multiply(&self, rhs: &Value) -> Option<Value> {
        arithmetic(self, rhs, i64::checked_mul, |a, b| a * b)
    }

    /// Deep-merge `other` into `self`. Mappings merge key by key, anything
    /// else is replaced.
    pub fn merge(&mut self, other: Value) {
        match (self, other) {
            (Value::Mapping(base), Value::Mapping(overlay)) => {
                for (key, value) in overlay {
                    match base.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match self {
            Value::Integer(n) => Some(Numeric::Integer(*n)),
            Value::Float(n) => Some(Numeric::Float(*n)),
            Value::String(s) => parse_numeral(s),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    #[allow(clippy::cast_precision_loss)]
    fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(n) => n as f64,
            Numeric::Float(n) => n,
        }
    }
}

/// An optionally signed integer or decimal numeral, surrounding whitespace
/// allowed. Broader than argument coercion, which leaves `-1.5` a string.
fn parse_numeral(text: &str) -> Option<Numeric> {
    let text = text.trim();
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || fraction.is_some_and(|fraction| !is_digits(fraction)) {
        return None;
    }
    if fraction.is_none() {
        if let Ok(n) = text.parse() {
            return Some(Numeric::Integer(n));
        }
    }
    text.parse().ok().map(Numeric::Float)
}

fn arithmetic(
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Option<Value> {
    let (lhs, rhs) = (lhs.numeric()?, rhs.numeric()?);
    let value = match (lhs, rhs) {
        (Numeric::Integer(a), Numeric::Integer(b)) => int_op(a, b).map_or_else(
            || Value::Float(float_op(lhs.as_f64(), rhs.as_f64())),
            Value::Integer,
        ),
        _ => Value::Float(float_op(lhs.as_f64(), rhs.as_f64())),
    };
    Some(value)
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::String(s) => Value::String(s),
            Literal::Boolean(b) => Value::Boolean(b),
            Literal::Integer(n) => Value::Integer(n),
            Literal::Float(n) => Value::Float(n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Mapping(entries)
    }
}

impl<K, V> FromIterator<(K, V)> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Undefined,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or_default(),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => entries.into_iter().collect(),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(n) => Value::Integer(n),
            toml::Value::Float(n) => Value::Float(n),
            toml::Value::Boolean(b) => Value::Boolean(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            toml::Value::Table(entries) => entries.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Value {
        [
            ("accent", Value::from("#f60")),
            (
                "greys",
                Value::Sequence(vec![Value::from("#111"), Value::from("#eee")]),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn path(keys: &[&str]) -> Vec<String> {
        keys.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn traverse_mapping_and_sequence() {
        let palette = palette();
        assert_eq!(palette.traverse(&path(&["accent"])), Ok(&Value::from("#f60")));
        assert_eq!(palette.traverse(&path(&["greys", "1"])), Ok(&Value::from("#eee")));
        assert_eq!(palette.traverse(&[]), Ok(&palette));
    }

    #[test]
    fn missing_entries_are_undefined() {
        let palette = palette();
        assert_eq!(palette.traverse(&path(&["nope"])), Ok(&Value::Undefined));
        assert_eq!(palette.traverse(&path(&["greys", "9"])), Ok(&Value::Undefined));
        assert_eq!(
            palette.traverse(&path(&["nope", "deeper"])),
            Ok(&Value::Undefined)
        );
    }

    #[test]
    fn indexing_a_scalar_fails() {
        let palette = palette();
        let err = palette.traverse(&path(&["accent", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "cannot index into a string with key 'x'");

        let err = palette.traverse(&path(&["greys", "first"])).unwrap_err();
        assert_eq!(err.to_string(), "cannot index into a sequence with key 'first'");
    }

    #[test]
    fn render_scalars() {
        assert_eq!(Value::Undefined.render().as_deref(), Some(""));
        assert_eq!(Value::Boolean(true).render().as_deref(), Some("true"));
        assert_eq!(Value::Boolean(false).render().as_deref(), Some("false"));
        assert_eq!(Value::Integer(-4).render().as_deref(), Some("-4"));
        assert_eq!(Value::Float(11.0).render().as_deref(), Some("11"));
        assert_eq!(Value::Float(0.25).render().as_deref(), Some("0.25"));
        assert_eq!(Value::from("1px").render().as_deref(), Some("1px"));
        assert_eq!(palette().render(), None);
    }

    #[test]
    fn integer_addition_stays_integer() {
        assert_eq!(
            Value::Integer(5).add(&Value::Integer(5)),
            Some(Value::Integer(10))
        );
    }

    #[test]
    fn float_addition_promotes() {
        assert_eq!(
            Value::Float(5.5).add(&Value::Float(5.5)),
            Some(Value::Float(11.0))
        );
        assert_eq!(
            Value::Integer(1).add(&Value::Float(0.5)),
            Some(Value::Float(1.5))
        );
    }

    #[test]
    fn overflow_promotes_to_float() {
        let sum = Value::Integer(i64::MAX).add(&Value::Integer(1));
        assert!(matches!(sum, Some(Value::Float(_))));
    }

    #[test]
    fn numeric_strings_take_part_in_arithmetic() {
        assert_eq!(
            Value::from("3").multiply(&Value::Integer(4)),
            Some(Value::Integer(12))
        );
        assert_eq!(Value::from("3px").add(&Value::Integer(1)), None);
        assert_eq!(Value::from("1.5").add(&Value::from("-1.5")), Some(Value::Float(0.0)));
        assert_eq!(Value::from(" -2 ").multiply(&Value::Integer(3)), Some(Value::Integer(-6)));
        assert_eq!(Value::from("-").add(&Value::Integer(1)), None);
        assert_eq!(Value::from(".5").add(&Value::Integer(1)), None);
        assert_eq!(Value::Boolean(true).add(&Value::Integer(1)), None);
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::from("12").as_i64(), Some(12));
        assert_eq!(Value::Float(1.5).as_i64(), None);
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Value::from("wide").as_f64(), None);
    }

    #[test]
    fn concat_renders_both_sides() {
        let joined = Value::from("5 + 5 = ").concat(&Value::Integer(10));
        assert_eq!(joined, Value::from("5 + 5 = 10"));
    }

    #[test]
    fn merge_is_deep() {
        let mut base: Value = [("colors", palette()), ("size", Value::Integer(1))]
            .into_iter()
            .collect();
        let overlay: Value = [(
            "colors",
            [("accent", Value::from("#00f"))].into_iter().collect::<Value>(),
        )]
        .into_iter()
        .collect();

        base.merge(overlay);

        assert_eq!(
            base.traverse(&path(&["colors", "accent"])),
            Ok(&Value::from("#00f"))
        );
        assert_eq!(
            base.traverse(&path(&["colors", "greys", "0"])),
            Ok(&Value::from("#111"))
        );
        assert_eq!(base.traverse(&path(&["size"])), Ok(&Value::Integer(1)));
    }

    #[test]
    fn from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": [1, 2.5, null], "b": {"c": true}}"#).unwrap();
        let value = Value::from(json);
        assert_eq!(value.traverse(&path(&["a", "1"])), Ok(&Value::Float(2.5)));
        assert_eq!(value.traverse(&path(&["a", "2"])), Ok(&Value::Undefined));
        assert_eq!(value.traverse(&path(&["b", "c"])), Ok(&Value::Boolean(true)));
    }

    #[test]
    fn from_toml() {
        let table: toml::Table = toml::from_str("size = 4\n[fonts]\nbody = 'serif'\n").unwrap();
        let value = Value::from(toml::Value::Table(table));
        assert_eq!(value.traverse(&path(&["size"])), Ok(&Value::Integer(4)));
        assert_eq!(
            value.traverse(&path(&["fonts", "body"])),
            Ok(&Value::from("serif"))
        );
    }
}
