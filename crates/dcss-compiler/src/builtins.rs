use crate::filters::required_arg;
use crate::filters::FilterError;
use crate::filters::FilterRegistry;
use crate::value::Value;

/// The filters every engine built with [`Engine::with_builtins`] knows.
///
/// [`Engine::with_builtins`]: crate::Engine::with_builtins
#[must_use]
pub fn builtins() -> FilterRegistry {
    FilterRegistry::new()
        .with("default", default)
        .with("upper", upper)
        .with("lower", lower)
        .with("trim", trim)
        .with("append", append)
        .with("prepend", prepend)
        .with("add", add)
        .with("multiply", multiply)
        .with("round", round)
}

fn default(value: Value, args: &[Value]) -> Result<Value, FilterError> {
    let fallback = required_arg(args, 0)?;
    if value.is_empty() {
        Ok(fallback.clone())
    } else {
        Ok(value)
    }
}

fn upper(value: Value, _args: &[Value]) -> Result<Value, FilterError> {
    map_text(value, str::to_uppercase)
}

fn lower(value: Value, _args: &[Value]) -> Result<Value, FilterError> {
    map_text(value, str::to_lowercase)
}

fn trim(value: Value, _args: &[Value]) -> Result<Value, FilterError> {
    map_text(value, |text| text.trim().to_string())
}

fn append(value: Value, args: &[Value]) -> Result<Value, FilterError> {
    expect_scalar(&value)?;
    Ok(args.iter().fold(value, |acc, arg| acc.concat(arg)))
}

fn prepend(value: Value, args: &[Value]) -> Result<Value, FilterError> {
    expect_scalar(&value)?;
    let prefix = args
        .iter()
        .fold(Value::String(String::new()), |acc, arg| acc.concat(arg));
    Ok(prefix.concat(&value))
}

fn add(value: Value, args: &[Value]) -> Result<Value, FilterError> {
    let rhs = required_arg(args, 0)?;
    value
        .add(rhs)
        .ok_or_else(|| arithmetic_error(&value, rhs))
}

fn multiply(value: Value, args: &[Value]) -> Result<Value, FilterError> {
    let rhs = required_arg(args, 0)?;
    value
        .multiply(rhs)
        .ok_or_else(|| arithmetic_error(&value, rhs))
}

/// `round(precision = 0)`: round to `precision` decimal places. Integers
/// are returned unchanged.
fn round(value: Value, args: &[Value]) -> Result<Value, FilterError> {
    let precision = match args.first() {
        None => 0,
        Some(arg) => arg.as_i64().ok_or(FilterError::InvalidArgument {
            position: 1,
            expected: "an integer",
            found: arg.kind(),
        })?,
    };

    if let Some(n) = value.as_i64() {
        return Ok(Value::Integer(n));
    }
    let n = value.as_f64().ok_or(FilterError::InvalidValue {
        expected: "numeric",
        found: value.kind(),
    })?;

    let places = i32::try_from(precision.clamp(0, 15)).unwrap_or_default();
    let factor = 10_f64.powi(places);
    Ok(Value::Float((n * factor).round() / factor))
}

/// Undefined passes through untouched so a later `default` still applies.
fn map_text(value: Value, f: impl FnOnce(&str) -> String) -> Result<Value, FilterError> {
    if value.is_undefined() {
        return Ok(value);
    }
    let text = value.render().ok_or(FilterError::InvalidValue {
        expected: "scalar",
        found: value.kind(),
    })?;
    Ok(Value::String(f(&text)))
}

fn expect_scalar(value: &Value) -> Result<(), FilterError> {
    match value {
        Value::Sequence(_) | Value::Mapping(_) => Err(FilterError::InvalidValue {
            expected: "scalar",
            found: value.kind(),
        }),
        _ => Ok(()),
    }
}

fn arithmetic_error(value: &Value, rhs: &Value) -> FilterError {
    if value.is_numeric() {
        FilterError::InvalidArgument {
            position: 1,
            expected: "a number",
            found: rhs.kind(),
        }
    } else {
        FilterError::InvalidValue {
            expected: "numeric",
            found: value.kind(),
        }
    }
}
