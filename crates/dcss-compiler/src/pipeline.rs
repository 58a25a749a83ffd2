use dcss_templates::FilterCall;

use crate::diagnostics::CompileDiagnostic;
use crate::filters::FilterRegistry;
use crate::value::Value;

/// Run `initial` through `chain`, left to right.
///
/// Each filter sees exactly what the previous one returned. A filter that is
/// not registered, or that fails, leaves the value as it was and records a
/// diagnostic; the rest of the chain still runs.
pub fn apply(
    initial: Value,
    chain: &[FilterCall],
    registry: &FilterRegistry,
    diagnostics: &mut Vec<CompileDiagnostic>,
) -> Value {
    chain.iter().fold(initial, |value, call| {
        let Some(filter) = registry.get(&call.name) else {
            diagnostics.push(CompileDiagnostic::FilterNotFound {
                name: call.name.clone(),
                span: call.span,
            });
            return value;
        };

        let args: Vec<Value> = call.args.iter().cloned().map(Value::from).collect();
        match filter.apply(value.clone(), &args) {
            Ok(next) => next,
            Err(err) => {
                diagnostics.push(CompileDiagnostic::FilterFailed {
                    name: call.name.clone(),
                    reason: err.to_string(),
                    span: call.span,
                });
                value
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use dcss_source::Span;
    use dcss_templates::coerce;

    use super::*;
    use crate::filters::FilterError;

    fn call(name: &str, args: &[&str]) -> FilterCall {
        FilterCall::new(
            name.to_string(),
            args.iter().map(|raw| coerce(raw)).collect(),
            Span::default(),
        )
    }

    fn complex_filter(value: Value, args: &[Value]) -> Result<Value, FilterError> {
        Ok(args.iter().take(2).fold(value, |acc, arg| acc.concat(arg)))
    }

    fn sum_filter(value: Value, args: &[Value]) -> Result<Value, FilterError> {
        let a = crate::filters::required_arg(args, 0)?;
        let b = crate::filters::required_arg(args, 1)?;
        let sum = a.add(b).ok_or_else(|| FilterError::custom("operands must be numbers"))?;
        Ok(value.concat(&sum))
    }

    fn registry() -> FilterRegistry {
        FilterRegistry::new()
            .with("simple_filter", |value: Value, _: &[Value]| {
                Ok(value.concat(&Value::from("bar")))
            })
            .with("complex_filter", complex_filter)
            .with("add_filter", sum_filter)
    }

    fn run(initial: &str, chain: &[FilterCall]) -> (Value, Vec<CompileDiagnostic>) {
        let mut diagnostics = Vec::new();
        let value = apply(Value::from(initial), chain, &registry(), &mut diagnostics);
        (value, diagnostics)
    }

    #[test]
    fn empty_chain_is_identity() {
        assert_eq!(run("foo", &[]).0, Value::from("foo"));
    }

    #[test]
    fn simple_filters_compose() {
        assert_eq!(run("foo", &[call("simple_filter", &[])]).0, Value::from("foobar"));
        assert_eq!(
            run(
                "foo",
                &[call("simple_filter", &[]), call("simple_filter", &[])]
            )
            .0,
            Value::from("foobarbar")
        );
    }

    #[test]
    fn arguments_are_passed_positionally() {
        assert_eq!(
            run("foo", &[call("complex_filter", &["'bar'"])]).0,
            Value::from("foobar")
        );
        assert_eq!(
            run("foo", &[call("complex_filter", &["'bar'", "'foo'"])]).0,
            Value::from("foobarfoo")
        );
    }

    #[test]
    fn chain_order_is_significant() {
        let forward = run(
            "foo",
            &[
                call("complex_filter", &["'bar'"]),
                call("complex_filter", &["'foo'"]),
            ],
        )
        .0;
        let reversed = run(
            "foo",
            &[
                call("complex_filter", &["'foo'"]),
                call("complex_filter", &["'bar'"]),
            ],
        )
        .0;
        assert_eq!(forward, Value::from("foobarfoo"));
        assert_eq!(reversed, Value::from("foofoobar"));
        assert_ne!(forward, reversed);
    }

    #[test]
    fn numeral_kinds_are_preserved() {
        assert_eq!(
            run("5 + 5 = ", &[call("add_filter", &["5", "5"])]).0,
            Value::from("5 + 5 = 10")
        );
        assert_eq!(
            run("5.5 + 5.5 = ", &[call("add_filter", &["5.5", "5.5"])]).0,
            Value::from("5.5 + 5.5 = 11")
        );
    }

    #[test]
    fn unknown_filter_is_skipped() {
        let (value, diagnostics) = run(
            "value1",
            &[call("missingFilter", &[]), call("simple_filter", &[])],
        );
        assert_eq!(value, Value::from("value1bar"));
        assert_eq!(
            diagnostics,
            vec![CompileDiagnostic::FilterNotFound {
                name: "missingFilter".to_string(),
                span: Span::default(),
            }]
        );
    }

    #[test]
    fn failing_filter_passes_value_through() {
        let (value, diagnostics) = run("x", &[call("add_filter", &["1"])]);
        assert_eq!(value, Value::from("x"));
        assert_eq!(
            diagnostics,
            vec![CompileDiagnostic::FilterFailed {
                name: "add_filter".to_string(),
                reason: "missing argument 2".to_string(),
                span: Span::default(),
            }]
        );
    }
}
