use dcss_templates::scan;
use dcss_templates::Placeholder;
use dcss_templates::Segment;
use serde::Serialize;

use crate::diagnostics::CompileDiagnostic;
use crate::filters::FilterRegistry;
use crate::pipeline;
use crate::resolver::Resolver;
use crate::value::Value;

/// The filter that may stand in for an undefined variable.
const DEFAULT_FILTER: &str = "default";

/// Output of one compilation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Compilation {
    pub output: String,
    pub diagnostics: Vec<CompileDiagnostic>,
}

/// Substitute every placeholder in `source`.
///
/// Text between placeholders is copied unchanged. Problems with a single
/// placeholder never abort the pass: they are collected in
/// [`Compilation::diagnostics`] and logged as warnings.
pub fn compile(source: &str, resolver: &dyn Resolver, filters: &FilterRegistry) -> Compilation {
    let mut output = String::with_capacity(source.len());
    let mut diagnostics = Vec::new();
    let mut placeholders = 0usize;

    for segment in scan(source) {
        match segment {
            Segment::Text { text, .. } => output.push_str(text),
            Segment::Placeholder(placeholder) => {
                placeholders += 1;
                output.push_str(&evaluate(&placeholder, resolver, filters, &mut diagnostics));
            }
        }
    }

    for diagnostic in &diagnostics {
        tracing::warn!(
            code = diagnostic.code(),
            offset = diagnostic.span().start,
            "{diagnostic}"
        );
    }
    tracing::debug!(
        placeholders,
        diagnostics = diagnostics.len(),
        "compiled {} bytes",
        source.len()
    );

    Compilation {
        output,
        diagnostics,
    }
}

/// Resolve one placeholder, run its filter chain, and render the result.
///
/// A variable that resolves to nothing is always reported, unless a
/// `default` call in the chain supplied its fallback: `$missing|default(0)`
/// is quiet but `$missing|append('px')` and `$missing|append('px')|default(0)`
/// are not.
pub fn evaluate(
    placeholder: &Placeholder,
    resolver: &dyn Resolver,
    filters: &FilterRegistry,
    diagnostics: &mut Vec<CompileDiagnostic>,
) -> String {
    let (initial, traversed) = match resolver.resolve(&placeholder.name, &placeholder.subscripts) {
        Ok(value) => (value, true),
        Err(err) => {
            diagnostics.push(CompileDiagnostic::SubscriptTraversal {
                path: placeholder.path(),
                reason: err.to_string(),
                span: placeholder.span,
            });
            (Value::Undefined, false)
        }
    };
    let missing = traversed && initial.is_undefined();

    // Split at the first `default` call: its fallback only counts when the
    // value reaching it is still undefined.
    let split = placeholder
        .filters
        .iter()
        .position(|call| call.name == DEFAULT_FILTER && filters.contains(&call.name))
        .unwrap_or(placeholder.filters.len());
    let (before, after) = placeholder.filters.split_at(split);

    let mut chain_diagnostics = Vec::new();
    let partial = pipeline::apply(initial, before, filters, &mut chain_diagnostics);
    let fell_back = partial.is_undefined() && !after.is_empty();
    let value = pipeline::apply(partial, after, filters, &mut chain_diagnostics);

    let defaulted = fell_back && !value.is_undefined();
    if missing && !defaulted {
        diagnostics.push(CompileDiagnostic::UndefinedVariable {
            path: placeholder.path(),
            span: placeholder.span,
        });
    }
    diagnostics.append(&mut chain_diagnostics);

    if let Some(text) = value.render() {
        text.into_owned()
    } else {
        diagnostics.push(CompileDiagnostic::NonScalarValue {
            path: placeholder.path(),
            kind: value.kind(),
            span: placeholder.span,
        });
        String::new()
    }
}
