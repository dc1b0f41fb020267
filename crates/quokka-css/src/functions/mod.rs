//! Value functions such as `calc()` and `rgb()`, resolved per element just
//! before a property is applied.
//!
//! [CSS Values Level 4 § 2.5](https://www.w3.org/TR/css-values-4/#functional-notations)
//!
//! A function value in a [`Rule`](crate::rules::Rule) keeps its raw argument
//! tokens. At apply time each one is looked up by its lower-case name and
//! replaced by the string the function produces. Resolution works on copies;
//! the stylesheet's values are never changed.

mod calc;
mod color;
mod misc;

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use quokka_common::warning::warn_once;
use quokka_dom::{Document, NodeId};

use crate::error::StyleError;
use crate::host::ElementMetrics;
use crate::rules::PropertyValue;

pub use calc::{Calc, Max, Min};
pub use color::{Hsl, Rgb};
pub use misc::{Attr, Counter, CubicBezier, Gradient, Var};

/// What a function may consult about the element being styled.
#[derive(Debug, Clone, Copy)]
pub struct FunctionContext<'a> {
    /// The document the element lives in.
    pub document: &'a Document,
    /// The element being styled.
    pub element: NodeId,
    /// Lower-cased name of the property being computed.
    pub property: &'a str,
    /// Layout metrics for relative lengths.
    pub metrics: ElementMetrics,
    /// Custom properties of the stylesheet.
    pub custom_vars: &'a BTreeMap<String, Vec<String>>,
}

/// One value function.
pub trait Function: Sync {
    /// Lower-case name without `(`.
    fn key(&self) -> &'static str;

    /// Whether the caller appends the property name as a final argument.
    fn takes_property(&self) -> bool {
        false
    }

    /// Produce the resolved value.
    ///
    /// # Errors
    ///
    /// [`StyleError::FunctionFailed`] or [`StyleError::Eval`] when the
    /// arguments cannot be used.
    fn process(&self, context: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError>;
}

static CATALOGUE: &[&dyn Function] = &[
    &Attr,
    &Calc,
    &Gradient::new("conic-gradient"),
    &Counter,
    &CubicBezier,
    &Hsl::new("hsl"),
    &Hsl::new("hsla"),
    &Gradient::new("linear-gradient"),
    &Max,
    &Min,
    &Gradient::new("radial-gradient"),
    &Gradient::new("repeating-conic-gradient"),
    &Gradient::new("repeating-linear-gradient"),
    &Gradient::new("repeating-radial-gradient"),
    &Rgb::new("rgb"),
    &Rgb::new("rgba"),
    &Var,
];

static REGISTRY: LazyLock<HashMap<&'static str, &'static dyn Function>> =
    LazyLock::new(|| catalogue().map(|f| (f.key(), f)).collect());

/// Find a function by name, ignoring ASCII case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static dyn Function> {
    REGISTRY.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Every registered function, in catalogue order.
pub fn catalogue() -> impl Iterator<Item = &'static dyn Function> {
    CATALOGUE.iter().copied()
}

/// Resolve every function value among `values`.
///
/// A value whose function is unknown or fails is kept as written and the
/// problem is returned next to the resolved values.
#[must_use]
pub fn resolve_values(
    context: &FunctionContext<'_>,
    values: &[PropertyValue],
) -> (Vec<PropertyValue>, Vec<StyleError>) {
    let mut problems = Vec::new();
    let resolved = values
        .iter()
        .map(|value| {
            if !value.is_function() {
                return value.clone();
            }
            match resolve_function(context, value) {
                Ok(text) => PropertyValue::new(text),
                Err(err) => {
                    tracing::debug!(function = %value.text, error = %err, "function left unresolved");
                    problems.push(err);
                    value.clone()
                }
            }
        })
        .collect();
    (resolved, problems)
}

fn resolve_function(context: &FunctionContext<'_>, value: &PropertyValue) -> Result<String, StyleError> {
    let Some(function) = lookup(&value.text) else {
        let _ = warn_once("function", &format!("unknown function '{}()'", value.text));
        return Err(StyleError::FunctionUnknown {
            name: value.text.clone(),
        });
    };
    if function.takes_property() {
        let mut args = value.args.clone();
        args.push(context.property.to_string());
        function.process(context, &args)
    } else {
        function.process(context, &value.args)
    }
}

/// Parse a plain number argument.
pub(crate) fn number_arg(function: &str, arg: &str) -> Result<f64, StyleError> {
    arg.trim()
        .parse()
        .map_err(|_| StyleError::function_failed(function, format!("'{arg}' is not a number")))
}


#[cfg(test)]
mod tests {
    use super::test_support::with_context;
    use super::*;

    #[test]
    fn test_registry_is_complete() {
        assert_eq!(REGISTRY.len(), catalogue().count());
        assert!(lookup("CALC").is_some());
        assert!(lookup("frobnicate").is_none());
    }

    #[test]
    fn test_unknown_function_is_left_untouched() {
        let mut value = PropertyValue::function("frobnicate");
        value.push_arg("1");
        let (resolved, problems) = with_context("width", ElementMetrics::default(), |ctx| {
            resolve_values(ctx, std::slice::from_ref(&value))
        });
        assert_eq!(resolved, vec![value]);
        assert_eq!(
            problems,
            vec![StyleError::FunctionUnknown {
                name: "frobnicate".to_string()
            }]
        );
    }

    #[test]
    fn test_bare_values_pass_through() {
        let values = vec![PropertyValue::new("red"), PropertyValue::new("2px")];
        let (resolved, problems) =
            with_context("color", ElementMetrics::default(), |ctx| resolve_values(ctx, &values));
        assert_eq!(resolved, values);
        assert!(problems.is_empty());
    }
}
