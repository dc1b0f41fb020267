//! Reference and pass-through functions.

use super::{Function, FunctionContext, number_arg};
use crate::error::StyleError;

/// `var(--name[, fallback])` left over from parsing, because the custom
/// property was bound after the declaration that uses it.
#[derive(Debug)]
pub struct Var;

impl Function for Var {
    fn key(&self) -> &'static str {
        "var"
    }

    fn process(&self, context: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        let Some((name, fallback)) = args.split_first() else {
            return Err(StyleError::function_failed(self.key(), "no custom property name"));
        };
        if let Some(bound) = context.custom_vars.get(name) {
            return Ok(bound.join(" "));
        }
        if fallback.is_empty() {
            Err(StyleError::function_failed(
                self.key(),
                format!("'{name}' is not defined"),
            ))
        } else {
            Ok(fallback.join(" "))
        }
    }
}

/// `attr(name[, fallback])`: an attribute of the element being styled.
#[derive(Debug)]
pub struct Attr;

impl Function for Attr {
    fn key(&self) -> &'static str {
        "attr"
    }

    fn process(&self, context: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        let Some((name, fallback)) = args.split_first() else {
            return Err(StyleError::function_failed(self.key(), "no attribute name"));
        };
        if let Some(value) = context.document.attribute(context.element, name) {
            return Ok(value.to_string());
        }
        if fallback.is_empty() {
            Err(StyleError::function_failed(
                self.key(),
                format!("element has no '{name}' attribute"),
            ))
        } else {
            Ok(fallback.join(" "))
        }
    }
}

/// `cubic-bezier(x1, y1, x2, y2)`, validated and normalised.
#[derive(Debug)]
pub struct CubicBezier;

impl Function for CubicBezier {
    fn key(&self) -> &'static str {
        "cubic-bezier"
    }

    fn process(&self, _: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        let points = args
            .iter()
            .map(|a| number_arg(self.key(), a))
            .collect::<Result<Vec<_>, _>>()?;
        let [x1, y1, x2, y2] = points.as_slice() else {
            return Err(StyleError::function_failed(self.key(), "expected four numbers"));
        };
        // [CSS Easing § 2.2] "Both x values must be in the range [0, 1]"
        if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
            return Err(StyleError::function_failed(self.key(), "x values must be within [0, 1]"));
        }
        Ok(format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"))
    }
}

/// The gradient family. The arguments are handed to the host unchanged.
#[derive(Debug)]
pub struct Gradient {
    key: &'static str,
}

impl Gradient {
    /// Register under `key`.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Function for Gradient {
    fn key(&self) -> &'static str {
        self.key
    }

    fn process(&self, _: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        Ok(format!("{}({})", self.key, args.join(" ")))
    }
}

/// `counter(name[, style])`. Counters are not tracked, so the reference is
/// passed on by name.
#[derive(Debug)]
pub struct Counter;

impl Function for Counter {
    fn key(&self) -> &'static str {
        "counter"
    }

    fn process(&self, _: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        match args {
            [] => Err(StyleError::function_failed(self.key(), "no counter name")),
            [name] => Ok(format!("counter({name})")),
            [name, style, ..] => Ok(format!("counter({name}, {style})")),
        }
    }
}
