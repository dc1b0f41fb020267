//! Length arithmetic: `calc()`, `min()`, `max()`.
//!
//! [CSS Values Level 4 § 10](https://www.w3.org/TR/css-values-4/#math)

use super::{Function, FunctionContext};
use crate::error::StyleError;
use crate::expr::evaluate;
use crate::units::{Axis, format_px, resolve_length};

/// Split off the property name the caller appended.
fn split_property<'a>(key: &str, args: &'a [String]) -> Result<(&'a [String], Axis), StyleError> {
    match args.split_last() {
        Some((property, terms)) if !terms.is_empty() => Ok((terms, Axis::for_property(property))),
        _ => Err(StyleError::function_failed(key, "no arguments")),
    }
}

fn length_px(key: &str, context: &FunctionContext<'_>, term: &str, axis: Axis) -> Result<f64, StyleError> {
    resolve_length(term, &context.metrics, axis)
        .ok_or_else(|| StyleError::function_failed(key, format!("cannot resolve '{term}'")))
}

/// `calc()`. Every length is resolved to pixels, then the expression is
/// evaluated with `*` and `/` binding tighter than `+` and `-`, left to
/// right. `%` refers to the parent's height for vertical properties and to
/// its width otherwise.
#[derive(Debug)]
pub struct Calc;

impl Function for Calc {
    fn key(&self) -> &'static str {
        "calc"
    }

    fn takes_property(&self) -> bool {
        true
    }

    fn process(&self, context: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        let (terms, axis) = split_property(self.key(), args)?;
        let tokens = terms
            .iter()
            .map(|term| match term.as_str() {
                op @ ("+" | "-" | "*" | "/" | "(" | ")") => Ok(op.to_string()),
                length => length_px(self.key(), context, length, axis).map(|px| px.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let px = evaluate(&tokens)?;
        Ok(format_px(px))
    }
}

fn pick(
    key: &str,
    context: &FunctionContext<'_>,
    args: &[String],
    better: fn(f64, f64) -> f64,
) -> Result<String, StyleError> {
    let (terms, axis) = split_property(key, args)?;
    let mut best: Option<f64> = None;
    for term in terms {
        let px = length_px(key, context, term, axis)?;
        best = Some(best.map_or(px, |b| better(b, px)));
    }
    best.map(format_px)
        .ok_or_else(|| StyleError::function_failed(key, "no arguments"))
}

/// `min()`: the smallest of its lengths.
#[derive(Debug)]
pub struct Min;

impl Function for Min {
    fn key(&self) -> &'static str {
        "min"
    }

    fn takes_property(&self) -> bool {
        true
    }

    fn process(&self, context: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        pick(self.key(), context, args, f64::min)
    }
}

/// `max()`: the largest of its lengths.
#[derive(Debug)]
pub struct Max;

impl Function for Max {
    fn key(&self) -> &'static str {
        "max"
    }

    fn takes_property(&self) -> bool {
        true
    }

    fn process(&self, context: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        pick(self.key(), context, args, f64::max)
    }
}
