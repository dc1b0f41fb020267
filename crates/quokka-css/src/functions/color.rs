//! Color functions, resolved to `#rrggbbaa`.
//!
//! [CSS Color Level 4 § 5](https://www.w3.org/TR/css-color-4/#rgb-functions)

use super::{Function, FunctionContext, number_arg};
use crate::error::StyleError;

/// Channel arguments with the `/` of the space-separated syntax removed.
fn channels(args: &[String]) -> Vec<&str> {
    args.iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty() && *a != "/")
        .collect()
}

/// `50%` → 0.5 of `scale`, `128` → 128.
fn scaled(key: &str, arg: &str, scale: f64) -> Result<f64, StyleError> {
    match arg.strip_suffix('%') {
        Some(percent) => Ok(number_arg(key, percent)? / 100.0 * scale),
        None => number_arg(key, arg),
    }
}

fn alpha(key: &str, arg: Option<&&str>) -> Result<f64, StyleError> {
    arg.map_or(Ok(1.0), |a| scaled(key, a, 1.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn hex(red: f64, green: f64, blue: f64, alpha: f64) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        to_byte(red),
        to_byte(green),
        to_byte(blue),
        to_byte(alpha * 255.0)
    )
}

/// `rgb()` and `rgba()`.
#[derive(Debug)]
pub struct Rgb {
    key: &'static str,
}

impl Rgb {
    /// Register under `key`.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Function for Rgb {
    fn key(&self) -> &'static str {
        self.key
    }

    fn process(&self, _: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        let args = channels(args);
        let [r, g, b, rest @ ..] = args.as_slice() else {
            return Err(StyleError::function_failed(self.key, "expected three channels"));
        };
        Ok(hex(
            scaled(self.key, r, 255.0)?,
            scaled(self.key, g, 255.0)?,
            scaled(self.key, b, 255.0)?,
            alpha(self.key, rest.first())?,
        ))
    }
}

/// `hsl()` and `hsla()`.
#[derive(Debug)]
pub struct Hsl {
    key: &'static str,
}

impl Hsl {
    /// Register under `key`.
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }
}

/// Hue in degrees from `120`, `120deg`, `0.5turn`.
fn hue(key: &str, arg: &str) -> Result<f64, StyleError> {
    if let Some(turns) = arg.strip_suffix("turn") {
        return Ok(number_arg(key, turns)? * 360.0);
    }
    number_arg(key, arg.strip_suffix("deg").unwrap_or(arg))
}

/// [CSS Color Level 4 § 7.1](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0);
    let channel = |n: f64| {
        let k = (n + hue / 30.0) % 12.0;
        let a = saturation * lightness.min(1.0 - lightness);
        lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };
    (channel(0.0) * 255.0, channel(8.0) * 255.0, channel(4.0) * 255.0)
}

impl Function for Hsl {
    fn key(&self) -> &'static str {
        self.key
    }

    fn process(&self, _: &FunctionContext<'_>, args: &[String]) -> Result<String, StyleError> {
        let args = channels(args);
        let [h, s, l, rest @ ..] = args.as_slice() else {
            return Err(StyleError::function_failed(self.key, "expected hue, saturation and lightness"));
        };
        let (r, g, b) = hsl_to_rgb(
            hue(self.key, h)?,
            scaled(self.key, s, 1.0)?.clamp(0.0, 1.0),
            scaled(self.key, l, 1.0)?.clamp(0.0, 1.0),
        );
        Ok(hex(r, g, b, alpha(self.key, rest.first())?))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{strings, with_context};
    use super::*;
    use crate::host::ElementMetrics;

    fn run(function: &dyn Function, args: &[&str]) -> Result<String, StyleError> {
        let args = strings(args);
        with_context("color", ElementMetrics::default(), |ctx| function.process(ctx, &args))
    }

    #[test]
    fn test_rgb_forms() {
        assert_eq!(run(&Rgb::new("rgb"), &["255", "0", "128"]), Ok("#ff0080ff".to_string()));
        assert_eq!(
            run(&Rgb::new("rgba"), &["100%", "0", "0", "0.5"]),
            Ok("#ff000080".to_string())
        );
        assert_eq!(
            run(&Rgb::new("rgb"), &["0", "0", "0", "/", "25%"]),
            Ok("#00000040".to_string())
        );
        assert!(run(&Rgb::new("rgb"), &["1", "2"]).is_err());
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(run(&Hsl::new("hsl"), &["0", "100%", "50%"]), Ok("#ff0000ff".to_string()));
        assert_eq!(run(&Hsl::new("hsl"), &["120deg", "100%", "25%"]), Ok("#008000ff".to_string()));
        assert_eq!(run(&Hsl::new("hsla"), &["0", "0%", "100%", "0"]), Ok("#ffffff00".to_string()));
    }
}
