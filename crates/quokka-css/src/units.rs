//! Lengths with units, resolved to pixels.
//!
//! [CSS Values Level 4 § 6](https://www.w3.org/TR/css-values-4/#lengths)

use crate::host::ElementMetrics;

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Which parent dimension a percentage refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Percentages of the parent's content width.
    Horizontal,
    /// Percentages of the parent's content height.
    Vertical,
}

impl Axis {
    /// `height`, `min-height`, `top`, `margin-bottom` and the like are
    /// vertical; everything else is horizontal.
    #[must_use]
    pub fn for_property(property: &str) -> Self {
        let property = property.to_ascii_lowercase();
        if property.ends_with("height") || property.ends_with("top") || property.ends_with("bottom") {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// Split `12.5em` into `(12.5, "em")`. `None` when the text does not start
/// with a number.
#[must_use]
pub fn split_length(text: &str) -> Option<(f64, &str)> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit() || c == '.' || (i == 0 && matches!(c, '+' | '-')))
        })
        .map_or(text.len(), |(i, _)| i);
    let number = text[..end].parse().ok()?;
    Some((number, &text[end..]))
}

/// Resolve a length to pixels. A unitless number is taken as pixels.
///
/// `%` is relative to the parent content box along `axis`; `em`/`rem` to
/// the font size and `ex` to half of it; `mm`, `cm`, `in`, `pt` and `pc`
/// go through the device's dots per millimetre.
#[must_use]
pub fn resolve_length(text: &str, metrics: &ElementMetrics, axis: Axis) -> Option<f64> {
    let (value, unit) = split_length(text)?;
    let dpmm = metrics.dots_per_millimeter;
    let px = match unit.to_ascii_lowercase().as_str() {
        "" | "px" => value,
        "%" => {
            let base = match axis {
                Axis::Horizontal => metrics.parent_width,
                Axis::Vertical => metrics.parent_height,
            };
            value / 100.0 * base
        }
        "em" | "rem" => value * metrics.font_size,
        "ex" => value * metrics.font_size * 0.5,
        "mm" => value * dpmm,
        "cm" => value * 10.0 * dpmm,
        "in" => value * MM_PER_INCH * dpmm,
        "pt" => value * MM_PER_INCH / 72.0 * dpmm,
        "pc" => value * MM_PER_INCH / 6.0 * dpmm,
        _ => return None,
    };
    Some(px)
}

/// Render pixels the way resolved values are handed to the host: five
/// decimals with trailing zeros dropped, then `px`.
#[must_use]
pub fn format_px(value: f64) -> String {
    let fixed = format!("{value:.5}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("{trimmed}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ElementMetrics {
        ElementMetrics {
            parent_width: 200.0,
            parent_height: 50.0,
            font_size: 10.0,
            dots_per_millimeter: 4.0,
        }
    }

    #[test]
    fn test_axis_for_property() {
        assert_eq!(Axis::for_property("height"), Axis::Vertical);
        assert_eq!(Axis::for_property("margin-top"), Axis::Vertical);
        assert_eq!(Axis::for_property("width"), Axis::Horizontal);
        assert_eq!(Axis::for_property("left"), Axis::Horizontal);
    }

    #[test]
    fn test_resolve_units() {
        let m = metrics();
        assert_eq!(resolve_length("12", &m, Axis::Horizontal), Some(12.0));
        assert_eq!(resolve_length("50%", &m, Axis::Horizontal), Some(100.0));
        assert_eq!(resolve_length("50%", &m, Axis::Vertical), Some(25.0));
        assert_eq!(resolve_length("2em", &m, Axis::Horizontal), Some(20.0));
        assert_eq!(resolve_length("1cm", &m, Axis::Horizontal), Some(40.0));
        assert_eq!(resolve_length("3vw", &m, Axis::Horizontal), None);
        assert_eq!(resolve_length("auto", &m, Axis::Horizontal), None);
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(90.0), "90px");
        assert_eq!(format_px(12.5), "12.5px");
        assert_eq!(format_px(1.0 / 3.0), "0.33333px");
        assert_eq!(format_px(-0.000_001), "0px");
    }
}
