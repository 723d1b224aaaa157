//! CSS length units and inline `style` sizing.
//!
//! Conversions assume a 16px base font and 96 DPI:
//!
//! | Unit  | Pixels      |
//! |-------|-------------|
//! | `px`  | 1           |
//! | `pt`  | 16 / 12     |
//! | `pc`  | 16          |
//! | `in`  | 96          |
//! | `mm`  | 96 / 25.4   |
//! | `cm`  | 96 / 2.54   |
//! | `m`   | 96 / 0.0254 |
//! | `ex`  | 7           |
//! | `em`  | 16          |
//! | `rem` | 16          |
//! | `%`   | 16 / 100    |

use std::sync::LazyLock;

use regex::Regex;

/// Pixel factor of a CSS length unit.
///
/// Unit names are matched case-insensitively.
pub fn unit_factor(unit: &str) -> Option<f64> {
    let factor = match unit.to_ascii_lowercase().as_str() {
        "px" => 1.0,
        "pt" => 16.0 / 12.0,
        "pc" => 16.0,
        "in" => 96.0,
        "mm" => 96.0 / 25.4,
        "cm" => 96.0 / 2.54,
        "m" => 96.0 / 0.0254,
        "ex" => 7.0,
        "em" | "rem" => 16.0,
        "%" => 16.0 / 100.0,
        _ => return None,
    };
    Some(factor)
}

/// Convert `value` in `unit` to whole pixels.
///
/// Unknown or missing units leave the number as is.
pub fn to_pixels(value: f64, unit: Option<&str>) -> u32 {
    let factor = unit.and_then(unit_factor).unwrap_or(1.0);
    let px = (value * factor).round();
    if px.is_finite() && px > 0.0 {
        px.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

// `max-width` and friends do not count as `width`
static RE_STYLE_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^-\w])width\s*:\s*(\d+(?:\.\d+)?)\s*([a-z]+|%)?").unwrap()
});

static RE_STYLE_HEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^-\w])height\s*:\s*(\d+(?:\.\d+)?)\s*([a-z]+|%)?").unwrap()
});

fn style_length(re: &Regex, style: &str) -> Option<u32> {
    let caps = re.captures(style)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(to_pixels(value, caps.get(2).map(|m| m.as_str())))
}

/// Extract `(width, height)` in pixels from an inline `style` attribute.
///
/// ```
/// use external_links::image::units::style_dimensions;
/// assert_eq!(style_dimensions("width:1in; height: 2em"), (Some(96), Some(32)));
/// assert_eq!(style_dimensions("color: red"), (None, None));
/// ```
pub fn style_dimensions(style: &str) -> (Option<u32>, Option<u32>) {
    (
        style_length(&RE_STYLE_WIDTH, style),
        style_length(&RE_STYLE_HEIGHT, style),
    )
}

/// Parse an HTML `width`/`height` attribute value (`32`, `32px`, `12.5`).
///
/// Only the leading number counts; values without one are ignored.
pub fn parse_attr_length(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let number: f64 = value[..end].parse().ok()?;
    Some(to_pixels(number, None))
}
