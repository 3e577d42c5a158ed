use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around a plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "padding `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(40.0, 50.0, 40.0, 50.0)
    }
}

/// Pixel offset applied to a group of primitives.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translate {
    pub x: f64,
    pub y: f64,
}

impl Translate {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn then(self, other: Translate) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Direction bars grow in. Vertical bars put categories on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Case-insensitive parse; anything other than `vertical` is horizontal.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.eq_ignore_ascii_case("vertical") {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        self == Self::Vertical
    }
}

/// How several layers of values share one category band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarLayout {
    #[default]
    Default,
    Stacked,
    Grouped,
}

impl BarLayout {
    /// Case-insensitive parse. Unknown names fall back to `Default`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.eq_ignore_ascii_case("stacked") {
            Self::Stacked
        } else if input.eq_ignore_ascii_case("grouped") {
            Self::Grouped
        } else {
            Self::Default
        }
    }

    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::Default
    }

    #[must_use]
    pub fn is_stacked(self) -> bool {
        self == Self::Stacked
    }

    #[must_use]
    pub fn is_grouped(self) -> bool {
        self == Self::Grouped
    }
}

#[cfg(test)]
mod tests {
    use super::{BarLayout, Orientation, Padding};

    #[test]
    fn orientation_parse_ignores_case() {
        assert_eq!(Orientation::parse("VERTICAL"), Orientation::Vertical);
        assert_eq!(Orientation::parse("Vertical"), Orientation::Vertical);
        assert_eq!(Orientation::parse("horizontal"), Orientation::Horizontal);
        assert_eq!(Orientation::parse("sideways"), Orientation::Horizontal);
    }

    #[test]
    fn bar_layout_parse_falls_back_to_default() {
        assert!(BarLayout::parse("DEFAULT").is_default());
        assert!(BarLayout::parse("Stacked").is_stacked());
        assert!(BarLayout::parse("grouped").is_grouped());
        assert!(BarLayout::parse("waterfall").is_default());
    }

    #[test]
    fn padding_rejects_negative_sides() {
        assert!(Padding::new(1.0, -1.0, 0.0, 0.0).validate().is_err());
        assert!(Padding::default().validate().is_ok());
    }
}
