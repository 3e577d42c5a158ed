use serde::{Deserialize, Serialize};

use crate::core::DatumValue;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// The ten-color categorical palette (`#1f77b4`, `#ff7f0e`, ...).
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Maps datum values to fill colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorScale {
    /// Category at domain index `i` gets `range[i % range.len()]`.
    Ordinal {
        domain: Vec<String>,
        range: Vec<Color>,
    },
    /// Numeric values interpolate between two colors, clamped to the domain.
    Linear {
        domain: (f64, f64),
        range: (Color, Color),
    },
}

impl ColorScale {
    pub fn ordinal<I, S>(domain: I, range: Vec<Color>) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scale = Self::Ordinal {
            domain: domain.into_iter().map(Into::into).collect(),
            range,
        };
        scale.validate()?;
        Ok(scale)
    }

    /// Ordinal scale over `domain` using the `CATEGORY10` palette.
    pub fn category10<I, S>(domain: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range = CATEGORY10
            .iter()
            .map(|hex| Color::parse(hex))
            .collect::<ChartResult<Vec<_>>>()?;
        Self::ordinal(domain, range)
    }

    pub fn linear(domain: (f64, f64), range: (Color, Color)) -> ChartResult<Self> {
        let scale = Self::Linear { domain, range };
        scale.validate()?;
        Ok(scale)
    }

    /// Checks scales that bypassed the constructors, e.g. deserialized ones.
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Ordinal { range, .. } => {
                if range.is_empty() {
                    return Err(ChartError::InvalidData(
                        "ordinal color range must not be empty".to_owned(),
                    ));
                }
                range.iter().try_for_each(|color| color.validate())
            }
            Self::Linear { domain, range } => {
                if !domain.0.is_finite() || !domain.1.is_finite() || domain.0 == domain.1 {
                    return Err(ChartError::InvalidData(
                        "color scale domain must be finite and non-zero".to_owned(),
                    ));
                }
                range.0.validate()?;
                range.1.validate()
            }
        }
    }

    /// Color for `value`, or `None` when the value cannot be mapped.
    #[must_use]
    pub fn color_for(&self, value: &DatumValue) -> Option<Color> {
        match self {
            Self::Ordinal { domain, range } => {
                let key = value.category_key();
                let index = domain.iter().position(|entry| *entry == key)?;
                range.get(index.checked_rem(range.len())?).copied()
            }
            Self::Linear { domain, range } => {
                let number = value.as_finite_number()?;
                let t = ((number - domain.0) / (domain.1 - domain.0)).clamp(0.0, 1.0);
                Some(lerp_color(range.0, range.1, t))
            }
        }
    }
}

#[must_use]
pub fn lerp_color(from: Color, to: Color, t: f64) -> Color {
    Color::rgba(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        from.alpha + (to.alpha - from.alpha) * t,
    )
}
