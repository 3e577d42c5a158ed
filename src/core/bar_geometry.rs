use serde::{Deserialize, Serialize};

use crate::core::band_scale::BandScale;
use crate::core::datum::DatumValue;
use crate::core::scale::LinearScale;
use crate::core::types::Orientation;
use crate::error::{ChartError, ChartResult};

/// Pixel placement of one bar rectangle, before any group translate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarRenderingProps {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

/// Scales a bar is resolved against.
///
/// `ordinal` carries the categories, `linear` the values; `layer_ordinal`
/// subdivides one ordinal band when bars are grouped.
#[derive(Debug, Clone, Copy)]
pub struct BarScales<'a> {
    pub ordinal: &'a BandScale,
    pub linear: &'a LinearScale,
    pub layer_ordinal: Option<&'a BandScale>,
}

/// Everything that decides where one bar lands.
#[derive(Debug, Clone, Copy)]
pub struct BarGeometryInput<'a> {
    /// `[baseline, top]` of a stacked segment.
    pub datum: Option<[f64; 2]>,
    pub orientation: Orientation,
    pub stacked: bool,
    pub grouped: bool,
    pub x_value: &'a DatumValue,
    pub y_value: &'a DatumValue,
    /// Height of the plotting area in pixels.
    pub height: f64,
}

/// Resolves bar position and size from a fixed decision table.
///
/// Orientation, stacking and grouping do not combine orthogonally, so each
/// output is decided by its own ordered list of conditions:
///
/// | output | first match wins |
/// |---|---|
/// | `x` | horizontal & !stacked → 0; vertical & !grouped → ordinal(x); stacked → linear(d0); else layer(x) |
/// | `y` | vertical & !stacked → linear(y); horizontal & !grouped → ordinal(x); stacked → linear(d1); else layer(y) |
/// | `height` | vertical & !stacked → height - linear(y); horizontal & !grouped → ordinal bandwidth; stacked → linear(d0) - linear(y); else layer bandwidth |
/// | `width` | vertical & !grouped → ordinal bandwidth; vertical & grouped → layer bandwidth; horizontal & grouped → linear(x); horizontal & stacked → linear(y) - linear(d0); else linear(y) |
pub fn resolve_bar_geometry(
    input: &BarGeometryInput<'_>,
    scales: &BarScales<'_>,
) -> ChartResult<BarRenderingProps> {
    let vertical = input.orientation.is_vertical();
    let stacked = input.stacked;
    let grouped = input.grouped;

    let ordinal = |value: &DatumValue| scales.ordinal.scale(value);
    let linear = |value: &DatumValue| scales.linear.scale(value.require_number()?);
    let layer = || scales.layer_ordinal.ok_or(ChartError::MissingLayerScale);
    let baseline = || -> ChartResult<f64> {
        let [d0, _] = input.datum.ok_or(ChartError::MissingStackPair)?;
        scales.linear.scale(d0)
    };
    let top = || -> ChartResult<f64> {
        let [_, d1] = input.datum.ok_or(ChartError::MissingStackPair)?;
        scales.linear.scale(d1)
    };

    let x = if !vertical && !stacked {
        0.0
    } else if vertical && !grouped {
        ordinal(input.x_value)?
    } else if stacked {
        baseline()?
    } else {
        layer()?.scale(input.x_value)?
    };

    let y = if vertical && !stacked {
        linear(input.y_value)?
    } else if !vertical && !grouped {
        ordinal(input.x_value)?
    } else if stacked {
        top()?
    } else {
        layer()?.scale(input.y_value)?
    };

    let height = if vertical && !stacked {
        input.height - linear(input.y_value)?
    } else if !vertical && !grouped {
        scales.ordinal.bandwidth()
    } else if stacked {
        baseline()? - linear(input.y_value)?
    } else {
        layer()?.bandwidth()
    };

    let width = if vertical && !grouped {
        scales.ordinal.bandwidth()
    } else if vertical && grouped {
        layer()?.bandwidth()
    } else if !vertical && grouped {
        linear(input.x_value)?
    } else if !vertical && stacked {
        linear(input.y_value)? - baseline()?
    } else {
        linear(input.y_value)?
    };

    Ok(BarRenderingProps {
        x,
        y,
        height,
        width,
    })
}
