use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::layout_helpers::{estimate_label_text_width_px, rotate_point};
use crate::core::{
    BandScale, DatumValue, LinearScale, Padding, PathBuilder, Translate, Viewport, format_tick,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, PathPrimitive, RenderFrame, ShapeStyle, TextHAlign, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrientation {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl AxisOrientation {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// `-1` when ticks point up or left, `1` otherwise.
    fn direction(self) -> f64 {
        match self {
            Self::Top | Self::Left => -1.0,
            Self::Right | Self::Bottom => 1.0,
        }
    }
}

/// Offset that places an axis on the edge of a `width` x `height` plot.
#[must_use]
pub fn calc_translate(orientation: AxisOrientation, width: f64, height: f64) -> Translate {
    Translate {
        x: if orientation == AxisOrientation::Right { width } else { 0.0 },
        y: if orientation == AxisOrientation::Bottom { height } else { 0.0 },
    }
}

/// Axis label placement in the label's own rotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPosition {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    /// Clockwise rotation in degrees.
    pub rotate: f64,
}

impl LabelPosition {
    /// Where the label anchor lands in chart coordinates once rotated.
    #[must_use]
    pub fn screen_point(self) -> (f64, f64) {
        rotate_point(self.x + self.dx, self.y + self.dy, self.rotate)
    }
}

/// Label placement outside the axis, centred on `center` (the middle of the
/// scale range) and pushed into half of the padding on that side.
#[must_use]
pub fn calc_label_position(
    orientation: AxisOrientation,
    translate: Translate,
    padding: Padding,
    center: f64,
) -> LabelPosition {
    match orientation {
        AxisOrientation::Top => LabelPosition {
            x: center,
            y: translate.y,
            dx: 0.0,
            dy: -padding.top / 2.0,
            rotate: 0.0,
        },
        AxisOrientation::Bottom => LabelPosition {
            x: center,
            y: translate.y,
            dx: 0.0,
            dy: padding.bottom / 2.0,
            rotate: 0.0,
        },
        AxisOrientation::Left => LabelPosition {
            x: -center,
            y: translate.x,
            dx: 0.0,
            dy: -padding.left / 2.0,
            rotate: 270.0,
        },
        AxisOrientation::Right => LabelPosition {
            x: center,
            y: -translate.x,
            dx: 0.0,
            dy: -padding.right / 2.0,
            rotate: 90.0,
        },
    }
}

/// Custom tick label formatter.
#[derive(Clone)]
pub struct TickFormat(Arc<dyn Fn(&DatumValue) -> String + Send + Sync>);

impl TickFormat {
    pub fn new<F>(format: F) -> Self
    where
        F: Fn(&DatumValue) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(format))
    }

    #[must_use]
    pub fn format(&self, value: &DatumValue) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickFormat(<fn>)")
    }
}

impl PartialEq for TickFormat {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Scale an axis can be drawn for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisScale {
    Linear(LinearScale),
    Band(BandScale),
}

impl AxisScale {
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Band(scale) => scale.range(),
        }
    }

    #[must_use]
    pub fn range_center(&self) -> f64 {
        match self {
            Self::Linear(scale) => scale.range_center(),
            Self::Band(scale) => scale.range_center(),
        }
    }

    pub fn as_linear(&self) -> ChartResult<&LinearScale> {
        match self {
            Self::Linear(scale) => Ok(scale),
            Self::Band(_) => Err(ChartError::InvalidData(
                "expected a linear scale, found a band scale".to_owned(),
            )),
        }
    }

    pub fn as_band(&self) -> ChartResult<&BandScale> {
        match self {
            Self::Band(scale) => Ok(scale),
            Self::Linear(_) => Err(ChartError::InvalidData(
                "expected a band scale, found a linear scale".to_owned(),
            )),
        }
    }

    /// Pixel offset of `value`; band scales answer with the band centre.
    pub fn position(&self, value: &DatumValue) -> ChartResult<f64> {
        match self {
            Self::Linear(scale) => scale.scale(value.require_number()?),
            Self::Band(scale) => {
                let key = value.category_key();
                scale
                    .center(&key)
                    .ok_or(ChartError::UnknownCategory { category: key })
            }
        }
    }

    fn ticks(&self, config: &AxisConfig) -> ChartResult<Vec<AxisTick>> {
        let label_for = |value: &DatumValue, fallback: String| match &config.tick_format {
            Some(format) => format.format(value),
            None => fallback,
        };

        match self {
            Self::Linear(scale) => {
                let step = scale.tick_step(config.ticks);
                let values: Vec<f64> = match &config.tick_values {
                    Some(values) => values
                        .iter()
                        .map(DatumValue::require_number)
                        .collect::<ChartResult<_>>()?,
                    None => scale.ticks(config.ticks).into_vec(),
                };
                values
                    .into_iter()
                    .map(|value| {
                        let datum = DatumValue::Number(value);
                        Ok(AxisTick {
                            offset: scale.scale(value)?,
                            label: label_for(&datum, format_tick(value, step)),
                            value: datum,
                        })
                    })
                    .collect()
            }
            Self::Band(scale) => {
                let values: Vec<DatumValue> = match &config.tick_values {
                    Some(values) => values.clone(),
                    None => scale.domain().map(DatumValue::from).collect(),
                };
                Ok(values
                    .into_iter()
                    .filter_map(|value| {
                        let key = value.category_key();
                        let Some(offset) = scale.center(&key) else {
                            warn!(category = %key, "tick value outside band domain dropped");
                            return None;
                        };
                        Some(AxisTick {
                            offset,
                            label: label_for(&value, key),
                            value,
                        })
                    })
                    .collect())
            }
        }
    }
}

/// One resolved tick: datum, pixel offset along the axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: DatumValue,
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default = "default_tick_count")]
    pub ticks: usize,
    #[serde(default)]
    pub tick_values: Option<Vec<DatumValue>>,
    #[serde(skip)]
    pub tick_format: Option<TickFormat>,
    #[serde(default = "default_tick_size")]
    pub tick_size_inner: f64,
    #[serde(default = "default_tick_size")]
    pub tick_size_outer: f64,
    #[serde(default = "default_tick_padding")]
    pub tick_padding: f64,
    /// Drops evenly spaced ticks until the estimated labels no longer overlap.
    #[serde(default)]
    pub auto_filter_tick_values: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub padding: Padding,
    /// Overrides the translate derived from orientation and plot size.
    #[serde(default)]
    pub translate: Option<Translate>,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_tick_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_label_font_size_px")]
    pub label_font_size_px: f64,
    #[serde(default = "default_axis_color")]
    pub color: Color,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_axis_class")]
    pub class_name: String,
    #[serde(default = "default_label_class")]
    pub label_class_name: String,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            ticks: default_tick_count(),
            tick_values: None,
            tick_format: None,
            tick_size_inner: default_tick_size(),
            tick_size_outer: default_tick_size(),
            tick_padding: default_tick_padding(),
            auto_filter_tick_values: false,
            label: None,
            padding: Padding::default(),
            translate: None,
            width: 0.0,
            height: 0.0,
            font_size_px: default_tick_font_size_px(),
            label_font_size_px: default_label_font_size_px(),
            color: default_axis_color(),
            stroke_width: default_stroke_width(),
            class_name: default_axis_class(),
            label_class_name: default_label_class(),
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn with_ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_tick_values(mut self, values: Vec<DatumValue>) -> Self {
        self.tick_values = Some(values);
        self
    }

    #[must_use]
    pub fn with_tick_format(mut self, format: TickFormat) -> Self {
        self.tick_format = Some(format);
        self
    }

    /// Sets inner and outer tick size together.
    #[must_use]
    pub fn with_tick_size(mut self, size: f64) -> Self {
        self.tick_size_inner = size;
        self.tick_size_outer = size;
        self
    }

    #[must_use]
    pub fn with_tick_size_inner(mut self, size: f64) -> Self {
        self.tick_size_inner = size;
        self
    }

    #[must_use]
    pub fn with_tick_size_outer(mut self, size: f64) -> Self {
        self.tick_size_outer = size;
        self
    }

    #[must_use]
    pub fn with_tick_padding(mut self, padding: f64) -> Self {
        self.tick_padding = padding;
        self
    }

    #[must_use]
    pub fn with_auto_filter_tick_values(mut self, enabled: bool) -> Self {
        self.auto_filter_tick_values = enabled;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_translate(mut self, translate: Translate) -> Self {
        self.translate = Some(translate);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("tick_size_inner", self.tick_size_inner),
            ("tick_size_outer", self.tick_size_outer),
            ("tick_padding", self.tick_padding),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidData(format!("axis {name} must be finite")));
            }
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis font size must be finite and > 0".to_owned(),
            ));
        }
        self.padding.validate()?;
        self.color.validate()
    }
}

fn default_tick_count() -> usize {
    10
}

fn default_tick_size() -> f64 {
    6.0
}

fn default_tick_padding() -> f64 {
    3.0
}

fn default_tick_font_size_px() -> f64 {
    10.0
}

fn default_label_font_size_px() -> f64 {
    12.0
}

fn default_axis_color() -> Color {
    Color::BLACK
}

fn default_stroke_width() -> f64 {
    1.0
}

fn default_axis_class() -> String {
    "axis".to_owned()
}

fn default_label_class() -> String {
    "axis-label".to_owned()
}

/// d3-style axis: domain path, tick marks, tick labels and an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    orientation: AxisOrientation,
    scale: AxisScale,
    config: AxisConfig,
    translate: Translate,
    translate_key: (AxisOrientation, f64, f64),
}

impl Axis {
    pub fn new(
        orientation: AxisOrientation,
        scale: AxisScale,
        config: AxisConfig,
    ) -> ChartResult<Self> {
        config.validate()?;
        let translate_key = (orientation, config.width, config.height);
        let translate = config
            .translate
            .unwrap_or_else(|| calc_translate(orientation, config.width, config.height));
        Ok(Self {
            orientation,
            scale,
            config,
            translate,
            translate_key,
        })
    }

    /// Horizontal axis; defaults to the bottom edge.
    pub fn x(
        orientation: Option<AxisOrientation>,
        scale: AxisScale,
        config: AxisConfig,
    ) -> ChartResult<Self> {
        let orientation = orientation.unwrap_or(AxisOrientation::Bottom);
        if !orientation.is_horizontal() {
            return Err(ChartError::InvalidData(format!(
                "x axis cannot be oriented {orientation:?}"
            )));
        }
        Self::new(orientation, scale, config)
    }

    /// Vertical axis; defaults to the left edge.
    pub fn y(
        orientation: Option<AxisOrientation>,
        scale: AxisScale,
        config: AxisConfig,
    ) -> ChartResult<Self> {
        let orientation = orientation.unwrap_or(AxisOrientation::Left);
        if orientation.is_horizontal() {
            return Err(ChartError::InvalidData(format!(
                "y axis cannot be oriented {orientation:?}"
            )));
        }
        Self::new(orientation, scale, config)
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    #[must_use]
    pub fn scale(&self) -> &AxisScale {
        &self.scale
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    #[must_use]
    pub fn translate(&self) -> Translate {
        self.translate
    }

    pub fn set_scale(&mut self, scale: AxisScale) {
        self.scale = scale;
    }

    /// Replaces orientation and config.
    ///
    /// Returns whether the translate was recomputed; it only is when the
    /// orientation or plot size changed, or an explicit translate is given.
    pub fn update(
        &mut self,
        orientation: AxisOrientation,
        config: AxisConfig,
    ) -> ChartResult<bool> {
        config.validate()?;
        let key = (orientation, config.width, config.height);
        let recomputed = if let Some(explicit) = config.translate {
            self.translate = explicit;
            true
        } else if key != self.translate_key || self.config.translate.is_some() {
            self.translate = calc_translate(orientation, config.width, config.height);
            true
        } else {
            false
        };
        self.translate_key = key;
        self.orientation = orientation;
        self.config = config;
        Ok(recomputed)
    }

    pub fn ticks(&self) -> ChartResult<Vec<AxisTick>> {
        let ticks = self.scale.ticks(&self.config)?;
        if !self.config.auto_filter_tick_values || ticks.len() < 2 {
            return Ok(ticks);
        }

        let (range_start, range_end) = self.scale.range();
        let length = (range_end - range_start).abs();
        let slot = if self.orientation.is_horizontal() {
            ticks
                .iter()
                .map(|tick| estimate_label_text_width_px(&tick.label, self.config.font_size_px))
                .fold(0.0_f64, f64::max)
                + 2.0 * self.config.tick_padding
        } else {
            self.config.font_size_px * 1.2
        };
        let fitting = (length / slot).floor().max(1.0) as usize;
        let stride = ticks.len().div_ceil(fitting);
        if stride > 1 {
            trace!(total = ticks.len(), stride, "axis ticks thinned");
        }
        Ok(ticks.into_iter().step_by(stride.max(1)).collect())
    }

    #[must_use]
    pub fn label_position(&self) -> LabelPosition {
        calc_label_position(
            self.orientation,
            self.translate,
            self.config.padding,
            self.scale.range_center(),
        )
    }

    /// Builds the axis in plot coordinates (translate applied).
    pub fn build_frame(&self, viewport: Viewport) -> ChartResult<RenderFrame> {
        let config = &self.config;
        let ticks = self.ticks()?;
        let k = self.orientation.direction();
        let horizontal = self.orientation.is_horizontal();
        let (range_start, range_end) = self.scale.range();
        let outer = k * config.tick_size_outer;
        let inner = k * config.tick_size_inner;
        let spacing = config.tick_size_inner.max(0.0) + config.tick_padding;

        let mut domain = PathBuilder::new();
        if horizontal {
            domain
                .move_to(range_start, outer)
                .line_to(range_start, 0.0)
                .line_to(range_end, 0.0)
                .line_to(range_end, outer);
        } else {
            domain
                .move_to(outer, range_start)
                .line_to(0.0, range_start)
                .line_to(0.0, range_end)
                .line_to(outer, range_end);
        }

        let mut frame = RenderFrame::new(viewport).with_path(
            PathPrimitive::new(domain.build(), Translate::default())
                .with_style(ShapeStyle::stroked(config.color, config.stroke_width))
                .with_class(format!("{} domain", config.class_name)),
        );

        let (anchor, text_shift) = match self.orientation {
            AxisOrientation::Top => (TextHAlign::Center, 0.0),
            AxisOrientation::Bottom => (TextHAlign::Center, 0.71 * config.font_size_px),
            AxisOrientation::Left => (TextHAlign::Right, 0.32 * config.font_size_px),
            AxisOrientation::Right => (TextHAlign::Left, 0.32 * config.font_size_px),
        };

        for tick in &ticks {
            let (line, (text_x, text_y)) = if horizontal {
                (
                    LinePrimitive::new(
                        tick.offset,
                        0.0,
                        tick.offset,
                        inner,
                        config.stroke_width,
                        config.color,
                    ),
                    (tick.offset, k * spacing + text_shift),
                )
            } else {
                (
                    LinePrimitive::new(
                        0.0,
                        tick.offset,
                        inner,
                        tick.offset,
                        config.stroke_width,
                        config.color,
                    ),
                    (k * spacing, tick.offset + text_shift),
                )
            };
            frame.lines.push(line);
            if !tick.label.is_empty() {
                frame.texts.push(
                    TextPrimitive::new(
                        tick.label.clone(),
                        text_x,
                        text_y,
                        config.font_size_px,
                        config.color,
                        anchor,
                    )
                    .with_class("tick"),
                );
            }
        }

        let mut frame = frame.translated(self.translate);

        if let Some(label) = config.label.as_deref().filter(|label| !label.is_empty()) {
            let position = self.label_position();
            let (x, y) = position.screen_point();
            frame.texts.push(
                TextPrimitive::new(
                    label,
                    x,
                    y,
                    config.label_font_size_px,
                    config.color,
                    TextHAlign::Center,
                )
                .with_rotation(position.rotate)
                .with_class(config.label_class_name.clone()),
            );
        }

        debug!(
            orientation = ?self.orientation,
            ticks = ticks.len(),
            translate_x = self.translate.x,
            translate_y = self.translate.y,
            "axis frame built"
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisConfig, AxisOrientation, AxisScale, calc_translate};
    use crate::core::{BandScale, LinearScale, Translate, Viewport};

    fn linear_axis(orientation: AxisOrientation) -> Axis {
        let scale = LinearScale::new(0.0, 100.0)
            .and_then(|scale| scale.with_range(0.0, 200.0))
            .expect("scale");
        Axis::new(
            orientation,
            AxisScale::Linear(scale),
            AxisConfig::default().with_size(200.0, 100.0),
        )
        .expect("axis")
    }

    #[test]
    fn translate_follows_orientation() {
        assert_eq!(
            calc_translate(AxisOrientation::Bottom, 200.0, 100.0),
            Translate::new(0.0, 100.0)
        );
        assert_eq!(
            calc_translate(AxisOrientation::Right, 200.0, 100.0),
            Translate::new(200.0, 0.0)
        );
        assert_eq!(calc_translate(AxisOrientation::Top, 200.0, 100.0), Translate::default());
        assert_eq!(calc_translate(AxisOrientation::Left, 200.0, 100.0), Translate::default());
    }

    #[test]
    fn translate_is_only_recomputed_on_geometry_change() {
        let mut axis = linear_axis(AxisOrientation::Bottom);
        let config = axis.config().clone().with_ticks(5);
        assert!(!axis.update(AxisOrientation::Bottom, config.clone()).expect("update"));
        assert!(axis.update(AxisOrientation::Top, config).expect("update"));
        assert_eq!(axis.translate(), Translate::default());
    }

    #[test]
    fn bottom_axis_ticks_hang_below_domain() {
        let frame = linear_axis(AxisOrientation::Bottom)
            .build_frame(Viewport::new(300, 200))
            .expect("frame");
        assert_eq!(frame.lines.len(), 11);
        let first = frame.lines[0];
        assert_eq!((first.x1, first.y1, first.y2), (0.0, 100.0, 106.0));
        assert_eq!(frame.texts[0].text, "0");
        assert_eq!(frame.paths[0].d, "M0,6L0,0L200,0L200,6");
        assert_eq!(frame.paths[0].translate, Translate::new(0.0, 100.0));
    }

    #[test]
    fn band_axis_ticks_sit_on_band_centres() {
        let scale = BandScale::new(["a", "b"])
            .and_then(|scale| scale.with_range(0.0, 100.0))
            .expect("band");
        let axis = Axis::x(None, AxisScale::Band(scale), AxisConfig::default()).expect("axis");
        let offsets: Vec<f64> = axis
            .ticks()
            .expect("ticks")
            .iter()
            .map(|tick| tick.offset)
            .collect();
        assert_eq!(offsets, vec![25.0, 75.0]);
    }

    #[test]
    fn auto_filter_thins_crowded_band_ticks() {
        let years: Vec<String> = (1970..2011).map(|year| year.to_string()).collect();
        let scale = BandScale::new(years)
            .and_then(|scale| scale.with_range(0.0, 400.0))
            .expect("band");
        let config = AxisConfig::default().with_auto_filter_tick_values(true);
        let axis = Axis::x(None, AxisScale::Band(scale), config).expect("axis");
        let ticks = axis.ticks().expect("ticks");
        assert!(ticks.len() < 41);
        assert_eq!(ticks[0].label, "1970");
    }

    #[test]
    fn y_axis_rejects_horizontal_orientation() {
        let scale = LinearScale::new(0.0, 1.0).expect("scale");
        let bottom = Axis::y(
            Some(AxisOrientation::Bottom),
            AxisScale::Linear(scale),
            AxisConfig::default(),
        );
        assert!(bottom.is_err());
    }
}
