use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::axis::{Axis, AxisConfig, AxisOrientation, AxisScale};
use crate::api::axis_chart::ChartScales;
use crate::api::bars::{Bars, BarsAccessors, BarsProps};
use crate::api::legend::{Legend, LegendItem};
use crate::core::{
    BandPadding, BandScale, DataAccessor, LinearScale, Orientation, Padding, Translate, Viewport,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionBehavior, InteractionEvent, InteractionState};
use crate::render::{Color, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive};

/// One half of the pyramid.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidSide {
    pub title: String,
    pub value: DataAccessor,
    pub color: Color,
}

impl PyramidSide {
    pub fn new(title: impl Into<String>, value: impl Into<DataAccessor>, color: Color) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidChartProps {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub padding: Padding,
    /// Horizontal gap between the halves, holding the category labels.
    #[serde(default = "default_center_gap")]
    pub center_gap: f64,
    #[serde(default)]
    pub band_padding: BandPadding,
    /// Shared value maximum; derived from the data when unset.
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub axis: AxisConfig,
    #[serde(default = "default_label_font_size")]
    pub font_size_px: f64,
    #[serde(default)]
    pub show_legend: bool,
    #[serde(default)]
    pub behavior: InteractionBehavior,
}

impl PyramidChartProps {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
            center_gap: default_center_gap(),
            band_padding: BandPadding::default(),
            max: None,
            title: None,
            axis: AxisConfig::default().with_ticks(5),
            font_size_px: default_label_font_size(),
            show_legend: false,
            behavior: InteractionBehavior::default(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_center_gap(mut self, center_gap: f64) -> Self {
        self.center_gap = center_gap;
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Width of one half.
    fn half_width(&self) -> f64 {
        (self.plot_width() - self.center_gap) / 2.0
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.padding.validate()?;
        if !self.center_gap.is_finite() || self.center_gap < 0.0 {
            return Err(ChartError::InvalidData(
                "center gap must be finite and >= 0".to_owned(),
            ));
        }
        if !self.half_width().is_finite() || self.half_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "pyramid halves need positive size, got {}x{}",
                self.half_width(),
                self.plot_height()
            )));
        }
        if let Some(max) = self.max {
            if !max.is_finite() || max <= 0.0 {
                return Err(ChartError::InvalidData(
                    "pyramid max must be finite and > 0".to_owned(),
                ));
            }
        }
        self.axis.validate()
    }
}

fn default_center_gap() -> f64 {
    60.0
}

fn default_label_font_size() -> f64 {
    11.0
}

/// Two horizontal bar series mirrored around a central column of category labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidChart {
    data: Vec<Value>,
    key: DataAccessor,
    category: DataAccessor,
    left: PyramidSide,
    right: PyramidSide,
    props: PyramidChartProps,
    interaction: InteractionState,
}

/// Scales and geometry shared by one build.
struct PyramidLayout {
    categories: BandScale,
    value: LinearScale,
    half_width: f64,
}

impl PyramidChart {
    pub fn new(
        data: Vec<Value>,
        key: impl Into<DataAccessor>,
        category: impl Into<DataAccessor>,
        left: PyramidSide,
        right: PyramidSide,
        props: PyramidChartProps,
    ) -> ChartResult<Self> {
        props.validate()?;
        left.color.validate()?;
        right.color.validate()?;
        Ok(Self {
            data,
            key: key.into(),
            category: category.into(),
            left,
            right,
            interaction: InteractionState::new(props.behavior),
            props,
        })
    }

    #[must_use]
    pub fn props(&self) -> &PyramidChartProps {
        &self.props
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    pub fn set_data(&mut self, data: Vec<Value>) {
        self.data = data;
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.props.width.ceil() as u32, self.props.height.ceil() as u32)
    }

    /// Largest value on either side, or the configured maximum.
    pub fn shared_max(&self) -> ChartResult<f64> {
        if let Some(max) = self.props.max {
            return Ok(max);
        }
        let mut largest = OrderedFloat(0.0);
        for datum in &self.data {
            for side in [&self.left, &self.right] {
                let value = side.value.require(datum)?.require_number()?;
                largest = largest.max(OrderedFloat(value));
            }
        }
        Ok(largest.0)
    }

    fn layout(&self) -> ChartResult<PyramidLayout> {
        let categories: IndexSet<String> = self
            .data
            .iter()
            .map(|datum| Ok(self.category.require(datum)?.category_key()))
            .collect::<ChartResult<_>>()?;
        let plot_height = self.props.plot_height();
        // First category sits at the bottom of the pyramid.
        let categories = BandScale::new(categories)?.with_range(plot_height, 0.0)?;

        let max = self.shared_max()?;
        let half_width = self.props.half_width();
        let value = LinearScale::new(0.0, if max > 0.0 { max } else { 1.0 })?
            .nice(self.props.axis.ticks)
            .with_range(0.0, half_width)?;

        Ok(PyramidLayout {
            categories,
            value,
            half_width,
        })
    }

    fn side_bars(&self, side: &PyramidSide, translate: f64, class_name: &str) -> ChartResult<Bars> {
        let mut props = BarsProps::default()
            .with_orientation(Orientation::Horizontal)
            .with_band_padding(self.props.band_padding)
            .with_fill(side.color)
            .with_category_translate(translate);
        props.rect_class_name = Some(class_name.to_owned());
        Bars::new(
            self.data.clone(),
            BarsAccessors::new(self.key.clone())
                .with_x(self.category.clone())
                .with_y(side.value.clone()),
            props,
        )
    }

    /// Plot-space bars of both halves; the left half is mirrored.
    fn side_rects(&self, layout: &PyramidLayout) -> ChartResult<Vec<RectPrimitive>> {
        let viewport = self.viewport();
        let scales = ChartScales {
            x: AxisScale::Linear(layout.value),
            y: AxisScale::Band(layout.categories.clone()),
        };

        let mut left = self
            .side_bars(&self.left, 0.0, "pyramid-left")?
            .build_frame(viewport, &scales, &self.interaction)?
            .rects;
        for rect in &mut left {
            rect.x = layout.half_width - (rect.x + rect.width);
        }
        let right = self
            .side_bars(&self.right, layout.half_width + self.props.center_gap, "pyramid-right")?
            .build_frame(viewport, &scales, &self.interaction)?
            .rects;
        left.extend(right);
        Ok(left)
    }

    /// Plot-space frame of both halves, category labels and axes.
    fn build_plot(&self, layout: &PyramidLayout) -> ChartResult<RenderFrame> {
        let viewport = self.viewport();
        let gap = self.props.center_gap;
        let plot_height = self.props.plot_height();

        let mut frame = RenderFrame::new(viewport);
        frame.rects = self.side_rects(layout)?;

        let padded = self.props.band_padding.apply(layout.categories.clone());
        let label_x = layout.half_width + gap / 2.0;
        for category in padded.domain() {
            if let Some(center) = padded.center(category) {
                frame.texts.push(
                    TextPrimitive::new(
                        category,
                        label_x,
                        center + 0.32 * self.props.font_size_px,
                        self.props.font_size_px,
                        Color::BLACK,
                        TextHAlign::Center,
                    )
                    .with_class("category-label"),
                );
            }
        }

        let axis_config = self.props.axis.clone().with_size(layout.half_width, plot_height);
        let left_axis = Axis::new(
            AxisOrientation::Bottom,
            AxisScale::Linear(layout.value.with_range(layout.half_width, 0.0)?),
            axis_config.clone().with_translate(Translate::new(0.0, plot_height)),
        )?;
        let right_axis = Axis::new(
            AxisOrientation::Bottom,
            AxisScale::Linear(layout.value),
            axis_config.with_translate(Translate::new(layout.half_width + gap, plot_height)),
        )?;
        frame.extend(left_axis.build_frame(viewport)?);
        frame.extend(right_axis.build_frame(viewport)?);

        for (side, center) in [
            (&self.left, layout.half_width / 2.0),
            (&self.right, layout.half_width * 1.5 + gap),
        ] {
            if !side.title.is_empty() {
                frame.texts.push(
                    TextPrimitive::new(
                        side.title.clone(),
                        center,
                        -8.0,
                        self.props.font_size_px + 1.0,
                        side.color,
                        TextHAlign::Center,
                    )
                    .with_class("side-title"),
                );
            }
        }
        Ok(frame)
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let layout = self.layout()?;
        let origin = Translate::new(self.props.padding.left, self.props.padding.top);
        let mut frame = RenderFrame::new(self.viewport());
        frame.extend(self.build_plot(&layout)?.translated(origin));

        if let Some(title) = self.props.title.as_deref().filter(|title| !title.is_empty()) {
            frame.texts.push(
                TextPrimitive::new(
                    title,
                    self.props.width / 2.0,
                    self.props.padding.top / 3.0,
                    self.props.font_size_px + 4.0,
                    Color::BLACK,
                    TextHAlign::Center,
                )
                .with_class("title"),
            );
        }

        if self.props.show_legend {
            let legend = Legend::new(vec![
                LegendItem::new(self.left.title.clone(), self.left.color),
                LegendItem::new(self.right.title.clone(), self.right.color),
            ]);
            let origin = Translate::new(
                self.props.width - self.props.padding.right + 5.0,
                self.props.padding.top,
            );
            frame.extend(legend.build_frame(self.viewport(), origin)?);
        }

        debug!(
            categories = layout.categories.len(),
            half_width = layout.half_width,
            max = layout.value.domain().1,
            "pyramid frame built"
        );
        Ok(frame)
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.build_frame()?)
    }

    /// Key of the topmost bar on either side under a chart-space point.
    ///
    /// Only the bars are resolved; axes, labels and the legend are skipped.
    pub fn hit_test(&self, x: f64, y: f64) -> ChartResult<Option<String>> {
        let layout = self.layout()?;
        let (x, y) = (x - self.props.padding.left, y - self.props.padding.top);
        Ok(self
            .side_rects(&layout)?
            .into_iter()
            .rev()
            .find(|rect| rect.contains(x, y))
            .and_then(|rect| rect.key))
    }

    pub fn on_click(&mut self, x: f64, y: f64) -> ChartResult<Option<InteractionEvent>> {
        let hit = self.hit_test(x, y)?;
        Ok(self.interaction.on_click(hit.as_deref(), x, y))
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> ChartResult<Vec<InteractionEvent>> {
        let hit = self.hit_test(x, y)?;
        Ok(self.interaction.on_pointer_move(hit.as_deref(), x, y))
    }

    pub fn on_pointer_leave(&mut self, x: f64, y: f64) -> Option<InteractionEvent> {
        self.interaction.on_pointer_leave(x, y)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PyramidChart, PyramidChartProps, PyramidSide};
    use crate::core::{BandPadding, Padding};
    use crate::render::Color;

    fn pyramid() -> PyramidChart {
        let mut props = PyramidChartProps::new(260.0, 120.0)
            .with_padding(Padding::uniform(10.0))
            .with_center_gap(40.0)
            .with_max(100.0);
        props.band_padding = BandPadding::uniform(0.0);
        PyramidChart::new(
            vec![
                json!({"age": "0-4", "male": 50, "female": 100}),
                json!({"age": "5-9", "male": 100, "female": 25}),
            ],
            "age",
            "age",
            PyramidSide::new("Male", "male", Color::STEELBLUE),
            PyramidSide::new("Female", "female", Color::BLACK),
            props,
        )
        .expect("pyramid")
    }

    #[test]
    fn halves_mirror_around_the_gap() {
        let frame = pyramid().build_frame().expect("frame");
        assert_eq!(frame.rects.len(), 4);

        // Half width is (240 - 40) / 2 = 100; youngest group is at the bottom.
        let left_young = &frame.rects[0];
        assert_eq!((left_young.x, left_young.width), (60.0, 50.0));
        assert_eq!((left_young.y, left_young.height), (60.0, 50.0));

        let right_young = &frame.rects[2];
        assert_eq!((right_young.x, right_young.width), (150.0, 100.0));
    }

    #[test]
    fn selection_spans_both_sides() {
        let mut chart = pyramid();
        chart.on_click(100.0, 80.0).expect("click");
        assert!(chart.interaction().is_selected("0-4"));
        let frame = chart.build_frame().expect("frame");
        let selected = frame
            .rects
            .iter()
            .filter(|rect| {
                rect.class_name
                    .as_deref()
                    .is_some_and(|class| class.contains("selected"))
            })
            .count();
        assert_eq!(selected, 2);
    }
}
