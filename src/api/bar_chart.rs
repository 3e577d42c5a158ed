use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::axis::{AxisConfig, AxisOrientation};
use crate::api::axis_chart::AxisChart;
use crate::api::bars::{Bars, BarsAccessors, BarsProps};
use crate::api::chart_config::ChartConfig;
use crate::api::legend::Legend;
use crate::core::Translate;
use crate::error::ChartResult;
use crate::interaction::{InteractionBehavior, InteractionEvent, InteractionState};
use crate::render::{Color, RenderFrame, Renderer, TextHAlign, TextPrimitive};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartProps {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_x_label")]
    pub x_label: String,
    #[serde(default = "default_y_label")]
    pub y_label: String,
    #[serde(default)]
    pub legend: Option<Legend>,
    #[serde(default)]
    pub bars: BarsProps,
    #[serde(default)]
    pub x_axis: AxisConfig,
    #[serde(default)]
    pub y_axis: AxisConfig,
    #[serde(default)]
    pub x_axis_orientation: Option<AxisOrientation>,
    #[serde(default)]
    pub y_axis_orientation: Option<AxisOrientation>,
    #[serde(default)]
    pub behavior: InteractionBehavior,
    #[serde(default = "default_title_font_size")]
    pub title_font_size_px: f64,
}

impl Default for BarChartProps {
    fn default() -> Self {
        Self {
            title: None,
            x_label: default_x_label(),
            y_label: default_y_label(),
            legend: None,
            bars: BarsProps::default(),
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            x_axis_orientation: None,
            y_axis_orientation: None,
            behavior: InteractionBehavior::default(),
            title_font_size_px: default_title_font_size(),
        }
    }
}

impl BarChartProps {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_axis_labels(
        mut self,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_bars(mut self, bars: BarsProps) -> Self {
        self.bars = bars;
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: InteractionBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

fn default_x_label() -> String {
    "X Axis".to_owned()
}

fn default_y_label() -> String {
    "Y Axis".to_owned()
}

fn default_title_font_size() -> f64 {
    16.0
}

/// Titled axis chart with one bar series, axes, an optional legend and its
/// own selection.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    chart: AxisChart,
    bars: Bars,
    props: BarChartProps,
    interaction: InteractionState,
}

impl BarChart {
    pub fn new(
        chart: AxisChart,
        data: Vec<Value>,
        accessors: BarsAccessors,
        props: BarChartProps,
    ) -> ChartResult<Self> {
        let bars = Bars::new(data, accessors, props.bars.clone())?;
        props.x_axis.validate()?;
        props.y_axis.validate()?;
        Ok(Self {
            chart,
            bars,
            interaction: InteractionState::new(props.behavior),
            props,
        })
    }

    /// Builds the chart described by a persisted config.
    pub fn from_config(
        config: &ChartConfig,
        data: Vec<Value>,
        accessors: BarsAccessors,
    ) -> ChartResult<Self> {
        config.validate()?;
        Self::new(config.axis_chart()?, data, accessors, config.chart.clone())
    }

    #[must_use]
    pub fn chart(&self) -> &AxisChart {
        &self.chart
    }

    #[must_use]
    pub fn bars(&self) -> &Bars {
        &self.bars
    }

    #[must_use]
    pub fn props(&self) -> &BarChartProps {
        &self.props
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionState {
        &mut self.interaction
    }

    pub fn set_chart(&mut self, chart: AxisChart) {
        self.chart = chart;
    }

    pub fn set_data(&mut self, data: Vec<Value>) {
        self.bars.set_data(data);
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let viewport = self.chart.viewport();
        let scales = self.chart.scales()?;

        let x_axis = self.chart.x_axis(
            self.props.x_axis_orientation,
            self.props.x_axis.clone().with_label(self.props.x_label.clone()),
        )?;
        let y_axis = self.chart.y_axis(
            self.props.y_axis_orientation,
            self.props.y_axis.clone().with_label(self.props.y_label.clone()),
        )?;

        let mut frame = self.chart.compose([
            self.bars.build_frame(viewport, &scales, &self.interaction)?,
            x_axis.build_frame(viewport)?,
            y_axis.build_frame(viewport)?,
        ]);

        if let Some(title) = self.props.title.as_deref().filter(|title| !title.is_empty()) {
            frame.texts.push(
                TextPrimitive::new(
                    title,
                    self.chart.width() / 2.0,
                    self.chart.padding().top / 2.0,
                    self.props.title_font_size_px,
                    Color::BLACK,
                    TextHAlign::Center,
                )
                .with_class("title"),
            );
        }

        if let Some(legend) = self.props.legend.as_ref().filter(|legend| !legend.is_empty()) {
            let origin = Translate::new(
                self.chart.padding().left + self.chart.plot_width() + 10.0,
                self.chart.padding().top,
            );
            frame.extend(legend.build_frame(viewport, origin)?);
        }

        debug!(
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            selected = self.interaction.selection().len(),
            "bar chart frame built"
        );
        Ok(frame)
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.build_frame()?)
    }

    /// Key of the topmost bar under a chart-space point.
    pub fn hit_test(&self, x: f64, y: f64) -> ChartResult<Option<String>> {
        let (plot_x, plot_y) = self.chart.to_plot_space(x, y);
        let scales = self.chart.scales()?;
        self.bars.hit_test(&scales, &self.interaction, plot_x, plot_y)
    }

    /// Click in chart space; toggles the hit bar's selection.
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

    use super::{BarChart, BarChartProps};
    use crate::api::axis_chart::{AxisChart, Domain};
    use crate::api::bars::BarsAccessors;

    fn chart() -> BarChart {
        let axis_chart = AxisChart::new(
            400.0,
            300.0,
            Domain::categorical(["a", "b"]),
            Domain::continuous(0.0, 10.0),
        )
        .expect("axis chart");
        BarChart::new(
            axis_chart,
            vec![json!({"key": "a", "y": 5}), json!({"key": "b", "y": 10})],
            BarsAccessors::new("key").with_x("key").with_y("y"),
            BarChartProps::default().with_title("Totals"),
        )
        .expect("bar chart")
    }

    #[test]
    fn axis_labels_default_to_placeholders() {
        let frame = chart().build_frame().expect("frame");
        let texts: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
        assert!(texts.contains(&"X Axis"));
        assert!(texts.contains(&"Y Axis"));
        assert!(texts.contains(&"Totals"));
        assert_eq!(frame.rects.len(), 2);
    }

    #[test]
    fn click_toggles_selection_and_repaints_last() {
        let mut chart = chart();
        // Plot point (75, 160) sits inside bar "a".
        let event = chart.on_click(50.0 + 75.0, 200.0).expect("click");
        assert_eq!(event.map(|event| event.key), Some("a".to_owned()));
        assert!(chart.interaction().is_selected("a"));

        let frame = chart.build_frame().expect("frame");
        assert_eq!(frame.rects.last().and_then(|rect| rect.key.as_deref()), Some("a"));

        chart.on_click(125.0, 200.0).expect("click");
        assert!(!chart.interaction().is_selected("a"));
    }
}
