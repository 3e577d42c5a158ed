use serde::{Deserialize, Serialize};

use crate::animate::TransitionConfig;
use crate::api::animated::AnimatedAxisChart;
use crate::api::axis_chart::{AxisChart, Domain};
use crate::api::bar_chart::BarChartProps;
use crate::core::Padding;
use crate::error::{ChartError, ChartResult};

/// Serializable bar chart setup.
///
/// Hosts can persist and reload a chart without inventing their own format.
/// Tick formatters are closures and are not part of the persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub padding: Padding,
    pub x_domain: Domain,
    pub y_domain: Domain,
    #[serde(default)]
    pub chart: BarChartProps,
    #[serde(default)]
    pub transition: TransitionConfig,
}

impl ChartConfig {
    #[must_use]
    pub fn new(width: f64, height: f64, x_domain: Domain, y_domain: Domain) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
            x_domain,
            y_domain,
            chart: BarChartProps::default(),
            transition: TransitionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_chart_props(mut self, chart: BarChartProps) -> Self {
        self.chart = chart;
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.transition.validate()?;
        self.chart.x_axis.validate()?;
        self.chart.y_axis.validate()?;
        self.chart.bars.validate()?;
        self.axis_chart().map(|_| ())
    }

    pub fn axis_chart(&self) -> ChartResult<AxisChart> {
        AxisChart::new(
            self.width,
            self.height,
            self.x_domain.clone(),
            self.y_domain.clone(),
        )?
        .with_padding(self.padding)
    }

    pub fn animated_axis_chart(&self) -> ChartResult<AnimatedAxisChart> {
        AnimatedAxisChart::new(self.axis_chart()?, self.transition)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
