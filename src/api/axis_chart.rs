use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::axis::{Axis, AxisConfig, AxisOrientation, AxisScale};
use crate::core::{BandScale, LinearScale, Orientation, Padding, Translate, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::RenderFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Linear,
    Band,
}

/// Input domain of one chart axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    Continuous { start: f64, end: f64 },
    Categorical { categories: Vec<String> },
}

impl Domain {
    #[must_use]
    pub fn continuous(start: f64, end: f64) -> Self {
        Self::Continuous { start, end }
    }

    pub fn categorical<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn scale_type(&self) -> ScaleType {
        match self {
            Self::Continuous { .. } => ScaleType::Linear,
            Self::Categorical { .. } => ScaleType::Band,
        }
    }

    fn build_scale(&self, range_start: f64, range_end: f64) -> ChartResult<AxisScale> {
        Ok(match self {
            Self::Continuous { start, end } => AxisScale::Linear(
                LinearScale::new(*start, *end)?.with_range(range_start, range_end)?,
            ),
            Self::Categorical { categories } => AxisScale::Band(
                BandScale::new(categories.iter().cloned())?.with_range(range_start, range_end)?,
            ),
        })
    }
}

/// Both scales of an axis chart, already ranged to the plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScales {
    pub x: AxisScale,
    pub y: AxisScale,
}

impl ChartScales {
    /// `(ordinal, linear)` for bars drawn in `orientation`.
    pub fn bar_scales(&self, orientation: Orientation) -> ChartResult<(&BandScale, &LinearScale)> {
        if orientation.is_vertical() {
            Ok((self.x.as_band()?, self.y.as_linear()?))
        } else {
            Ok((self.y.as_band()?, self.x.as_linear()?))
        }
    }
}

/// Plot area with padding and the x/y scales shared by its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisChart {
    width: f64,
    height: f64,
    padding: Padding,
    x_domain: Domain,
    y_domain: Domain,
}

impl AxisChart {
    pub fn new(width: f64, height: f64, x_domain: Domain, y_domain: Domain) -> ChartResult<Self> {
        let chart = Self {
            width,
            height,
            padding: Padding::default(),
            x_domain,
            y_domain,
        };
        chart.validate()?;
        Ok(chart)
    }

    pub fn with_padding(mut self, padding: Padding) -> ChartResult<Self> {
        self.padding = padding;
        self.validate()?;
        Ok(self)
    }

    pub fn with_domains(mut self, x_domain: Domain, y_domain: Domain) -> ChartResult<Self> {
        self.x_domain = x_domain;
        self.y_domain = y_domain;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> ChartResult<()> {
        self.padding.validate()?;
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(ChartError::InvalidData(
                "chart size must be finite".to_owned(),
            ));
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "plot area must be positive, got {}x{}",
                self.plot_width(),
                self.plot_height()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn padding(&self) -> Padding {
        self.padding
    }

    #[must_use]
    pub fn x_domain(&self) -> &Domain {
        &self.x_domain
    }

    #[must_use]
    pub fn y_domain(&self) -> &Domain {
        &self.y_domain
    }

    #[must_use]
    pub fn x_scale_type(&self) -> ScaleType {
        self.x_domain.scale_type()
    }

    #[must_use]
    pub fn y_scale_type(&self) -> ScaleType {
        self.y_domain.scale_type()
    }

    #[must_use]
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    #[must_use]
    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Offset of the plot area inside the full chart.
    #[must_use]
    pub fn origin(&self) -> Translate {
        Translate::new(self.padding.left, self.padding.top)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width.ceil() as u32, self.height.ceil() as u32)
    }

    /// Scales ranged to the plot; y runs bottom-up unless it is a band scale.
    pub fn scales(&self) -> ChartResult<ChartScales> {
        let x = self.x_domain.build_scale(0.0, self.plot_width())?;
        let y = match self.y_domain.scale_type() {
            ScaleType::Linear => self.y_domain.build_scale(self.plot_height(), 0.0)?,
            ScaleType::Band => self.y_domain.build_scale(0.0, self.plot_height())?,
        };
        Ok(ChartScales { x, y })
    }

    /// Axis config sized to this plot and sharing its padding.
    #[must_use]
    pub fn axis_config(&self, config: AxisConfig) -> AxisConfig {
        config
            .with_size(self.plot_width(), self.plot_height())
            .with_padding(self.padding)
    }

    pub fn x_axis(
        &self,
        orientation: Option<AxisOrientation>,
        config: AxisConfig,
    ) -> ChartResult<Axis> {
        let scales = self.scales()?;
        Axis::x(orientation, scales.x, self.axis_config(config))
    }

    pub fn y_axis(
        &self,
        orientation: Option<AxisOrientation>,
        config: AxisConfig,
    ) -> ChartResult<Axis> {
        let scales = self.scales()?;
        Axis::y(orientation, scales.y, self.axis_config(config))
    }

    /// Merges plot-space child frames into one chart frame.
    #[must_use]
    pub fn compose(&self, children: impl IntoIterator<Item = RenderFrame>) -> RenderFrame {
        let origin = self.origin();
        let mut frame = RenderFrame::new(self.viewport());
        let mut count = 0_usize;
        for child in children {
            frame.extend(child.translated(origin));
            count += 1;
        }
        debug!(children = count, width = self.width, height = self.height, "axis chart composed");
        frame
    }

    /// Converts a chart-space point into plot space.
    #[must_use]
    pub fn to_plot_space(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.padding.left, y - self.padding.top)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisChart, Domain};
    use crate::core::{Orientation, Padding};

    #[test]
    fn plot_area_excludes_padding() {
        let chart = AxisChart::new(
            400.0,
            300.0,
            Domain::categorical(["a", "b"]),
            Domain::continuous(0.0, 10.0),
        )
        .expect("chart");
        assert_eq!(chart.plot_width(), 300.0);
        assert_eq!(chart.plot_height(), 220.0);

        let scales = chart.scales().expect("scales");
        assert_eq!(scales.x.range(), (0.0, 300.0));
        assert_eq!(scales.y.range(), (220.0, 0.0));
        assert!(scales.bar_scales(Orientation::Vertical).is_ok());
        assert!(scales.bar_scales(Orientation::Horizontal).is_err());
    }

    #[test]
    fn band_y_scale_runs_top_down() {
        let chart = AxisChart::new(
            200.0,
            200.0,
            Domain::continuous(0.0, 1.0),
            Domain::categorical(["a"]),
        )
        .and_then(|chart| chart.with_padding(Padding::uniform(0.0)))
        .expect("chart");
        assert_eq!(chart.scales().expect("scales").y.range(), (0.0, 200.0));
    }

    #[test]
    fn padding_larger_than_chart_is_rejected() {
        let chart = AxisChart::new(
            80.0,
            300.0,
            Domain::continuous(0.0, 1.0),
            Domain::continuous(0.0, 1.0),
        );
        assert!(chart.is_err());
    }
}
