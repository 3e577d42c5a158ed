use serde_json::Value;
use tracing::trace;

use crate::animate::{Transition, TransitionConfig};
use crate::api::axis::{Axis, AxisConfig, AxisOrientation, AxisScale};
use crate::api::axis_chart::{AxisChart, ChartScales, Domain};
use crate::api::shape::Line;
use crate::core::{DataAccessor, LinearScale, Translate, Viewport};
use crate::error::ChartResult;
use crate::render::{Color, PathPrimitive, RenderFrame, ShapeStyle};

/// Linear axis whose domain eases towards each new target.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedAxis {
    orientation: AxisOrientation,
    range: (f64, f64),
    config: AxisConfig,
    domain: Transition<(f64, f64)>,
}

impl AnimatedAxis {
    pub fn new(
        orientation: AxisOrientation,
        scale: LinearScale,
        config: AxisConfig,
        transition: TransitionConfig,
    ) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            orientation,
            range: scale.range(),
            config,
            domain: Transition::new(scale.domain(), transition)?,
        })
    }

    /// Starts easing from the displayed domain to `[start, end]`.
    pub fn set_domain(&mut self, start: f64, end: f64) -> ChartResult<()> {
        LinearScale::new(start, end)?;
        self.domain.retarget((start, end));
        Ok(())
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        *self.domain.current()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.domain.is_finished()
    }

    /// Advances the domain and returns the axis to draw this frame.
    pub fn step(&mut self, delta_ms: f64) -> ChartResult<Axis> {
        self.domain.step(delta_ms);
        self.axis()
    }

    /// Axis for the displayed domain.
    pub fn axis(&self) -> ChartResult<Axis> {
        let (start, end) = self.domain();
        let scale = LinearScale::new(start, end)?.with_range(self.range.0, self.range.1)?;
        Axis::new(self.orientation, AxisScale::Linear(scale), self.config.clone())
    }

    pub fn build_frame(&self, viewport: Viewport) -> ChartResult<RenderFrame> {
        self.axis()?.build_frame(viewport)
    }
}

/// Axis chart whose continuous domains ease towards new targets.
///
/// Categorical domains cannot be blended and switch immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedAxisChart {
    chart: AxisChart,
    x: Option<Transition<(f64, f64)>>,
    y: Option<Transition<(f64, f64)>>,
    transition: TransitionConfig,
}

impl AnimatedAxisChart {
    pub fn new(chart: AxisChart, transition: TransitionConfig) -> ChartResult<Self> {
        transition.validate()?;
        Ok(Self {
            x: settled(chart.x_domain(), transition)?,
            y: settled(chart.y_domain(), transition)?,
            chart,
            transition,
        })
    }

    /// The chart as displayed right now.
    #[must_use]
    pub fn chart(&self) -> &AxisChart {
        &self.chart
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.x.as_ref().is_none_or(Transition::is_finished)
            && self.y.as_ref().is_none_or(Transition::is_finished)
    }

    pub fn set_domains(&mut self, x_domain: Domain, y_domain: Domain) -> ChartResult<()> {
        let x_displayed = self.chart.x_domain().clone();
        let y_displayed = self.chart.y_domain().clone();
        retarget(&mut self.x, &x_domain, self.transition)?;
        retarget(&mut self.y, &y_domain, self.transition)?;

        // Continuous axes keep showing their current domain until stepped.
        let x_now = if self.x.is_some() { x_displayed } else { x_domain };
        let y_now = if self.y.is_some() { y_displayed } else { y_domain };
        self.chart = self.chart.clone().with_domains(x_now, y_now)?;
        Ok(())
    }

    /// Advances both domains and returns the chart to draw this frame.
    pub fn step(&mut self, delta_ms: f64) -> ChartResult<&AxisChart> {
        let x_domain = match self.x.as_mut() {
            Some(transition) => {
                let (start, end) = *transition.step(delta_ms);
                Domain::continuous(start, end)
            }
            None => self.chart.x_domain().clone(),
        };
        let y_domain = match self.y.as_mut() {
            Some(transition) => {
                let (start, end) = *transition.step(delta_ms);
                Domain::continuous(start, end)
            }
            None => self.chart.y_domain().clone(),
        };
        self.chart = self.chart.clone().with_domains(x_domain, y_domain)?;
        trace!(finished = self.is_finished(), "animated axis chart stepped");
        Ok(&self.chart)
    }

    pub fn scales(&self) -> ChartResult<ChartScales> {
        self.chart.scales()
    }
}

fn settled(
    domain: &Domain,
    config: TransitionConfig,
) -> ChartResult<Option<Transition<(f64, f64)>>> {
    match domain {
        Domain::Continuous { start, end } => Ok(Some(Transition::new((*start, *end), config)?)),
        Domain::Categorical { .. } => Ok(None),
    }
}

fn retarget(
    transition: &mut Option<Transition<(f64, f64)>>,
    domain: &Domain,
    config: TransitionConfig,
) -> ChartResult<()> {
    match (transition.as_mut(), domain) {
        (Some(current), Domain::Continuous { start, end }) => current.retarget((*start, *end)),
        (None, _) | (Some(_), Domain::Categorical { .. }) => *transition = settled(domain, config)?,
    }
    Ok(())
}

/// Path whose `d` attribute morphs between shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedPath {
    d: Transition<String>,
    translate: Translate,
    fill: Option<Color>,
    style: ShapeStyle,
    class_name: Option<String>,
}

impl AnimatedPath {
    pub fn new(d: impl Into<String>, transition: TransitionConfig) -> ChartResult<Self> {
        Ok(Self {
            d: Transition::new(d.into(), transition)?,
            translate: Translate::default(),
            fill: None,
            style: ShapeStyle::default(),
            class_name: None,
        })
    }

    #[must_use]
    pub fn with_translate(mut self, translate: Translate) -> Self {
        self.translate = translate;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn set_d(&mut self, d: impl Into<String>) {
        self.d.retarget(d.into());
    }

    #[must_use]
    pub fn d(&self) -> &str {
        self.d.current()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.d.is_finished()
    }

    pub fn step(&mut self, delta_ms: f64) -> PathPrimitive {
        self.d.step(delta_ms);
        self.to_primitive()
    }

    #[must_use]
    pub fn to_primitive(&self) -> PathPrimitive {
        let mut path =
            PathPrimitive::new(self.d.current().clone(), self.translate).with_style(self.style);
        path.fill = self.fill;
        path.class_name = self.class_name.clone();
        path
    }
}

/// Line whose vertices glide to new data.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedLine {
    line: Line,
    coordinates: Transition<Vec<f64>>,
}

impl AnimatedLine {
    pub fn new(line: Line, transition: TransitionConfig) -> ChartResult<Self> {
        let coordinates = flatten(line.points());
        Ok(Self {
            coordinates: Transition::new(coordinates, transition)?,
            line,
        })
    }

    /// Eases towards pixel-space `points`.
    pub fn set_points(&mut self, points: &[(f64, f64)]) {
        self.coordinates.retarget(flatten(points));
    }

    /// Eases towards `data` mapped through `scales`.
    pub fn set_data(
        &mut self,
        data: &[Value],
        x: &DataAccessor,
        y: &DataAccessor,
        scales: &ChartScales,
    ) -> ChartResult<()> {
        let target = Line::from_data(data, x, y, scales)?;
        self.set_points(target.points());
        Ok(())
    }

    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.coordinates
            .current()
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.coordinates.is_finished()
    }

    pub fn step(&mut self, delta_ms: f64) -> PathPrimitive {
        self.coordinates.step(delta_ms);
        self.to_primitive()
    }

    #[must_use]
    pub fn to_primitive(&self) -> PathPrimitive {
        let mut line = self.line.clone();
        line.set_points(self.points());
        line.to_primitive()
    }
}

fn flatten(points: &[(f64, f64)]) -> Vec<f64> {
    points.iter().flat_map(|&(x, y)| [x, y]).collect()
}
