use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::api::axis_chart::ChartScales;
use crate::api::bars::{
    default_focused_class, default_focused_style, default_selected_class, default_selected_style,
};
use crate::core::{
    DEFAULT_SYMBOL_SIZE, DataAccessor, SymbolType, Translate, Viewport, line_path, symbol_path,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, PathPrimitive, RenderFrame, ShapeStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolProps {
    #[serde(default)]
    pub symbol_type: SymbolType,
    /// Symbol area in square pixels.
    #[serde(default = "default_symbol_size")]
    pub size: f64,
    #[serde(default = "default_symbol_fill")]
    pub fill: Color,
    #[serde(default)]
    pub translate: Translate,
    #[serde(default)]
    pub style: ShapeStyle,
    #[serde(default = "default_focused_style")]
    pub focused_style: ShapeStyle,
    #[serde(default = "default_selected_style")]
    pub selected_style: ShapeStyle,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default = "default_focused_class")]
    pub focused_class_name: String,
    #[serde(default = "default_selected_class")]
    pub selected_class_name: String,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub key: Option<String>,
}

impl Default for SymbolProps {
    fn default() -> Self {
        Self {
            symbol_type: SymbolType::default(),
            size: default_symbol_size(),
            fill: default_symbol_fill(),
            translate: Translate::default(),
            style: ShapeStyle::default(),
            focused_style: default_focused_style(),
            selected_style: default_selected_style(),
            class_name: None,
            focused_class_name: default_focused_class(),
            selected_class_name: default_selected_class(),
            focused: false,
            selected: false,
            key: None,
        }
    }
}

impl SymbolProps {
    #[must_use]
    pub fn with_symbol_type(mut self, symbol_type: SymbolType) -> Self {
        self.symbol_type = symbol_type;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_translate(mut self, translate: Translate) -> Self {
        self.translate = translate;
        self
    }

    #[must_use]
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(ChartError::InvalidData(
                "symbol size must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()?;
        self.style.validate()?;
        self.focused_style.validate()?;
        self.selected_style.validate()
    }
}

fn default_symbol_size() -> f64 {
    DEFAULT_SYMBOL_SIZE
}

fn default_symbol_fill() -> Color {
    Color::STEELBLUE
}

/// A single d3-style symbol. Path data is cached per type and size.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    props: SymbolProps,
    path: String,
}

impl Symbol {
    pub fn new(props: SymbolProps) -> ChartResult<Self> {
        props.validate()?;
        let path = symbol_path(props.symbol_type, props.size);
        Ok(Self { props, path })
    }

    #[must_use]
    pub fn props(&self) -> &SymbolProps {
        &self.props
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replaces props; returns whether the path had to be regenerated.
    pub fn update(&mut self, props: SymbolProps) -> ChartResult<bool> {
        props.validate()?;
        let regenerate =
            props.symbol_type != self.props.symbol_type || props.size != self.props.size;
        if regenerate {
            self.path = symbol_path(props.symbol_type, props.size);
            trace!(
                symbol = props.symbol_type.name(),
                size = props.size,
                "symbol path regenerated"
            );
        }
        self.props = props;
        Ok(regenerate)
    }

    /// Style after layering focused, then selected, over the base style.
    #[must_use]
    pub fn resolved_style(&self) -> ShapeStyle {
        let mut style = self.props.style;
        if self.props.focused {
            style = style.merged(self.props.focused_style);
        }
        if self.props.selected {
            style = style.merged(self.props.selected_style);
        }
        style
    }

    #[must_use]
    pub fn class_names(&self) -> Option<String> {
        let mut classes: Vec<&str> = self.props.class_name.iter().map(String::as_str).collect();
        if self.props.focused {
            classes.push(&self.props.focused_class_name);
        }
        if self.props.selected {
            classes.push(&self.props.selected_class_name);
        }
        (!classes.is_empty()).then(|| classes.join(" "))
    }

    #[must_use]
    pub fn to_primitive(&self) -> PathPrimitive {
        let mut path = PathPrimitive::new(self.path.clone(), self.props.translate)
            .with_fill(self.props.fill)
            .with_style(self.resolved_style());
        if let Some(classes) = self.class_names() {
            path = path.with_class(classes);
        }
        if let Some(key) = &self.props.key {
            path = path.with_key(key.clone());
        }
        path
    }

    #[must_use]
    pub fn build_frame(&self, viewport: Viewport) -> RenderFrame {
        RenderFrame::new(viewport).with_path(self.to_primitive())
    }
}

/// Polyline through data points mapped by the chart scales.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    points: Vec<(f64, f64)>,
    stroke: Color,
    stroke_width: f64,
    class_name: Option<String>,
}

impl Line {
    #[must_use]
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            points,
            stroke: Color::STEELBLUE,
            stroke_width: 2.5,
            class_name: None,
        }
    }

    /// Maps every datum through `scales`; band scales place points on band centres.
    pub fn from_data(
        data: &[Value],
        x: &DataAccessor,
        y: &DataAccessor,
        scales: &ChartScales,
    ) -> ChartResult<Self> {
        let points = data
            .iter()
            .map(|datum| {
                Ok((
                    scales.x.position(&x.require(datum)?)?,
                    scales.y.position(&y.require(datum)?)?,
                ))
            })
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self::new(points))
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color, width: f64) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<(f64, f64)>) {
        self.points = points;
    }

    #[must_use]
    pub fn path(&self) -> String {
        line_path(&self.points)
    }

    #[must_use]
    pub fn to_primitive(&self) -> PathPrimitive {
        let path = PathPrimitive::new(self.path(), Translate::default())
            .with_style(ShapeStyle::stroked(self.stroke, self.stroke_width));
        match &self.class_name {
            Some(class_name) => path.with_class(class_name.clone()),
            None => path,
        }
    }
}
