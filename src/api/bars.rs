#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::api::axis_chart::ChartScales;
use crate::core::{
    BandPadding, BandScale, BarGeometryInput, BarLayout, BarRenderingProps, BarScales,
    DataAccessor, DatumValue, Orientation, StackLayer, Viewport, resolve_bar_geometry,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::InteractionState;
use crate::render::{Color, ColorScale, RectPrimitive, RenderFrame, ShapeStyle};

/// Reads the `[baseline, top]` extent of a stacked datum.
#[derive(Debug, Clone, PartialEq)]
pub struct StackAccessors {
    pub baseline: DataAccessor,
    pub top: DataAccessor,
}

/// Accessors over bar records.
///
/// `x` reads the category and `y` the value whatever the orientation; the
/// component maps them onto screen axes.
#[derive(Debug, Clone, PartialEq)]
pub struct BarsAccessors {
    pub key: DataAccessor,
    pub x: Option<DataAccessor>,
    pub y: Option<DataAccessor>,
    /// Colour scale input; falls back to `x`.
    pub fill: Option<DataAccessor>,
    pub layer: Option<DataAccessor>,
    pub stack: Option<StackAccessors>,
}

impl BarsAccessors {
    #[must_use]
    pub fn new(key: impl Into<DataAccessor>) -> Self {
        Self {
            key: key.into(),
            x: None,
            y: None,
            fill: None,
            layer: None,
            stack: None,
        }
    }

    #[must_use]
    pub fn with_x(mut self, accessor: impl Into<DataAccessor>) -> Self {
        self.x = Some(accessor.into());
        self
    }

    #[must_use]
    pub fn with_y(mut self, accessor: impl Into<DataAccessor>) -> Self {
        self.y = Some(accessor.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, accessor: impl Into<DataAccessor>) -> Self {
        self.fill = Some(accessor.into());
        self
    }

    #[must_use]
    pub fn with_layer(mut self, accessor: impl Into<DataAccessor>) -> Self {
        self.layer = Some(accessor.into());
        self
    }

    #[must_use]
    pub fn with_stack(
        mut self,
        baseline: impl Into<DataAccessor>,
        top: impl Into<DataAccessor>,
    ) -> Self {
        self.stack = Some(StackAccessors {
            baseline: baseline.into(),
            top: top.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarsProps {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub layout: BarLayout,
    #[serde(default)]
    pub band_padding: BandPadding,
    /// Inner padding of the layer scale built for grouped bars.
    #[serde(default = "default_layer_padding")]
    pub layer_padding: f64,
    /// Explicit layer scale for grouped bars, already ranged to one band.
    #[serde(default)]
    pub layer_ordinal: Option<BandScale>,
    #[serde(default = "default_fill")]
    pub fill: Color,
    /// Colours bars by their fill value (the `fill` accessor, else `x`).
    /// Any resolved value is mapped, so category strings work with ordinal
    /// scales as well as numbers; unmapped values keep `fill`.
    #[serde(default)]
    pub color_scale: Option<ColorScale>,
    #[serde(default)]
    pub rect_style: ShapeStyle,
    #[serde(default = "default_focused_style")]
    pub focused_style: ShapeStyle,
    #[serde(default = "default_selected_style")]
    pub selected_style: ShapeStyle,
    #[serde(default)]
    pub rect_class_name: Option<String>,
    #[serde(default = "default_focused_class")]
    pub focused_class_name: String,
    #[serde(default = "default_selected_class")]
    pub selected_class_name: String,
    /// Shift applied to every bar along x.
    #[serde(default)]
    pub category_translate: f64,
    /// Plot height; defaults to the far end of the linear range.
    #[serde(default)]
    pub height: Option<f64>,
}

impl Default for BarsProps {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            layout: BarLayout::default(),
            band_padding: BandPadding::default(),
            layer_padding: default_layer_padding(),
            layer_ordinal: None,
            fill: default_fill(),
            color_scale: None,
            rect_style: ShapeStyle::default(),
            focused_style: default_focused_style(),
            selected_style: default_selected_style(),
            rect_class_name: None,
            focused_class_name: default_focused_class(),
            selected_class_name: default_selected_class(),
            category_translate: 0.0,
            height: None,
        }
    }
}

impl BarsProps {
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: BarLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_band_padding(mut self, band_padding: BandPadding) -> Self {
        self.band_padding = band_padding;
        self
    }

    #[must_use]
    pub fn with_layer_ordinal(mut self, layer_ordinal: BandScale) -> Self {
        self.layer_ordinal = Some(layer_ordinal);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_color_scale(mut self, color_scale: ColorScale) -> Self {
        self.color_scale = Some(color_scale);
        self
    }

    #[must_use]
    pub fn with_category_translate(mut self, translate: f64) -> Self {
        self.category_translate = translate;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.category_translate.is_finite() {
            return Err(ChartError::InvalidData(
                "category translate must be finite".to_owned(),
            ));
        }
        if let Some(height) = self.height {
            if !height.is_finite() {
                return Err(ChartError::InvalidData(
                    "bars height must be finite".to_owned(),
                ));
            }
        }
        if let Some(color_scale) = &self.color_scale {
            color_scale.validate()?;
        }
        self.fill.validate()?;
        self.rect_style.validate()?;
        self.focused_style.validate()?;
        self.selected_style.validate()
    }
}

fn default_layer_padding() -> f64 {
    0.05
}

fn default_fill() -> Color {
    Color::STEELBLUE
}

pub(crate) fn default_focused_style() -> ShapeStyle {
    ShapeStyle::stroked(Color::from_rgb8(0x77, 0x77, 0x77), 1.0)
}

pub(crate) fn default_selected_style() -> ShapeStyle {
    ShapeStyle::stroked(Color::BLACK, 1.0)
}

pub(crate) fn default_focused_class() -> String {
    "focused".to_owned()
}

pub(crate) fn default_selected_class() -> String {
    "selected".to_owned()
}

/// One resolved bar in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub key: String,
    /// Resolver output with group offset and category translate applied.
    pub rect: BarRenderingProps,
    pub fill: Color,
    pub selected: bool,
    pub focused: bool,
}

impl BarGeometry {
    /// Rect with negative extents flipped, as SVG would refuse them.
    #[must_use]
    pub fn normalized_rect(&self) -> BarRenderingProps {
        let BarRenderingProps {
            mut x,
            mut y,
            mut width,
            mut height,
        } = self.rect;
        if width < 0.0 {
            x += width;
            width = -width;
        }
        if height < 0.0 {
            y += height;
            height = -height;
        }
        BarRenderingProps {
            x,
            y,
            height,
            width,
        }
    }

    /// Whether the point lies inside the normalized rect, edges included.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let rect = self.normalized_rect();
        x >= rect.x && x <= rect.x + rect.width && y >= rect.y && y <= rect.y + rect.height
    }

    fn to_primitive(&self, props: &BarsProps) -> RectPrimitive {
        let rect = self.normalized_rect();
        let mut style = props.rect_style;
        let mut classes: Vec<&str> = props.rect_class_name.iter().map(String::as_str).collect();
        if self.focused {
            style = style.merged(props.focused_style);
            classes.push(&props.focused_class_name);
        }
        if self.selected {
            style = style.merged(props.selected_style);
            classes.push(&props.selected_class_name);
        }

        let primitive = RectPrimitive::new(rect.x, rect.y, rect.width, rect.height, self.fill)
            .with_style(style)
            .with_key(self.key.clone());
        if classes.is_empty() {
            primitive
        } else {
            primitive.with_class(classes.join(" "))
        }
    }
}

/// Bar series drawn against a band scale and a linear scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Bars {
    data: Vec<Value>,
    accessors: BarsAccessors,
    props: BarsProps,
}

impl Bars {
    pub fn new(data: Vec<Value>, accessors: BarsAccessors, props: BarsProps) -> ChartResult<Self> {
        validate_accessors(&accessors, &props)?;
        props.validate()?;
        Ok(Self {
            data,
            accessors,
            props,
        })
    }

    #[must_use]
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    #[must_use]
    pub fn accessors(&self) -> &BarsAccessors {
        &self.accessors
    }

    #[must_use]
    pub fn props(&self) -> &BarsProps {
        &self.props
    }

    pub fn set_data(&mut self, data: Vec<Value>) {
        self.data = data;
    }

    pub fn set_props(&mut self, props: BarsProps) -> ChartResult<()> {
        validate_accessors(&self.accessors, &props)?;
        props.validate()?;
        self.props = props;
        Ok(())
    }

    /// Keys of every datum in input order.
    pub fn keys(&self) -> ChartResult<Vec<String>> {
        self.data
            .iter()
            .map(|datum| Ok(self.accessors.key.require(datum)?.category_key()))
            .collect()
    }

    /// Resolves every bar, in paint order.
    pub fn project(
        &self,
        scales: &ChartScales,
        interaction: &InteractionState,
    ) -> ChartResult<Vec<BarGeometry>> {
        let (ordinal, linear) = scales.bar_scales(self.props.orientation)?;
        let ordinal = self.props.band_padding.apply(ordinal.clone());
        let layer_ordinal = if self.props.layout.is_grouped() {
            Some(match &self.props.layer_ordinal {
                Some(scale) => scale.clone(),
                None => self.layer_scale(&ordinal)?,
            })
        } else {
            None
        };
        let height = self.props.height.unwrap_or_else(|| {
            let (start, end) = linear.range();
            start.max(end)
        });

        let keys = self.keys()?;
        let order = interaction.render_order(&keys);
        let projector = BarProjector {
            bars: self,
            scales: BarScales {
                ordinal: &ordinal,
                linear,
                layer_ordinal: layer_ordinal.as_ref(),
            },
            height,
            interaction,
        };

        #[cfg(feature = "parallel-projection")]
        let projected: ChartResult<Vec<BarGeometry>> = {
            let projected: Vec<ChartResult<BarGeometry>> = order
                .par_iter()
                .map(|&index| projector.project_single(&self.data[index], &keys[index]))
                .collect();
            projected.into_iter().collect()
        };

        #[cfg(not(feature = "parallel-projection"))]
        let projected: ChartResult<Vec<BarGeometry>> = {
            let mut out = Vec::with_capacity(order.len());
            for index in order {
                out.push(projector.project_single(&self.data[index], &keys[index])?);
            }
            Ok(out)
        };

        let projected = projected?;
        debug!(
            bars = projected.len(),
            orientation = ?self.props.orientation,
            layout = ?self.props.layout,
            "bars projected"
        );
        Ok(projected)
    }

    /// Rects in plot coordinates; later rects paint over earlier ones.
    pub fn build_frame(
        &self,
        viewport: Viewport,
        scales: &ChartScales,
        interaction: &InteractionState,
    ) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(viewport);
        frame.rects = self
            .project(scales, interaction)?
            .iter()
            .map(|bar| bar.to_primitive(&self.props))
            .collect();
        Ok(frame)
    }

    /// Key of the topmost bar under a plot-space point.
    pub fn hit_test(
        &self,
        scales: &ChartScales,
        interaction: &InteractionState,
        x: f64,
        y: f64,
    ) -> ChartResult<Option<String>> {
        let projected = self.project(scales, interaction)?;
        Ok(projected
            .into_iter()
            .rev()
            .find(|bar| bar.contains(x, y))
            .map(|bar| bar.key))
    }

    /// Layer scale spanning one outer band, layers in first-seen order.
    fn layer_scale(&self, ordinal: &BandScale) -> ChartResult<BandScale> {
        let layer = self
            .accessors
            .layer
            .as_ref()
            .ok_or(ChartError::MissingLayerScale)?;
        let layers = self
            .data
            .iter()
            .map(|datum| layer.require(datum))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(BandScale::from_values(&layers)?
            .with_range(0.0, ordinal.bandwidth())?
            .with_padding_inner(self.props.layer_padding))
    }
}

fn validate_accessors(accessors: &BarsAccessors, props: &BarsProps) -> ChartResult<()> {
    let missing = |field: &str| ChartError::MissingField {
        field: field.to_owned(),
    };
    if accessors.x.is_none() {
        return Err(missing("x"));
    }
    match props.layout {
        BarLayout::Default if accessors.y.is_none() => Err(missing("y")),
        BarLayout::Grouped if accessors.y.is_none() => Err(missing("y")),
        BarLayout::Grouped if accessors.layer.is_none() => Err(missing("layer")),
        BarLayout::Stacked if accessors.stack.is_none() => Err(missing("stack")),
        _ => Ok(()),
    }
}

struct BarProjector<'a> {
    bars: &'a Bars,
    scales: BarScales<'a>,
    height: f64,
    interaction: &'a InteractionState,
}

impl BarProjector<'_> {
    fn project_single(&self, datum: &Value, key: &str) -> ChartResult<BarGeometry> {
        let accessors = &self.bars.accessors;
        let props = &self.bars.props;
        let vertical = props.orientation.is_vertical();
        let require = |accessor: &Option<DataAccessor>, field: &str| match accessor {
            Some(accessor) => accessor.require(datum),
            None => Err(ChartError::MissingField {
                field: field.to_owned(),
            }),
        };

        let category = require(&accessors.x, "x")?;
        let mut stack_pair = None;
        let (x_value, y_value) = match props.layout {
            BarLayout::Default => (category.clone(), require(&accessors.y, "y")?),
            BarLayout::Grouped => {
                let value = require(&accessors.y, "y")?;
                let layer = require(&accessors.layer, "layer")?;
                if vertical { (layer, value) } else { (value, layer) }
            }
            BarLayout::Stacked => {
                let stack = accessors.stack.as_ref().ok_or(ChartError::MissingStackPair)?;
                let baseline = stack.baseline.require(datum)?.require_number()?;
                let top = stack.top.require(datum)?.require_number()?;
                stack_pair = Some([baseline, top]);
                (category.clone(), DatumValue::Number(top))
            }
        };

        let input = BarGeometryInput {
            datum: stack_pair,
            orientation: props.orientation,
            stacked: props.layout.is_stacked(),
            grouped: props.layout.is_grouped(),
            x_value: &x_value,
            y_value: &y_value,
            height: self.height,
        };
        let mut rect = resolve_bar_geometry(&input, &self.scales)?;

        if props.layout.is_grouped() {
            let offset = self.scales.ordinal.scale(&category)?;
            if vertical {
                rect.x += offset;
            } else {
                rect.y += offset;
            }
        }
        rect.x += props.category_translate;

        let fill = props
            .color_scale
            .as_ref()
            .and_then(|scale| {
                let fill_accessor = accessors.fill.as_ref().or(accessors.x.as_ref())?;
                scale.color_for(&fill_accessor.resolve(datum)?)
            })
            .unwrap_or(props.fill);

        trace!(
            key,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "bar resolved"
        );
        Ok(BarGeometry {
            key: key.to_owned(),
            rect,
            fill,
            selected: self.interaction.is_selected(key),
            focused: self.interaction.focus() == Some(key),
        })
    }
}

/// Flattens stacked layers into bar records.
///
/// Each record carries `key` (`category-layer`), `category`, `layer`,
/// `baseline`, `top` and `value`; pair it with [`stacked_accessors`].
#[must_use]
pub fn stack_layer_records(layers: &[StackLayer]) -> Vec<Value> {
    layers
        .iter()
        .flat_map(|layer| {
            layer.segments.iter().map(move |segment| {
                let category = segment.category.category_key();
                json!({
                    "key": format!("{category}-{}", layer.key),
                    "category": category,
                    "layer": layer.key,
                    "baseline": segment.baseline,
                    "top": segment.top,
                    "value": segment.value(),
                })
            })
        })
        .collect()
}

/// Accessors matching the records built by [`stack_layer_records`].
#[must_use]
pub fn stacked_accessors() -> BarsAccessors {
    BarsAccessors::new("key")
        .with_x("category")
        .with_y("value")
        .with_fill("layer")
        .with_layer("layer")
        .with_stack("baseline", "top")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BarGeometry, Bars, BarsAccessors, BarsProps};
    use crate::api::axis::AxisScale;
    use crate::api::axis_chart::ChartScales;
    use crate::core::{BandPadding, BandScale, BarLayout, BarRenderingProps, LinearScale};
    use crate::interaction::InteractionState;
    use crate::render::Color;

    fn scales() -> ChartScales {
        ChartScales {
            x: AxisScale::Band(
                BandScale::new(["a", "b"])
                    .and_then(|scale| scale.with_range(0.0, 100.0))
                    .expect("band"),
            ),
            y: AxisScale::Linear(
                LinearScale::new(0.0, 10.0)
                    .and_then(|scale| scale.with_range(100.0, 0.0))
                    .expect("linear"),
            ),
        }
    }

    #[test]
    fn layouts_require_their_accessors() {
        let accessors = BarsAccessors::new("key").with_x("x").with_y("y");
        assert!(Bars::new(Vec::new(), accessors.clone(), BarsProps::default()).is_ok());
        let grouped = BarsProps::default().with_layout(BarLayout::Grouped);
        assert!(Bars::new(Vec::new(), accessors.clone(), grouped).is_err());
        let stacked = BarsProps::default().with_layout(BarLayout::Stacked);
        assert!(Bars::new(Vec::new(), accessors, stacked).is_err());
    }

    #[test]
    fn negative_extents_are_flipped() {
        let bar = BarGeometry {
            key: "a".to_owned(),
            rect: BarRenderingProps {
                x: 10.0,
                y: 50.0,
                height: -20.0,
                width: 5.0,
            },
            fill: Color::STEELBLUE,
            selected: false,
            focused: false,
        };
        assert_eq!(bar.normalized_rect().y, 30.0);
        assert_eq!(bar.normalized_rect().height, 20.0);
    }

    #[test]
    fn vertical_default_bars_fill_their_band() {
        let data = vec![
            json!({"key": "a", "x": "a", "y": 5}),
            json!({"key": "b", "x": "b", "y": 10}),
        ];
        let bars = Bars::new(
            data,
            BarsAccessors::new("key").with_x("x").with_y("y"),
            BarsProps::default().with_band_padding(BandPadding::uniform(0.0)),
        )
        .expect("bars");
        let projected = bars
            .project(&scales(), &InteractionState::default())
            .expect("project");
        let rect = |x, y, height, width| BarRenderingProps { x, y, height, width };
        assert_eq!(projected[0].rect, rect(0.0, 50.0, 50.0, 50.0));
        assert_eq!(projected[1].rect, rect(50.0, 0.0, 100.0, 50.0));
        assert_eq!(projected[0].fill, Color::STEELBLUE);
    }
}
