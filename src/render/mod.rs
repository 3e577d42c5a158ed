mod color_scale;
mod frame;
mod null_renderer;
mod primitives;
mod svg_renderer;

pub use color_scale::{CATEGORY10, ColorScale, lerp_color};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, PathPrimitive, RectPrimitive, ShapeStyle, TextHAlign, TextPrimitive,
};
pub use svg_renderer::{SvgRenderStats, SvgRenderer, escape_xml};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart components and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
