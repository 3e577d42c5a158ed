//! svg-chart-rs: composable SVG chart components.
//!
//! Components (axes, bars, pyramids, symbols, a select dropdown) compute
//! backend-agnostic `RenderFrame`s from caller records; `SvgRenderer` turns
//! a frame into SVG markup.

pub mod animate;
pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{AxisChart, BarChart, Bars, ChartConfig, PyramidChart, Select};
pub use error::{ChartError, ChartResult};
