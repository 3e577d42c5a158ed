//! Chart components built on the core scales and render primitives.
//!
//! Every component turns its props and the caller's records into a
//! `RenderFrame`; none of them draws directly.

mod animated;
mod axis;
mod axis_chart;
mod bar_chart;
mod bars;
mod chart_config;
mod layout_helpers;
mod legend;
mod pyramid;
mod select;
mod shape;

pub use animated::{AnimatedAxis, AnimatedAxisChart, AnimatedLine, AnimatedPath};
pub use axis::{
    Axis, AxisConfig, AxisOrientation, AxisScale, AxisTick, LabelPosition, TickFormat,
    calc_label_position, calc_translate,
};
pub use axis_chart::{AxisChart, ChartScales, Domain, ScaleType};
pub use bar_chart::{BarChart, BarChartProps};
pub use bars::{
    BarGeometry, Bars, BarsAccessors, BarsProps, StackAccessors, stack_layer_records,
    stacked_accessors,
};
pub use chart_config::ChartConfig;
pub use legend::{Legend, LegendItem};
pub use pyramid::{PyramidChart, PyramidChartProps, PyramidSide};
pub use select::{
    HIERARCHY_INDENT_PX, Select, SelectLayout, SelectOption, SelectProps, widest_label_width,
};
pub use shape::{Line, Symbol, SymbolProps};
