pub mod band_scale;
pub mod bar_geometry;
pub mod datum;
pub mod scale;
pub mod stack;
pub mod symbol;
pub mod ticks;
pub mod types;

pub use band_scale::{BandPadding, BandScale};
pub use bar_geometry::{BarGeometryInput, BarRenderingProps, BarScales, resolve_bar_geometry};
pub use datum::{DataAccessor, DatumValue, format_number};
pub use scale::LinearScale;
pub use stack::{
    StackFields, StackLayer, StackRow, StackSegment, stack_layers, stack_rows_from_records,
    stacked_data_array, stacked_max,
};
pub use symbol::{DEFAULT_SYMBOL_SIZE, PathBuilder, SymbolType, line_path, symbol_path};
pub use ticks::{TickValues, format_tick, nice_extent, tick_increment, tick_step, ticks};
pub use types::{BarLayout, Orientation, Padding, Translate, Viewport};
