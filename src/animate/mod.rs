//! Time-sliced value transitions.
//!
//! Nothing here owns a clock: hosts call `Transition::step` once per frame
//! with the elapsed milliseconds and rebuild their frame from the result.

mod easing;
mod interpolate;
mod transition;

pub use easing::Easing;
pub use interpolate::{Interpolate, lerp};
pub use transition::{FLEX_FRAME_MS, Transition, TransitionConfig};
