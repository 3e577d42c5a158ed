use serde::{Deserialize, Serialize};

use crate::animate::{Easing, Interpolate};
use crate::error::{ChartError, ChartResult};

/// Longest frame delta honoured when `flex_duration` is on (one 60 Hz frame).
pub const FLEX_FRAME_MS: f64 = 1000.0 / 60.0;

/// Timing for value transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    #[serde(default)]
    pub easing: Easing,
    /// Clamp each step to one frame so dropped frames stretch the animation
    /// instead of skipping ahead.
    #[serde(default)]
    pub flex_duration: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: Easing::default(),
            flex_duration: false,
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_flex_duration(mut self, flex_duration: bool) -> Self {
        self.flex_duration = flex_duration;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(ChartError::InvalidData(
                "transition duration must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_duration_ms() -> f64 {
    500.0
}

/// Per-frame interpolation from the value on screen towards a target.
///
/// The host drives time by calling `step` with frame deltas; `retarget`
/// restarts from whatever is currently displayed so motion stays continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T: Interpolate> {
    config: TransitionConfig,
    from: T,
    to: T,
    current: T,
    elapsed_ms: f64,
}

impl<T: Interpolate> Transition<T> {
    /// Starts settled at `value`.
    pub fn new(value: T, config: TransitionConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            from: value.clone(),
            to: value.clone(),
            current: value,
            elapsed_ms: config.duration_ms,
        })
    }

    #[must_use]
    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    #[must_use]
    pub fn current(&self) -> &T {
        &self.current
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.to
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.config.duration_ms
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.config.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.config.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Animates from the current value to `to`.
    pub fn retarget(&mut self, to: T) {
        self.from = self.current.clone();
        self.to = to;
        self.elapsed_ms = 0.0;
        if self.config.duration_ms <= 0.0 {
            self.finish();
        }
    }

    /// Jumps to `value` without animating.
    pub fn snap_to(&mut self, value: T) {
        self.from = value.clone();
        self.to = value;
        self.finish();
    }

    pub fn finish(&mut self) {
        self.elapsed_ms = self.config.duration_ms;
        self.current = self.to.clone();
    }

    /// Advances by `delta_ms` and returns the value to display.
    pub fn step(&mut self, delta_ms: f64) -> &T {
        if self.is_finished() {
            return &self.current;
        }

        let mut delta = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        if self.config.flex_duration {
            delta = delta.min(FLEX_FRAME_MS);
        }
        self.elapsed_ms += delta;

        if self.is_finished() {
            self.finish();
        } else {
            let eased = self.config.easing.apply(self.progress());
            self.current = self.from.interpolate(&self.to, eased);
        }
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{Transition, TransitionConfig};
    use crate::animate::Easing;

    fn linear(duration_ms: f64) -> TransitionConfig {
        TransitionConfig::default()
            .with_duration_ms(duration_ms)
            .with_easing(Easing::Linear)
    }

    #[test]
    fn reaches_target_exactly_at_duration() {
        let mut transition = Transition::new(0.0, linear(100.0)).expect("transition");
        transition.retarget(10.0);
        assert_eq!(*transition.step(25.0), 2.5);
        assert!(!transition.is_finished());
        assert_eq!(*transition.step(75.0), 10.0);
        assert!(transition.is_finished());
        assert_eq!(*transition.step(10.0), 10.0);
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut transition = Transition::new(0.0, linear(100.0)).expect("transition");
        transition.retarget(10.0);
        transition.step(50.0);
        transition.retarget(0.0);
        assert_eq!(*transition.current(), 5.0);
        assert_eq!(*transition.step(50.0), 2.5);
    }

    #[test]
    fn flex_duration_clamps_long_frames() {
        let mut transition =
            Transition::new(0.0, linear(100.0).with_flex_duration(true)).expect("transition");
        transition.retarget(100.0);
        transition.step(1000.0);
        assert!(!transition.is_finished());
        assert!((transition.current() - 100.0 / 6.0).abs() <= 1e-9);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut transition = Transition::new((0.0, 1.0), linear(0.0)).expect("transition");
        transition.retarget((5.0, 6.0));
        assert_eq!(*transition.current(), (5.0, 6.0));
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert!(Transition::new(0.0, linear(-1.0)).is_err());
    }
}
