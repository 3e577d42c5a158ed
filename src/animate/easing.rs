use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    CubicIn,
    #[default]
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Eased progress for linear progress `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Self::Linear => t,
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    #[test]
    fn every_easing_pins_endpoints() {
        for easing in [Easing::Linear, Easing::CubicIn, Easing::CubicOut, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn cubic_out_front_loads_progress() {
        assert_eq!(Easing::CubicOut.apply(0.5), 0.875);
        assert_eq!(Easing::CubicIn.apply(0.5), 0.125);
        assert_eq!(Easing::CubicInOut.apply(0.5), 0.5);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }
}
