use serde::{Deserialize, Serialize};

use crate::core::ticks::{self, TickValues};
use crate::error::{ChartError, ChartResult};

/// Continuous mapping from a numeric domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    /// Creates a scale over `[domain_start, domain_end]` with the unit range.
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        validate_domain(domain_start, domain_end)?;
        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    pub fn with_domain(mut self, domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        validate_domain(domain_start, domain_end)?;
        self.domain_start = domain_start;
        self.domain_end = domain_end;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Midpoint of the output range, where axis labels are centred.
    #[must_use]
    pub fn range_center(self) -> f64 {
        (self.range_start + self.range_end) * 0.5
    }

    pub fn scale(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return Err(ChartError::InvalidData(
                "cannot invert a scale with an empty range".to_owned(),
            ));
        }

        let normalized = (pixel - self.range_start) / range_span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> TickValues {
        ticks::ticks(self.domain_start, self.domain_end, count)
    }

    #[must_use]
    pub fn tick_step(self, count: usize) -> f64 {
        ticks::tick_step(self.domain_start, self.domain_end, count)
    }

    /// Returns a copy whose domain is extended to round tick boundaries.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (domain_start, domain_end) =
            ticks::nice_extent(self.domain_start, self.domain_end, count);
        Self {
            domain_start,
            domain_end,
            ..self
        }
    }
}

fn validate_domain(domain_start: f64, domain_end: f64) -> ChartResult<()> {
    if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
        return Err(ChartError::InvalidData(
            "scale domain must be finite and non-zero".to_owned(),
        ));
    }
    Ok(())
}
