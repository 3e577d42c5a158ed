use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::datum::DatumValue;
use crate::error::{ChartError, ChartResult};

/// Maps discrete categories to contiguous, evenly sized pixel bands.
///
/// Layout follows the usual band-scale model: `padding_inner` is the fraction
/// of a step left empty between bands, `padding_outer` the number of steps
/// left before the first and after the last band, and `align` distributes the
/// outer slack (0 = all after, 1 = all before).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: IndexSet<String>,
    range_start: f64,
    range_end: f64,
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
}

impl BandScale {
    /// Creates a scale over `categories`; duplicates keep their first position.
    pub fn new<I, S>(categories: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let domain: IndexSet<String> = categories.into_iter().map(Into::into).collect();
        if domain.is_empty() {
            return Err(ChartError::InvalidData(
                "band scale domain must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            domain,
            range_start: 0.0,
            range_end: 1.0,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
        })
    }

    pub fn from_values<'a, I>(values: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = &'a DatumValue>,
    {
        Self::new(values.into_iter().map(DatumValue::category_key))
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "band scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    /// Sets inner and outer padding to the same value.
    #[must_use]
    pub fn with_padding(self, padding: f64) -> Self {
        self.with_padding_inner(padding).with_padding_outer(padding)
    }

    #[must_use]
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = sanitize(padding).min(1.0);
        self
    }

    #[must_use]
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = sanitize(padding);
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: f64) -> Self {
        self.align = sanitize(align).clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn domain(&self) -> impl ExactSizeIterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.domain.contains(category)
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn range_center(&self) -> f64 {
        (self.range_start + self.range_end) * 0.5
    }

    #[must_use]
    pub fn padding_inner(&self) -> f64 {
        self.padding_inner
    }

    #[must_use]
    pub fn padding_outer(&self) -> f64 {
        self.padding_outer
    }

    #[must_use]
    pub fn align(&self) -> f64 {
        self.align
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.layout().step
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.layout().bandwidth
    }

    /// Start of the band for `category`, or `None` when it is not in the domain.
    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        let index = self.domain.get_index_of(category)?;
        Some(self.layout().band_start(index, self.domain.len()))
    }

    pub fn scale(&self, value: &DatumValue) -> ChartResult<f64> {
        let key = value.category_key();
        self.position(&key)
            .ok_or(ChartError::UnknownCategory { category: key })
    }

    /// Centre of the band for `category`.
    #[must_use]
    pub fn center(&self, category: &str) -> Option<f64> {
        let layout = self.layout();
        let index = self.domain.get_index_of(category)?;
        Some(layout.band_start(index, self.domain.len()) + layout.bandwidth * 0.5)
    }

    /// Category whose band contains `pixel`, ignoring padding gaps.
    #[must_use]
    pub fn category_at(&self, pixel: f64) -> Option<&str> {
        let layout = self.layout();
        let count = self.domain.len();
        (0..count)
            .find(|&index| {
                let start = layout.band_start(index, count);
                pixel >= start && pixel <= start + layout.bandwidth
            })
            .and_then(|index| self.domain.get_index(index))
            .map(String::as_str)
    }

    fn layout(&self) -> BandLayout {
        let count = self.domain.len() as f64;
        let reverse = self.range_end < self.range_start;
        let (start, stop) = if reverse {
            (self.range_end, self.range_start)
        } else {
            (self.range_start, self.range_end)
        };

        let mut step =
            (stop - start) / (count - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut first = start + (stop - start - step * (count - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            first = first.round();
            bandwidth = bandwidth.round();
        }

        BandLayout {
            first,
            step,
            bandwidth,
            reverse,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BandLayout {
    first: f64,
    step: f64,
    bandwidth: f64,
    reverse: bool,
}

impl BandLayout {
    fn band_start(self, index: usize, count: usize) -> f64 {
        let slot = if self.reverse {
            count - 1 - index
        } else {
            index
        };
        self.first + self.step * slot as f64
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Band padding as configured on bar components.
///
/// Precedence when applied: `outer` if set, else `inner` if set, else the
/// uniform `padding`. `align` is applied independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPadding {
    #[serde(default = "default_band_padding")]
    pub padding: f64,
    #[serde(default)]
    pub inner: Option<f64>,
    #[serde(default)]
    pub outer: Option<f64>,
    #[serde(default)]
    pub align: Option<f64>,
}

impl Default for BandPadding {
    fn default() -> Self {
        Self {
            padding: default_band_padding(),
            inner: None,
            outer: None,
            align: None,
        }
    }
}

impl BandPadding {
    #[must_use]
    pub fn uniform(padding: f64) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn apply(self, scale: BandScale) -> BandScale {
        let scale = if let Some(outer) = self.outer {
            scale.with_padding_outer(outer)
        } else if let Some(inner) = self.inner {
            scale.with_padding_inner(inner)
        } else {
            scale.with_padding(self.padding)
        };

        match self.align {
            Some(align) => scale.with_align(align),
            None => scale,
        }
    }
}

fn default_band_padding() -> f64 {
    0.05
}
