use smallvec::SmallVec;

/// Tick values for one axis; most axes stay well under 16 ticks.
pub type TickValues = SmallVec<[f64; 16]>;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

fn step_multiplier(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Signed tick increment: positive values are the step itself, negative values
/// encode `-1 / step` so sub-unit steps stay exact.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let multiplier = step_multiplier(error);
    if power >= 0.0 {
        multiplier * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / multiplier
    }
}

/// Absolute tick spacing between `start` and `stop` for roughly `count` ticks.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let step0 = (stop - start).abs() / count as f64;
    let mut step1 = 10f64.powf(step0.log10().floor());
    step1 *= step_multiplier(step0 / step1);
    if stop < start { -step1 } else { step1 }
}

/// Evenly spaced, human-friendly values covering `[start, stop]`.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> TickValues {
    let mut values = TickValues::new();
    if !start.is_finite() || !stop.is_finite() {
        return values;
    }
    if start == stop && count > 0 {
        values.push(start);
        return values;
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let step = tick_increment(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return values;
    }

    if step > 0.0 {
        let first = (lo / step).ceil();
        let last = (hi / step).floor();
        let n = (last - first + 1.0).ceil().max(0.0) as usize;
        values.extend((0..n).map(|i| (first + i as f64) * step));
    } else {
        let first = (lo * step).floor();
        let last = (hi * step).ceil();
        let n = (first - last + 1.0).ceil().max(0.0) as usize;
        values.extend((0..n).map(|i| (first - i as f64) / step));
    }

    if reverse {
        values.reverse();
    }
    values
}

/// Extends `[start, stop]` outward to round tick boundaries.
#[must_use]
pub fn nice_extent(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let reverse = stop < start;
    let (mut lo, mut hi) = if reverse { (stop, start) } else { (start, stop) };

    let mut step = tick_increment(lo, hi, count);
    for _ in 0..2 {
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        step = tick_increment(lo, hi, count);
    }

    if reverse { (hi, lo) } else { (lo, hi) }
}

/// Formats a tick with as many decimals as its step needs and `,` grouping.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let step = step.abs();
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let value = if value == 0.0 { 0.0 } else { value };
    let fixed = format!("{value:.decimals$}");
    group_thousands(&fixed)
}

fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::from(sign);
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_tick, nice_extent, tick_step, ticks};

    #[test]
    fn ticks_cover_unit_interval_in_tenths() {
        let values = ticks(0.0, 1.0, 10);
        assert_eq!(values.len(), 11);
        assert!((values[3] - 0.3).abs() <= 1e-12);
        assert_eq!(values[10], 1.0);
    }

    #[test]
    fn ticks_pick_round_steps() {
        assert_eq!(ticks(0.0, 100.0, 5).as_slice(), &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(ticks(100.0, 900.0, 4).as_slice(), &[200.0, 400.0, 600.0, 800.0]);
    }

    #[test]
    fn reversed_domains_produce_descending_ticks() {
        assert_eq!(ticks(10.0, 0.0, 2).as_slice(), &[10.0, 5.0, 0.0]);
    }

    #[test]
    fn nice_extent_rounds_outward() {
        assert_eq!(nice_extent(0.13, 0.97, 10), (0.1, 1.0));
        assert_eq!(nice_extent(103.0, 887.0, 10), (100.0, 900.0));
    }

    #[test]
    fn tick_format_uses_step_precision_and_grouping() {
        assert_eq!(format_tick(1500.0, 500.0), "1,500");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-1234567.0, 1.0), "-1,234,567");
        assert_eq!(format_tick(-0.0, 1.0), "0");
        assert!((tick_step(0.0, 1.0, 10) - 0.1).abs() <= 1e-12);
    }
}
