use crate::core::{BarRenderingProps, format_number};
use crate::render::{Color, lerp_color};

/// Values a transition can blend between.
///
/// `t` is eased progress in `[0, 1]`; `t = 0` yields `self`, `t = 1` yields a
/// value equal to `to`.
pub trait Interpolate: Clone {
    #[must_use]
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for (f64, f64) {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        (lerp(self.0, to.0, t), lerp(self.1, to.1, t))
    }
}

/// Pairwise over the common prefix; extra target entries are taken as-is.
impl Interpolate for Vec<f64> {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        to.iter()
            .enumerate()
            .map(|(index, target)| match self.get(index) {
                Some(from) => lerp(*from, *target, t),
                None => *target,
            })
            .collect()
    }
}

impl Interpolate for BarRenderingProps {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            height: lerp(self.height, to.height, t),
            width: lerp(self.width, to.width, t),
        }
    }
}

impl Interpolate for Color {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp_color(*self, *to, t)
    }
}

/// Blends the numbers embedded in two strings, such as SVG path data.
///
/// The target string's text is kept; its n-th number moves from the n-th
/// number of `self` when there is one and stays fixed otherwise.
impl Interpolate for String {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        let from_numbers: Vec<f64> = scan_numbers(self)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Number(value) => Some(value),
                Segment::Text(_) => None,
            })
            .collect();

        let mut out = String::with_capacity(to.len());
        let mut number_index = 0;
        for segment in scan_numbers(to) {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Number(target) => {
                    let value = match from_numbers.get(number_index) {
                        Some(from) => lerp(*from, target, t),
                        None => target,
                    };
                    out.push_str(&format_number(value));
                    number_index += 1;
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    Number(f64),
}

fn scan_numbers(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        match number_end(bytes, index) {
            Some(end) => {
                let parsed = input[index..end].parse::<f64>().ok();
                if let Some(value) = parsed {
                    if text_start < index {
                        segments.push(Segment::Text(&input[text_start..index]));
                    }
                    segments.push(Segment::Number(value));
                    text_start = end;
                }
                index = end;
            }
            None => index += 1,
        }
    }
    if text_start < bytes.len() {
        segments.push(Segment::Text(&input[text_start..]));
    }
    segments
}

/// End of a number literal starting at `start`, if one starts there.
fn number_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut index = start;
    if matches!(bytes.get(index), Some(b'-' | b'+')) {
        index += 1;
    }

    let integer_start = index;
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    let mut digits = index - integer_start;
    if bytes.get(index) == Some(&b'.') {
        let fraction_start = index + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        if fraction_end > fraction_start || digits > 0 {
            digits += fraction_end - fraction_start;
            index = fraction_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        let mut exponent = index + 1;
        if matches!(bytes.get(exponent), Some(b'-' | b'+')) {
            exponent += 1;
        }
        let exponent_digits_start = exponent;
        while bytes.get(exponent).is_some_and(u8::is_ascii_digit) {
            exponent += 1;
        }
        if exponent > exponent_digits_start {
            index = exponent;
        }
    }
    Some(index)
}
