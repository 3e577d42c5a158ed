use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::datum::format_number;

/// Default symbol area in square pixels.
pub const DEFAULT_SYMBOL_SIZE: f64 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    #[default]
    Circle,
    Cross,
    Diamond,
    Line,
    Square,
    Star,
    Triangle,
    Wye,
}

impl SymbolType {
    pub const ALL: [SymbolType; 8] = [
        Self::Circle,
        Self::Cross,
        Self::Diamond,
        Self::Line,
        Self::Square,
        Self::Star,
        Self::Triangle,
        Self::Wye,
    ];

    /// Parses a symbol name; unknown names fall back to `Circle`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Cross => "cross",
            Self::Diamond => "diamond",
            Self::Line => "line",
            Self::Square => "square",
            Self::Star => "star",
            Self::Triangle => "triangle",
            Self::Wye => "wye",
        }
    }
}

/// Accumulates SVG path data using the compact `M x,y L x,y Z` form.
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    data: String,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let _ = write!(self.data, "M{},{}", format_number(x), format_number(y));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let _ = write!(self.data, "L{},{}", format_number(x), format_number(y));
        self
    }

    /// Full circle around the origin starting and ending at `(r, 0)`.
    pub fn circle(&mut self, r: f64) -> &mut Self {
        let r_text = format_number(r);
        let neg_text = format_number(-r);
        let _ = write!(
            self.data,
            "M{r_text},0A{r_text},{r_text},0,1,1,{neg_text},0A{r_text},{r_text},0,1,1,{r_text},0"
        );
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = write!(
            self.data,
            "M{},{}h{}v{}h{}Z",
            format_number(x),
            format_number(y),
            format_number(width),
            format_number(height),
            format_number(-width)
        );
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.data.push('Z');
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.data
    }
}

/// SVG path data for `kind` centred on the origin with area `size`.
#[must_use]
pub fn symbol_path(kind: SymbolType, size: f64) -> String {
    let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
    let mut path = PathBuilder::new();
    match kind {
        SymbolType::Circle => {
            path.circle((size / PI).sqrt());
        }
        SymbolType::Cross => {
            let r = (size / 5.0).sqrt() / 2.0;
            path.move_to(-3.0 * r, -r)
                .line_to(-r, -r)
                .line_to(-r, -3.0 * r)
                .line_to(r, -3.0 * r)
                .line_to(r, -r)
                .line_to(3.0 * r, -r)
                .line_to(3.0 * r, r)
                .line_to(r, r)
                .line_to(r, 3.0 * r)
                .line_to(-r, 3.0 * r)
                .line_to(-r, r)
                .line_to(-3.0 * r, r)
                .close();
        }
        SymbolType::Diamond => {
            let tan30 = (1.0f64 / 3.0).sqrt();
            let y = (size / (tan30 * 2.0)).sqrt();
            let x = y * tan30;
            path.move_to(0.0, -y)
                .line_to(x, 0.0)
                .line_to(0.0, y)
                .line_to(-x, 0.0)
                .close();
        }
        SymbolType::Line => {
            let width = size.sqrt();
            let height = 1.5;
            path.rect(-width / 2.0, -height / 2.0, width, height);
        }
        SymbolType::Square => {
            let width = size.sqrt();
            let x = -width / 2.0;
            path.rect(x, x, width, width);
        }
        SymbolType::Star => {
            let ka = 0.890_813_091_529_285_2;
            let kr = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
            let kx = (TAU / 10.0).sin() * kr;
            let ky = -(TAU / 10.0).cos() * kr;
            let r = (size * ka).sqrt();
            let x = kx * r;
            let y = ky * r;
            path.move_to(0.0, -r).line_to(x, y);
            for i in 1..5 {
                let angle = TAU * f64::from(i) / 5.0;
                let (s, c) = angle.sin_cos();
                path.line_to(s * r, -c * r).line_to(c * x - s * y, s * x + c * y);
            }
            path.close();
        }
        SymbolType::Triangle => {
            let sqrt3 = 3f64.sqrt();
            let y = -(size / (sqrt3 * 3.0)).sqrt();
            path.move_to(0.0, y * 2.0)
                .line_to(-sqrt3 * y, -y)
                .line_to(sqrt3 * y, -y)
                .close();
        }
        SymbolType::Wye => {
            let c = -0.5;
            let s = 3f64.sqrt() / 2.0;
            let k = 1.0 / 12f64.sqrt();
            let a = (k / 2.0 + 1.0) * 3.0;
            let r = (size / a).sqrt();
            let (x0, y0) = (r / 2.0, r * k);
            let (x1, y1) = (x0, r * k + r);
            let (x2, y2) = (-x1, y1);
            path.move_to(x0, y0)
                .line_to(x1, y1)
                .line_to(x2, y2)
                .line_to(c * x0 - s * y0, s * x0 + c * y0)
                .line_to(c * x1 - s * y1, s * x1 + c * y1)
                .line_to(c * x2 - s * y2, s * x2 + c * y2)
                .line_to(c * x0 + s * y0, c * y0 - s * x0)
                .line_to(c * x1 + s * y1, c * y1 - s * x1)
                .line_to(c * x2 + s * y2, c * y2 - s * x2)
                .close();
        }
    }
    path.build()
}

/// Polyline through `points`; empty input yields an empty path.
#[must_use]
pub fn line_path(points: &[(f64, f64)]) -> String {
    let mut path = PathBuilder::new();
    for (index, (x, y)) in points.iter().copied().enumerate() {
        if index == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    path.build()
}

#[cfg(test)]
mod tests {
    use super::{SymbolType, line_path, symbol_path};

    #[test]
    fn square_and_line_are_centred_rectangles() {
        assert_eq!(symbol_path(SymbolType::Square, 64.0), "M-4,-4h8v8h-8Z");
        assert_eq!(symbol_path(SymbolType::Line, 64.0), "M-4,-0.75h8v1.5h-8Z");
    }

    #[test]
    fn circle_uses_two_half_arcs() {
        let r = (64.0 / std::f64::consts::PI).sqrt();
        let expected = format!("M{r},0A{r},{r},0,1,1,{},0A{r},{r},0,1,1,{r},0", -r);
        assert_eq!(symbol_path(SymbolType::Circle, 64.0), expected);
    }

    #[test]
    fn cross_has_twelve_vertices() {
        let path = symbol_path(SymbolType::Cross, 20.0);
        assert!(path.starts_with("M-3,-1L-1,-1L-1,-3"));
        assert_eq!(path.matches('L').count(), 11);
        assert!(path.ends_with('Z'));
    }

    #[test]
    fn every_symbol_produces_closed_geometry() {
        for kind in SymbolType::ALL {
            let path = symbol_path(kind, 64.0);
            assert!(path.starts_with('M'), "{kind:?}");
            if kind != SymbolType::Circle {
                assert!(path.ends_with('Z'), "{kind:?}");
            }
        }
    }

    #[test]
    fn unknown_symbol_names_fall_back_to_circle() {
        assert_eq!(SymbolType::parse("Star"), SymbolType::Star);
        assert_eq!(SymbolType::parse("hexagon"), SymbolType::Circle);
    }

    #[test]
    fn line_path_joins_points() {
        assert_eq!(line_path(&[(0.0, 10.0), (5.0, 2.5)]), "M0,10L5,2.5");
        assert_eq!(line_path(&[]), "");
    }
}
