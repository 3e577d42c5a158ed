pub(crate) fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    // Keep this estimate deterministic and backend-independent.
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            'i' | 'l' | 'j' | '\'' | '|' => 0.28,
            'm' | 'w' | 'M' | 'W' => 0.86,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Rotates `(x, y)` clockwise by `degrees` around the origin, as SVG `rotate()` does.
///
/// Quarter turns are exact so axis labels land on whole pixels.
pub(crate) fn rotate_point(x: f64, y: f64, degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (x, y)
    } else if normalized == 90.0 {
        (-y, x)
    } else if normalized == 180.0 {
        (-x, -y)
    } else if normalized == 270.0 {
        (y, -x)
    } else {
        let (sin, cos) = normalized.to_radians().sin_cos();
        (x * cos - y * sin, x * sin + y * cos)
    }
}
