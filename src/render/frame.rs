use crate::core::{Translate, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Backends paint rects, then paths, then lines, then texts; order inside each
/// list is paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub paths: Vec<PathPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            paths: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: PathPrimitive) -> Self {
        self.paths.push(path);
        self
    }

    /// Appends every primitive of `other`, keeping this frame's viewport.
    pub fn extend(&mut self, other: RenderFrame) {
        self.lines.extend(other.lines);
        self.rects.extend(other.rects);
        self.paths.extend(other.paths);
        self.texts.extend(other.texts);
    }

    /// Shifts every primitive by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Translate) -> Self {
        if offset == Translate::default() {
            return self;
        }
        for line in &mut self.lines {
            line.x1 += offset.x;
            line.x2 += offset.x;
            line.y1 += offset.y;
            line.y2 += offset.y;
        }
        for rect in &mut self.rects {
            rect.x += offset.x;
            rect.y += offset.y;
        }
        for path in &mut self.paths {
            path.translate = path.translate.then(offset);
        }
        for text in &mut self.texts {
            text.x += offset.x;
            text.y += offset.y;
        }
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for path in &self.paths {
            path.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.rects.is_empty()
            && self.paths.is_empty()
            && self.texts.is_empty()
    }

    /// Topmost rect carrying a key that contains the point.
    #[must_use]
    pub fn rect_key_at(&self, x: f64, y: f64) -> Option<&str> {
        self.rects
            .iter()
            .rev()
            .find(|rect| rect.key.is_some() && rect.contains(x, y))
            .and_then(|rect| rect.key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::{Translate, Viewport};
    use crate::render::{Color, RectPrimitive};

    #[test]
    fn translate_moves_rects_and_keeps_topmost_hit() {
        let frame = RenderFrame::new(Viewport::new(100, 100))
            .with_rect(RectPrimitive::new(0.0, 0.0, 10.0, 10.0, Color::BLACK).with_key("under"))
            .with_rect(RectPrimitive::new(5.0, 5.0, 10.0, 10.0, Color::BLACK).with_key("over"))
            .translated(Translate::new(10.0, 0.0));

        assert_eq!(frame.rects[0].x, 10.0);
        assert_eq!(frame.rect_key_at(17.0, 7.0), Some("over"));
        assert_eq!(frame.rect_key_at(11.0, 1.0), Some("under"));
        assert_eq!(frame.rect_key_at(1.0, 1.0), None);
    }
}
