use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer, SvgRenderStats};

/// Headless backend: validates frames and counts what would be drawn.
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames_rendered: usize,
    last_stats: SvgRenderStats,
    last_keys: Vec<String>,
}

impl NullRenderer {
    #[must_use]
    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    /// Datum keys of the last frame's rects and paths, in paint order.
    #[must_use]
    pub fn last_keys(&self) -> &[String] {
        &self.last_keys
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_stats = SvgRenderStats {
            lines_drawn: frame.lines.len(),
            rects_drawn: frame.rects.len(),
            paths_drawn: frame.paths.len(),
            texts_drawn: frame.texts.len(),
        };
        self.last_keys = frame
            .rects
            .iter()
            .filter_map(|rect| rect.key.clone())
            .chain(frame.paths.iter().filter_map(|path| path.key.clone()))
            .collect();
        Ok(())
    }
}
