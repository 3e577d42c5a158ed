use serde::{Deserialize, Serialize};

use crate::api::layout_helpers::estimate_label_text_width_px;
use crate::api::shape::{Symbol, SymbolProps};
use crate::core::{SymbolType, Translate, Viewport};
use crate::error::ChartResult;
use crate::render::{Color, RenderFrame, TextHAlign, TextPrimitive};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub color: Color,
    #[serde(default)]
    pub symbol_type: SymbolType,
}

impl LegendItem {
    #[must_use]
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            symbol_type: SymbolType::Square,
        }
    }

    #[must_use]
    pub fn with_symbol_type(mut self, symbol_type: SymbolType) -> Self {
        self.symbol_type = symbol_type;
        self
    }
}

/// Vertical list of symbol + label rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub items: Vec<LegendItem>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default = "default_legend_symbol_size")]
    pub symbol_size: f64,
    #[serde(default = "default_legend_font_size")]
    pub font_size_px: f64,
}

impl Legend {
    #[must_use]
    pub fn new(items: Vec<LegendItem>) -> Self {
        Self {
            items,
            title: None,
            row_height: default_row_height(),
            symbol_size: default_legend_symbol_size(),
            font_size_px: default_legend_font_size(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn label_offset(&self) -> f64 {
        self.symbol_size.sqrt() + 8.0
    }

    /// Estimated width of the widest row.
    #[must_use]
    pub fn width(&self) -> f64 {
        let widest = self
            .items
            .iter()
            .map(|item| estimate_label_text_width_px(&item.label, self.font_size_px))
            .chain(self.title.iter().map(|title| {
                estimate_label_text_width_px(title, self.font_size_px) - self.label_offset()
            }))
            .fold(0.0_f64, f64::max);
        self.label_offset() + widest
    }

    /// Rows laid out downward from `origin`.
    pub fn build_frame(&self, viewport: Viewport, origin: Translate) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(viewport);
        let half_symbol = self.symbol_size.sqrt() / 2.0;
        let mut row_top = 0.0;

        if let Some(title) = self.title.as_deref().filter(|title| !title.is_empty()) {
            frame.texts.push(
                TextPrimitive::new(
                    title,
                    0.0,
                    self.row_height / 2.0 + 0.32 * self.font_size_px,
                    self.font_size_px,
                    Color::BLACK,
                    TextHAlign::Left,
                )
                .with_class("legend-title"),
            );
            row_top += self.row_height;
        }

        for item in &self.items {
            let center_y = row_top + self.row_height / 2.0;
            let symbol = Symbol::new(
                SymbolProps::default()
                    .with_symbol_type(item.symbol_type)
                    .with_size(self.symbol_size)
                    .with_fill(item.color)
                    .with_translate(Translate::new(half_symbol, center_y))
                    .with_key(item.label.clone()),
            )?;
            frame.paths.push(symbol.to_primitive());
            frame.texts.push(
                TextPrimitive::new(
                    item.label.clone(),
                    self.label_offset(),
                    center_y + 0.32 * self.font_size_px,
                    self.font_size_px,
                    Color::BLACK,
                    TextHAlign::Left,
                )
                .with_class("legend-label"),
            );
            row_top += self.row_height;
        }

        Ok(frame.translated(origin))
    }
}

fn default_row_height() -> f64 {
    20.0
}

fn default_legend_symbol_size() -> f64 {
    100.0
}

fn default_legend_font_size() -> f64 {
    12.0
}
