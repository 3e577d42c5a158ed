use std::fmt::Write as _;

use crate::core::format_number;
use crate::error::ChartResult;
use crate::render::{Color, RenderFrame, Renderer, ShapeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
}

/// Renders frames to standalone SVG markup.
///
/// Markup is built as a plain string; the last document is kept until the
/// next `render` call.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    background: Option<Color>,
    document: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: Color) -> ChartResult<Self> {
        color.validate()?;
        self.background = Some(color);
        Ok(self)
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "svg"
    }

    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        let width = frame.viewport.width;
        let height = frame.viewport.height;
        let mut out = String::with_capacity(256 + frame.rects.len() * 96);
        let mut stats = SvgRenderStats::default();

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        if let Some(background) = self.background {
            let _ = write!(
                out,
                r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
                background.to_css()
            );
        }

        for rect in &frame.rects {
            out.push_str("<rect");
            push_attr(&mut out, "x", &format_number(rect.x));
            push_attr(&mut out, "y", &format_number(rect.y));
            push_attr(&mut out, "width", &format_number(rect.width));
            push_attr(&mut out, "height", &format_number(rect.height));
            push_attr(&mut out, "fill", &rect.style.fill.unwrap_or(rect.fill_color).to_css());
            push_stroke(&mut out, rect.style);
            push_optional(&mut out, "class", rect.class_name.as_deref());
            push_optional(&mut out, "data-key", rect.key.as_deref());
            out.push_str("/>");
            stats.rects_drawn += 1;
        }

        for path in &frame.paths {
            out.push_str("<path");
            push_attr(&mut out, "d", &path.d);
            let fill = path.style.fill.or(path.fill);
            push_attr(
                &mut out,
                "fill",
                &fill.map_or_else(|| "none".to_owned(), Color::to_css),
            );
            push_stroke(&mut out, path.style);
            if path.translate.x != 0.0 || path.translate.y != 0.0 {
                push_attr(
                    &mut out,
                    "transform",
                    &format!(
                        "translate({}, {})",
                        format_number(path.translate.x),
                        format_number(path.translate.y)
                    ),
                );
            }
            push_optional(&mut out, "class", path.class_name.as_deref());
            push_optional(&mut out, "data-key", path.key.as_deref());
            out.push_str("/>");
            stats.paths_drawn += 1;
        }

        for line in &frame.lines {
            out.push_str("<line");
            push_attr(&mut out, "x1", &format_number(line.x1));
            push_attr(&mut out, "y1", &format_number(line.y1));
            push_attr(&mut out, "x2", &format_number(line.x2));
            push_attr(&mut out, "y2", &format_number(line.y2));
            push_attr(&mut out, "stroke", &line.color.to_css());
            push_attr(&mut out, "stroke-width", &format_number(line.stroke_width));
            out.push_str("/>");
            stats.lines_drawn += 1;
        }

        for text in &frame.texts {
            out.push_str("<text");
            push_attr(&mut out, "x", &format_number(text.x));
            push_attr(&mut out, "y", &format_number(text.y));
            push_attr(&mut out, "font-size", &format_number(text.font_size_px));
            push_attr(&mut out, "fill", &text.color.to_css());
            push_attr(&mut out, "text-anchor", text.h_align.svg_anchor());
            if text.rotation_deg != 0.0 {
                push_attr(
                    &mut out,
                    "transform",
                    &format!(
                        "rotate({} {} {})",
                        format_number(text.rotation_deg),
                        format_number(text.x),
                        format_number(text.y)
                    ),
                );
            }
            push_optional(&mut out, "class", text.class_name.as_deref());
            out.push('>');
            out.push_str(&escape_xml(&text.text));
            out.push_str("</text>");
            stats.texts_drawn += 1;
        }

        out.push_str("</svg>");
        self.document = out;
        self.last_stats = stats;
        Ok(())
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, r#" {name}="{}""#, escape_xml(value));
}

fn push_optional(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        push_attr(out, name, value);
    }
}

fn push_stroke(out: &mut String, style: ShapeStyle) {
    if let Some(stroke) = style.stroke {
        push_attr(out, "stroke", &stroke.to_css());
    }
    if let Some(width) = style.stroke_width {
        push_attr(out, "stroke-width", &format_number(width));
    }
    if let Some(opacity) = style.opacity {
        push_attr(out, "opacity", &format_number(opacity));
    }
}

/// Escapes the five XML special characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
