use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::api::layout_helpers::estimate_label_text_width_px;
use crate::core::{DataAccessor, Translate, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, RectPrimitive, RenderFrame, ShapeStyle, TextHAlign, TextPrimitive,
};

/// Indent per hierarchy level in hierarchical menus.
pub const HIERARCHY_INDENT_PX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub level: usize,
}

impl SelectOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            level: 0,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Reads options out of arbitrary records.
    pub fn from_records(
        records: &[Value],
        label: &DataAccessor,
        value: &DataAccessor,
    ) -> ChartResult<Vec<Self>> {
        records
            .iter()
            .map(|record| {
                Ok(Self::new(
                    label.require(record)?.category_key(),
                    value.require(record)?.category_key(),
                ))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectProps {
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub multi: bool,
    /// Opens the menu above the control instead of below.
    #[serde(default)]
    pub menu_upward: bool,
    /// Width of the outer wrapper; the menu still sizes to its labels.
    #[serde(default)]
    pub width: Option<f64>,
    /// Pixels added to the widest label to size the menu.
    #[serde(default = "default_width_pad")]
    pub width_pad: f64,
    #[serde(default)]
    pub hierarchical: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size_px: f64,
    #[serde(default = "default_row_height")]
    pub option_height: f64,
    #[serde(default = "default_control_height")]
    pub control_height: f64,
    #[serde(default = "default_menu_max_height")]
    pub menu_max_height: f64,
}

impl SelectProps {
    #[must_use]
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            multi: false,
            menu_upward: false,
            width: None,
            width_pad: default_width_pad(),
            hierarchical: false,
            placeholder: None,
            font_size_px: default_font_size(),
            option_height: default_row_height(),
            control_height: default_control_height(),
            menu_max_height: default_menu_max_height(),
        }
    }

    #[must_use]
    pub fn with_multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    #[must_use]
    pub fn with_menu_upward(mut self, menu_upward: bool) -> Self {
        self.menu_upward = menu_upward;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_width_pad(mut self, width_pad: f64) -> Self {
        self.width_pad = width_pad;
        self
    }

    #[must_use]
    pub fn with_hierarchical(mut self, hierarchical: bool) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("width_pad", self.width_pad),
            ("font_size_px", self.font_size_px),
            ("option_height", self.option_height),
            ("control_height", self.control_height),
            ("menu_max_height", self.menu_max_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "select {name} must be finite and >= 0"
                )));
            }
        }
        if let Some(width) = self.width {
            if !width.is_finite() || width <= 0.0 {
                return Err(ChartError::InvalidData(
                    "select width must be finite and > 0".to_owned(),
                ));
            }
        }
        let mut seen = IndexSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.value.as_str()) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate select option value `{}`",
                    option.value
                )));
            }
        }
        Ok(())
    }

    fn menu_key(&self) -> (&[SelectOption], u64, bool, bool) {
        (
            &self.options,
            self.width_pad.to_bits(),
            self.hierarchical,
            self.menu_upward,
        )
    }
}

fn default_width_pad() -> f64 {
    60.0
}

fn default_font_size() -> f64 {
    12.0
}

fn default_row_height() -> f64 {
    28.0
}

fn default_control_height() -> f64 {
    34.0
}

fn default_menu_max_height() -> f64 {
    198.0
}

/// Resolved sizes of the select control and its menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectLayout {
    pub menu_width: f64,
    pub wrapper_width: Option<f64>,
    pub menu_upward: bool,
}

impl SelectLayout {
    /// Width of the control box.
    #[must_use]
    pub fn control_width(self) -> f64 {
        self.wrapper_width.unwrap_or(self.menu_width)
    }
}

/// Estimated width of the widest option label, hierarchy indent included.
#[must_use]
pub fn widest_label_width(options: &[SelectOption], hierarchical: bool, font_size_px: f64) -> f64 {
    options
        .iter()
        .map(|option| {
            let indent = if hierarchical {
                option.level as f64 * HIERARCHY_INDENT_PX
            } else {
                0.0
            };
            estimate_label_text_width_px(&option.label, font_size_px) + indent
        })
        .fold(0.0, f64::max)
}

/// Searchable single or multi value dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    props: SelectProps,
    value: IndexSet<String>,
    search: String,
    open: bool,
    layout: SelectLayout,
    layout_revision: u64,
}

impl Select {
    pub fn new(props: SelectProps) -> ChartResult<Self> {
        props.validate()?;
        let layout = compute_layout(&props);
        Ok(Self {
            props,
            value: IndexSet::new(),
            search: String::new(),
            open: false,
            layout,
            layout_revision: 1,
        })
    }

    #[must_use]
    pub fn props(&self) -> &SelectProps {
        &self.props
    }

    /// Replaces props, keeping selected values that still exist.
    ///
    /// The menu layout is only recomputed when options, width pad, hierarchy
    /// or direction change; the wrapper width only when `width` changes.
    pub fn set_props(&mut self, props: SelectProps) -> ChartResult<bool> {
        props.validate()?;
        let relayout = props.menu_key() != self.props.menu_key()
            || props.font_size_px != self.props.font_size_px;
        if relayout {
            self.layout = compute_layout(&props);
            self.layout_revision += 1;
            trace!(menu_width = self.layout.menu_width, "select menu relaid out");
        } else if props.width != self.props.width {
            self.layout.wrapper_width = props.width;
        }

        self.value
            .retain(|value| props.options.iter().any(|option| option.value == *value));
        if !props.multi && self.value.len() > 1 {
            self.value.truncate(1);
        }
        self.props = props;
        Ok(relayout)
    }

    #[must_use]
    pub fn layout(&self) -> SelectLayout {
        self.layout
    }

    /// Bumped each time the menu layout is recomputed.
    #[must_use]
    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        match &self.props.placeholder {
            Some(placeholder) if !placeholder.is_empty() => placeholder,
            _ if self.props.multi => "Add/Remove...",
            _ => "Select...",
        }
    }

    /// Single-select value; `None` is the reset state.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.first().map(String::as_str)
    }

    /// All selected values in selection order; empty is the reset state.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.value.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.value.contains(value)
    }

    fn option(&self, value: &str) -> ChartResult<&SelectOption> {
        self.props
            .options
            .iter()
            .find(|option| option.value == value)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown select option `{value}`")))
    }

    /// Selects `value`; single mode replaces the value and closes the menu.
    pub fn select(&mut self, value: &str) -> ChartResult<bool> {
        self.option(value)?;
        let changed = if self.props.multi {
            self.value.insert(value.to_owned())
        } else {
            let changed = self.value() != Some(value);
            self.value.clear();
            self.value.insert(value.to_owned());
            self.open = false;
            changed
        };
        self.search.clear();
        debug!(value, changed, multi = self.props.multi, "select value");
        Ok(changed)
    }

    pub fn deselect(&mut self, value: &str) -> bool {
        self.value.shift_remove(value)
    }

    /// Flips `value`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, value: &str) -> ChartResult<bool> {
        if self.is_selected(value) {
            self.deselect(value);
            Ok(false)
        } else {
            self.select(value)?;
            Ok(true)
        }
    }

    /// Back to the reset value.
    pub fn clear(&mut self) {
        self.value.clear();
        self.search.clear();
    }

    /// Multi selects show a clear control once something is selected.
    #[must_use]
    pub fn is_clearable(&self) -> bool {
        self.props.multi && !self.value.is_empty()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        if !self.search.is_empty() {
            self.open = true;
        }
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.search.clear();
    }

    /// Options matching the search text, case-insensitively.
    ///
    /// Multi selects leave already selected options out of the menu.
    #[must_use]
    pub fn filtered_options(&self) -> Vec<&SelectOption> {
        let needle = self.search.trim().to_lowercase();
        self.props
            .options
            .iter()
            .filter(|option| !(self.props.multi && self.value.contains(&option.value)))
            .filter(|option| needle.is_empty() || option.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Text shown in the control when no chips are drawn.
    #[must_use]
    pub fn display_text(&self) -> String {
        if !self.search.is_empty() {
            return self.search.clone();
        }
        match (self.props.multi, self.value()) {
            (false, Some(value)) => self
                .option(value)
                .map(|option| option.label.clone())
                .unwrap_or_else(|_| value.to_owned()),
            _ if self.value.is_empty() => self.placeholder().to_owned(),
            _ => String::new(),
        }
    }

    /// Control, value chips and, when open, the option menu at `origin`.
    pub fn build_frame(&self, viewport: Viewport, origin: Translate) -> ChartResult<RenderFrame> {
        let props = &self.props;
        let border = ShapeStyle::stroked(Color::from_rgb8(0xcc, 0xcc, 0xcc), 1.0);
        let text_color = Color::from_rgb8(0x33, 0x33, 0x33);
        let muted = Color::from_rgb8(0xaa, 0xaa, 0xaa);
        let control_width = self.layout.control_width();
        let baseline = props.control_height / 2.0 + 0.32 * props.font_size_px;

        let mut frame = RenderFrame::new(viewport).with_rect(
            RectPrimitive::new(
                0.0,
                0.0,
                control_width,
                props.control_height,
                Color::rgb(1.0, 1.0, 1.0),
            )
            .with_style(border)
            .with_class("select-control"),
        );

        let mut cursor = 10.0;
        if props.multi && self.search.is_empty() {
            for value in &self.value {
                let label = self.option(value).map(|option| option.label.as_str())?;
                let width = estimate_label_text_width_px(label, props.font_size_px) + 22.0;
                frame.rects.push(
                    RectPrimitive::new(
                        cursor - 5.0,
                        5.0,
                        width,
                        props.control_height - 10.0,
                        Color::from_rgb8(0xeb, 0xf5, 0xff),
                    )
                    .with_style(ShapeStyle::stroked(Color::from_rgb8(0xc2, 0xe0, 0xff), 1.0))
                    .with_class("select-value")
                    .with_key(value.clone()),
                );
                frame.texts.push(
                    TextPrimitive::new(
                        format!("{label} \u{d7}"),
                        cursor,
                        baseline,
                        props.font_size_px,
                        text_color,
                        TextHAlign::Left,
                    )
                    .with_class("select-value-label"),
                );
                cursor += width + 5.0;
            }
        }

        let text = self.display_text();
        if !text.is_empty() {
            let color = if self.value.is_empty() && self.search.is_empty() {
                muted
            } else {
                text_color
            };
            frame.texts.push(
                TextPrimitive::new(
                    text,
                    cursor,
                    baseline,
                    props.font_size_px,
                    color,
                    TextHAlign::Left,
                )
                .with_class("select-placeholder"),
            );
        }
        if self.is_clearable() {
            frame.texts.push(
                TextPrimitive::new(
                    "\u{d7}",
                    control_width - 24.0,
                    baseline,
                    props.font_size_px + 4.0,
                    muted,
                    TextHAlign::Center,
                )
                .with_class("select-clear"),
            );
        }

        if self.open {
            self.push_menu(&mut frame, text_color);
        }
        Ok(frame.translated(origin))
    }

    fn push_menu(&self, frame: &mut RenderFrame, text_color: Color) {
        let props = &self.props;
        let options = self.filtered_options();
        let rows = if options.is_empty() { 1 } else { options.len() };
        let menu_height = (rows as f64 * props.option_height).min(props.menu_max_height);
        let top = if self.layout.menu_upward {
            -menu_height
        } else {
            props.control_height
        };
        let row_baseline = props.option_height / 2.0 + 0.32 * props.font_size_px;
        let white = Color::rgb(1.0, 1.0, 1.0);

        frame.rects.push(
            RectPrimitive::new(0.0, top, self.layout.menu_width, menu_height, white)
                .with_style(ShapeStyle::stroked(Color::from_rgb8(0xcc, 0xcc, 0xcc), 1.0))
                .with_class("select-menu"),
        );

        if options.is_empty() {
            frame.texts.push(
                TextPrimitive::new(
                    "No results found",
                    10.0,
                    top + row_baseline,
                    props.font_size_px,
                    text_color,
                    TextHAlign::Left,
                )
                .with_class("select-noresults"),
            );
            return;
        }

        let visible = (props.menu_max_height / props.option_height).floor().max(1.0) as usize;
        for (row, option) in options.iter().take(visible).enumerate() {
            let row_top = top + row as f64 * props.option_height;
            let indent = if props.hierarchical {
                option.level as f64 * HIERARCHY_INDENT_PX
            } else {
                0.0
            };
            let mut row_rect =
                RectPrimitive::new(0.0, row_top, self.layout.menu_width, props.option_height, white)
                    .with_class("select-option")
                    .with_key(option.value.clone());
            if self.is_selected(&option.value) {
                row_rect.fill_color = Color::from_rgb8(0xf5, 0xfa, 0xff);
                row_rect.class_name = Some("select-option selected".to_owned());
            }
            frame.rects.push(row_rect);
            frame.texts.push(
                TextPrimitive::new(
                    option.label.clone(),
                    10.0 + indent,
                    row_top + row_baseline,
                    props.font_size_px,
                    text_color,
                    TextHAlign::Left,
                )
                .with_class("select-option-label"),
            );
        }
    }
}

fn compute_layout(props: &SelectProps) -> SelectLayout {
    let widest = widest_label_width(&props.options, props.hierarchical, props.font_size_px);
    let menu_width = widest + props.width_pad;
    SelectLayout {
        menu_width,
        wrapper_width: props.width,
        menu_upward: props.menu_upward,
    }
}

#[cfg(test)]
mod tests {
    use super::{Select, SelectOption, SelectProps};

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("Brazil", "BRA"),
            SelectOption::new("Russia", "RUS"),
            SelectOption::new("India", "IND"),
        ]
    }

    #[test]
    fn placeholders_follow_mode() {
        let single = Select::new(SelectProps::new(options())).expect("select");
        assert_eq!(single.placeholder(), "Select...");
        let multi = Select::new(SelectProps::new(options()).with_multi(true)).expect("select");
        assert_eq!(multi.placeholder(), "Add/Remove...");
    }

    #[test]
    fn single_select_replaces_value() {
        let mut select = Select::new(SelectProps::new(options())).expect("select");
        select.open();
        assert!(select.select("BRA").expect("select"));
        assert!(!select.is_open());
        select.select("IND").expect("select");
        assert_eq!(select.values(), vec!["IND"]);
        assert!(select.select("XXX").is_err());
        select.clear();
        assert_eq!(select.value(), None);
    }

    #[test]
    fn multi_menu_hides_selected_and_filters() {
        let mut select =
            Select::new(SelectProps::new(options()).with_multi(true)).expect("select");
        select.select("RUS").expect("select");
        select.set_search("I");
        let labels: Vec<&str> = select
            .filtered_options()
            .iter()
            .map(|option| option.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Brazil", "India"]);
        assert!(select.is_clearable());
    }

    #[test]
    fn layout_is_memoized_on_menu_inputs() {
        let mut select = Select::new(SelectProps::new(options())).expect("select");
        let revision = select.layout_revision();
        assert!(!select.set_props(SelectProps::new(options()).with_width(300.0)).expect("props"));
        assert_eq!(select.layout_revision(), revision);
        assert_eq!(select.layout().control_width(), 300.0);
        assert!(select.set_props(SelectProps::new(options()).with_width_pad(80.0)).expect("props"));
        assert_eq!(select.layout_revision(), revision + 1);
    }
}
