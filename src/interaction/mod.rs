use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEventKind {
    Click,
    MouseOver,
    MouseMove,
    MouseLeave,
}

/// Pointer event resolved against a datum, handed back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub kind: PointerEventKind,
    pub key: String,
    pub x: f64,
    pub y: f64,
}

/// How pointer input feeds back into focus and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionBehavior {
    /// Hovering a datum focuses it; leaving clears focus.
    pub focus_on_hover: bool,
    /// Clicking a datum toggles its selection.
    pub toggle_on_click: bool,
}

impl Default for InteractionBehavior {
    fn default() -> Self {
        Self {
            focus_on_hover: true,
            toggle_on_click: true,
        }
    }
}

/// Selection set, focused datum and hover tracking for one chart.
///
/// Selection keeps insertion order: later selections render above earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    behavior: InteractionBehavior,
    selection: IndexSet<String>,
    focus: Option<String>,
    hovered: Option<String>,
}

impl InteractionState {
    #[must_use]
    pub fn new(behavior: InteractionBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn behavior(&self) -> InteractionBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: InteractionBehavior) {
        self.behavior = behavior;
    }

    #[must_use]
    pub fn selection(&self) -> &IndexSet<String> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.contains(key)
    }

    /// Position of `key` in selection order.
    #[must_use]
    pub fn selection_index(&self, key: &str) -> Option<usize> {
        self.selection.get_index_of(key)
    }

    /// Adds `key`; returns `false` when it was already selected.
    pub fn select(&mut self, key: impl Into<String>) -> bool {
        self.selection.insert(key.into())
    }

    /// Removes `key`, keeping the order of the remaining selection.
    pub fn deselect(&mut self, key: &str) -> bool {
        self.selection.shift_remove(key)
    }

    /// Selects `key` when unselected, deselects it otherwise.
    ///
    /// Returns whether the key is selected afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.deselect(key) {
            false
        } else {
            self.select(key);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_selection<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = keys.into_iter().map(Into::into).collect();
    }

    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn set_focus(&mut self, key: Option<String>) {
        self.focus = key;
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Indices of `keys` in paint order: unselected first in input order, then
    /// selected in selection order.
    #[must_use]
    pub fn render_order<S: AsRef<str>>(&self, keys: &[S]) -> Vec<usize> {
        render_order(&self.selection, keys)
    }

    /// Tracks the datum under the pointer and reports leave/over/move events.
    pub fn on_pointer_move(&mut self, hit: Option<&str>, x: f64, y: f64) -> Vec<InteractionEvent> {
        let mut events = Vec::with_capacity(2);
        if self.hovered.as_deref() != hit {
            if let Some(previous) = self.hovered.take() {
                events.push(event(PointerEventKind::MouseLeave, previous, x, y));
            }
            if let Some(key) = hit {
                events.push(event(PointerEventKind::MouseOver, key.to_owned(), x, y));
            }
            self.hovered = hit.map(str::to_owned);
            if self.behavior.focus_on_hover {
                self.focus = self.hovered.clone();
            }
        }
        if let Some(key) = hit {
            events.push(event(PointerEventKind::MouseMove, key.to_owned(), x, y));
        }
        trace!(hovered = ?self.hovered, events = events.len(), "pointer move");
        events
    }

    /// Pointer left the chart entirely.
    pub fn on_pointer_leave(&mut self, x: f64, y: f64) -> Option<InteractionEvent> {
        let previous = self.hovered.take()?;
        if self.behavior.focus_on_hover {
            self.focus = None;
        }
        Some(event(PointerEventKind::MouseLeave, previous, x, y))
    }

    pub fn on_click(&mut self, hit: Option<&str>, x: f64, y: f64) -> Option<InteractionEvent> {
        let key = hit?;
        if self.behavior.toggle_on_click {
            let selected = self.toggle(key);
            trace!(key, selected, "click toggled selection");
        }
        Some(event(PointerEventKind::Click, key.to_owned(), x, y))
    }
}

fn event(kind: PointerEventKind, key: String, x: f64, y: f64) -> InteractionEvent {
    InteractionEvent { kind, key, x, y }
}

/// Stable paint order: keys absent from `selection` first, then by selection index.
#[must_use]
pub fn render_order<S: AsRef<str>>(selection: &IndexSet<String>, keys: &[S]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by_key(|&index| {
        selection
            .get_index_of(keys[index].as_ref())
            .map_or(0, |position| position + 1)
    });
    order
}

#[cfg(test)]
mod tests {
    use super::{InteractionBehavior, InteractionState, PointerEventKind};

    #[test]
    fn render_order_puts_selection_last_in_selection_order() {
        let mut state = InteractionState::default();
        state.select("c");
        state.select("a");
        let order = state.render_order(&["a", "b", "c", "d"]);
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut state = InteractionState::default();
        state.select("x");
        let before = state.clone();
        assert!(state.toggle("y"));
        assert!(!state.toggle("y"));
        assert_eq!(state, before);
    }

    #[test]
    fn hover_reports_leave_then_over() {
        let mut state = InteractionState::default();
        let events = state.on_pointer_move(Some("a"), 1.0, 1.0);
        let kinds: Vec<_> = events.iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![PointerEventKind::MouseOver, PointerEventKind::MouseMove]);
        assert_eq!(state.focus(), Some("a"));

        let events = state.on_pointer_move(Some("b"), 2.0, 1.0);
        assert_eq!(events[0].kind, PointerEventKind::MouseLeave);
        assert_eq!(events[0].key, "a");
        assert_eq!(events[1].kind, PointerEventKind::MouseOver);
        assert_eq!(state.focus(), Some("b"));

        let leave = state.on_pointer_leave(3.0, 1.0).expect("leave event");
        assert_eq!(leave.key, "b");
        assert_eq!(state.focus(), None);
        assert!(state.on_pointer_leave(3.0, 1.0).is_none());
    }

    #[test]
    fn click_without_toggle_behavior_keeps_selection() {
        let mut state = InteractionState::new(InteractionBehavior {
            focus_on_hover: false,
            toggle_on_click: false,
        });
        let event = state.on_click(Some("a"), 0.0, 0.0).expect("click");
        assert_eq!(event.kind, PointerEventKind::Click);
        assert!(!state.is_selected("a"));
        assert!(state.on_click(None, 0.0, 0.0).is_none());
    }
}
