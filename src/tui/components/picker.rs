//! # Picker Component
//!
//! Centered list overlay used for choosing a model (Ctrl+P) or a prompt
//! template (Ctrl+T).
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `PickerState` lives in `TuiState` while the overlay is open
//! - `Picker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};

use crate::core::params::Model;
use crate::core::templates::Template;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

/// What the open picker is choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Model,
    Template,
}

/// One selectable row.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerItem {
    pub label: String,
    pub detail: Option<String>,
    /// Marks the currently active choice (e.g. the selected model)
    pub active: bool,
}

/// Persistent state for the picker overlay.
pub struct PickerState {
    pub kind: PickerKind,
    pub items: Vec<PickerItem>,
    pub selected: usize,
    pub list_state: ListState,
}

impl PickerState {
    pub fn new(kind: PickerKind, items: Vec<PickerItem>, selected: usize) -> Self {
        let selected = selected.min(items.len().saturating_sub(1));
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(selected));
        }
        Self {
            kind,
            items,
            selected,
            list_state,
        }
    }

    /// Model picker with the active model preselected.
    pub fn models(current: Model) -> Self {
        let items = Model::ALL
            .iter()
            .map(|m| PickerItem {
                label: m.display_name().to_string(),
                detail: Some(m.slug().to_string()),
                active: *m == current,
            })
            .collect();
        Self::new(PickerKind::Model, items, current.index())
    }

    pub fn templates(templates: &[Template]) -> Self {
        let items = templates
            .iter()
            .map(|t| PickerItem {
                label: t.name.to_string(),
                detail: t.prompt.lines().next().map(str::to_string),
                active: false,
            })
            .collect();
        Self::new(PickerKind::Template, items, 0)
    }

    fn title(&self) -> &'static str {
        match self.kind {
            PickerKind::Model => " Models ",
            PickerKind::Template => " Templates ",
        }
    }
}

/// Events emitted by the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// Index into the items the picker was built from.
    Select(usize),
    Dismiss,
}

impl EventHandler for PickerState {
    type Event = PickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PickerEvent> {
        match event {
            TuiEvent::Escape => Some(PickerEvent::Dismiss),
            TuiEvent::CursorUp => {
                if !self.items.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if !self.items.is_empty() {
                    self.selected = (self.selected + 1).min(self.items.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => {
                (self.selected < self.items.len()).then_some(PickerEvent::Select(self.selected))
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the picker overlay.
pub struct Picker<'a> {
    state: &'a mut PickerState,
    palette: &'a Palette,
}

impl<'a> Picker<'a> {
    pub fn new(state: &'a mut PickerState, palette: &'a Palette) -> Self {
        Self { state, palette }
    }
}

impl<'a> Component for Picker<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.dim())
            .style(self.palette.base())
            .title(self.state.title())
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Select  Esc Back ").centered())
            .padding(Padding::horizontal(1));

        let inner_width = overlay.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .state
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.state.selected {
                    self.palette.highlight()
                } else if item.active {
                    self.palette.base().fg(self.palette.accent)
                } else {
                    self.palette.base()
                };
                let marker = if item.active { "* " } else { "  " };
                let mut spans = vec![Span::styled(format!("{marker}{}", item.label), style)];
                if let Some(detail) = &item.detail {
                    let used = item.label.chars().count() + 4;
                    let detail = truncate_str(detail, inner_width.saturating_sub(used));
                    let detail_style = if i == self.state.selected {
                        style
                    } else {
                        self.palette.dim()
                    };
                    spans.push(Span::styled(format!("  {detail}"), detail_style));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
