//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the conversation (props).
//!
//! Because the conversation is append-only, cached heights for existing
//! messages stay valid until the width changes; each frame only measures
//! the new tail.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Modifier;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{Conversation, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageCard;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

const SPINNER: [&str; 4] = ["·  ", "·· ", "···", " ··"];
/// Height of the "assistant is typing" placeholder card.
const PENDING_HEIGHT: u16 = 3;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Currently selected message index (click or keyboard navigation)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::default(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Scroll so the selected message is fully visible.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        let Some(&item_bottom) = self.layout.prefix_heights.get(idx) else {
            return;
        };
        let item_top = if idx == 0 { 0 } else { self.layout.prefix_heights[idx - 1] };
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }

    /// Move the selection by `delta`, starting from the last message if
    /// nothing is selected.
    pub fn move_selection(&mut self, delta: isize, message_count: usize) {
        if message_count == 0 {
            self.selected_index = None;
            return;
        }
        let last = message_count - 1;
        let next = match self.selected_index {
            Some(idx) => idx.saturating_add_signed(delta).min(last),
            None => last,
        };
        self.selected_index = Some(next);
        self.scroll_to_selected();
    }
}

/// Cached per-message heights at one content width.
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl LayoutCache {
    /// Measure any messages not yet cached. A width change invalidates everything.
    pub fn sync(&mut self, conversation: &Conversation, content_width: u16) {
        if content_width != self.content_width {
            self.heights.clear();
            self.prefix_heights.clear();
            self.content_width = content_width;
        }
        let mut running = self.prefix_heights.last().copied().unwrap_or(0);
        for message in conversation.messages().iter().skip(self.heights.len()) {
            let height = MessageCard::calculate_height(message, content_width);
            running = running.saturating_add(height);
            self.heights.push(height);
            self.prefix_heights.push(running);
        }
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Indices of messages intersecting the viewport.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let start = self.prefix_heights.partition_point(|&bottom| bottom <= scroll_offset);
        let view_end = scroll_offset.saturating_add(viewport_height);
        let end = self.prefix_heights.partition_point(|&bottom| bottom < view_end) + 1;
        start..end.min(self.heights.len())
    }

    /// Message index at content row `content_y`, if any.
    pub fn index_at(&self, content_y: u16) -> Option<usize> {
        let idx = self.prefix_heights.partition_point(|&bottom| bottom <= content_y);
        (idx < self.heights.len()).then_some(idx)
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub conversation: &'a Conversation,
    pub palette: &'a Palette,
    /// Show the typing placeholder under the last message
    pub awaiting: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        conversation: &'a Conversation,
        palette: &'a Palette,
        awaiting: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            conversation,
            palette,
            awaiting,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        self.state.layout.sync(self.conversation, content_width);
        self.state.viewport_height = area.height;

        let total_height = self.state.layout.total_height();
        let pending_height = if self.awaiting { PENDING_HEIGHT } else { 0 };
        let canvas_height = total_height.saturating_add(pending_height);

        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        // Fill the canvas so the theme background shows through gaps
        scroll_view.render_widget(
            Block::default().style(self.palette.base()),
            Rect::new(0, 0, content_width, canvas_height),
        );

        for i in visible {
            let (Some(message), Some(&bottom)) = (
                self.conversation.get(i),
                self.state.layout.prefix_heights.get(i),
            ) else {
                continue;
            };
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, bottom.saturating_sub(height), content_width, height);
            let is_selected = self.state.selected_index == Some(i);
            scroll_view.render_widget(MessageCard::new(message, is_selected, self.palette), rect);
        }

        if self.awaiting {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            let style = self.palette.role(Role::Assistant).add_modifier(Modifier::DIM);
            let placeholder = Paragraph::new(format!(" {spinner}"))
                .style(style)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(style)
                        .title(" assistant · typing "),
                );
            // Sits under the last message unless the canvas is already at its height limit
            scroll_view.render_widget(
                placeholder,
                Rect::new(
                    0,
                    canvas_height.saturating_sub(PENDING_HEIGHT),
                    content_width,
                    PENDING_HEIGHT,
                ),
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on the persistent state because `MessageList` is
/// rebuilt every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Message;
    use crate::core::preferences::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn conversation_of(n: usize) -> Conversation {
        let mut conversation = Conversation::new();
        for i in 0..n {
            if i % 2 == 0 {
                conversation.append_user_message(format!("question {i}"));
            } else {
                conversation.append_assistant_message(Message::assistant(format!("answer {i}")));
            }
        }
        conversation
    }

    #[test]
    fn test_layout_cache_appends_only_new_messages() {
        let mut cache = LayoutCache::default();
        let mut conversation = conversation_of(2);
        cache.sync(&conversation, 40);
        assert_eq!(cache.heights, vec![3, 3]);
        assert_eq!(cache.prefix_heights, vec![3, 6]);

        conversation.append_user_message("more");
        cache.sync(&conversation, 40);
        assert_eq!(cache.prefix_heights, vec![3, 6, 9]);
    }

    #[test]
    fn test_layout_cache_resets_on_width_change() {
        let mut cache = LayoutCache::default();
        let conversation = conversation_of(1);
        cache.sync(&conversation, 40);
        // width 12 → content width 8: "question" | "0"
        cache.sync(&conversation, 12);
        assert_eq!(cache.heights, vec![4]);
    }

    #[test]
    fn test_visible_range_and_index_at() {
        let mut cache = LayoutCache::default();
        cache.sync(&conversation_of(5), 40); // each 3 rows: bottoms 3,6,9,12,15
        assert_eq!(cache.visible_range(0, 6), 0..2);
        assert_eq!(cache.visible_range(4, 3), 1..3);
        assert_eq!(cache.index_at(0), Some(0));
        assert_eq!(cache.index_at(3), Some(1));
        assert_eq!(cache.index_at(14), Some(4));
        assert_eq!(cache.index_at(15), None);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut state = MessageListState::new();
        state.move_selection(-1, 0);
        assert_eq!(state.selected_index, None);

        state.move_selection(-1, 3);
        assert_eq!(state.selected_index, Some(2));
        state.move_selection(5, 3);
        assert_eq!(state.selected_index, Some(2));
        state.move_selection(-5, 3);
        assert_eq!(state.selected_index, Some(0));
    }

    #[test]
    fn test_scroll_up_unpins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn test_render_placeholder_at_height_limit() {
        // 40_000 one-char lines per message: two of them saturate the canvas
        let tall = "x\n".repeat(40_000);
        let mut conversation = Conversation::new();
        conversation.append_user_message(tall.clone());
        conversation.append_assistant_message(Message::assistant(tall));

        let backend = TestBackend::new(10, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let palette = Palette::for_theme(Theme::Dark);
        let mut state = MessageListState::new();

        for frame in 0..2 {
            terminal
                .draw(|f| {
                    MessageList::new(&mut state, &conversation, &palette, true, frame)
                        .render(f, f.area());
                })
                .unwrap();
        }

        assert_eq!(state.layout.heights, vec![40_002, 40_002]);
        assert_eq!(state.layout.total_height(), u16::MAX);
    }

    #[test]
    fn test_render_shows_messages_and_placeholder() {
        let backend = TestBackend::new(50, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let conversation = conversation_of(1);
        let palette = Palette::for_theme(Theme::Light);
        let mut state = MessageListState::new();

        terminal
            .draw(|f| {
                MessageList::new(&mut state, &conversation, &palette, true, 0).render(f, f.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("question 0"));
        assert!(text.contains("typing"));
    }
}
