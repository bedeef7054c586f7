//! # InputBox Component
//!
//! Holds the pending prompt and emits it on Enter.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter)
//! - Accept prefilled text from a template
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `disabled` and `palette` are
//! props synced from the application state every frame. While disabled the
//! box keeps its text and swallows Enter, so nothing is lost or queued while
//! a response is pending.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::preferences::Theme;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

use layout::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_cell,
    inner_width, next_char_boundary, prev_char_boundary, wrap_rows,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Pending prompt (Internal State)
    pub buffer: String,
    /// Cursor byte offset into `buffer`
    cursor: usize,
    /// True while a response is pending (Prop)
    pub disabled: bool,
    /// True when focus is elsewhere: cursor mode or an open picker (Prop)
    pub dimmed: bool,
    /// Colours for the active theme (Prop)
    pub palette: Palette,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            disabled: false,
            dimmed: false,
            palette: Palette::for_theme(Theme::default()),
        }
    }

    /// Replace the buffer, e.g. with a template's prompt. Cursor goes to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Height for the current buffer, clamped to
    /// [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = wrap_rows(&self.buffer, inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let rows = wrap_rows(&self.buffer, width);
        let (col, row) = cursor_cell(&self.buffer, self.cursor, width);

        // Keep the cursor row on screen
        let scroll = row.saturating_sub(MAX_VISIBLE_LINES as usize - 1) as u16;

        let (title, style) = if self.disabled {
            (" Prompt (waiting for response...) ", self.palette.dim())
        } else if self.dimmed {
            (" Prompt (type to edit) ", self.palette.dim())
        } else {
            (" Prompt (Enter to send, Ctrl+J newline) ", self.palette.base())
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style)
            .title(title)
            .padding(Padding::horizontal(1));

        let input = Paragraph::new(rows.join("\n"))
            .block(block)
            .style(style)
            .scroll((scroll, 0));
        frame.render_widget(input, area);

        if !self.disabled && !self.dimmed {
            let x = area.x + CONTENT_OFFSET_X + col as u16;
            let y = area.y + CONTENT_OFFSET_Y + (row as u16).saturating_sub(scroll);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor, text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
