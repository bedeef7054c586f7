//! # TitleBar Component
//!
//! Top status bar showing the active model and the latest status message.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new("GPT-4".to_string(), "Response received".to_string(), false);
//! title_bar.render(frame, area);
//! ```
//!
//! ### Props-in-Struct Pattern
//!
//! Props are stored as struct fields rather than passed to `render()` because
//! the `Component` trait fixes the render signature.
//!
//! ## Conditional Formatting
//!
//! 1. **Awaiting**: `"promptpad (model: GPT-4) | Generating response..."`
//! 2. **Status message**: `"promptpad (model: GPT-4) | Exported chat-export.json"`
//! 3. **Default**: `"promptpad (model: GPT-4)"`

use crate::tui::component::Component;
use crate::tui::theme::Palette;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

/// Top status bar component showing model name and status.
pub struct TitleBar {
    /// Display name of the active model (e.g., "GPT-4")
    pub model_name: String,
    /// Status message (e.g., "Copied message to clipboard")
    pub status_message: String,
    /// Whether a response is pending; overrides the status text
    pub awaiting: bool,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(model_name: String, status_message: String, awaiting: bool) -> Self {
        Self {
            model_name,
            status_message,
            awaiting,
            palette: Palette::for_theme(Default::default()),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    fn text(&self) -> String {
        if self.awaiting {
            format!("promptpad (model: {}) | Generating response...", self.model_name)
        } else if self.status_message.is_empty() {
            format!("promptpad (model: {})", self.model_name)
        } else {
            format!("promptpad (model: {}) | {}", self.model_name, self.status_message)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = self
            .palette
            .base()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(Span::styled(self.text(), style)).style(self.palette.base());
        frame.render_widget(line, area);
    }
}
