use chrono::{Local, TimeZone};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::conversation::Message;
use crate::tui::theme::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Renders one chat message as a bordered card titled with role and time.
///
/// Transient: built fresh each frame by `MessageList`, which owns the
/// selection state.
#[derive(Clone, Copy)]
pub struct MessageCard<'a> {
    pub message: &'a Message,
    pub is_selected: bool,
    pub palette: &'a Palette,
}

impl<'a> MessageCard<'a> {
    pub fn new(message: &'a Message, is_selected: bool, palette: &'a Palette) -> Self {
        Self {
            message,
            is_selected,
            palette,
        }
    }

    /// Height this message needs at `width`, without rendering it.
    ///
    /// The `textwrap` options match ratatui's `Paragraph` wrapping so the
    /// prediction lines up with what actually gets drawn.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

/// `HH:MM:SS` in local time for an epoch-millis timestamp.
pub fn format_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

impl<'a> Widget for MessageCard<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self.palette.role(self.message.role);
        let border_style = if self.is_selected {
            self.palette.base().fg(self.palette.selection).add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let title = format!(
            " {} · {} ",
            self.message.role.label(),
            format_time(self.message.timestamp)
        );

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.message.content.trim())
            .style(self.palette.base())
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
