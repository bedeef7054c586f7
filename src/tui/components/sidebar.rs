//! # Sidebar Component
//!
//! Fixed-width settings panel beside the conversation: model, generation
//! parameters, theme, the template catalog, and key help.
//!
//! Stateless. Everything it shows is read from `App` each frame; changes go
//! through the key bindings, which dispatch actions.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::params::{GenerationParameters, Model};
use crate::core::preferences::Theme;
use crate::core::templates::Template;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

/// Width the sidebar takes when the terminal is wide enough.
pub const SIDEBAR_WIDTH: u16 = 32;

const KEY_HELP: [(&str, &str); 8] = [
    ("Ctrl+P", "choose model"),
    ("F2/F3", "temperature -/+"),
    ("F4/F5", "max tokens -/+"),
    ("Ctrl+T", "templates"),
    ("Ctrl+L", "toggle theme"),
    ("Ctrl+E", "export chat"),
    ("Ctrl+Y", "copy message"),
    ("Ctrl+C", "quit"),
];

pub struct Sidebar<'a> {
    pub model: Model,
    pub parameters: GenerationParameters,
    pub theme: Theme,
    pub templates: &'a [Template],
    pub palette: &'a Palette,
}

impl<'a> Sidebar<'a> {
    pub fn new(
        model: Model,
        parameters: GenerationParameters,
        theme: Theme,
        templates: &'a [Template],
        palette: &'a Palette,
    ) -> Self {
        Self {
            model,
            parameters,
            theme,
            templates,
            palette,
        }
    }

    fn heading(&self, text: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            text,
            self.palette
                .base()
                .fg(self.palette.accent)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn field(&self, label: &'static str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{label:<12}"), self.palette.dim()),
            Span::styled(value, self.palette.base()),
        ])
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            self.heading("Model"),
            self.field("", self.model.display_name().to_string()),
            Line::default(),
            self.heading("Parameters"),
            self.field("Temperature", format!("{:.1}", self.parameters.temperature())),
            self.field("Max tokens", self.parameters.max_tokens().to_string()),
            Line::default(),
            self.heading("Theme"),
            self.field("", self.theme.as_str().to_string()),
            Line::default(),
            self.heading("Templates"),
        ];
        lines.extend(
            self.templates
                .iter()
                .map(|t| Line::from(Span::styled(format!("  {}", t.name), self.palette.base()))),
        );
        lines.push(Line::default());
        lines.push(self.heading("Keys"));
        lines.extend(KEY_HELP.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:<8}"), self.palette.base().fg(self.palette.accent)),
                Span::styled(*what, self.palette.dim()),
            ])
        }));
        lines
    }
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.dim())
            .title(" Settings ")
            .style(self.palette.base())
            .padding(Padding::horizontal(1));

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
