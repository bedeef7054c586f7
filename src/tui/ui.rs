use crate::core::state::App;
use crate::core::templates;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::message_list::LayoutCache;
use crate::tui::components::{
    InputBox, MessageList, Picker, SIDEBAR_WIDTH, Sidebar, TitleBar,
};
use crate::tui::theme::Palette;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Block;

/// Narrowest chat column we keep before dropping the sidebar.
const MIN_CHAT_WIDTH: u16 = 40;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppLayout {
    pub title: Rect,
    /// `None` when the terminal is too narrow for both columns
    pub sidebar: Option<Rect>,
    pub messages: Rect,
    pub input: Rect,
}

/// Split the frame. Shared by drawing and mouse hit testing so both agree.
pub fn compute_layout(frame_area: Rect, input_box: &InputBox) -> AppLayout {
    use Constraint::{Length, Min};
    let [title, body] = Layout::vertical([Length(1), Min(0)]).areas(frame_area);

    let (sidebar, chat) = if body.width >= SIDEBAR_WIDTH + MIN_CHAT_WIDTH {
        let [sidebar, chat] = Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(body);
        (Some(sidebar), chat)
    } else {
        (None, body)
    };

    let input_height = input_box.calculate_height(chat.width);
    let [messages, input] = Layout::vertical([Min(0), Length(input_height)]).areas(chat);

    AppLayout {
        title,
        sidebar,
        messages,
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let palette = Palette::for_theme(app.theme);
    let awaiting = app.is_awaiting_response();

    // Sync InputBox props with App/TUI state
    tui.input_box.palette = palette;
    tui.input_box.disabled = awaiting;
    tui.input_box.dimmed = tui.overlay.is_some() || tui.input_mode == super::InputMode::Cursor;

    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let layout = compute_layout(frame.area(), &tui.input_box);

    TitleBar::new(
        app.model.display_name().to_string(),
        app.status_message.clone(),
        awaiting,
    )
    .with_palette(palette)
    .render(frame, layout.title);

    if let Some(sidebar_area) = layout.sidebar {
        Sidebar::new(
            app.model,
            app.parameters,
            app.theme,
            templates::list(),
            &palette,
        )
        .render(frame, sidebar_area);
    }

    MessageList::new(
        &mut tui.message_list,
        &app.conversation,
        &palette,
        awaiting,
        spinner_frame,
    )
    .render(frame, layout.messages);

    tui.input_box.render(frame, layout.input);

    if let Some(picker) = tui.overlay.as_mut() {
        Picker::new(picker, &palette).render(frame, frame.area());
    }
}

/// Hit test: given a screen position, find which message index (if any) is there.
pub fn hit_test_message(
    screen_x: u16,
    screen_y: u16,
    messages_area: Rect,
    scroll_offset_y: u16,
    layout: &LayoutCache,
) -> Option<usize> {
    let inside_x = screen_x >= messages_area.x && screen_x < messages_area.right();
    let inside_y = screen_y >= messages_area.y && screen_y < messages_area.bottom();
    if !inside_x || !inside_y {
        return None;
    }

    // Convert screen Y to content Y (accounting for scroll)
    let content_y = (screen_y - messages_area.y).saturating_add(scroll_offset_y);
    layout.index_at(content_y)
}
