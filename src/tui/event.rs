use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global
    ForceQuit, // Ctrl+C
    Resize,

    // Editing / navigation
    Submit,
    Escape,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // Message list
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseClick(u16, u16),

    // Sidebar controls
    OpenModelPicker,    // Ctrl+P
    OpenTemplatePicker, // Ctrl+T
    ToggleTheme,        // Ctrl+L
    Export,             // Ctrl+E
    Copy,               // Ctrl+Y
    TemperatureDown,    // F2
    TemperatureUp,      // F3
    MaxTokensDown,      // F4
    MaxTokensUp,        // F5
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
/// Terminal read errors are logged and treated as "no event".
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(ev) => map_event(ev),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn map_event(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(_) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Translate a key press into a `TuiEvent`. Releases and repeats of
/// non-character keys are dropped.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('p')) => Some(TuiEvent::OpenModelPicker),
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => Some(TuiEvent::OpenTemplatePicker),
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(TuiEvent::ToggleTheme),
        (KeyModifiers::CONTROL, KeyCode::Char('e')) => Some(TuiEvent::Export),
        (KeyModifiers::CONTROL, KeyCode::Char('y')) => Some(TuiEvent::Copy),
        // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
        (KeyModifiers::CONTROL, KeyCode::Char('j')) => Some(TuiEvent::InputChar('\n')),
        (KeyModifiers::SHIFT, KeyCode::Enter) => Some(TuiEvent::InputChar('\n')),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            Some(TuiEvent::InputChar(c))
        }
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Delete) => Some(TuiEvent::Delete),
        (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
        (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
        (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
        (_, KeyCode::F(2)) => Some(TuiEvent::TemperatureDown),
        (_, KeyCode::F(3)) => Some(TuiEvent::TemperatureUp),
        (_, KeyCode::F(4)) => Some(TuiEvent::MaxTokensDown),
        (_, KeyCode::F(5)) => Some(TuiEvent::MaxTokensUp),
        _ => None,
    }
}
