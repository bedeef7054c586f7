//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Flow
//!
//! ```text
//! TuiEvent → handle_event() → Action → core::update() → Effect → EffectRunner
//!                                          ↑                          │
//!                                          └── mpsc (ResponseReceived) ┘
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Awaiting a response**: draws every ~80ms so the typing indicator animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::export::{ClipboardSink, SystemClipboard, copy_message, write_export};
use crate::core::params::Model;
use crate::core::preferences::PreferenceStore;
use crate::core::state::App;
use crate::core::templates;
use crate::inference::{ResponseProvider, ResponseRequest, SimulatedProvider};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    InputBox, InputEvent, MessageListState, PickerEvent, PickerKind, PickerState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Modal input mode
    pub input_mode: InputMode,
    // Model / template chooser (None = hidden)
    pub overlay: Option<PickerState>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            overlay: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without
        // it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Translate one terminal event into at most one core action.
///
/// TUI-only state (input buffer, picker, selection, scroll) is updated here
/// directly; anything that touches `App` comes back as an `Action`.
pub fn handle_event(
    app: &App,
    tui: &mut TuiState,
    event: TuiEvent,
    messages_area: Rect,
) -> Option<Action> {
    // Several events can arrive between draws; keep the prop current so a
    // second Enter does not swallow the buffer
    tui.input_box.disabled = app.is_awaiting_response();

    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        _ => {}
    }

    // When a picker is open, route all events to it
    if let Some(picker) = tui.overlay.as_mut() {
        let picked = picker.handle_event(&event)?;
        let kind = picker.kind;
        tui.overlay = None;
        return match picked {
            PickerEvent::Select(index) => match kind {
                PickerKind::Model => Model::ALL.get(index).copied().map(Action::SelectModel),
                PickerKind::Template => templates::list()
                    .get(index)
                    .map(|t| Action::ApplyTemplate(t.id)),
            },
            PickerEvent::Dismiss => None,
        };
    }

    match event {
        TuiEvent::OpenModelPicker => {
            tui.overlay = Some(PickerState::models(app.model));
            return None;
        }
        TuiEvent::OpenTemplatePicker => {
            tui.overlay = Some(PickerState::templates(templates::list()));
            return None;
        }
        TuiEvent::ToggleTheme => return Some(Action::ToggleTheme),
        TuiEvent::Export => return Some(Action::ExportConversation),
        TuiEvent::Copy => return copy_target(app, tui).map(Action::CopyMessage),
        TuiEvent::TemperatureDown => return Some(Action::StepTemperature(-1)),
        TuiEvent::TemperatureUp => return Some(Action::StepTemperature(1)),
        TuiEvent::MaxTokensDown => return Some(Action::StepMaxTokens(-1)),
        TuiEvent::MaxTokensUp => return Some(Action::StepMaxTokens(1)),
        TuiEvent::MouseClick(col, row) => {
            let scroll_offset = tui.message_list.scroll_state.offset().y;
            if let Some(idx) = ui::hit_test_message(
                col,
                row,
                messages_area,
                scroll_offset,
                &tui.message_list.layout,
            ) {
                tui.message_list.selected_index = Some(idx);
                tui.input_mode = InputMode::Cursor;
            }
            return None;
        }
        // Scroll events always go to MessageList regardless of mode
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            return None;
        }
        _ => {}
    }

    // Modal event dispatch
    match tui.input_mode {
        InputMode::Input => {
            if matches!(event, TuiEvent::Escape) {
                tui.input_mode = InputMode::Cursor;
                tui.message_list.selected_index = app.conversation.len().checked_sub(1);
                return None;
            }
            match tui.input_box.handle_event(&event)? {
                InputEvent::Submit(text) => Some(Action::Submit(text)),
                InputEvent::ContentChanged => None,
            }
        }
        InputMode::Cursor => {
            match event {
                TuiEvent::CursorUp => {
                    tui.message_list.move_selection(-1, app.conversation.len());
                }
                TuiEvent::CursorDown => {
                    tui.message_list.move_selection(1, app.conversation.len());
                }
                // Typing auto-switches to Input mode and forwards the event
                TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                    tui.input_mode = InputMode::Input;
                    tui.message_list.selected_index = None;
                    tui.input_box.handle_event(&event);
                }
                TuiEvent::Submit => {
                    tui.input_mode = InputMode::Input;
                    tui.message_list.selected_index = None;
                }
                _ => {}
            }
            None
        }
    }
}

/// The selected message, or the latest one when nothing is selected.
fn copy_target(app: &App, tui: &TuiState) -> Option<usize> {
    tui.message_list
        .selected_index
        .filter(|&i| i < app.conversation.len())
        .or_else(|| app.conversation.len().checked_sub(1))
}

/// Carries out the I/O that `update()` asks for.
pub struct EffectRunner<C: ClipboardSink = SystemClipboard> {
    tx: mpsc::Sender<Action>,
    pub preferences: PreferenceStore,
    pub clipboard: C,
    pending: Option<AbortHandle>,
}

impl<C: ClipboardSink> EffectRunner<C> {
    pub fn new(tx: mpsc::Sender<Action>, preferences: PreferenceStore, clipboard: C) -> Self {
        Self {
            tx,
            preferences,
            clipboard,
            pending: None,
        }
    }

    /// Perform `effect`. Returns true when the app should exit.
    pub fn run(&mut self, app: &mut App, tui: &mut TuiState, effect: Effect) -> bool {
        match effect {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::SpawnRequest(request) => {
                self.pending = Some(spawn_request(
                    app.provider.clone(),
                    request,
                    self.tx.clone(),
                ));
            }
            Effect::FillPrompt(text) => {
                tui.input_box.set_text(text);
                tui.input_mode = InputMode::Input;
                tui.message_list.selected_index = None;
            }
            Effect::SaveTheme(theme) => self.preferences.save(theme),
            Effect::WriteExport(export) => match write_export(&app.export_dir, &export) {
                Ok(path) => {
                    app.status_message = format!(
                        "Exported {} to {}",
                        message_count(export.messages.len()),
                        path.display()
                    );
                }
                Err(e) => {
                    warn!("Export failed: {}", e);
                    app.status_message = format!("Export failed: {e}");
                }
            },
            Effect::CopyToClipboard(text) => match copy_message(&mut self.clipboard, &text) {
                Ok(()) => app.status_message = String::from("Copied message to clipboard"),
                Err(e) => {
                    warn!("Copy failed: {}", e);
                    app.status_message = format!("Copy failed: {e}");
                }
            },
        }
        false
    }

    /// Cancel any response still in flight.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Aborting pending response");
            handle.abort();
        }
    }
}

/// "1 message", "3 messages".
fn message_count(n: usize) -> String {
    if n == 1 {
        String::from("1 message")
    } else {
        format!("{n} messages")
    }
}

fn spawn_request(
    provider: Arc<dyn ResponseProvider>,
    request: ResponseRequest,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!(
        "Spawning request to {} (model={})",
        provider.name(),
        request.model.slug()
    );
    let handle = tokio::spawn(async move {
        let action = match provider.respond(request).await {
            Ok(message) => Action::ResponseReceived(message),
            Err(e) => {
                warn!("Provider error: {}", e);
                Action::ResponseFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver response: receiver dropped");
        }
    });
    handle.abort_handle()
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider: Arc<dyn ResponseProvider> =
        Arc::new(SimulatedProvider::new(config.response_delay));
    let preferences = PreferenceStore::open(config.preferences_path.clone());
    let theme = preferences.load();
    let mut app = App::from_config(provider, &config, theme);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut effects = EffectRunner::new(tx, preferences, SystemClipboard::new());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut messages_area = Rect::default();

    'main: loop {
        let animating = app.is_awaiting_response();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 8.0) as usize;
            let completed = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            messages_area = ui::compute_layout(completed.area, &tui.input_box).messages;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = handle_event(&app, &mut tui, event, messages_area) {
                debug!("Dispatching {:?}", action);
                let effect = update(&mut app, action);
                if effects.run(&mut app, &mut tui, effect) {
                    break 'main;
                }
            }
        }

        // Handle background task actions (simulated responses)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if effects.run(&mut app, &mut tui, effect) {
                break 'main;
            }
        }
    }

    effects.shutdown();
    info!("Exiting with {} messages", app.conversation.len());
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::{Message, Role};
    use crate::core::preferences::{MemoryBackend, Theme};
    use crate::core::state::RequestState;
    use crate::test_support::{BrokenClipboard, RecordingClipboard, test_app};

    const AREA: Rect = Rect {
        x: 32,
        y: 1,
        width: 68,
        height: 36,
    };

    fn runner() -> (EffectRunner<RecordingClipboard>, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        let preferences = PreferenceStore::new(Box::new(MemoryBackend::new()));
        (
            EffectRunner::new(tx, preferences, RecordingClipboard::default()),
            rx,
        )
    }

    fn type_text(app: &App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            assert_eq!(handle_event(app, tui, TuiEvent::InputChar(c), AREA), None);
        }
    }

    /// Feed an event through the whole pipeline the way the run loop does.
    fn dispatch(
        app: &mut App,
        tui: &mut TuiState,
        effects: &mut EffectRunner<RecordingClipboard>,
        event: TuiEvent,
    ) {
        if let Some(action) = handle_event(app, tui, event, AREA) {
            let effect = update(app, action);
            effects.run(app, tui, effect);
        }
    }

    #[test]
    fn test_typing_and_enter_submits() {
        let app = test_app();
        let mut tui = TuiState::new();
        type_text(&app, &mut tui, "Hello");

        let action = handle_event(&app, &mut tui, TuiEvent::Submit, AREA);
        assert_eq!(action, Some(Action::Submit("Hello".to_string())));
        assert!(tui.input_box.buffer.is_empty());
    }

    #[test]
    fn test_enter_while_awaiting_keeps_text() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".to_string()));
        let mut tui = TuiState::new();
        type_text(&app, &mut tui, "second");

        assert_eq!(handle_event(&app, &mut tui, TuiEvent::Submit, AREA), None);
        assert_eq!(tui.input_box.buffer, "second");
        assert_eq!(app.conversation.len(), 1);
    }

    #[test]
    fn test_force_quit() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.overlay = Some(PickerState::models(app.model));
        assert_eq!(
            handle_event(&app, &mut tui, TuiEvent::ForceQuit, AREA),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_model_picker_selects_model() {
        let app = test_app();
        let mut tui = TuiState::new();

        handle_event(&app, &mut tui, TuiEvent::OpenModelPicker, AREA);
        assert!(tui.overlay.is_some());
        handle_event(&app, &mut tui, TuiEvent::CursorDown, AREA);
        handle_event(&app, &mut tui, TuiEvent::CursorDown, AREA);

        let action = handle_event(&app, &mut tui, TuiEvent::Submit, AREA);
        assert_eq!(action, Some(Action::SelectModel(Model::Claude3Opus)));
        assert!(tui.overlay.is_none());
    }

    #[test]
    fn test_picker_swallows_typing_and_dismisses() {
        let app = test_app();
        let mut tui = TuiState::new();

        handle_event(&app, &mut tui, TuiEvent::OpenTemplatePicker, AREA);
        assert_eq!(handle_event(&app, &mut tui, TuiEvent::InputChar('x'), AREA), None);
        assert!(tui.input_box.buffer.is_empty());

        assert_eq!(handle_event(&app, &mut tui, TuiEvent::Escape, AREA), None);
        assert!(tui.overlay.is_none());
        assert_eq!(tui.input_mode, InputMode::Input);
    }

    #[test]
    fn test_template_fills_prompt_exactly() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut effects, _rx) = runner();
        type_text(&app, &mut tui, "draft that gets replaced");

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::OpenTemplatePicker);
        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Submit);

        let first = &templates::list()[0];
        assert_eq!(tui.input_box.buffer, first.prompt);
        assert!(app.conversation.is_empty());
    }

    #[test]
    fn test_parameter_keys_step_values() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut effects, _rx) = runner();

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::TemperatureUp);
        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::MaxTokensDown);
        assert!((app.parameters.temperature() - 0.8).abs() < 1e-6);
        assert_eq!(app.parameters.max_tokens(), 900);
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut effects, _rx) = runner();

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::ToggleTheme);
        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(effects.preferences.load(), Theme::Dark);

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::ToggleTheme);
        assert_eq!(effects.preferences.load(), Theme::Light);
    }

    #[test]
    fn test_cursor_mode_selection_and_copy() {
        let mut app = test_app();
        update(&mut app, Action::Submit("question".to_string()));
        update(&mut app, Action::ResponseReceived(Message::assistant("answer")));
        let mut tui = TuiState::new();
        let (mut effects, _rx) = runner();

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Escape);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(1));

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::CursorUp);
        assert_eq!(tui.message_list.selected_index, Some(0));

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Copy);
        assert_eq!(effects.clipboard.copied, vec!["question".to_string()]);
        assert_eq!(app.status_message, "Copied message to clipboard");

        // Typing returns to input mode and lands in the buffer
        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::InputChar('h'));
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.message_list.selected_index, None);
        assert_eq!(tui.input_box.buffer, "h");
    }

    #[test]
    fn test_copy_defaults_to_last_message() {
        let mut app = test_app();
        let tui = TuiState::new();
        assert_eq!(copy_target(&app, &tui), None);

        update(&mut app, Action::Submit("only".to_string()));
        assert_eq!(copy_target(&app, &tui), Some(0));
    }

    #[test]
    fn test_export_writes_file_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app();
        app.export_dir = dir.path().to_path_buf();
        update(&mut app, Action::Submit("Hello".to_string()));
        let mut tui = TuiState::new();
        let (mut effects, _rx) = runner();

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Export);

        assert!(dir.path().join("chat-export.json").exists());
        assert!(app.status_message.starts_with("Exported 1 message to "));
    }

    #[test]
    fn test_message_count_pluralises() {
        assert_eq!(message_count(0), "0 messages");
        assert_eq!(message_count(1), "1 message");
        assert_eq!(message_count(4), "4 messages");
    }

    #[test]
    fn test_copy_failure_reports_clipboard_error() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".to_string()));
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();
        let preferences = PreferenceStore::new(Box::new(MemoryBackend::new()));
        let mut effects = EffectRunner::new(tx, preferences, BrokenClipboard);

        let effect = update(&mut app, Action::CopyMessage(0));
        effects.run(&mut app, &mut tui, effect);

        assert_eq!(app.status_message, "Copy failed: clipboard write failed: denied");
    }

    #[test]
    fn test_export_failure_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app();
        // A regular file where the export directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        app.export_dir = blocker.join("nested");
        let mut tui = TuiState::new();
        let (mut effects, _rx) = runner();

        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Export);
        assert!(app.status_message.starts_with("Export failed"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawned_request_delivers_reply() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut effects, rx) = runner();

        type_text(&app, &mut tui, "Hello");
        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Submit);
        assert_eq!(app.request, RequestState::AwaitingResponse);

        let action = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        update(&mut app, action);

        assert_eq!(app.conversation.len(), 2);
        let reply = app.conversation.last().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.contains("GPT-4"));
        assert_eq!(app.request, RequestState::Idle);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_aborts_pending_request() {
        let mut app = App::new(
            Arc::new(SimulatedProvider::new(Duration::from_secs(60))),
            Model::Gpt4,
        );
        let mut tui = TuiState::new();
        let (mut effects, rx) = runner();

        type_text(&app, &mut tui, "Hello");
        dispatch(&mut app, &mut tui, &mut effects, TuiEvent::Submit);
        effects.shutdown();

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
