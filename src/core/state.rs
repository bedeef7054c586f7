//! # Application State
//!
//! Core business state for promptpad. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn ResponseProvider>  // answers prompts
//! ├── conversation: Conversation           // append-only message log
//! ├── model: Model                         // selected model
//! ├── parameters: GenerationParameters     // temperature / max tokens
//! ├── theme: Theme                         // persisted preference
//! ├── request: RequestState                // Idle | AwaitingResponse
//! ├── export_dir: PathBuf                  // where exports land
//! └── status_message: String               // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::conversation::Conversation;
use crate::core::params::{GenerationParameters, Model};
use crate::core::preferences::Theme;
use crate::inference::ResponseProvider;

/// The two-state request cycle.
///
/// ```text
/// Idle ──begin()──▶ AwaitingResponse ──finish()──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    AwaitingResponse,
}

impl RequestState {
    /// Idle → AwaitingResponse. Returns false (and changes nothing) if a
    /// request is already in flight.
    pub fn begin(&mut self) -> bool {
        match self {
            RequestState::Idle => {
                *self = RequestState::AwaitingResponse;
                true
            }
            RequestState::AwaitingResponse => false,
        }
    }

    /// AwaitingResponse → Idle. Returns false if nothing was in flight.
    pub fn finish(&mut self) -> bool {
        match self {
            RequestState::AwaitingResponse => {
                *self = RequestState::Idle;
                true
            }
            RequestState::Idle => false,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, RequestState::AwaitingResponse)
    }
}

pub struct App {
    pub provider: Arc<dyn ResponseProvider>,
    pub conversation: Conversation,
    pub model: Model,
    pub parameters: GenerationParameters,
    pub theme: Theme,
    pub request: RequestState,
    pub export_dir: PathBuf,
    pub status_message: String,
}

impl App {
    pub fn new(provider: Arc<dyn ResponseProvider>, model: Model) -> Self {
        Self {
            provider,
            conversation: Conversation::new(),
            model,
            parameters: GenerationParameters::default(),
            theme: Theme::default(),
            request: RequestState::Idle,
            export_dir: PathBuf::from("."),
            status_message: String::from("Welcome to promptpad!"),
        }
    }

    /// Create an App from resolved configuration and the loaded theme.
    pub fn from_config(
        provider: Arc<dyn ResponseProvider>,
        config: &ResolvedConfig,
        theme: Theme,
    ) -> Self {
        let mut app = Self::new(provider, config.model);
        app.parameters = config.parameters;
        app.export_dir = config.export_dir.clone();
        app.theme = theme;
        app
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.request.is_awaiting()
    }
}
