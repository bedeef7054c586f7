//! # Actions
//!
//! Everything that can happen in promptpad becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The simulator answers? That's `Action::ResponseReceived(message)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the adapter should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::core::conversation::Message;
use crate::core::export::{ConversationExport, export_conversation};
use crate::core::params::Model;
use crate::core::preferences::Theme;
use crate::core::state::App;
use crate::core::templates;
use crate::inference::ResponseRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User sent the pending prompt.
    Submit(String),
    /// The provider answered.
    ResponseReceived(Message),
    /// The provider failed. Carries a display string.
    ResponseFailed(String),
    SelectModel(Model),
    /// Move temperature by N steps of 0.1.
    StepTemperature(i32),
    /// Move max tokens by N steps of 100.
    StepMaxTokens(i32),
    ToggleTheme,
    /// Prefill the prompt with the template of this id.
    ApplyTemplate(u32),
    ExportConversation,
    /// Copy the message at this index.
    CopyMessage(usize),
    Quit,
}

/// I/O requested by `update()`, carried out by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnRequest(ResponseRequest),
    /// Replace the pending prompt with this text.
    FillPrompt(String),
    SaveTheme(Theme),
    WriteExport(ConversationExport),
    CopyToClipboard(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() {
                return Effect::None;
            }
            // Sending is disabled while a reply is pending; a submit that
            // slips through is dropped rather than queued.
            if !app.request.begin() {
                debug!("Submit ignored: response pending");
                return Effect::None;
            }
            app.conversation.append_user_message(text.clone());
            app.status_message = format!("Waiting for {}...", app.model);
            info!(
                "User message appended ({} total), requesting {}",
                app.conversation.len(),
                app.model
            );
            Effect::SpawnRequest(ResponseRequest {
                prompt: text,
                model: app.model,
                parameters: app.parameters,
            })
        }
        Action::ResponseReceived(message) => {
            if !app.request.finish() {
                debug!("Dropping stale response");
                return Effect::None;
            }
            app.conversation.append_assistant_message(message);
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::ResponseFailed(error) => {
            if app.request.finish() {
                app.status_message = format!("Request failed: {error}");
            }
            Effect::None
        }
        Action::SelectModel(model) => {
            app.model = model;
            app.status_message = format!("Model: {model}");
            Effect::None
        }
        Action::StepTemperature(steps) => {
            app.parameters.step_temperature(steps);
            app.status_message = format!("Temperature: {:.1}", app.parameters.temperature());
            Effect::None
        }
        Action::StepMaxTokens(steps) => {
            app.parameters.step_max_tokens(steps);
            app.status_message = format!("Max tokens: {}", app.parameters.max_tokens());
            Effect::None
        }
        Action::ToggleTheme => {
            app.theme = app.theme.toggled();
            app.status_message = format!("Theme: {}", app.theme.as_str());
            Effect::SaveTheme(app.theme)
        }
        Action::ApplyTemplate(id) => match templates::find(id) {
            Some(template) => {
                app.status_message = format!("Template: {}", template.name);
                Effect::FillPrompt(templates::apply_template(template))
            }
            None => Effect::None,
        },
        Action::ExportConversation => Effect::WriteExport(export_conversation(
            app.model,
            app.parameters,
            app.conversation.messages(),
        )),
        Action::CopyMessage(index) => match app.conversation.get(index) {
            Some(message) => Effect::CopyToClipboard(message.content.clone()),
            None => Effect::None,
        },
        Action::Quit => Effect::Quit,
    }
}
