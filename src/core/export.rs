//! # Export & Copy
//!
//! Snapshot the conversation to `chat-export.json`, or put one message on
//! the system clipboard.
//!
//! Export file layout:
//!
//! ```json
//! {
//!   "model": "GPT-4",
//!   "parameters": { "temperature": 0.7, "maxTokens": 1000 },
//!   "messages": [ { "role": "user", "content": "Hello", "timestamp": 1718000000000 } ],
//!   "timestamp": "2024-06-10T06:13:20.000Z"
//! }
//! ```
//!
//! The file name is fixed, so a second export overwrites the first.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use log::info;
use serde::Serialize;

use crate::core::conversation::Message;
use crate::core::params::{GenerationParameters, Model};

pub const EXPORT_FILE_NAME: &str = "chat-export.json";

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "export I/O error: {e}"),
            ExportError::Serialize(e) => write!(f, "export serialization error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialize(e)
    }
}

/// Why a copy to the clipboard did not happen.
#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard could be opened at startup (headless, no display server).
    Unavailable,
    /// The platform clipboard rejected the write.
    Write(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable => write!(f, "no clipboard available"),
            ClipboardError::Write(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Point-in-time snapshot of a conversation and its settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationExport {
    pub model: String,
    pub parameters: GenerationParameters,
    pub messages: Vec<Message>,
    /// ISO-8601 export time.
    pub timestamp: String,
}

impl ConversationExport {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds a snapshot of the live model, parameters and messages.
pub fn export_conversation(
    model: Model,
    parameters: GenerationParameters,
    messages: &[Message],
) -> ConversationExport {
    ConversationExport {
        model: model.display_name().to_string(),
        parameters,
        messages: messages.to_vec(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Writes `export` to `<dir>/chat-export.json` and returns the path.
pub fn write_export(dir: &Path, export: &ConversationExport) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, export.to_json()?)?;
    info!(
        "Exported {} messages to {}",
        export.messages.len(),
        path.display()
    );
    Ok(path)
}

/// Somewhere text can be copied to.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard.
///
/// The handle is created once and kept for the life of the app; on Wayland
/// the contents vanish when the owning handle is dropped.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::warn!("System clipboard unavailable: {}", e);
                None
            }
        };
        Self { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = self.inner.as_mut().ok_or(ClipboardError::Unavailable)?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Copies a message's literal text.
pub fn copy_message(
    clipboard: &mut dyn ClipboardSink,
    content: &str,
) -> Result<(), ClipboardError> {
    clipboard.set_text(content)
}
