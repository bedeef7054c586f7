//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use async_trait::async_trait;

use crate::core::conversation::Message;
use crate::core::export::{ClipboardError, ClipboardSink};
use crate::core::params::Model;
use crate::inference::{ProviderError, ResponseProvider, ResponseRequest, canned_response};

/// Answers immediately with the simulator's canned text.
pub struct InstantProvider;

#[async_trait]
impl ResponseProvider for InstantProvider {
    fn name(&self) -> &str {
        "instant"
    }

    async fn respond(&self, request: ResponseRequest) -> Result<Message, ProviderError> {
        Ok(Message::assistant(canned_response(&request.prompt, request.model)))
    }
}

/// Clipboard that remembers everything written to it.
#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Vec<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.copied.push(text.to_string());
        Ok(())
    }
}

/// Clipboard that refuses every write.
pub struct BrokenClipboard;

impl ClipboardSink for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Write("denied".to_string()))
    }
}

/// Creates a test App with an InstantProvider.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(InstantProvider), Model::Gpt4)
}
