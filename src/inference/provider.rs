use std::fmt;

use async_trait::async_trait;

use crate::core::conversation::Message;
use crate::core::params::{GenerationParameters, Model};

/// Errors a response provider can report.
///
/// The simulator never produces one. The variants describe what a real
/// network-backed provider would need to surface.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned an error response.
    Api { status: u16, message: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to answer one prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRequest {
    pub prompt: String,
    pub model: Model,
    pub parameters: GenerationParameters,
}

#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Produces the assistant's reply to a single prompt.
    ///
    /// Callers are responsible for rejecting blank prompts.
    async fn respond(&self, request: ResponseRequest) -> Result<Message, ProviderError>;
}
