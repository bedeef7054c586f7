//! Canned-response provider standing in for a real inference backend.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::provider::{ProviderError, ResponseProvider, ResponseRequest};
use crate::core::conversation::Message;
use crate::core::params::Model;

pub const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_millis(1500);

/// Waits a fixed delay, then answers with a deterministic message naming
/// the model. Never fails.
pub struct SimulatedProvider {
    delay: Duration,
}

impl SimulatedProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_DELAY)
    }
}

/// The reply text for a prompt. Same inputs, same output.
pub fn canned_response(prompt: &str, model: Model) -> String {
    format!(
        "This is a simulated response from {} to: \"{}\". \
         Connect a real provider to get actual completions.",
        model.display_name(),
        prompt.trim()
    )
}

#[async_trait]
impl ResponseProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn respond(&self, request: ResponseRequest) -> Result<Message, ProviderError> {
        debug!(
            "Simulating {} response (delay={}ms, temperature={}, max_tokens={})",
            request.model,
            self.delay.as_millis(),
            request.parameters.temperature(),
            request.parameters.max_tokens()
        );
        tokio::time::sleep(self.delay).await;
        Ok(Message::assistant(canned_response(&request.prompt, request.model)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Role;
    use crate::core::params::GenerationParameters;

    fn request(prompt: &str, model: Model) -> ResponseRequest {
        ResponseRequest {
            prompt: prompt.to_string(),
            model,
            parameters: GenerationParameters::default(),
        }
    }

    #[test]
    fn test_canned_response_is_deterministic() {
        assert_eq!(
            canned_response("Hello", Model::Gpt4),
            canned_response("Hello", Model::Gpt4)
        );
        assert!(canned_response("Hello", Model::Gpt4).contains("GPT-4"));
        assert!(canned_response("Hello", Model::Llama3_70b).contains("Llama 3 70B"));
    }

    #[test]
    fn test_default_delay_is_one_and_a_half_seconds() {
        assert_eq!(SimulatedProvider::default().delay(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_respond_waits_full_delay() {
        let provider = SimulatedProvider::default();
        let start = tokio::time::Instant::now();

        let message = provider.respond(request("Hello", Model::Gpt4)).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(message.role, Role::Assistant);
        assert!(message.content.contains("GPT-4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_respond_not_ready_before_delay() {
        let provider = SimulatedProvider::default();
        let mut task = tokio_test::task::spawn(provider.respond(request("Hi", Model::Gpt4)));

        assert!(task.poll().is_pending());
        tokio::time::advance(Duration::from_millis(1499)).await;
        assert!(task.poll().is_pending());
        tokio::time::advance(Duration::from_millis(10)).await;
        assert!(task.poll().is_ready());
    }
}
