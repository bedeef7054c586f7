//! Model selection and generation parameters.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of selectable models, in sidebar order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Model {
    #[default]
    #[value(name = "gpt-4")]
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[value(name = "gpt-3.5-turbo")]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[value(name = "claude-3-opus")]
    #[serde(rename = "claude-3-opus")]
    Claude3Opus,
    #[value(name = "claude-3-sonnet")]
    #[serde(rename = "claude-3-sonnet")]
    Claude3Sonnet,
    #[value(name = "llama-3-70b")]
    #[serde(rename = "llama-3-70b")]
    Llama3_70b,
}

impl Model {
    pub const ALL: [Model; 5] = [
        Model::Gpt4,
        Model::Gpt35Turbo,
        Model::Claude3Opus,
        Model::Claude3Sonnet,
        Model::Llama3_70b,
    ];

    /// Human-facing name, also used in responses and exports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Model::Gpt4 => "GPT-4",
            Model::Gpt35Turbo => "GPT-3.5 Turbo",
            Model::Claude3Opus => "Claude 3 Opus",
            Model::Claude3Sonnet => "Claude 3 Sonnet",
            Model::Llama3_70b => "Llama 3 70B",
        }
    }

    /// Identifier accepted on the command line and in the config file.
    pub fn slug(&self) -> &'static str {
        match self {
            Model::Gpt4 => "gpt-4",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Claude3Opus => "claude-3-opus",
            Model::Claude3Sonnet => "claude-3-sonnet",
            Model::Llama3_70b => "llama-3-70b",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Model> {
        Model::ALL.into_iter().find(|m| m.slug() == slug)
    }

    /// Position in `ALL`. Used by the model picker to preselect the active row.
    pub fn index(&self) -> usize {
        Model::ALL.iter().position(|m| m == self).unwrap_or(0)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 1.0;
pub const TEMPERATURE_STEP: f32 = 0.1;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const MAX_TOKENS_MIN: u32 = 100;
pub const MAX_TOKENS_MAX: u32 = 2000;
pub const MAX_TOKENS_STEP: u32 = 100;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Sampling knobs shown in the sidebar. Always within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    temperature: f32,
    max_tokens: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl GenerationParameters {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        let mut params = Self::default();
        params.set_temperature(temperature);
        params.set_max_tokens(max_tokens);
        params
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Sets the temperature, clamped to [0, 1] and rounded to one decimal.
    /// NaN falls back to the default.
    pub fn set_temperature(&mut self, value: f32) {
        let value = if value.is_nan() { DEFAULT_TEMPERATURE } else { value };
        let clamped = value.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
        self.temperature = (clamped * 10.0).round() / 10.0;
    }

    pub fn set_max_tokens(&mut self, value: u32) {
        self.max_tokens = value.clamp(MAX_TOKENS_MIN, MAX_TOKENS_MAX);
    }

    /// Moves temperature by `steps` increments of 0.1.
    pub fn step_temperature(&mut self, steps: i32) {
        self.set_temperature(self.temperature + steps as f32 * TEMPERATURE_STEP);
    }

    /// Moves max tokens by `steps` increments of 100.
    pub fn step_max_tokens(&mut self, steps: i32) {
        let next = self.max_tokens as i64 + steps as i64 * MAX_TOKENS_STEP as i64;
        self.set_max_tokens(next.clamp(0, u32::MAX as i64) as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_slugs_round_trip_through_lookup() {
        for model in Model::ALL {
            assert_eq!(Model::from_slug(model.slug()), Some(model));
        }
        assert_eq!(Model::from_slug("gpt-5"), None);
    }

    #[test]
    fn test_model_value_enum_matches_slug() {
        for model in Model::ALL {
            let parsed = Model::from_str(model.slug(), false).unwrap();
            assert_eq!(parsed, model);
        }
    }

    #[test]
    fn test_model_index_matches_order() {
        assert_eq!(Model::Gpt4.index(), 0);
        assert_eq!(Model::Llama3_70b.index(), 4);
    }

    #[test]
    fn test_default_parameters() {
        let params = GenerationParameters::default();
        assert_eq!(params.temperature(), 0.7);
        assert_eq!(params.max_tokens(), 1000);
    }

    #[test]
    fn test_temperature_clamps() {
        let mut params = GenerationParameters::default();
        params.set_temperature(1.7);
        assert_eq!(params.temperature(), 1.0);
        params.set_temperature(-0.3);
        assert_eq!(params.temperature(), 0.0);
        params.set_temperature(f32::NAN);
        assert_eq!(params.temperature(), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_step_temperature_stays_on_grid() {
        let mut params = GenerationParameters::default();
        params.step_temperature(1);
        assert_eq!(params.temperature(), 0.8);
        params.step_temperature(10);
        assert_eq!(params.temperature(), 1.0);
        params.step_temperature(-3);
        assert_eq!(params.temperature(), 0.7);
    }

    #[test]
    fn test_max_tokens_clamps() {
        let mut params = GenerationParameters::new(0.5, 50);
        assert_eq!(params.max_tokens(), 100);
        params.step_max_tokens(-5);
        assert_eq!(params.max_tokens(), 100);
        params.set_max_tokens(5000);
        assert_eq!(params.max_tokens(), 2000);
        params.step_max_tokens(-1);
        assert_eq!(params.max_tokens(), 1900);
    }

    #[test]
    fn test_parameters_serialize_camel_case() {
        let json = serde_json::to_value(GenerationParameters::new(0.5, 800)).unwrap();
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["maxTokens"], 800);
    }
}
