//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.promptpad/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::params::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParameters, Model};
use crate::core::preferences::FileBackend;
use crate::inference::simulator::DEFAULT_RESPONSE_DELAY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PromptpadConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub response_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub export_dir: Option<String>,
    pub preferences_file: Option<String>,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<Model>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub delay_ms: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model: Model,
    pub parameters: GenerationParameters,
    pub response_delay: Duration,
    pub export_dir: PathBuf,
    /// `None` when there's no home directory; preferences then live in memory.
    pub preferences_path: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.promptpad/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".promptpad").join("config.toml"))
}

/// Load config from `~/.promptpad/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PromptpadConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PromptpadConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PromptpadConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PromptpadConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(PromptpadConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PromptpadConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# promptpad configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_model = "gpt-4"            # gpt-4, gpt-3.5-turbo, claude-3-opus, claude-3-sonnet, llama-3-70b
# temperature = 0.7                  # 0.0 - 1.0
# max_tokens = 1000                  # 100 - 2000
# response_delay_ms = 1500           # simulated response latency

# [storage]
# export_dir = "~/Downloads"         # Or set PROMPTPAD_EXPORT_DIR
# preferences_file = "preferences.json"  # Relative to ~/.promptpad/
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

pub const MODEL_ENV: &str = "PROMPTPAD_MODEL";
pub const EXPORT_DIR_ENV: &str = "PROMPTPAD_EXPORT_DIR";

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PromptpadConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with<F>(config: &PromptpadConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Model: CLI → env → config → default
    let model = cli
        .model
        .or_else(|| env(MODEL_ENV).and_then(|s| parse_model(&s)))
        .or_else(|| config.general.default_model.as_deref().and_then(parse_model))
        .unwrap_or_default();

    // Parameters: CLI → config → default, clamped into range
    let temperature = cli
        .temperature
        .or(config.general.temperature)
        .unwrap_or(DEFAULT_TEMPERATURE);
    let max_tokens = cli
        .max_tokens
        .or(config.general.max_tokens)
        .unwrap_or(DEFAULT_MAX_TOKENS);

    let response_delay = cli
        .delay_ms
        .or(config.general.response_delay_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_RESPONSE_DELAY);

    // Export dir: CLI → env → config → downloads dir → cwd
    let export_dir = cli
        .export_dir
        .clone()
        .or_else(|| env(EXPORT_DIR_ENV).map(PathBuf::from))
        .or_else(|| config.storage.export_dir.as_deref().map(expand_home))
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let preferences_path = match config.storage.preferences_file.as_deref() {
        Some(file) => dirs::home_dir().map(|h| h.join(".promptpad").join(file)),
        None => FileBackend::default_path(),
    };

    ResolvedConfig {
        model,
        parameters: GenerationParameters::new(temperature, max_tokens),
        response_delay,
        export_dir,
        preferences_path,
    }
}

fn parse_model(slug: &str) -> Option<Model> {
    let model = Model::from_slug(slug.trim());
    if model.is_none() {
        warn!("Unknown model {:?}, falling back", slug);
    }
    model
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn file_config() -> PromptpadConfig {
        PromptpadConfig {
            general: GeneralConfig {
                default_model: Some("claude-3-opus".to_string()),
                ..Default::default()
            },
            storage: StorageConfig {
                export_dir: Some("/tmp/file-exports".to_string()),
                preferences_file: None,
            },
        }
    }

    #[test]
    fn test_env_beats_config_file() {
        let env = env_of(&[(MODEL_ENV, "gpt-3.5-turbo"), (EXPORT_DIR_ENV, "/tmp/env-exports")]);
        let resolved = resolve_with(&file_config(), &CliOverrides::default(), env);
        assert_eq!(resolved.model, Model::Gpt35Turbo);
        assert_eq!(resolved.export_dir, PathBuf::from("/tmp/env-exports"));
    }

    #[test]
    fn test_cli_beats_env() {
        let env = env_of(&[(MODEL_ENV, "gpt-3.5-turbo"), (EXPORT_DIR_ENV, "/tmp/env-exports")]);
        let cli = CliOverrides {
            model: Some(Model::Claude3Sonnet),
            export_dir: Some(PathBuf::from("/tmp/cli-exports")),
            ..Default::default()
        };
        let resolved = resolve_with(&file_config(), &cli, env);
        assert_eq!(resolved.model, Model::Claude3Sonnet);
        assert_eq!(resolved.export_dir, PathBuf::from("/tmp/cli-exports"));
    }

    #[test]
    fn test_unknown_env_model_falls_back() {
        let env = env_of(&[(MODEL_ENV, "gpt-9")]);
        let resolved = resolve_with(&file_config(), &CliOverrides::default(), &env);
        assert_eq!(resolved.model, Model::Claude3Opus);

        let resolved = resolve_with(&PromptpadConfig::default(), &CliOverrides::default(), &env);
        assert_eq!(resolved.model, Model::Gpt4);
    }

    #[test]
    fn test_config_file_used_without_env() {
        let resolved = resolve_with(&file_config(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.model, Model::Claude3Opus);
        assert_eq!(resolved.export_dir, PathBuf::from("/tmp/file-exports"));
    }

    #[test]
    fn test_default_config_parses() {
        let config = PromptpadConfig::default();
        assert!(config.general.default_model.is_none());
        assert!(config.storage.export_dir.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = PromptpadConfig::default();
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.parameters, GenerationParameters::default());
        assert_eq!(resolved.response_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PromptpadConfig {
            general: GeneralConfig {
                default_model: Some("claude-3-opus".to_string()),
                temperature: Some(0.2),
                max_tokens: Some(400),
                response_delay_ms: Some(10),
            },
            storage: StorageConfig {
                export_dir: Some("/tmp/promptpad-exports".to_string()),
                preferences_file: None,
            },
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.parameters.temperature(), 0.2);
        assert_eq!(resolved.parameters.max_tokens(), 400);
        assert_eq!(resolved.response_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = PromptpadConfig {
            general: GeneralConfig {
                default_model: Some("claude-3-opus".to_string()),
                temperature: Some(0.2),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            model: Some(Model::Llama3_70b),
            temperature: Some(0.9),
            export_dir: Some(PathBuf::from("/tmp/cli-exports")),
            ..Default::default()
        };
        let resolved = resolve_with(&config, &cli, no_env);
        assert_eq!(resolved.model, Model::Llama3_70b);
        assert_eq!(resolved.parameters.temperature(), 0.9);
        assert_eq!(resolved.export_dir, PathBuf::from("/tmp/cli-exports"));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = PromptpadConfig {
            general: GeneralConfig {
                temperature: Some(3.5),
                max_tokens: Some(10),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.parameters.temperature(), 1.0);
        assert_eq!(resolved.parameters.max_tokens(), 100);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        assert_eq!(parse_model("gpt-9"), None);
        assert_eq!(parse_model(" gpt-4 "), Some(Model::Gpt4));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[general]
default_model = "gpt-3.5-turbo"
"#;
        let config: PromptpadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_model.as_deref(), Some("gpt-3.5-turbo"));
        assert!(config.general.temperature.is_none());
        assert!(config.storage.export_dir.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
default_model = "llama-3-70b"
temperature = 0.4
max_tokens = 1200
response_delay_ms = 250

[storage]
export_dir = "/tmp/out"
preferences_file = "prefs.json"
"#;
        let config: PromptpadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.max_tokens, Some(1200));
        assert_eq!(config.general.response_delay_ms, Some(250));
        assert_eq!(config.storage.preferences_file.as_deref(), Some("prefs.json"));
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.general.default_model.is_none());

        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.contains("# default_model"));
        // Everything is commented out, so it parses to defaults
        let reparsed = load_config_from(&path).unwrap();
        assert!(reparsed.general.temperature.is_none());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\ntemperature = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/exports"), home.join("exports"));
        }
    }
}
