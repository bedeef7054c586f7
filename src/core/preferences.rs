//! # Preferences
//!
//! Durable key-value storage for user preferences. Today that is a single
//! value: the colour theme, stored under [`THEME_KEY`].
//!
//! The on-disk form is a flat JSON object at `~/.promptpad/preferences.json`:
//!
//! ```json
//! { "promptpad.theme": "dark" }
//! ```
//!
//! Storage problems never reach the user. A missing or unreadable file loads
//! as the default theme; a failed write is logged and dropped.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Fixed storage key for the theme.
pub const THEME_KEY: &str = "promptpad.theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// A string-to-string store that outlives the session.
pub trait PreferenceBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// JSON-file backed store.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.promptpad/preferences.json`, or `None` without a home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".promptpad").join("preferences.json"))
    }

    fn read_all(&self) -> io::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl PreferenceBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("Failed to read preferences {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        // A corrupt file is replaced rather than blocking every future write.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// In-process store. Used when no home directory exists, and in tests.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("preference store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Theme persistence on top of any backend.
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    /// File store at `path`, or an in-memory store when there is no path.
    pub fn open(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => {
                debug!("Preferences at {}", path.display());
                Self::new(Box::new(FileBackend::new(path)))
            }
            None => {
                warn!("No preferences path available, theme will not persist");
                Self::new(Box::new(MemoryBackend::new()))
            }
        }
    }

    /// Persisted theme, or `Light` if absent or unrecognised.
    pub fn load(&self) -> Theme {
        match self.backend.get(THEME_KEY) {
            Some(value) => Theme::parse(&value).unwrap_or_else(|| {
                warn!("Ignoring unknown theme value {:?}", value);
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    /// Writes the theme. Failures are logged and otherwise ignored.
    pub fn save(&self, theme: Theme) {
        if let Err(e) = self.backend.set(THEME_KEY, theme.as_str()) {
            warn!("Failed to persist theme: {}", e);
        } else {
            debug!("Theme saved: {}", theme.as_str());
        }
    }
}
