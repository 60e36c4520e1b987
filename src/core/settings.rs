// File: src/core/settings.rs
use crate::core::types::Language;
use crate::error::Result;
use crate::persistence::{read_json, write_json_atomic};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const MIN_GRID_COLUMNS: u32 = 1;
pub const MAX_GRID_COLUMNS: u32 = 16;

/// User preferences. A missing or unreadable key takes its default on load
/// without disturbing the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSettings", rename_all = "camelCase")]
pub struct AppSettings {
    pub language: Language,
    pub speech_rate: f32,
    pub speech_pitch: f32,
    pub auto_speak: bool,
    pub show_labels: bool,
    pub volume_boost: bool,
    pub grid_columns: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::Spanish,
            speech_rate: 1.0,
            speech_pitch: 1.0,
            auto_speak: true,
            show_labels: true,
            volume_boost: false,
            grid_columns: 4,
        }
    }
}

/// On-disk form of [`AppSettings`], read one field at a time.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct StoredSettings {
    #[serde(deserialize_with = "lenient")]
    language: Option<String>,
    #[serde(deserialize_with = "lenient")]
    speech_rate: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    speech_pitch: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    auto_speak: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    show_labels: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    volume_boost: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    grid_columns: Option<u32>,
}

/// `None` for a value of the wrong shape instead of an error.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(%value, error = %e, "ignoring unreadable setting");
            Ok(None)
        }
    }
}

impl From<StoredSettings> for AppSettings {
    fn from(stored: StoredSettings) -> Self {
        let defaults = AppSettings::default();
        let language = stored.language.and_then(|code| {
            let parsed = Language::from_code(&code);
            if parsed.is_none() {
                warn!(%code, "unknown language in settings, using default");
            }
            parsed
        });
        Self {
            language: language.unwrap_or(defaults.language),
            speech_rate: finite_or(stored.speech_rate, defaults.speech_rate),
            speech_pitch: finite_or(stored.speech_pitch, defaults.speech_pitch),
            auto_speak: stored.auto_speak.unwrap_or(defaults.auto_speak),
            show_labels: stored.show_labels.unwrap_or(defaults.show_labels),
            volume_boost: stored.volume_boost.unwrap_or(defaults.volume_boost),
            grid_columns: stored.grid_columns.unwrap_or(defaults.grid_columns),
        }
    }
}

fn finite_or(value: Option<f32>, fallback: f32) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// For UI callers; the store keeps whatever it is given.
pub fn clamp_grid_columns(columns: u32) -> u32 {
    columns.clamp(MIN_GRID_COLUMNS, MAX_GRID_COLUMNS)
}

type Observer = Box<dyn FnMut(&AppSettings)>;

/// Owns the settings record and writes it back whole on every change.
pub struct SettingsManager {
    path: PathBuf,
    current: AppSettings,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("path", &self.path)
            .field("current", &self.current)
            .finish()
    }
}

impl SettingsManager {
    /// Loads the record at `path`; anything unreadable yields defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match read_json::<AppSettings>(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => AppSettings::default(),
            Err(e) => {
                warn!(error = %e, "settings unreadable, using defaults");
                AppSettings::default()
            }
        };
        Self { path, current, observers: Vec::new() }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.current
    }

    /// Replaces the record, persists it and notifies observers. The
    /// in-memory value changes even if the write fails.
    ///
    /// A non-finite rate or pitch cannot be stored, so the previous value is
    /// kept for that field.
    pub fn update(&mut self, mut settings: AppSettings) -> Result<()> {
        if !settings.speech_rate.is_finite() {
            warn!(rate = settings.speech_rate, "ignoring non-finite speech rate");
            settings.speech_rate = self.current.speech_rate;
        }
        if !settings.speech_pitch.is_finite() {
            warn!(pitch = settings.speech_pitch, "ignoring non-finite speech pitch");
            settings.speech_pitch = self.current.speech_pitch;
        }
        self.current = settings;
        for observer in self.observers.iter_mut() {
            observer(&self.current);
        }
        debug!(settings = ?self.current, "settings updated");
        write_json_atomic(&self.path, &self.current)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&AppSettings) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn modify(&mut self, change: impl FnOnce(&mut AppSettings)) -> Result<()> {
        let mut next = self.current.clone();
        change(&mut next);
        self.update(next)
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.modify(|s| s.language = language)
    }

    pub fn set_speech_rate(&mut self, rate: f32) -> Result<()> {
        self.modify(|s| s.speech_rate = rate)
    }

    pub fn set_speech_pitch(&mut self, pitch: f32) -> Result<()> {
        self.modify(|s| s.speech_pitch = pitch)
    }

    pub fn set_auto_speak(&mut self, enabled: bool) -> Result<()> {
        self.modify(|s| s.auto_speak = enabled)
    }

    pub fn set_show_labels(&mut self, enabled: bool) -> Result<()> {
        self.modify(|s| s.show_labels = enabled)
    }

    pub fn set_volume_boost(&mut self, enabled: bool) -> Result<()> {
        self.modify(|s| s.volume_boost = enabled)
    }

    pub fn set_grid_columns(&mut self, columns: u32) -> Result<()> {
        self.modify(|s| s.grid_columns = columns)
    }
}
