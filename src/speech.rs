// File: src/speech.rs
use crate::core::settings::AppSettings;
use crate::core::types::Language;
use tracing::debug;

/// Share of the maximum volume used when the boost is on.
pub const BOOSTED_VOLUME: f32 = 0.9;

/// One request to the speech engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: Language,
    pub rate: f32,
    pub pitch: f32,
    pub volume_boost: bool,
}

impl Utterance {
    pub fn from_settings(text: impl Into<String>, settings: &AppSettings) -> Self {
        Self {
            text: text.into(),
            language: settings.language,
            rate: settings.speech_rate,
            pitch: settings.speech_pitch,
            volume_boost: settings.volume_boost,
        }
    }

    pub fn volume_hint(&self) -> Option<f32> {
        self.volume_boost.then_some(BOOSTED_VOLUME)
    }
}

/// The platform text-to-speech engine.
///
/// `speak` is fire-and-forget; a new call replaces whatever was pending.
pub trait SpeechEngine {
    fn speak(&mut self, utterance: &Utterance);
    fn stop(&mut self) {}
}

/// Drops every utterance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

impl SpeechEngine for SilentSpeech {
    fn speak(&mut self, utterance: &Utterance) {
        debug!(text = %utterance.text, lang = utterance.language.code(), "speech dropped");
    }
}
