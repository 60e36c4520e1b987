// src/core/types.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// A stable pictogram identifier, unique within a catalog.
pub type PictogramId = String;

/// Languages a pictogram can be labelled and spoken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "ca")]
    Catalan,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Spanish, Language::Catalan, Language::English];

    /// Language used when a pictogram has no label in the requested one.
    pub const FALLBACK: Language = Language::Spanish;

    pub fn code(self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::Catalan => "ca",
            Language::English => "en",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Spanish => "Español",
            Language::Catalan => "Català",
            Language::English => "English",
        }
    }

    /// BCP-47 tag handed to the speech engine.
    pub fn locale_tag(self) -> &'static str {
        match self {
            Language::Spanish => "es-ES",
            Language::Catalan => "ca-ES",
            Language::English => "en-GB",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Grammar tag used for colour-coding and the grouped grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GrammarType {
    Pronoun,
    Verb,
    Noun,
    Adjective,
    Shortcut,
    #[default]
    Unknown,
}

impl GrammarType {
    pub fn tag(self) -> &'static str {
        match self {
            GrammarType::Pronoun => "pronoun",
            GrammarType::Verb => "verb",
            GrammarType::Noun => "noun",
            GrammarType::Adjective => "adjective",
            GrammarType::Shortcut => "shortcut",
            GrammarType::Unknown => "",
        }
    }

    pub fn color(self) -> PictogramColor {
        match self {
            GrammarType::Pronoun => PictogramColor::Yellow,
            GrammarType::Verb => PictogramColor::Green,
            GrammarType::Adjective => PictogramColor::Blue,
            GrammarType::Noun => PictogramColor::Orange,
            GrammarType::Shortcut => PictogramColor::Purple,
            GrammarType::Unknown => PictogramColor::Unknown,
        }
    }
}

impl From<String> for GrammarType {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pronoun" => GrammarType::Pronoun,
            "verb" => GrammarType::Verb,
            "noun" => GrammarType::Noun,
            "adjective" => GrammarType::Adjective,
            "shortcut" => GrammarType::Shortcut,
            _ => GrammarType::Unknown,
        }
    }
}

impl From<GrammarType> for String {
    fn from(grammar: GrammarType) -> Self {
        grammar.tag().to_string()
    }
}

/// Background colour of a pictogram cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictogramColor {
    Yellow,
    Green,
    Blue,
    Orange,
    Purple,
    Unknown,
}

impl PictogramColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PictogramColor::Yellow => (0xF4, 0xFA, 0x14),
            PictogramColor::Green => (0x4E, 0xFF, 0x58),
            PictogramColor::Blue => (0x4C, 0x8E, 0xFF),
            PictogramColor::Orange => (0xFF, 0x9E, 0x19),
            PictogramColor::Purple => (0xCE, 0x93, 0xD8),
            PictogramColor::Unknown => (0xE0, 0xE0, 0xE0),
        }
    }

    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// A symbol-plus-label unit representing one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pictogram {
    pub id: PictogramId,
    #[serde(default, deserialize_with = "known_labels")]
    pub labels: BTreeMap<Language, String>,
    #[serde(default)]
    pub icon_res: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_image_path: Option<String>,
    #[serde(default)]
    pub grammar_type: GrammarType,
}

/// Reads the label map, dropping languages this build does not know.
fn known_labels<'de, D>(deserializer: D) -> Result<BTreeMap<Language, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(code, label)| match Language::from_code(&code) {
            Some(language) => Some((language, label)),
            None => {
                warn!(%code, %label, "ignoring label in unknown language");
                None
            }
        })
        .collect())
}

impl Pictogram {
    pub fn new(id: impl Into<PictogramId>, grammar_type: GrammarType) -> Self {
        Self {
            id: id.into(),
            labels: BTreeMap::new(),
            icon_res: String::new(),
            custom_image_path: None,
            grammar_type,
        }
    }

    pub fn with_label(mut self, language: Language, label: impl Into<String>) -> Self {
        self.labels.insert(language, label.into());
        self
    }

    pub fn with_icon(mut self, icon_res: impl Into<String>) -> Self {
        self.icon_res = icon_res.into();
        self
    }

    /// Id for a pictogram created on the device.
    pub fn new_custom_id() -> PictogramId {
        format!("custom_{}", uuid::Uuid::new_v4().simple())
    }

    /// Label in `language`, then in the fallback language, then empty.
    pub fn label(&self, language: Language) -> &str {
        self.labels
            .get(&language)
            .or_else(|| self.labels.get(&Language::FALLBACK))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn color(&self) -> PictogramColor {
        self.grammar_type.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_spanish_then_empty() {
        let p = Pictogram::new("poma", GrammarType::Noun)
            .with_label(Language::Spanish, "manzana")
            .with_label(Language::Catalan, "poma");
        assert_eq!(p.label(Language::Catalan), "poma");
        assert_eq!(p.label(Language::English), "manzana");

        let bare = Pictogram::new("x", GrammarType::Unknown).with_label(Language::English, "x");
        assert_eq!(bare.label(Language::Catalan), "");
    }

    #[test]
    fn grammar_tags_parse_leniently() {
        let parsed: Vec<GrammarType> = serde_json::from_str(r#"["verb", "", "NOUN", "adverb"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![GrammarType::Verb, GrammarType::Unknown, GrammarType::Noun, GrammarType::Unknown]
        );
        assert_eq!(serde_json::to_string(&GrammarType::Unknown).unwrap(), r#""""#);
    }

    #[test]
    fn pictogram_json_shape() {
        let json = r#"{"id":"yo","labels":{"es":"yo","ca":"jo"},"iconRes":"ic_yo","grammarType":"pronoun"}"#;
        let p: Pictogram = serde_json::from_str(json).unwrap();
        assert_eq!(p.label(Language::Catalan), "jo");
        assert_eq!(p.color(), PictogramColor::Yellow);
        assert!(p.custom_image_path.is_none());
        assert_eq!(PictogramColor::Orange.hex(), "#FF9E19");
    }

    #[test]
    fn unknown_label_languages_are_dropped() {
        let json = r#"{"id":"gat","labels":{"ca":"gat","fr":"chat","xx":"?"},"grammarType":"noun"}"#;
        let p: Pictogram = serde_json::from_str(json).unwrap();
        assert_eq!(p.labels.len(), 1);
        assert_eq!(p.label(Language::Catalan), "gat");
        assert_eq!(p.label(Language::English), "");
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("CA"), Some(Language::Catalan));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::default(), Language::Spanish);
    }
}
