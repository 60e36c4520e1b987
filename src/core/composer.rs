// File: src/core/composer.rs
use crate::core::types::{Language, Pictogram};
use crate::error::{AacError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Turns a pictogram sequence into a sentence.
pub trait PhraseComposer {
    fn compose(&self, pictograms: &[Pictogram], language: Language) -> Result<String>;
}

/// Joins labels with single spaces. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedComposer;

impl RuleBasedComposer {
    pub fn join_labels(&self, pictograms: &[Pictogram], language: Language) -> String {
        pictograms
            .iter()
            .map(|p| p.label(language))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PhraseComposer for RuleBasedComposer {
    fn compose(&self, pictograms: &[Pictogram], language: Language) -> Result<String> {
        Ok(self.join_labels(pictograms, language))
    }
}

const MOCK_PHRASES: &[(&[&str], &str)] = &[
    (&["yo", "querer", "galleta"], "Yo quiero una galleta"),
    (&["yo", "querer", "comer", "galleta"], "Yo quiero comer una galleta"),
    (&["niña", "comer", "manzana"], "La niña come una manzana"),
    (&["yo", "comer", "manzana"], "Yo como una manzana"),
    (&["jo", "voler", "galeta"], "Jo vull una galeta"),
    (&["nena", "menjar", "poma"], "La nena menja una poma"),
];

/// Hand-written sentences for a few exact id sequences, rule-based otherwise.
///
/// The table is keyed by ids only; the ids already encode the language.
#[derive(Debug, Clone)]
pub struct MockComposer {
    phrases: HashMap<Vec<String>, String>,
    fallback: RuleBasedComposer,
}

impl Default for MockComposer {
    fn default() -> Self {
        let phrases = MOCK_PHRASES
            .iter()
            .map(|(ids, sentence)| {
                (ids.iter().map(|id| id.to_string()).collect(), sentence.to_string())
            })
            .collect();
        Self { phrases, fallback: RuleBasedComposer }
    }
}

impl MockComposer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, pictograms: &[Pictogram]) -> Option<&str> {
        let key: Vec<String> = pictograms.iter().map(|p| p.id.clone()).collect();
        self.phrases.get(&key).map(String::as_str)
    }
}

impl PhraseComposer for MockComposer {
    fn compose(&self, pictograms: &[Pictogram], language: Language) -> Result<String> {
        match self.lookup(pictograms) {
            Some(sentence) => Ok(sentence.to_string()),
            None => self.fallback.compose(pictograms, language),
        }
    }
}

/// Extension point for a language-model backend. Not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmComposer;

impl PhraseComposer for LlmComposer {
    fn compose(&self, _pictograms: &[Pictogram], _language: Language) -> Result<String> {
        Err(AacError::NotImplemented("LLM"))
    }
}

/// Which composer to build at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ComposerKind {
    #[value(name = "rule")]
    RuleBased,
    #[default]
    Mock,
    Llm,
}

impl FromStr for ComposerKind {
    type Err = AacError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rule" | "rule-based" | "rule_based" => Ok(ComposerKind::RuleBased),
            "mock" => Ok(ComposerKind::Mock),
            "llm" => Ok(ComposerKind::Llm),
            other => Err(AacError::InvalidId(other.to_string())),
        }
    }
}

impl fmt::Display for ComposerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComposerKind::RuleBased => "rule",
            ComposerKind::Mock => "mock",
            ComposerKind::Llm => "llm",
        })
    }
}

/// The composer in use, fixed when the engine is built.
#[derive(Debug, Clone)]
pub enum Composer {
    RuleBased(RuleBasedComposer),
    Mock(MockComposer),
    Llm(LlmComposer),
}

impl Composer {
    pub fn from_kind(kind: ComposerKind) -> Self {
        match kind {
            ComposerKind::RuleBased => Composer::RuleBased(RuleBasedComposer),
            ComposerKind::Mock => Composer::Mock(MockComposer::new()),
            ComposerKind::Llm => Composer::Llm(LlmComposer),
        }
    }

    pub fn kind(&self) -> ComposerKind {
        match self {
            Composer::RuleBased(_) => ComposerKind::RuleBased,
            Composer::Mock(_) => ComposerKind::Mock,
            Composer::Llm(_) => ComposerKind::Llm,
        }
    }
}

impl PhraseComposer for Composer {
    fn compose(&self, pictograms: &[Pictogram], language: Language) -> Result<String> {
        match self {
            Composer::RuleBased(c) => c.compose(pictograms, language),
            Composer::Mock(c) => c.compose(pictograms, language),
            Composer::Llm(c) => c.compose(pictograms, language),
        }
    }
}
