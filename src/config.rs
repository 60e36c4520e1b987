// File: src/config.rs
use crate::core::composer::ComposerKind;
use crate::error::{AacError, Result};
use crate::persistence::{DataLayout, PACKAGED_CATALOG};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DATA_DIR_ENV: &str = "AAC_DATA_DIR";
pub const COMPOSER_ENV: &str = "AAC_COMPOSER";
pub const LOG_ENV: &str = "AAC_LOG";
const APP_DIR_NAME: &str = "aac-phrase-engine";
const FALLBACK_DATA_DIR: &str = "aac-data";

/// Start-up choices for an [`crate::AacEngine`].
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub composer: ComposerKind,
    /// Packaged catalog document (JSON text).
    pub packaged_catalog: String,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            composer: ComposerKind::default(),
            packaged_catalog: PACKAGED_CATALOG.to_string(),
        }
    }

    pub fn with_composer(mut self, composer: ComposerKind) -> Self {
        self.composer = composer;
        self
    }

    /// Replaces the compiled-in catalog with a file on disk.
    pub fn with_packaged_catalog_file(mut self, path: &Path) -> Result<Self> {
        self.packaged_catalog = fs::read_to_string(path).map_err(|e| AacError::io(path, e))?;
        Ok(self)
    }

    /// Flag, then environment, then platform defaults.
    pub fn resolve(data_dir: Option<PathBuf>, composer: Option<ComposerKind>) -> Self {
        let data_dir = data_dir
            .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let composer = composer.unwrap_or_else(|| match env::var(COMPOSER_ENV) {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!(%value, "unknown composer in {}, using default", COMPOSER_ENV);
                ComposerKind::default()
            }),
            Err(_) => ComposerKind::default(),
        });

        Self::new(data_dir).with_composer(composer)
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_dir)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Stderr logging filtered by `AAC_LOG` (default `warn`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/aac")), Some(ComposerKind::Llm));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/aac"));
        assert_eq!(config.composer, ComposerKind::Llm);
        assert_eq!(config.layout().settings_file(), PathBuf::from("/tmp/aac/settings.json"));
    }

    #[test]
    fn packaged_catalog_file_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cat.json");
        fs::write(&path, r#"{"categories":{}}"#).unwrap();
        let config = Config::new(dir.path()).with_packaged_catalog_file(&path).unwrap();
        assert_eq!(config.packaged_catalog, r#"{"categories":{}}"#);
        assert!(Config::new(dir.path())
            .with_packaged_catalog_file(&dir.path().join("none.json"))
            .is_err());
    }
}
