// File: src/persistence.rs
use crate::core::catalog::PictogramCatalog;
use crate::error::{AacError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const CATALOG_FILENAME: &str = "pictogram_catalog.json";
pub const BOARDS_DIR: &str = "boards";
pub const BOARD_PREFS_FILENAME: &str = "board_prefs.json";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const IMAGES_DIR: &str = "pictogram_images";

/// Catalog shipped with the crate, used until the user edits anything.
pub const PACKAGED_CATALOG: &str = include_str!("../assets/pictogram_catalog.json");

/// Where every document lives under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.root.join(CATALOG_FILENAME)
    }

    pub fn boards_dir(&self) -> PathBuf {
        self.root.join(BOARDS_DIR)
    }

    pub fn board_prefs_file(&self) -> PathBuf {
        self.root.join(BOARD_PREFS_FILENAME)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILENAME)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }
}

/// Writes `value` as pretty JSON, replacing `path` only once the whole
/// document is on disk.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| AacError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| AacError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| AacError::json(path, e))?;
        writer.flush().map_err(|e| AacError::io(path, e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| AacError::io(path, e.error))?;
    debug!(path = %path.display(), "document written");
    Ok(())
}

/// Reads a JSON document. A missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AacError::io(path, e)),
    };
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map(Some)
        .map_err(|e| AacError::json(path, e))
}

pub fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| AacError::io(parent_dir, e))?;
    let mut temp_file =
        NamedTempFile::new_in(parent_dir).map_err(|e| AacError::io(parent_dir, e))?;
    temp_file
        .write_all(text.as_bytes())
        .map_err(|e| AacError::io(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| AacError::io(path, e.error))?;
    Ok(())
}

pub fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AacError::io(path, e)),
    }
}

/// Loads and saves the pictogram catalog.
///
/// The device copy overrides the packaged one as soon as it exists.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    override_path: PathBuf,
    packaged_json: String,
}

impl CatalogStore {
    pub fn new(override_path: impl Into<PathBuf>) -> Self {
        Self::with_packaged(override_path, PACKAGED_CATALOG)
    }

    pub fn with_packaged(override_path: impl Into<PathBuf>, packaged_json: impl Into<String>) -> Self {
        Self {
            override_path: override_path.into(),
            packaged_json: packaged_json.into(),
        }
    }

    pub fn override_path(&self) -> &Path {
        &self.override_path
    }

    pub fn has_override(&self) -> bool {
        self.override_path.exists()
    }

    /// Never fails: a broken override falls back to the packaged catalog,
    /// a broken packaged catalog to an empty one.
    pub fn load(&self) -> PictogramCatalog {
        match read_json::<PictogramCatalog>(&self.override_path) {
            Ok(Some(catalog)) => return catalog,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "catalog override unreadable, using packaged catalog"),
        }
        self.load_packaged()
    }

    pub fn load_packaged(&self) -> PictogramCatalog {
        match serde_json::from_str(&self.packaged_json) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %AacError::PackagedCatalog(e), "using an empty catalog");
                PictogramCatalog::default()
            }
        }
    }

    /// Rewrites the whole catalog document.
    pub fn save(&self, catalog: &PictogramCatalog) -> Result<()> {
        write_json_atomic(&self.override_path, catalog)
    }

    /// Drops the device copy so the packaged catalog is used again.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.override_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AacError::io(&self.override_path, e)),
        }
    }
}
