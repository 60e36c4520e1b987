// File: src/images.rs
use crate::core::types::Pictogram;
use crate::error::{validate_file_id, AacError, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Custom pictogram images, one file per image, addressed by filename.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

/// What a pictogram cell should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictogramImage<'a> {
    Custom(PathBuf),
    Icon(&'a str),
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copies an acquired image into the store and returns its new filename.
    pub fn save_image(&self, mut source: impl Read) -> Result<String> {
        fs::create_dir_all(&self.dir).map_err(|e| AacError::io(&self.dir, e))?;
        let filename = format!("picto_{}.png", uuid::Uuid::new_v4().simple());
        let path = self.dir.join(&filename);

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| AacError::io(&self.dir, e))?;
        io::copy(&mut source, &mut temp_file).map_err(|e| AacError::io(&path, e))?;
        temp_file.persist(&path).map_err(|e| AacError::io(&path, e.error))?;

        debug!(%filename, "image saved");
        Ok(filename)
    }

    pub fn image_path(&self, filename: &str) -> Result<PathBuf> {
        validate_file_id(filename)?;
        Ok(self.dir.join(filename))
    }

    pub fn image_exists(&self, filename: &str) -> bool {
        self.image_path(filename).map(|p| p.is_file()).unwrap_or(false)
    }

    pub fn delete_image(&self, filename: &str) -> bool {
        let Ok(path) = self.image_path(filename) else {
            return false;
        };
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not delete image");
                false
            }
        }
    }

    /// Custom image if its file is present, otherwise the packaged icon.
    pub fn display_image<'a>(&self, pictogram: &'a Pictogram) -> PictogramImage<'a> {
        match pictogram.custom_image_path.as_deref() {
            Some(name) if self.image_exists(name) => {
                PictogramImage::Custom(self.dir.join(name))
            }
            _ => PictogramImage::Icon(&pictogram.icon_res),
        }
    }
}
