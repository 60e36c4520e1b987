// File: src/error.rs
use std::path::PathBuf;

/// Errors raised by the stores and the composer.
///
/// Most of these never reach a user: the engine logs them and falls back to
/// a safe default. They are still typed so tests and the C boundary can see
/// what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum AacError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse packaged catalog: {0}")]
    PackagedCatalog(#[source] serde_json::Error),
    #[error("invalid identifier '{0}'")]
    InvalidId(String),
    #[error("the default board cannot be deleted")]
    DefaultBoardProtected,
    #[error("no board with id '{0}'")]
    UnknownBoard(String),
    #[error("{0} composer is not implemented")]
    NotImplemented(&'static str),
}

pub type Result<T> = std::result::Result<T, AacError>;

impl AacError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AacError::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        AacError::Json { path: path.into(), source }
    }
}

/// Ids end up as file names, so anything that could escape the directory is refused.
pub(crate) fn validate_file_id(id: &str) -> Result<()> {
    let bad = id.is_empty()
        || id.contains('/')
        || id.contains('\\')
        || id.contains("..")
        || id.chars().any(char::is_control);
    if bad {
        Err(AacError::InvalidId(id.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_ids() {
        assert!(validate_file_id("board_1").is_ok());
        assert!(validate_file_id("").is_err());
        assert!(validate_file_id("../etc").is_err());
        assert!(validate_file_id("a/b").is_err());
        assert!(validate_file_id("a\\b").is_err());
    }
}
