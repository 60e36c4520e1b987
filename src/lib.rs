// src/lib.rs

pub mod boards;
pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod images;
pub mod persistence;
pub mod speech;

pub use crate::config::Config;
pub use crate::core::board::{resolve_pictograms, Board, DEFAULT_BOARD_ID};
pub use crate::core::catalog::PictogramCatalog;
pub use crate::core::composer::{Composer, ComposerKind, PhraseComposer};
pub use crate::core::engine::AacEngine;
pub use crate::core::settings::AppSettings;
pub use crate::core::types::{GrammarType, Language, Pictogram};
pub use crate::error::{AacError, Result};
