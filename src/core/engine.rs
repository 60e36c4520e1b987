use crate::boards::BoardManager;
use crate::config::Config;
use crate::core::board::Board;
use crate::core::catalog::PictogramCatalog;
use crate::core::composer::{Composer, PhraseComposer};
use crate::core::sequence::PhraseSequence;
use crate::core::settings::SettingsManager;
use crate::core::types::Pictogram;
use crate::error::{AacError, Result};
use crate::images::ImageStore;
use crate::persistence::CatalogStore;
use crate::speech::{SpeechEngine, Utterance};
use tracing::{info, warn};

// The engine owns every piece of state; callers hold it and pass it around.
// Writes are best-effort: failures are logged and the in-memory state stays.
pub struct AacEngine {
    catalog: PictogramCatalog,
    catalog_store: CatalogStore,
    pub boards: BoardManager,
    pub settings: SettingsManager,
    pub phrase: PhraseSequence,
    pub images: ImageStore,
    composer: Composer,
    speech: Box<dyn SpeechEngine>,
}

impl AacEngine {
    pub fn open(config: &Config, speech: Box<dyn SpeechEngine>) -> Self {
        let layout = config.layout();
        let catalog_store =
            CatalogStore::with_packaged(layout.catalog_file(), config.packaged_catalog.clone());
        let catalog = catalog_store.load();
        let duplicates = catalog.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(?duplicates, "duplicate pictogram ids, first occurrence wins");
        }

        let boards = BoardManager::new(&layout);
        if let Err(e) = boards.ensure_default_board(&catalog) {
            warn!(error = %e, "could not create the default board");
        }

        let settings = SettingsManager::load(layout.settings_file());
        info!(
            pictograms = catalog.all_pictograms().len(),
            categories = catalog.categories.len(),
            composer = %config.composer,
            "engine ready"
        );

        Self {
            catalog,
            catalog_store,
            boards,
            settings,
            phrase: PhraseSequence::new(),
            images: ImageStore::new(layout.images_dir()),
            composer: Composer::from_kind(config.composer),
            speech,
        }
    }

    pub fn catalog(&self) -> &PictogramCatalog {
        &self.catalog
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Pictograms of the active board, in display order.
    pub fn grid(&self) -> Vec<&Pictogram> {
        self.boards.active_pictograms(&self.catalog)
    }

    /// Adds a pictogram to the phrase and speaks its label if auto-speak is on.
    /// Returns `false` for ids the catalog does not know.
    pub fn tap(&mut self, pictogram_id: &str) -> bool {
        let Some(pictogram) = self.catalog.find_by_id(pictogram_id).cloned() else {
            warn!(id = %pictogram_id, "tap on unknown pictogram");
            return false;
        };
        let settings = self.settings.settings().clone();
        let label = pictogram.label(settings.language).to_string();
        self.phrase.append(pictogram);
        if settings.auto_speak {
            self.speech.speak(&Utterance::from_settings(label, &settings));
        }
        true
    }

    pub fn compose_phrase(&self) -> Result<String> {
        let language = self.settings.settings().language;
        self.composer.compose(self.phrase.pictograms(), language)
    }

    /// Composes the current phrase and hands it to the speech engine.
    pub fn speak_phrase(&mut self) -> Result<String> {
        let sentence = self.compose_phrase()?;
        let utterance = Utterance::from_settings(sentence.clone(), self.settings.settings());
        self.speech.speak(&utterance);
        Ok(sentence)
    }

    pub fn stop_speaking(&mut self) {
        self.speech.stop();
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Pictogram> {
        self.phrase.remove_at(index)
    }

    pub fn clear_phrase(&mut self) {
        self.phrase.clear();
    }

    pub fn switch_board(&mut self, board_id: &str) -> Result<()> {
        if self.boards.load_board(board_id).is_none() {
            return Err(AacError::UnknownBoard(board_id.to_string()));
        }
        self.boards.set_active_board_id(board_id)
    }

    /// Stores a board, bumping its modification time.
    pub fn save_board(&mut self, mut board: Board) -> Result<Board> {
        board.touch();
        self.boards.save_board(&board)?;
        Ok(board)
    }

    pub fn delete_board(&mut self, board_id: &str) -> Result<()> {
        self.boards.delete_board(board_id, &self.catalog)
    }

    /// Adds or edits a pictogram and rewrites the catalog document.
    pub fn upsert_pictogram(&mut self, category: &str, pictogram: Pictogram) {
        self.catalog.upsert(category, pictogram);
        self.persist_catalog();
    }

    /// Removes a pictogram and its custom image, if any.
    pub fn remove_pictogram(&mut self, pictogram_id: &str) -> Option<Pictogram> {
        let removed = self.catalog.remove(pictogram_id)?;
        if let Some(image) = removed.custom_image_path.as_deref() {
            self.images.delete_image(image);
        }
        self.persist_catalog();
        Some(removed)
    }

    pub fn reload_catalog(&mut self) {
        self.catalog = self.catalog_store.load();
    }

    /// Goes back to the packaged catalog.
    pub fn reset_catalog(&mut self) {
        if let Err(e) = self.catalog_store.reset() {
            warn!(error = %e, "could not remove catalog override");
        }
        self.reload_catalog();
    }

    fn persist_catalog(&self) {
        if let Err(e) = self.catalog_store.save(&self.catalog) {
            warn!(error = %e, "catalog not saved");
        }
    }
}
