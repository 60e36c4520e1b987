// File: src/boards.rs
use crate::core::board::{resolve_pictograms, Board, DEFAULT_BOARD_ID};
use crate::core::catalog::PictogramCatalog;
use crate::core::types::Pictogram;
use crate::error::{validate_file_id, AacError, Result};
use crate::persistence::{read_json, read_text, write_json_atomic, write_text_atomic, DataLayout};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Persists boards (one JSON file each) and the active-board pointer.
#[derive(Debug, Clone)]
pub struct BoardManager {
    boards_dir: PathBuf,
    prefs_file: PathBuf,
}

impl BoardManager {
    pub fn new(layout: &DataLayout) -> Self {
        Self {
            boards_dir: layout.boards_dir(),
            prefs_file: layout.board_prefs_file(),
        }
    }

    fn board_file(&self, board_id: &str) -> Result<PathBuf> {
        validate_file_id(board_id)?;
        Ok(self.boards_dir.join(format!("{}.json", board_id)))
    }

    /// All readable boards, most recently modified first.
    pub fn list_boards(&self) -> Vec<Board> {
        let entries = match fs::read_dir(&self.boards_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(dir = %self.boards_dir.display(), error = %e, "cannot list boards");
                return Vec::new();
            }
        };

        let mut boards: Vec<Board> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
            .filter_map(|path| match read_json::<Board>(&path) {
                Ok(board) => board,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable board");
                    None
                }
            })
            .collect();

        boards.sort_by(|a, b| b.last_modified.cmp(&a.last_modified).then_with(|| a.id.cmp(&b.id)));
        boards
    }

    pub fn load_board(&self, board_id: &str) -> Option<Board> {
        let path = self.board_file(board_id).ok()?;
        match read_json::<Board>(&path) {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "board unreadable");
                None
            }
        }
    }

    pub fn save_board(&self, board: &Board) -> Result<()> {
        let path = self.board_file(&board.id)?;
        write_json_atomic(&path, board)?;
        debug!(board = %board.id, pictograms = board.pictogram_ids.len(), "board saved");
        Ok(())
    }

    /// Deletes a board. If it was the active one, the pointer moves to the
    /// most recent remaining board, or to a recreated default board.
    pub fn delete_board(&self, board_id: &str, catalog: &PictogramCatalog) -> Result<()> {
        if board_id == DEFAULT_BOARD_ID {
            return Err(AacError::DefaultBoardProtected);
        }
        let path = self.board_file(board_id)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AacError::UnknownBoard(board_id.to_string()))
            }
            Err(e) => return Err(AacError::io(path, e)),
        }
        info!(board = %board_id, "board deleted");

        if self.active_board_id() == board_id {
            match self.list_boards().into_iter().next() {
                Some(next) => self.set_active_board_id(&next.id)?,
                None => {
                    let default = Board::create_default(catalog);
                    self.save_board(&default)?;
                    self.set_active_board_id(&default.id)?;
                }
            }
        }
        Ok(())
    }

    /// The active board id, or the default id when unset or unreadable.
    pub fn active_board_id(&self) -> String {
        match read_text(&self.prefs_file) {
            Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => DEFAULT_BOARD_ID.to_string(),
            Err(e) => {
                warn!(error = %e, "active board pointer unreadable");
                DEFAULT_BOARD_ID.to_string()
            }
        }
    }

    pub fn set_active_board_id(&self, board_id: &str) -> Result<()> {
        validate_file_id(board_id)?;
        write_text_atomic(&self.prefs_file, board_id)
    }

    /// Creates and activates the default board when there are no boards at all.
    pub fn ensure_default_board(&self, catalog: &PictogramCatalog) -> Result<()> {
        if !self.list_boards().is_empty() {
            return Ok(());
        }
        let default = Board::create_default(catalog);
        self.save_board(&default)?;
        self.set_active_board_id(&default.id)?;
        info!(pictograms = default.pictogram_ids.len(), "default board created");
        Ok(())
    }

    pub fn active_board(&self) -> Option<Board> {
        self.load_board(&self.active_board_id())
    }

    /// What the grid shows: the active board, or the whole catalog if the
    /// active board is gone.
    pub fn active_pictograms<'c>(&self, catalog: &'c PictogramCatalog) -> Vec<&'c Pictogram> {
        match self.active_board() {
            Some(board) => resolve_pictograms(&board, catalog),
            None => {
                warn!("no active board found, using all pictograms");
                catalog.all_pictograms()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::CatalogStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BoardManager, PictogramCatalog) {
        let dir = TempDir::new().unwrap();
        let layout = DataLayout::new(dir.path());
        let catalog = CatalogStore::new(layout.catalog_file()).load();
        (dir, BoardManager::new(&layout), catalog)
    }

    #[test]
    fn ensure_default_board_on_empty_list() {
        let (_dir, boards, catalog) = setup();
        boards.ensure_default_board(&catalog).unwrap();

        let listed = boards.list_boards();
        assert_eq!(listed.len(), 1);
        let expected: Vec<String> = catalog.all_pictograms().iter().map(|p| p.id.clone()).collect();
        assert_eq!(listed[0].pictogram_ids, expected);
        assert_eq!(boards.active_board_id(), DEFAULT_BOARD_ID);

        // Second call is a no-op.
        boards.ensure_default_board(&catalog).unwrap();
        assert_eq!(boards.list_boards().len(), 1);
    }

    #[test]
    fn unreadable_board_files_are_skipped() {
        let (dir, boards, _catalog) = setup();
        boards.save_board(&Board::new("Casa", vec!["yo".into()])).unwrap();
        fs::write(dir.path().join("boards").join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("boards").join("notes.txt"), "hi").unwrap();
        assert_eq!(boards.list_boards().len(), 1);
        assert!(boards.load_board("broken").is_none());
    }

    #[test]
    fn list_sorted_by_last_modified_desc() {
        let (_dir, boards, _catalog) = setup();
        let mut old = Board::new("old", vec![]);
        old.last_modified = 10;
        let mut new = Board::new("new", vec![]);
        new.last_modified = 20;
        boards.save_board(&old).unwrap();
        boards.save_board(&new).unwrap();
        let names: Vec<_> = boards.list_boards().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn default_board_cannot_be_deleted() {
        let (_dir, boards, catalog) = setup();
        boards.ensure_default_board(&catalog).unwrap();
        assert!(matches!(
            boards.delete_board(DEFAULT_BOARD_ID, &catalog),
            Err(AacError::DefaultBoardProtected)
        ));
        assert!(matches!(
            boards.delete_board("nope", &catalog),
            Err(AacError::UnknownBoard(_))
        ));
    }

    #[test]
    fn deleting_active_board_reassigns_pointer() {
        let (_dir, boards, catalog) = setup();
        boards.ensure_default_board(&catalog).unwrap();
        let school = Board::new("Escola", vec!["yo".into()]);
        boards.save_board(&school).unwrap();
        boards.set_active_board_id(&school.id).unwrap();

        boards.delete_board(&school.id, &catalog).unwrap();
        assert_eq!(boards.active_board_id(), DEFAULT_BOARD_ID);
    }

    #[test]
    fn deleting_last_board_recreates_default() {
        let (dir, boards, catalog) = setup();
        let only = Board::new("Solo", vec![]);
        boards.save_board(&only).unwrap();
        boards.set_active_board_id(&only.id).unwrap();
        assert!(!dir.path().join("boards").join("default.json").exists());

        boards.delete_board(&only.id, &catalog).unwrap();
        assert_eq!(boards.active_board_id(), DEFAULT_BOARD_ID);
        assert!(boards.load_board(DEFAULT_BOARD_ID).is_some());
    }

    #[test]
    fn active_pictograms_fall_back_to_catalog() {
        let (_dir, boards, catalog) = setup();
        boards.set_active_board_id("missing").unwrap();
        assert_eq!(boards.active_pictograms(&catalog).len(), catalog.all_pictograms().len());

        let board = Board::new("Menjar", vec!["poma".into(), "borrat".into(), "galeta".into()]);
        boards.save_board(&board).unwrap();
        boards.set_active_board_id(&board.id).unwrap();
        let ids: Vec<_> = boards.active_pictograms(&catalog).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["poma", "galeta"]);
    }

    #[test]
    fn rejects_path_traversal_ids() {
        let (_dir, boards, _catalog) = setup();
        let mut board = Board::new("x", vec![]);
        board.id = "../escape".into();
        assert!(matches!(boards.save_board(&board), Err(AacError::InvalidId(_))));
        assert!(boards.set_active_board_id("a/b").is_err());
    }
}
