// File: src/core/board.rs
use crate::core::catalog::PictogramCatalog;
use crate::core::types::{Pictogram, PictogramId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_BOARD_ID: &str = "default";
pub const DEFAULT_BOARD_NAME: &str = "Tots els pictogrames";

/// A user-curated ordering of catalog pictograms, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub pictogram_ids: Vec<PictogramId>,
    #[serde(default = "now_millis")]
    pub created_at: u64,
    #[serde(default = "now_millis")]
    pub last_modified: u64,
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Board {
    pub fn new(name: impl Into<String>, pictogram_ids: Vec<PictogramId>) -> Self {
        let now = now_millis();
        Self {
            id: format!("board_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            pictogram_ids,
            created_at: now,
            last_modified: now,
        }
    }

    /// The "all pictograms" board, in catalog order.
    pub fn create_default(catalog: &PictogramCatalog) -> Self {
        let now = now_millis();
        Self {
            id: DEFAULT_BOARD_ID.to_string(),
            name: DEFAULT_BOARD_NAME.to_string(),
            pictogram_ids: catalog.all_pictograms().iter().map(|p| p.id.clone()).collect(),
            created_at: now,
            last_modified: now,
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_BOARD_ID
    }

    pub fn touch(&mut self) {
        // Never move backwards, even if the clock does.
        self.last_modified = now_millis().max(self.last_modified);
    }
}

/// Board ids mapped through the catalog, in board order. Ids the catalog no
/// longer knows are dropped.
pub fn resolve_pictograms<'c>(board: &Board, catalog: &'c PictogramCatalog) -> Vec<&'c Pictogram> {
    board
        .pictogram_ids
        .iter()
        .filter_map(|id| catalog.find_by_id(id))
        .collect()
}

/// Ids on the board that the catalog cannot resolve.
pub fn dangling_ids<'b>(board: &'b Board, catalog: &PictogramCatalog) -> Vec<&'b str> {
    board
        .pictogram_ids
        .iter()
        .filter(|id| catalog.find_by_id(id).is_none())
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GrammarType;
    use proptest::prelude::*;

    fn catalog_of(ids: &[&str]) -> PictogramCatalog {
        let mut catalog = PictogramCatalog::new();
        catalog.categories.insert(
            "all".into(),
            ids.iter().map(|id| Pictogram::new(*id, GrammarType::Noun)).collect(),
        );
        catalog
    }

    #[test]
    fn resolve_drops_deleted_pictograms() {
        let catalog = catalog_of(&["a", "b", "c"]);
        let board = Board::new("test", vec!["c".into(), "gone".into(), "a".into(), "c".into()]);
        let ids: Vec<_> = resolve_pictograms(&board, &catalog).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "c"]);
        assert_eq!(dangling_ids(&board, &catalog), vec!["gone"]);
    }

    #[test]
    fn default_board_lists_catalog() {
        let catalog = catalog_of(&["x", "y"]);
        let board = Board::create_default(&catalog);
        assert!(board.is_default());
        assert_eq!(board.pictogram_ids, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn timestamps_default_when_missing() {
        let board: Board = serde_json::from_str(r#"{"id":"b","name":"B","pictogramIds":["a"]}"#).unwrap();
        assert!(board.created_at > 0);
        assert_ne!(Board::new("x", vec![]).id, Board::new("x", vec![]).id);
    }

    proptest! {
        #[test]
        fn resolve_preserves_board_order(
            catalog_ids in proptest::collection::vec("[a-e]", 0..8),
            board_ids in proptest::collection::vec("[a-h]", 0..12),
        ) {
            let refs: Vec<&str> = catalog_ids.iter().map(String::as_str).collect();
            let catalog = catalog_of(&refs);
            let board = Board::new("p", board_ids.clone());
            let resolved: Vec<String> = resolve_pictograms(&board, &catalog)
                .iter()
                .map(|p| p.id.clone())
                .collect();
            let expected: Vec<String> = board_ids
                .into_iter()
                .filter(|id| catalog_ids.contains(id))
                .collect();
            prop_assert_eq!(resolved, expected);
        }

        #[test]
        fn find_by_id_matches_query(
            catalog_ids in proptest::collection::vec("[a-e]", 0..8),
            query in "[a-h]",
        ) {
            let refs: Vec<&str> = catalog_ids.iter().map(String::as_str).collect();
            let catalog = catalog_of(&refs);
            match catalog.find_by_id(&query) {
                Some(p) => {
                    prop_assert_eq!(&p.id, &query);
                }
                None => {
                    prop_assert!(!catalog_ids.contains(&query));
                }
            }
        }
    }
}
