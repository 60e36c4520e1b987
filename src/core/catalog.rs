// File: src/core/catalog.rs
use crate::core::types::{Pictogram, PictogramId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The full pictogram library, grouped by category.
///
/// Categories keep the order they were loaded in, so saving a freshly loaded
/// catalog reproduces the same document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PictogramCatalog {
    pub categories: IndexMap<String, Vec<Pictogram>>,
}

impl PictogramCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    /// Every pictogram, category by category.
    pub fn all_pictograms(&self) -> Vec<&Pictogram> {
        self.categories.values().flatten().collect()
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn pictograms_in(&self, category: &str) -> &[Pictogram] {
        self.categories.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Linear scan; with duplicated ids the first one in category order wins.
    pub fn find_by_id(&self, id: &str) -> Option<&Pictogram> {
        self.categories.values().flatten().find(|p| p.id == id)
    }

    pub fn find_with_category(&self, id: &str) -> Option<(&str, &Pictogram)> {
        self.categories.iter().find_map(|(category, pictograms)| {
            pictograms
                .iter()
                .find(|p| p.id == id)
                .map(|p| (category.as_str(), p))
        })
    }

    /// Adds or replaces `pictogram` so that it ends up in `category`.
    ///
    /// Editing in place keeps its position; moving to another category
    /// removes it from the old one and appends it to the new one.
    pub fn upsert(&mut self, category: &str, pictogram: Pictogram) {
        let current = self
            .find_with_category(&pictogram.id)
            .map(|(c, _)| c.to_string());

        match current {
            Some(existing) if existing == category => {
                if let Some(slot) = self
                    .categories
                    .get_mut(category)
                    .and_then(|list| list.iter_mut().find(|p| p.id == pictogram.id))
                {
                    *slot = pictogram;
                }
            }
            Some(existing) => {
                if let Some(list) = self.categories.get_mut(&existing) {
                    list.retain(|p| p.id != pictogram.id);
                }
                // A duplicate may already sit in the target category.
                let target = self.categories.entry(category.to_string()).or_default();
                target.retain(|p| p.id != pictogram.id);
                target.push(pictogram);
            }
            None => {
                self.categories
                    .entry(category.to_string())
                    .or_default()
                    .push(pictogram);
            }
        }
    }

    /// Removes the first pictogram with `id`. Empty categories are kept.
    pub fn remove(&mut self, id: &str) -> Option<Pictogram> {
        for list in self.categories.values_mut() {
            if let Some(pos) = list.iter().position(|p| p.id == id) {
                return Some(list.remove(pos));
            }
        }
        None
    }

    /// Ids that appear more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<PictogramId> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for p in self.categories.values().flatten() {
            let count = seen.entry(p.id.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(p.id.clone());
            }
        }
        duplicates
    }
}
