// File: src/core/grid.rs
use crate::core::types::{GrammarType, Pictogram};

/// One column block of the grouped layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarGroup<'a> {
    pub grammar: GrammarType,
    pub columns: usize,
    pub pictograms: Vec<&'a Pictogram>,
}

/// Block order and width, left to right.
const GROUPS: [(GrammarType, usize); 5] = [
    (GrammarType::Pronoun, 2),
    (GrammarType::Verb, 3),
    (GrammarType::Noun, 4),
    (GrammarType::Adjective, 2),
    (GrammarType::Shortcut, 1),
];

/// Splits pictograms into grammar blocks, keeping input order inside each.
/// Untagged pictograms have no block; empty blocks are left out.
pub fn group_by_grammar<'a>(pictograms: &[&'a Pictogram]) -> Vec<GrammarGroup<'a>> {
    GROUPS
        .iter()
        .filter_map(|&(grammar, columns)| {
            let members: Vec<&Pictogram> = pictograms
                .iter()
                .copied()
                .filter(|p| p.grammar_type == grammar)
                .collect();
            (!members.is_empty()).then(|| GrammarGroup { grammar, columns, pictograms: members })
        })
        .collect()
}

/// Flat layout: rows of at most `columns` cells.
pub fn rows<'a, T>(items: &'a [T], columns: usize) -> impl Iterator<Item = &'a [T]> {
    items.chunks(columns.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_in_fixed_order() {
        let ps = vec![
            Pictogram::new("comer", GrammarType::Verb),
            Pictogram::new("yo", GrammarType::Pronoun),
            Pictogram::new("x", GrammarType::Unknown),
            Pictogram::new("beber", GrammarType::Verb),
        ];
        let refs: Vec<&Pictogram> = ps.iter().collect();
        let groups = group_by_grammar(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].grammar, GrammarType::Pronoun);
        assert_eq!(groups[0].columns, 2);
        let verbs: Vec<_> = groups[1].pictograms.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(verbs, vec!["comer", "beber"]);
    }

    #[test]
    fn rows_chunk_and_guard_zero() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(rows(&items, 2).count(), 3);
        assert_eq!(rows(&items, 0).count(), 5);
    }
}
