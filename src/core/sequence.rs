// File: src/core/sequence.rs
use crate::core::types::Pictogram;
use tracing::debug;

/// Handle returned by [`PhraseSequence::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&[Pictogram])>;

/// The phrase being built from tapped pictograms.
///
/// Every mutation is applied first and then published, so observers only
/// ever see a complete sequence. No length cap.
#[derive(Default)]
pub struct PhraseSequence {
    pictograms: Vec<Pictogram>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for PhraseSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseSequence")
            .field("pictograms", &self.pictograms)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PhraseSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pictograms(&self) -> &[Pictogram] {
        &self.pictograms
    }

    pub fn len(&self) -> usize {
        self.pictograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictograms.is_empty()
    }

    /// Duplicates are allowed.
    pub fn append(&mut self, pictogram: Pictogram) {
        debug!(id = %pictogram.id, "phrase append");
        self.pictograms.push(pictogram);
        self.publish();
    }

    /// Out-of-range indices are ignored and nobody is notified.
    pub fn remove_at(&mut self, index: usize) -> Option<Pictogram> {
        if index >= self.pictograms.len() {
            return None;
        }
        let removed = self.pictograms.remove(index);
        debug!(index, id = %removed.id, "phrase remove");
        self.publish();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.pictograms.clear();
        self.publish();
    }

    /// Registers an observer called with the whole sequence after each change.
    pub fn subscribe(&mut self, observer: impl FnMut(&[Pictogram]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn publish(&mut self) {
        let snapshot = &self.pictograms;
        for (_, observer) in self.observers.iter_mut() {
            observer(snapshot);
        }
    }
}
