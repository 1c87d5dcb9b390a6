//! Reveal controller - how many filtered results are currently shown.
//!
//! The trigger (a "load more" button, an end-of-list sentinel) belongs to
//! the view. The controller only tracks the count: it grows by one page per
//! `load_more` and snaps back to one page whenever the result sequence it
//! last saw changes.

use std::num::NonZeroUsize;

use catalog_model::ItemId;
use tracing::debug;

/// Where the reveal window stands relative to the result length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// No results at all.
    Empty,
    /// Some results are still hidden.
    Partial,
    /// Every result is visible.
    Complete,
}

#[derive(Debug, Clone)]
pub struct RevealController {
    page_size: NonZeroUsize,
    visible_count: usize,
    seen: Vec<ItemId>,
}

impl RevealController {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            visible_count: page_size.get(),
            seen: Vec::new(),
        }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Raw tracked count. May exceed a short result; use
    /// [`RevealController::visible_len`] for the rendered length.
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Compare `results` with the last sequence seen and reset to one page
    /// if they differ in length or members. Returns whether a reset happened.
    pub fn sync(&mut self, results: &[ItemId]) -> bool {
        if self.seen.as_slice() == results {
            return false;
        }
        self.seen = results.to_vec();
        self.reset();
        debug!(
            total = results.len(),
            visible = self.visible_count,
            "reveal window reset"
        );
        true
    }

    pub fn reset(&mut self) {
        self.visible_count = self.page_size.get();
    }

    /// Reveal one more page, capped at `total`. No-op once complete.
    /// Returns whether more items became visible.
    pub fn load_more(&mut self, total: usize) -> bool {
        if self.visible_count >= total {
            return false;
        }
        self.visible_count = (self.visible_count + self.page_size.get()).min(total);
        debug!(total, visible = self.visible_count, "revealed more results");
        true
    }

    pub fn visible_len(&self, total: usize) -> usize {
        self.visible_count.min(total)
    }

    pub fn phase(&self, total: usize) -> RevealPhase {
        if total == 0 {
            RevealPhase::Empty
        } else if self.visible_len(total) < total {
            RevealPhase::Partial
        } else {
            RevealPhase::Complete
        }
    }

    /// The visible prefix of `results`.
    pub fn visible_slice<'a, T>(&self, results: &'a [T]) -> &'a [T] {
        &results[..self.visible_len(results.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(size: usize) -> NonZeroUsize {
        NonZeroUsize::new(size).unwrap()
    }

    fn ids(prefix: &str, count: usize) -> Vec<ItemId> {
        (0..count)
            .map(|n| ItemId::new(format!("{prefix}-{n}")).unwrap())
            .collect()
    }

    #[test]
    fn advances_by_page_and_caps_at_total() {
        let results = ids("a", 14);
        let mut reveal = RevealController::new(page(6));
        reveal.sync(&results);
        assert_eq!(reveal.visible_slice(&results).len(), 6);
        assert_eq!(reveal.phase(results.len()), RevealPhase::Partial);

        assert!(reveal.load_more(results.len()));
        assert_eq!(reveal.visible_count(), 12);
        assert!(reveal.load_more(results.len()));
        assert_eq!(reveal.visible_count(), 14);
        assert_eq!(reveal.phase(results.len()), RevealPhase::Complete);
        assert!(!reveal.load_more(results.len()));
        assert_eq!(reveal.visible_count(), 14);
    }

    #[test]
    fn resets_to_page_size_when_results_change() {
        let a = ids("a", 20);
        let b = ids("b", 9);
        let mut reveal = RevealController::new(page(6));
        reveal.sync(&a);
        reveal.load_more(a.len());
        assert_eq!(reveal.visible_count(), 12);

        assert!(reveal.sync(&b));
        assert_eq!(reveal.visible_count(), 6);
    }

    #[test]
    fn same_length_different_members_still_resets() {
        let mut a = ids("a", 10);
        let mut reveal = RevealController::new(page(4));
        reveal.sync(&a);
        reveal.load_more(a.len());
        assert!(!reveal.sync(&a));
        assert_eq!(reveal.visible_count(), 8);

        a.swap(0, 1);
        assert!(reveal.sync(&a));
        assert_eq!(reveal.visible_count(), 4);
    }

    #[test]
    fn short_and_empty_results() {
        let mut reveal = RevealController::new(page(6));
        let few = ids("a", 2);
        reveal.sync(&few);
        assert_eq!(reveal.visible_slice(&few).len(), 2);
        assert_eq!(reveal.phase(few.len()), RevealPhase::Complete);

        reveal.sync(&[]);
        assert_eq!(reveal.phase(0), RevealPhase::Empty);
        assert!(!reveal.load_more(0));
    }
}
