//! An unordered bag of ready-to-schedule candidates with O(1) append and
//! swap-remove, caching the running score sum roulette selection needs.

use smallvec::SmallVec;

use crate::inst::InstId;

/// One candidate in the ready list.
#[derive(Copy, Clone, Debug)]
pub struct ReadyEntry {
    pub inst_id: InstId,
    pub ready_on: u32,
    pub heuristic_key: u64,
    pub score: f64,
}

/// Small DAGs have small ready lists in practice; the inline capacity avoids
/// a heap allocation for the common case while still growing for the rest.
const INLINE_CAPACITY: usize = 16;

#[derive(Clone, Debug, Default)]
pub struct ReadyList {
    entries: SmallVec<[ReadyEntry; INLINE_CAPACITY]>,
    score_sum: f64,
}

impl ReadyList {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            score_sum: 0.0,
        }
    }

    /// Appends `entry`. Capacity grows geometrically (via `SmallVec`'s own
    /// spill-to-heap behavior) on overflow of the inline buffer; the first
    /// spill past `INLINE_CAPACITY` is logged as a `ReadyListOverflow`
    /// warning (never fatal -- growth already happened).
    pub fn add(&mut self, entry: ReadyEntry) {
        self.score_sum += entry.score;
        self.entries.push(entry);
        if self.entries.len() == INLINE_CAPACITY + 1 {
            log::warn!(
                "{}",
                crate::error::SchedError::ReadyListOverflow(INLINE_CAPACITY)
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> &ReadyEntry {
        &self.entries[i]
    }

    /// Removes and returns the entry at `i`, filling its slot with the last
    /// entry (swap-remove). Indices are invalid across any `add`/`remove`.
    pub fn remove_at(&mut self, i: usize) -> ReadyEntry {
        let removed = self.entries.swap_remove(i);
        self.score_sum -= removed.score;
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.score_sum = 0.0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadyEntry> {
        self.entries.iter()
    }

    pub fn score_sum(&self) -> f64 {
        self.score_sum
    }

    /// Overwrites the score of entry `i` in place, keeping `score_sum`
    /// consistent. Used by the rescore step, which recomputes every entry's
    /// score from scratch each time a new instruction is committed.
    pub fn set_score(&mut self, i: usize, score: f64) {
        self.score_sum += score - self.entries[i].score;
        self.entries[i].score = score;
    }

    /// Overwrites the heuristic key of entry `i` in place (used when the
    /// dynamic LUC contribution is OR-ed in during rescoring).
    pub fn set_heuristic_key(&mut self, i: usize, key: u64) {
        self.entries[i].heuristic_key = key;
    }

    /// Index of the entry with the highest score, if any.
    pub fn argmax_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.score.partial_cmp(&b.score).unwrap())
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, score: f64) -> ReadyEntry {
        ReadyEntry {
            inst_id: InstId::from_u32(id),
            ready_on: 0,
            heuristic_key: 0,
            score,
        }
    }

    #[test]
    fn score_sum_consistent_after_mutations() {
        let mut list = ReadyList::new();
        list.add(entry(0, 1.0));
        list.add(entry(1, 2.0));
        list.add(entry(2, 3.0));
        assert_eq!(list.score_sum(), 6.0);

        list.remove_at(1);
        assert_eq!(list.score_sum(), 4.0);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn clear_is_idempotent_empty() {
        let mut list = ReadyList::new();
        list.add(entry(0, 5.0));
        list.remove_at(0);
        assert!(list.is_empty());
        assert_eq!(list.score_sum(), 0.0);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.score_sum(), 0.0);
    }

    #[test]
    fn argmax_finds_highest_score() {
        let mut list = ReadyList::new();
        list.add(entry(0, 1.0));
        list.add(entry(1, 9.0));
        list.add(entry(2, 3.0));
        assert_eq!(list.argmax_index(), Some(1));
    }

    #[test]
    fn set_score_keeps_sum_consistent() {
        let mut list = ReadyList::new();
        list.add(entry(0, 1.0));
        list.add(entry(1, 2.0));
        list.set_score(0, 5.0);
        assert_eq!(list.score_sum(), 7.0);
    }
}
