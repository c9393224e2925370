//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! One entry per slot, indexed by `key % capacity`. A store overwrites the
//! resident entry when the slot is empty, the keys match, the new result is
//! at least as deep, or the resident was written during an earlier search.
//! Otherwise the resident is kept and the new result is dropped.

use log::warn;

use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Score is a lower bound (the node failed high).
    Lower,
    /// Score is an upper bound (no move raised alpha).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
    generation: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub rejected_stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    current_generation: u8,
    stats: TTStats,
}

impl TranspositionTable {
    /// Table with room for `capacity` entries. If the memory cannot be
    /// obtained the table is created empty: every probe misses and every
    /// store is ignored.
    pub fn new(capacity: usize) -> Self {
        let mut entries: Vec<Option<TTEntry>> = Vec::new();
        if let Err(err) = entries.try_reserve_exact(capacity) {
            warn!("could not allocate a {capacity}-entry transposition table ({err}); running without one");
        } else {
            entries.resize(capacity, None);
        }
        Self {
            entries,
            current_generation: 0,
            stats: TTStats::default(),
        }
    }

    /// Table sized to roughly `size_mb` mebibytes.
    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1).saturating_mul(1024 * 1024);
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        Self::new((bytes / entry_size).max(1))
    }

    /// Start a new search: entries written before this call become
    /// replaceable regardless of depth.
    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.current_generation = 0;
        self.stats = TTStats::default();
    }

    /// Slot count fixed at construction.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for a zero-capacity table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.entries.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied slots per thousand, as reported by `info hashfull`.
    pub fn hashfull_permille(&self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample].iter().filter(|slot| slot.is_some()).count();
        used * 1000 / sample
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some((key % self.entries.len() as u64) as usize)
        }
    }

    /// Entry for `key` searched at least `depth` plies deep.
    pub fn probe(&mut self, key: u64, depth: u8) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key)?;
        let hit = self.entries[idx].filter(|e| e.key == key && e.depth >= depth);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Best move remembered for `key`, whatever depth it came from.
    pub fn best_move_hint(&self, key: u64) -> Option<Move> {
        let idx = self.idx(key)?;
        self.entries[idx]
            .filter(|e| e.key == key)
            .and_then(|e| e.best_move)
    }

    pub fn store(&mut self, key: u64, depth: u8, score: i32, bound: Bound, best_move: Option<Move>) {
        let Some(idx) = self.idx(key) else {
            return;
        };

        let replace = match self.entries[idx] {
            None => true,
            Some(existing) => {
                existing.key == key
                    || depth >= existing.depth
                    || existing.generation != self.current_generation
            }
        };

        if replace {
            self.stats.stores += 1;
            self.entries[idx] = Some(TTEntry {
                key,
                depth,
                score,
                bound,
                best_move,
                generation: self.current_generation,
            });
        } else {
            self.stats.rejected_stores += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TranspositionTable};
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::chess_move::Move;

    #[test]
    fn store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new(1024);
        let mv = Move::quiet(12, 28, PieceKind::Pawn);
        tt.store(123, 5, 42, Bound::Exact, Some(mv));

        let got = tt.probe(123, 5).expect("entry should exist");
        assert_eq!(got.key, 123);
        assert_eq!(got.depth, 5);
        assert_eq!(got.score, 42);
        assert_eq!(got.bound, Bound::Exact);
        assert_eq!(got.best_move, Some(mv));
        assert_eq!(tt.stats().hits, 1);
    }

    #[test]
    fn unknown_keys_and_shallow_entries_miss() {
        let mut tt = TranspositionTable::new(1024);
        assert!(tt.probe(77, 0).is_none());

        tt.store(77, 3, 10, Bound::Lower, None);
        assert!(tt.probe(77, 4).is_none(), "stored depth is too shallow");
        assert!(tt.probe(77, 3).is_some());
        assert!(tt.probe(77 + 1024, 0).is_none(), "same slot, different key");
    }

    #[test]
    fn shallower_result_for_another_key_keeps_the_resident() {
        let mut tt = TranspositionTable::new(16);
        tt.store(5, 6, 1, Bound::Exact, None);
        tt.store(5 + 16, 2, 9, Bound::Exact, None);

        assert_eq!(tt.probe(5, 0).expect("resident kept").score, 1);
        assert!(tt.probe(5 + 16, 0).is_none());
        assert_eq!(tt.stats().rejected_stores, 1);

        tt.store(5 + 16, 6, 9, Bound::Exact, None);
        assert_eq!(tt.probe(5 + 16, 0).expect("equal depth replaces").score, 9);
    }

    #[test]
    fn same_key_always_overwrites() {
        let mut tt = TranspositionTable::new(16);
        tt.store(3, 8, 1, Bound::Upper, None);
        tt.store(3, 1, 2, Bound::Exact, None);
        let got = tt.probe(3, 0).expect("entry should exist");
        assert_eq!(got.depth, 1);
        assert_eq!(got.score, 2);
    }

    #[test]
    fn entries_from_an_earlier_search_are_replaceable() {
        let mut tt = TranspositionTable::new(16);
        tt.store(4, 9, 1, Bound::Exact, None);
        tt.new_generation();
        tt.store(4 + 16, 1, 2, Bound::Exact, None);
        assert_eq!(tt.probe(4 + 16, 0).expect("stale entry replaced").score, 2);
    }

    #[test]
    fn best_move_hint_ignores_depth() {
        let mut tt = TranspositionTable::new(64);
        let mv = Move::quiet(6, 21, PieceKind::Knight);
        tt.store(9, 1, 0, Bound::Upper, Some(mv));
        assert!(tt.probe(9, 5).is_none());
        assert_eq!(tt.best_move_hint(9), Some(mv));
        assert_eq!(tt.best_move_hint(10), None);
    }

    #[test]
    fn zero_capacity_table_misses_and_ignores_stores() {
        let mut tt = TranspositionTable::new(0);
        tt.store(1, 4, 5, Bound::Exact, None);
        assert!(tt.is_empty());
        assert!(tt.probe(1, 0).is_none());
        assert_eq!(tt.best_move_hint(1), None);
        assert_eq!(tt.hashfull_permille(), 0);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut tt = TranspositionTable::new(32);
        tt.store(1, 1, 1, Bound::Exact, None);
        assert_eq!(tt.occupied(), 1);
        tt.clear();
        assert_eq!(tt.occupied(), 0);
        assert!(tt.probe(1, 0).is_none());
        assert_eq!(tt.len(), 32);
    }
}
