//! Transform history: one generation slot per transform kind.

use crate::error::{NumsiftError, Result};
use crate::transform::TransformKind;

/// Ordered generations of a session's token list.
///
/// Slot `i` holds the output of `TransformKind::from_index(i)` applied to the
/// base in slot 0. Slots are filled lazily and overwritten by index, so the
/// history never grows past the transform table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformHistory {
    generations: Vec<Vec<String>>,
    current: usize,
}

impl Default for TransformHistory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TransformHistory {
    /// A history whose only generation is `base`.
    pub fn new(base: Vec<String>) -> Self {
        Self {
            generations: vec![base],
            current: 0,
        }
    }

    /// Collapses the history to a single committed base generation.
    pub fn reset(&mut self, base: Vec<String>) {
        self.generations.clear();
        self.generations.push(base);
        self.current = 0;
    }

    /// The committed base list (generation 0).
    pub fn base(&self) -> &[String] {
        &self.generations[0]
    }

    /// The active generation.
    pub fn current(&self) -> &[String] {
        &self.generations[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_kind(&self) -> TransformKind {
        TransformKind::from_index(self.current).unwrap_or(TransformKind::Original)
    }

    /// Number of filled generation slots, base included.
    pub fn slot_count(&self) -> usize {
        self.generations.len()
    }

    /// Applies the next transform in the cycle to the base list.
    ///
    /// The output lands in the slot for that transform, overwriting it if it
    /// was filled before, and becomes the active generation.
    ///
    /// # Errors
    ///
    /// Returns [`NumsiftError::NoData`] without mutating anything when the
    /// base list is empty.
    pub fn cycle(&mut self) -> Result<TransformKind> {
        if self.base().is_empty() {
            return Err(NumsiftError::no_data());
        }
        let kind = self.current_kind().next();
        let next = kind.index();
        let output = kind.apply(self.base());

        if next < self.generations.len() {
            self.generations[next] = output;
        } else {
            // Slots fill in table order starting from the base, so the next
            // missing slot is always the one we want.
            debug_assert_eq!(next, self.generations.len());
            self.generations.push(output);
        }
        self.current = next;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_distinct;
    use strum::EnumCount;

    #[test]
    fn test_empty_base_rejects_cycle() {
        let mut history = TransformHistory::default();
        let before = history.clone();
        assert!(history.cycle().unwrap_err().is_no_data());
        assert_eq!(history, before);
    }

    #[test]
    fn test_full_cycle_restores_base() {
        let base = extract_distinct("+14155550123 442071838750 +447700900123");
        let mut history = TransformHistory::new(base.clone());
        for _ in 0..TransformKind::COUNT {
            history.cycle().unwrap();
            assert!(history.slot_count() <= TransformKind::COUNT);
            assert!(history.current_index() < history.slot_count());
        }
        assert_eq!(history.current_index(), 0);
        assert_eq!(history.current(), base.as_slice());
        assert_eq!(history.slot_count(), TransformKind::COUNT);
    }

    #[test]
    fn test_scenario_cycle() {
        let mut history =
            TransformHistory::new(extract_distinct("call +14155550123 and 442071838750 now"));
        history.cycle().unwrap();
        assert_eq!(history.cycle().unwrap(), TransformKind::RemovePlus);
        assert_eq!(history.current(), ["14155550123", "442071838750"]);
        for _ in 0..3 {
            history.cycle().unwrap();
        }
        assert_eq!(history.current(), ["+14155550123", "442071838750"]);
    }

    #[test]
    fn test_second_lap_overwrites_slots() {
        let mut history = TransformHistory::new(vec!["5551234567".to_string()]);
        for _ in 0..7 {
            history.cycle().unwrap();
        }
        assert_eq!(history.slot_count(), TransformKind::COUNT);
        assert_eq!(history.current_kind(), TransformKind::RemovePlus);
        assert_eq!(history.current(), ["5551234567"]);
    }

    #[test]
    fn test_reset_collapses_history() {
        let mut history = TransformHistory::new(vec!["5551234567".to_string()]);
        history.cycle().unwrap();
        history.reset(vec!["6661234567".to_string()]);
        assert_eq!(history.slot_count(), 1);
        assert_eq!(history.current_index(), 0);
        assert_eq!(history.base(), ["6661234567"]);
    }

    #[test]
    fn test_base_slot_always_present() {
        let mut history = TransformHistory::default();
        assert_eq!(history.slot_count(), 1);
        assert!(history.base().is_empty());
        assert_eq!(history.current(), history.base());

        history.reset(Vec::new());
        assert_eq!(history.slot_count(), 1);
        assert_eq!(history.current_index(), 0);
    }
}
