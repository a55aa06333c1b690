#![forbid(unsafe_code)]

//! Key model: the ordered letter sequence that defines plot columns.
//!
//! A key may repeat letters (one letter, several columns) and may omit
//! letters (those letters cannot be encoded). Keys are replaced wholesale,
//! never edited in place.
//!
//! # Invariants
//!
//! 1. Every stored byte is an uppercase ASCII letter `A..=Z`.
//! 2. Length never exceeds [`MAX_KEY_LEN`].

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

/// Maximum number of letters retained by [`Key::normalize`].
pub const MAX_KEY_LEN: usize = 1000;

/// The default key, also used to count missing letters.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Summary counts shown next to the key editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyStats {
    /// Number of letters in the key.
    pub length: usize,
    /// Sum over letters of `occurrences - 1`, for letters seen more than once.
    pub duplicate_count: usize,
    /// Alphabet letters absent from the key.
    pub missing_count: usize,
}

/// A normalized cipher key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key {
    letters: Vec<u8>,
}

impl Key {
    /// Normalize arbitrary text into a key.
    ///
    /// Drops every character that is not an ASCII letter, upper-cases the
    /// rest and keeps at most [`MAX_KEY_LEN`] letters. Never fails; empty
    /// input yields an empty key.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let letters = raw
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase() as u8)
            .take(MAX_KEY_LEN)
            .collect();
        Self { letters }
    }

    /// The default `A..Z` key.
    #[must_use]
    pub fn alphabet() -> Self {
        Self::normalize(ALPHABET)
    }

    /// The empty key. Every letter is unmappable and every decode is empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            letters: Vec::new(),
        }
    }

    /// Number of letters (and therefore columns).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.letters).unwrap_or_default()
    }

    /// Letter stored at a column, if the column exists.
    #[inline]
    #[must_use]
    pub fn letter_at(&self, index: usize) -> Option<u8> {
        self.letters.get(index).copied()
    }

    /// Iterate over `(column, letter)` pairs in key order.
    pub fn columns(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.letters.iter().copied().enumerate()
    }

    /// Every column holding `letter`, ascending.
    #[must_use]
    pub fn positions_of(&self, letter: u8) -> Vec<usize> {
        self.letters
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| (l == letter).then_some(i))
            .collect()
    }

    /// Whether at least one column holds `letter`.
    #[must_use]
    pub fn contains(&self, letter: u8) -> bool {
        self.letters.contains(&letter)
    }

    /// Length, duplicate and missing-letter counts.
    #[must_use]
    pub fn stats(&self) -> KeyStats {
        let mut counts = [0usize; 26];
        for &l in &self.letters {
            counts[usize::from(l - b'A')] += 1;
        }
        KeyStats {
            length: self.letters.len(),
            duplicate_count: counts.iter().filter(|&&c| c > 1).map(|c| c - 1).sum(),
            missing_count: counts.iter().filter(|&&c| c == 0).count(),
        }
    }

    /// A uniformly random permutation of this key's letters.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut letters = self.letters.clone();
        letters.shuffle(rng);
        Self { letters }
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::alphabet()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.as_str()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn normalize_strips_non_letters_and_uppercases() {
        assert_eq!(Key::normalize("He11o, World!").as_str(), "HEOWORLD");
    }

    #[test]
    fn normalize_empty_and_symbol_only() {
        assert!(Key::normalize("").is_empty());
        assert!(Key::normalize("123 !? \u{e9}\u{df}").is_empty());
    }

    #[test]
    fn normalize_truncates_to_max_len() {
        let raw = "ab".repeat(MAX_KEY_LEN);
        let key = Key::normalize(&raw);
        assert_eq!(key.len(), MAX_KEY_LEN);
        assert!(key.as_str().starts_with("ABAB"));
    }

    #[test]
    fn stats_of_aab() {
        let stats = Key::normalize("AAB").stats();
        assert_eq!(
            stats,
            KeyStats {
                length: 3,
                duplicate_count: 1,
                missing_count: 24,
            }
        );
    }

    #[test]
    fn stats_of_alphabet_and_empty() {
        assert_eq!(
            Key::alphabet().stats(),
            KeyStats {
                length: 26,
                duplicate_count: 0,
                missing_count: 0,
            }
        );
        assert_eq!(Key::empty().stats().missing_count, 26);
    }

    #[test]
    fn stats_counts_each_extra_occurrence() {
        let stats = Key::normalize("AAAABBC").stats();
        assert_eq!(stats.duplicate_count, 4);
        assert_eq!(stats.missing_count, 23);
    }

    #[test]
    fn positions_of_lists_every_column() {
        let key = Key::normalize("ABCABA");
        assert_eq!(key.positions_of(b'A'), vec![0, 3, 5]);
        assert_eq!(key.positions_of(b'C'), vec![2]);
        assert!(key.positions_of(b'Z').is_empty());
    }

    #[test]
    fn shuffled_is_a_permutation() {
        let key = Key::normalize("HELLOWORLD");
        let mut rng = SmallRng::seed_from_u64(7);
        let shuffled = key.shuffled(&mut rng);
        let mut a = key.as_str().as_bytes().to_vec();
        let mut b = shuffled.as_str().as_bytes().to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn default_is_alphabet() {
        assert_eq!(Key::default().as_str(), ALPHABET);
    }
}
