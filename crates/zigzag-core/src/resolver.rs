#![forbid(unsafe_code)]

//! Index resolution: which key column plots a given plaintext letter.
//!
//! A letter that appears several times in the key has several candidate
//! columns. The first time a `(position, letter)` pair is plotted, one
//! candidate is picked at random and cached. Later redraws of the same pair
//! reuse the cached column as long as the key still holds that letter there.
//!
//! # Invariants
//!
//! 1. A cached index is only reused when `key[index] == letter`.
//! 2. [`IndexResolver::invalidate`] empties the cache; key replacement must call it.
//! 3. [`IndexResolver::prune`] keeps exactly the pairs present in the plaintext.
//!
//! The decision itself is the pure function [`resolve_or_assign`], so reuse
//! versus fresh choice never depends on animation or redraw timing.

use std::collections::{HashMap, HashSet};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::key::Key;

/// Identity of one plotted letter: its position in the plaintext and the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Character position in the (uppercased, truncated) plaintext.
    pub position: usize,
    /// Uppercase ASCII letter.
    pub letter: u8,
}

impl CacheKey {
    #[inline]
    #[must_use]
    pub const fn new(position: usize, letter: u8) -> Self {
        Self { position, letter }
    }
}

/// Outcome of [`resolve_or_assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The cached column is still valid and was reused. No cache change.
    Reused(usize),
    /// A fresh column was chosen. The caller must store it in the cache.
    Assigned(usize),
}

impl Resolution {
    /// The chosen key column.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Reused(i) | Self::Assigned(i) => i,
        }
    }
}

/// Chooses one column among several candidates.
pub trait IndexPicker {
    /// Pick one element of `candidates`. Never called with an empty slice.
    fn pick(&mut self, candidates: &[usize]) -> usize;
}

/// Uniform random choice, the picker used interactively.
#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: SmallRng,
}

impl RandomPicker {
    /// Reproducible picker for tests and `--seed` runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Picker seeded from the operating system.
    #[cfg(feature = "os-rng")]
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl IndexPicker for RandomPicker {
    fn pick(&mut self, candidates: &[usize]) -> usize {
        candidates[self.rng.random_range(0..candidates.len())]
    }
}

/// Always picks the lowest candidate column. Makes every key behave as if
/// it had no duplicates, which keeps round trips exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestPicker;

impl IndexPicker for LowestPicker {
    fn pick(&mut self, candidates: &[usize]) -> usize {
        candidates[0]
    }
}

/// Resolve-or-assign decision for one plotted letter.
///
/// Returns `None` when `candidates` is empty: the letter has no column and
/// must be skipped. Otherwise reuses the entry for `cache_key` if
/// [`ResolutionCache::is_valid`] accepts it, and asks `picker` for a fresh
/// choice if not. The cache itself is never modified here.
pub fn resolve_or_assign(
    key: &Key,
    cache: &ResolutionCache,
    cache_key: CacheKey,
    candidates: &[usize],
    picker: &mut dyn IndexPicker,
) -> Option<Resolution> {
    if candidates.is_empty() {
        return None;
    }
    match cache.get(cache_key) {
        Some(index) if cache.is_valid(key, cache_key) => Some(Resolution::Reused(index)),
        _ => Some(Resolution::Assigned(picker.pick(candidates))),
    }
}

/// Map from `(position, letter)` to the column chosen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionCache {
    entries: HashMap<CacheKey, usize>,
}

impl ResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: CacheKey) -> Option<usize> {
        self.entries.get(&key).copied()
    }

    /// Whether the entry for `cache_key` exists and still matches `key`.
    #[must_use]
    pub fn is_valid(&self, key: &Key, cache_key: CacheKey) -> bool {
        self.get(cache_key)
            .is_some_and(|index| key.letter_at(index) == Some(cache_key.letter))
    }

    pub fn insert(&mut self, key: CacheKey, index: usize) {
        self.entries.insert(key, index);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry not in `live`. Returns how many were removed.
    pub fn retain_only(&mut self, live: &HashSet<CacheKey>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| live.contains(k));
        before - self.entries.len()
    }
}

/// Resolution cache plus the picker that fills it.
///
/// Shared by bulk encoding and step playback so both produce the same columns.
#[derive(Debug)]
pub struct IndexResolver<P = RandomPicker> {
    cache: ResolutionCache,
    picker: P,
}

impl<P: IndexPicker> IndexResolver<P> {
    #[must_use]
    pub fn new(picker: P) -> Self {
        Self {
            cache: ResolutionCache::new(),
            picker,
        }
    }

    /// Resolve the column for `letter` at plaintext `position`.
    ///
    /// Returns `None` if the key has no column for the letter.
    pub fn resolve(&mut self, key: &Key, position: usize, letter: u8) -> Option<usize> {
        let candidates = key.positions_of(letter);
        let cache_key = CacheKey::new(position, letter);
        let resolution =
            resolve_or_assign(key, &self.cache, cache_key, &candidates, &mut self.picker)?;
        match resolution {
            Resolution::Reused(index) => {
                tracing::trace!(position, letter = %char::from(letter), index, "reused cached column");
            }
            Resolution::Assigned(index) => {
                tracing::trace!(position, letter = %char::from(letter), index, "assigned column");
                self.cache.insert(cache_key, index);
            }
        }
        Some(resolution.index())
    }

    /// Remove cache entries whose pair no longer occurs in `plaintext`.
    ///
    /// `plaintext` must already be uppercased and truncated the way the
    /// encoder prepares it, so positions line up.
    pub fn prune(&mut self, plaintext: &str) -> usize {
        let live: HashSet<CacheKey> = plaintext
            .chars()
            .enumerate()
            .filter(|(_, c)| c.is_ascii_uppercase())
            .map(|(i, c)| CacheKey::new(i, c as u8))
            .collect();
        let removed = self.cache.retain_only(&live);
        if removed > 0 {
            tracing::debug!(removed, remaining = self.cache.len(), "pruned stale column choices");
        }
        removed
    }

    /// Forget every cached choice. Required whenever the key is replaced.
    pub fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            tracing::debug!(entries = self.cache.len(), "invalidated column cache");
        }
        self.cache.clear();
    }

    #[must_use]
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }
}

impl Default for IndexResolver<LowestPicker> {
    fn default() -> Self {
        Self::new(LowestPicker)
    }
}
