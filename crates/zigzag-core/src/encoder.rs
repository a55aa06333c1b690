#![forbid(unsafe_code)]

//! Plaintext to point sequence.
//!
//! Letters are plotted in plaintext order, one row per *plotted* letter.
//! Non-letters and letters the key lacks are skipped without consuming a
//! row. Encoding happens in two phases so bulk and step-by-step callers
//! share one code path:
//!
//! 1. [`plan`] picks out the plottable symbols (pure, no cache access).
//! 2. [`plot_symbol`] resolves one symbol's column and produces its point.
//!
//! [`encode`] runs both phases over the whole plan and prunes the cache.

use crate::key::Key;
use crate::layout::Layout;
use crate::point::Point;
use crate::resolver::{IndexPicker, IndexResolver};

/// Maximum number of plaintext characters considered.
pub const MAX_PLAINTEXT_LEN: usize = 10_000;

/// One plaintext letter that has at least one key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSymbol {
    /// Character position in the prepared plaintext (the cache identity).
    pub position: usize,
    /// Uppercase ASCII letter.
    pub letter: u8,
}

/// Truncate to [`MAX_PLAINTEXT_LEN`] characters and upper-case ASCII letters.
///
/// Positions used for caching are character offsets into this string.
#[must_use]
pub fn prepare_plaintext(plaintext: &str) -> String {
    plaintext
        .chars()
        .take(MAX_PLAINTEXT_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// The plottable symbols of already-prepared plaintext, in order.
#[must_use]
pub fn plan(prepared: &str, key: &Key) -> Vec<PlannedSymbol> {
    prepared
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_ascii_uppercase() && key.contains(*c as u8))
        .map(|(position, c)| PlannedSymbol {
            position,
            letter: c as u8,
        })
        .collect()
}

/// Resolve one planned symbol and place it on `row`.
///
/// Returns `None` only if the key lost the letter since planning.
pub fn plot_symbol<P: IndexPicker>(
    symbol: PlannedSymbol,
    row: usize,
    key: &Key,
    resolver: &mut IndexResolver<P>,
    layout: &Layout,
) -> Option<Point> {
    resolver
        .resolve(key, symbol.position, symbol.letter)
        .map(|index| layout.point(index, row))
}

/// Encode plaintext into an ordered point sequence.
///
/// Updates the resolver cache: new pairs are assigned, then pairs absent
/// from this plaintext are pruned.
pub fn encode<P: IndexPicker>(
    plaintext: &str,
    key: &Key,
    resolver: &mut IndexResolver<P>,
    layout: &Layout,
) -> Vec<Point> {
    let prepared = prepare_plaintext(plaintext);
    let mut points = Vec::new();
    for symbol in plan(&prepared, key) {
        if let Some(point) = plot_symbol(symbol, points.len(), key, resolver, layout) {
            points.push(point);
        }
    }
    resolver.prune(&prepared);
    tracing::debug!(
        chars = prepared.chars().count(),
        points = points.len(),
        "encoded plaintext"
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{CacheKey, LowestPicker, RandomPicker};

    #[test]
    fn skips_non_letters_without_consuming_rows() {
        let key = Key::alphabet();
        let layout = Layout::default();
        let mut resolver = IndexResolver::new(LowestPicker);
        let points = encode("a b!", &key, &mut resolver, &layout);
        assert_eq!(
            points,
            vec![Point::new(40.0, 100.0), Point::new(80.0, 124.0)]
        );
    }

    #[test]
    fn skips_letters_missing_from_key() {
        let key = Key::normalize("XYZ");
        let layout = Layout::default();
        let mut resolver = IndexResolver::new(LowestPicker);
        let points = encode("axbyc", &key, &mut resolver, &layout);
        assert_eq!(
            points,
            vec![Point::new(40.0, 100.0), Point::new(80.0, 124.0)]
        );
    }

    #[test]
    fn empty_inputs_yield_no_points() {
        let layout = Layout::default();
        let mut resolver = IndexResolver::new(LowestPicker);
        assert!(encode("", &Key::alphabet(), &mut resolver, &layout).is_empty());
        assert!(encode("hello", &Key::empty(), &mut resolver, &layout).is_empty());
    }

    #[test]
    fn plan_records_true_positions() {
        let prepared = prepare_plaintext("a-a a");
        let symbols = plan(&prepared, &Key::alphabet());
        let positions: Vec<usize> = symbols.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 2, 4]);
    }

    #[test]
    fn prepare_truncates_and_uppercases() {
        let long = "z".repeat(MAX_PLAINTEXT_LEN + 5);
        let prepared = prepare_plaintext(&long);
        assert_eq!(prepared.chars().count(), MAX_PLAINTEXT_LEN);
        assert!(prepared.chars().all(|c| c == 'Z'));
    }

    #[test]
    fn re_encoding_reuses_columns() {
        let key = Key::normalize("AAAAAAAAAABBBBBBBBBB");
        let layout = Layout::default();
        let mut resolver = IndexResolver::new(RandomPicker::seeded(9));
        let first = encode("abababab", &key, &mut resolver, &layout);
        let second = encode("abababab", &key, &mut resolver, &layout);
        assert_eq!(first, second);
    }

    #[test]
    fn encode_prunes_removed_positions() {
        let key = Key::alphabet();
        let layout = Layout::default();
        let mut resolver = IndexResolver::new(LowestPicker);
        encode("abc", &key, &mut resolver, &layout);
        assert_eq!(resolver.cache().len(), 3);
        encode("ab", &key, &mut resolver, &layout);
        assert_eq!(resolver.cache().len(), 2);
        assert!(resolver.cache().get(CacheKey::new(2, b'C')).is_none());
    }
}
