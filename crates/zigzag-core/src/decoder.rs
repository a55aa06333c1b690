#![forbid(unsafe_code)]

//! Point set to plaintext.
//!
//! Decode input may be hand-typed and unordered, so points are first
//! stable-sorted by row (`y`). Each point then maps to the key column whose
//! x is nearest; ties go to the lowest column index.

use std::cmp::Ordering;

use crate::key::Key;
use crate::layout::Layout;
use crate::point::Point;

/// Stable ascending sort by `y`. Equal rows keep their input order, and
/// `-0.0` counts as equal to `0.0`.
#[must_use]
pub fn sort_by_row(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal));
    sorted
}

/// Key column whose x is closest to `x`. `None` for an empty key.
#[must_use]
pub fn nearest_key_index(x: f64, key: &Key, layout: &Layout) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for index in 0..key.len() {
        let distance = (layout.col_x(index) - x).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Lowercase letter of the column nearest to `point`. `None` for an empty key.
#[must_use]
pub fn decode_point(point: Point, key: &Key, layout: &Layout) -> Option<char> {
    nearest_key_index(point.x, key, layout)
        .and_then(|index| key.letter_at(index))
        .map(|l| char::from(l).to_ascii_lowercase())
}

/// Decode a point set into lowercase plaintext.
///
/// An empty key yields an empty string for any input.
#[must_use]
pub fn decode(points: &[Point], key: &Key, layout: &Layout) -> String {
    sort_by_row(points)
        .into_iter()
        .filter_map(|p| decode_point(p, key, layout))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_layout() -> Layout {
        Layout {
            margin_x: 0.0,
            col_gap: 200.0,
            ..Layout::default()
        }
    }

    #[test]
    fn sorts_by_row_before_mapping() {
        let key = Key::normalize("AB");
        let points = [Point::new(200.0, 200.0), Point::new(0.0, 100.0)];
        assert_eq!(decode(&points, &key, &two_column_layout()), "ab");
    }

    #[test]
    fn equal_rows_keep_input_order() {
        let points = [
            Point::new(1.0, 5.0),
            Point::new(2.0, 5.0),
            Point::new(3.0, 1.0),
        ];
        let xs: Vec<f64> = sort_by_row(&points).iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn negative_zero_row_ties_with_zero() {
        let points = crate::parse::parse_points("40,0 80,-0").unwrap();
        assert_eq!(decode(&points, &Key::alphabet(), &Layout::default()), "ab");

        let points = crate::parse::parse_points("80,-0 40,0").unwrap();
        assert_eq!(decode(&points, &Key::alphabet(), &Layout::default()), "ba");
    }

    #[test]
    fn nearest_column_with_low_index_tie_break() {
        let key = Key::normalize("AB");
        let layout = two_column_layout();
        assert_eq!(nearest_key_index(99.0, &key, &layout), Some(0));
        assert_eq!(nearest_key_index(100.0, &key, &layout), Some(0));
        assert_eq!(nearest_key_index(101.0, &key, &layout), Some(1));
        assert_eq!(nearest_key_index(5000.0, &key, &layout), Some(1));
    }

    #[test]
    fn empty_key_decodes_to_empty() {
        let points = [Point::new(40.0, 100.0), Point::new(80.0, 124.0)];
        assert_eq!(decode(&points, &Key::empty(), &Layout::default()), "");
    }

    #[test]
    fn empty_points_decode_to_empty() {
        assert_eq!(decode(&[], &Key::alphabet(), &Layout::default()), "");
    }

    #[test]
    fn output_is_lowercase() {
        let layout = Layout::default();
        let p = layout.point(7, 0);
        assert_eq!(decode_point(p, &Key::alphabet(), &layout), Some('h'));
    }
}
