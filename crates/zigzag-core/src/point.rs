#![forbid(unsafe_code)]

//! Points in layout space and their plain-text export form.

use std::fmt::Write;

/// A coordinate pair: `x` selects a column, `y` a row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Format points as `"x,y x,y ..."` with each coordinate rounded to an integer.
///
/// Halves round toward positive infinity, so `12.5` becomes `13` and
/// `-2.5` becomes `-2`. An empty slice yields an empty string.
#[must_use]
pub fn format_points(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 9);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{},{}", round_half_up(p.x), round_half_up(p.y));
    }
    out
}

fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}
