#![forbid(unsafe_code)]

//! Plot geometry.
//!
//! Columns come from key indices and rows from the plotted-letter count.
//! Encoder, decoder and renderers must all read the same [`Layout`], so a
//! point written by one is read back at the same column by the other.

use crate::point::Point;

/// Extra space kept below the lowest point.
const BOTTOM_PADDING: f64 = 80.0;

/// Distance between the bottom of a guide line and the canvas edge.
const GUIDE_BOTTOM_INSET: f64 = 30.0;

/// Column/row geometry in abstract layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Layout {
    /// Canvas width.
    pub width: f64,
    /// Minimum canvas height.
    pub height: f64,
    /// X of column 0.
    pub margin_x: f64,
    /// Baseline of the key letters above the guides.
    pub top_y: f64,
    /// Y where guides start and where row 0 sits.
    pub guide_top_y: f64,
    /// Vertical distance between rows.
    pub row_gap: f64,
    /// Horizontal distance between columns.
    pub col_gap: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 600.0,
            margin_x: 40.0,
            top_y: 70.0,
            guide_top_y: 100.0,
            row_gap: 24.0,
            col_gap: 40.0,
        }
    }
}

impl Layout {
    /// X coordinate of a key column.
    #[inline]
    #[must_use]
    pub fn col_x(&self, index: usize) -> f64 {
        self.margin_x + index as f64 * self.col_gap
    }

    /// Y coordinate of a plotted row.
    #[inline]
    #[must_use]
    pub fn row_y(&self, row: usize) -> f64 {
        self.guide_top_y + row as f64 * self.row_gap
    }

    /// The point for a key column on a given row.
    #[inline]
    #[must_use]
    pub fn point(&self, index: usize, row: usize) -> Point {
        Point::new(self.col_x(index), self.row_y(row))
    }

    /// Canvas height needed to show every point: `max(height, max_y + 80)`.
    #[must_use]
    pub fn canvas_height(&self, points: &[Point]) -> f64 {
        points
            .iter()
            .map(|p| p.y)
            .reduce(f64::max)
            .map_or(self.height, |max_y| self.height.max(max_y + BOTTOM_PADDING))
    }

    /// Canvas height reserved up front for `rows` plotted letters.
    ///
    /// Used when a playback starts so the canvas does not grow mid-animation.
    #[must_use]
    pub fn canvas_height_for_rows(&self, rows: usize) -> f64 {
        let max_y = self.guide_top_y + rows as f64 * self.row_gap;
        self.height.max(max_y + BOTTOM_PADDING)
    }

    /// Bottom end of the dashed column guides on a canvas of `canvas_height`.
    #[inline]
    #[must_use]
    pub fn guide_bottom_y(&self, canvas_height: f64) -> f64 {
        canvas_height - GUIDE_BOTTOM_INSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_and_rows() {
        let layout = Layout::default();
        assert_eq!(layout.col_x(0), 40.0);
        assert_eq!(layout.col_x(25), 1040.0);
        assert_eq!(layout.row_y(0), 100.0);
        assert_eq!(layout.row_y(3), 172.0);
    }

    #[test]
    fn canvas_height_uses_minimum_for_short_paths() {
        let layout = Layout::default();
        assert_eq!(layout.canvas_height(&[]), 600.0);
        assert_eq!(layout.canvas_height(&[Point::new(0.0, 300.0)]), 600.0);
    }

    #[test]
    fn canvas_height_grows_with_lowest_point() {
        let layout = Layout::default();
        let points = [Point::new(0.0, 900.0), Point::new(10.0, 100.0)];
        assert_eq!(layout.canvas_height(&points), 980.0);
    }

    #[test]
    fn canvas_height_for_rows_reserves_past_last_row() {
        let layout = Layout::default();
        assert_eq!(layout.canvas_height_for_rows(30), 900.0);
        assert_eq!(layout.canvas_height_for_rows(1), 600.0);
    }

    #[test]
    fn guides_stop_above_bottom_edge() {
        assert_eq!(Layout::default().guide_bottom_y(600.0), 570.0);
    }
}
