#![forbid(unsafe_code)]

//! View frames: everything one redraw of a view needs.
//!
//! A frame is a plain snapshot. It owns copies of the key and points, so
//! it can be handed to any [`Surface`] after the session has moved on.
//!
//! # Draw order
//!
//! 1. Guide layer: key labels along `top_y`, then one dashed guide per column.
//! 2. The connected path through all points.
//! 3. Every point with the normal marker.
//! 4. The highlighted step point, if any.

use zigzag_core::{Key, Layout, Point};

use crate::surface::{Marker, PathStyle, Surface};

/// How the key guide layer appears in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuideMode {
    #[default]
    Visible,
    /// Drawn but hidden, so exports can still reveal them.
    Hidden,
    /// Not drawn at all.
    Omitted,
}

impl GuideMode {
    /// Encode views keep hidden guides in the document.
    #[must_use]
    pub const fn encode(hidden: bool) -> Self {
        if hidden { Self::Hidden } else { Self::Visible }
    }

    /// Decode views drop hidden guides entirely.
    #[must_use]
    pub const fn decode(hidden: bool) -> Self {
        if hidden { Self::Omitted } else { Self::Visible }
    }
}

/// A snapshot of one view, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    pub key: Key,
    pub layout: Layout,
    /// Canvas height; guides end 30 units above it.
    pub canvas_height: f64,
    pub guides: GuideMode,
    pub points: Vec<Point>,
    pub path_style: PathStyle,
    /// Most recent playback step, drawn on top with [`Marker::Step`].
    pub highlight: Option<Point>,
}

impl ViewFrame {
    /// Guides only, at the layout's base height.
    #[must_use]
    pub fn key_preview(key: Key, layout: Layout) -> Self {
        Self {
            key,
            canvas_height: layout.height,
            layout,
            guides: GuideMode::Visible,
            points: Vec::new(),
            path_style: PathStyle::Encode,
            highlight: None,
        }
    }

    /// A frame sized to fit its points.
    #[must_use]
    pub fn fitted(
        key: Key,
        layout: Layout,
        points: Vec<Point>,
        guides: GuideMode,
        path_style: PathStyle,
    ) -> Self {
        Self {
            canvas_height: layout.canvas_height(&points),
            key,
            layout,
            guides,
            points,
            path_style,
            highlight: None,
        }
    }

    #[must_use]
    pub fn with_canvas_height(mut self, height: f64) -> Self {
        self.canvas_height = height;
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: Option<Point>) -> Self {
        self.highlight = highlight;
        self
    }

    /// Emit this frame's commands to `surface`.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.begin(self.layout.width, self.canvas_height);

        if self.guides != GuideMode::Omitted {
            surface.begin_guides(self.guides == GuideMode::Hidden);
            for (index, letter) in self.key.columns() {
                surface.draw_label(self.layout.col_x(index), self.layout.top_y, char::from(letter));
            }
            let bottom = self.layout.guide_bottom_y(self.canvas_height);
            for index in 0..self.key.len() {
                surface.draw_guide(self.layout.col_x(index), self.layout.guide_top_y, bottom);
            }
            surface.end_guides();
        }

        if !self.points.is_empty() {
            surface.draw_path(&self.points, self.path_style);
            for &point in &self.points {
                surface.draw_point(point, Marker::Normal);
            }
        }

        if let Some(step) = self.highlight {
            surface.draw_point(step, Marker::Step);
        }
    }
}
