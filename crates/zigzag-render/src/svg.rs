#![forbid(unsafe_code)]

//! SVG output.
//!
//! - [`SvgSurface`]: a [`Surface`] that builds SVG markup using CSS classes
//!   (`key-letter`, `guide-line`, `polyline`, `point`, `point step`).
//! - [`SvgExporter`]: a standalone download document. Embeds the theme's
//!   stylesheet and sets `fill="none"` on every polyline so the file renders
//!   correctly without the host page's CSS.

use std::fmt::Write;

use zigzag_core::Point;

use crate::frame::ViewFrame;
use crate::surface::{Marker, PathStyle, Surface};
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// SVG Surface
// ---------------------------------------------------------------------------

/// Builds an SVG document from surface commands.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
    stylesheet: Option<String>,
    background: Option<&'static str>,
    explicit_fill: bool,
}

impl SvgSurface {
    /// A surface for live display. Styling comes from the host page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed a `<style>` block as the document's first child.
    #[must_use]
    pub fn with_stylesheet(mut self, css: String) -> Self {
        self.stylesheet = Some(css);
        self
    }

    /// Paint a full-canvas background rectangle.
    #[must_use]
    pub fn with_background(mut self, color: Option<&'static str>) -> Self {
        self.background = color;
        self
    }

    /// Put `fill="none"` directly on polylines.
    #[must_use]
    pub fn with_explicit_fill(mut self, on: bool) -> Self {
        self.explicit_fill = on;
        self
    }

    /// The finished `<svg>` document.
    #[must_use]
    pub fn finish(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 640);
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\">",
            self.width, self.height
        );
        if let Some(css) = &self.stylesheet {
            out.push_str("<style>");
            out.push_str(css);
            out.push_str("</style>");
        }
        if let Some(bg) = self.background {
            let _ = write!(out, "<rect width=\"100%\" height=\"100%\" fill=\"{bg}\"/>");
        }
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }
}

impl Surface for SvgSurface {
    fn begin(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.body.clear();
    }

    fn begin_guides(&mut self, hidden: bool) {
        self.body.push_str(if hidden {
            "<g class=\"hidden-guides\">"
        } else {
            "<g>"
        });
    }

    fn end_guides(&mut self) {
        self.body.push_str("</g>");
    }

    fn draw_label(&mut self, x: f64, y: f64, letter: char) {
        let _ = write!(
            self.body,
            "<text x=\"{x}\" y=\"{y}\" class=\"key-letter\" text-anchor=\"middle\">"
        );
        let mut buf = [0u8; 4];
        svg_escape_into(&mut self.body, letter.encode_utf8(&mut buf));
        self.body.push_str("</text>");
    }

    fn draw_guide(&mut self, x: f64, y_top: f64, y_bottom: f64) {
        let _ = write!(
            self.body,
            "<line x1=\"{x}\" y1=\"{y_top}\" x2=\"{x}\" y2=\"{y_bottom}\" class=\"guide-line\"/>"
        );
    }

    fn draw_path(&mut self, points: &[Point], style: PathStyle) {
        self.body.push_str("<polyline points=\"");
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                self.body.push(' ');
            }
            let _ = write!(self.body, "{},{}", p.x, p.y);
        }
        self.body.push_str("\" class=\"polyline\"");
        if style == PathStyle::Decode {
            self.body.push_str(" stroke-dasharray=\"none\"");
        }
        if self.explicit_fill {
            self.body.push_str(" fill=\"none\"");
        }
        self.body.push_str("/>");
    }

    fn draw_point(&mut self, point: Point, marker: Marker) {
        let class = match marker {
            Marker::Normal => "point",
            Marker::Step => "point step",
        };
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" class=\"{class}\"/>",
            point.x,
            point.y,
            marker.radius()
        );
    }
}

/// SVG-escape a string into the output buffer.
fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}

// ---------------------------------------------------------------------------
// SVG Exporter
// ---------------------------------------------------------------------------

/// Configuration for standalone SVG downloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgExporter {
    /// Palette used for the embedded stylesheet and background.
    pub theme: Theme,
}

impl SvgExporter {
    #[must_use]
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Render `frame` to a self-contained SVG document.
    #[must_use]
    pub fn export(&self, frame: &ViewFrame) -> String {
        let palette = self.theme.palette();
        let mut surface = SvgSurface::new()
            .with_stylesheet(palette.stylesheet())
            .with_background(palette.background)
            .with_explicit_fill(true);
        frame.draw(&mut surface);
        let doc = surface.finish();
        tracing::debug!(
            theme = %self.theme,
            points = frame.points.len(),
            bytes = doc.len(),
            "exported svg"
        );
        doc
    }
}
