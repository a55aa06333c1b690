#![forbid(unsafe_code)]

//! Drawing for the zigzag cipher lab.
//!
//! # Key Components
//!
//! - [`Surface`] - Minimal 2D command target (labels, guides, paths, points)
//! - [`ViewFrame`] - Snapshot of one view, drawn onto any surface
//! - [`SvgSurface`] / [`SvgExporter`] - Live SVG markup and standalone downloads
//! - [`Theme`] / [`Palette`] - Light and dark colors, embedded on export

pub mod frame;
pub mod surface;
pub mod svg;
pub mod theme;

pub use frame::{GuideMode, ViewFrame};
pub use surface::{DrawCommand, Marker, PathStyle, POINT_RADIUS, Recorder, STEP_RADIUS, Surface};
pub use svg::{SvgExporter, SvgSurface};
pub use theme::{Palette, Theme, ThemeParseError};

/// Render a frame to live SVG markup (no embedded styling).
#[must_use]
pub fn render_svg(frame: &ViewFrame) -> String {
    let mut surface = SvgSurface::new();
    frame.draw(&mut surface);
    surface.finish()
}
