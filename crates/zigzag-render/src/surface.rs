#![forbid(unsafe_code)]

//! The drawing surface abstraction.
//!
//! A [`Surface`] receives a small fixed vocabulary of commands: start a
//! canvas, open and close the guide layer, draw a key label, a dashed
//! guide, a connected path, or a single point. [`ViewFrame`](crate::ViewFrame)
//! is the only producer, so every backend sees commands in the same order.
//!
//! [`Recorder`] keeps the commands as data for tests and for hosts that
//! replay them onto their own canvas.

use zigzag_core::Point;

/// Radius of an ordinary plotted point.
pub const POINT_RADIUS: f64 = 4.2;

/// Radius of the highlighted step point during playback.
pub const STEP_RADIUS: f64 = 5.2;

/// How a connected path is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// Encode view: the theme's default stroke.
    Encode,
    /// Decode view: explicitly solid, never dashed.
    Decode,
}

/// Which marker a point is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Normal,
    /// The most recently emitted playback step.
    Step,
}

impl Marker {
    #[must_use]
    pub const fn radius(self) -> f64 {
        match self {
            Self::Normal => POINT_RADIUS,
            Self::Step => STEP_RADIUS,
        }
    }
}

/// A 2D drawing target.
pub trait Surface {
    /// Start a fresh canvas. Any previous content is discarded.
    fn begin(&mut self, width: f64, height: f64);

    /// Open the guide layer. `hidden` keeps its content but hides it.
    fn begin_guides(&mut self, hidden: bool);

    /// Close the guide layer opened by [`Surface::begin_guides`].
    fn end_guides(&mut self);

    /// A key letter centered on `x`.
    fn draw_label(&mut self, x: f64, y: f64, letter: char);

    /// A dashed vertical column guide.
    fn draw_guide(&mut self, x: f64, y_top: f64, y_bottom: f64);

    /// A connected path through `points` in order. Never called with an empty slice.
    fn draw_path(&mut self, points: &[Point], style: PathStyle);

    fn draw_point(&mut self, point: Point, marker: Marker);
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Begin { width: f64, height: f64 },
    BeginGuides { hidden: bool },
    EndGuides,
    Label { x: f64, y: f64, letter: char },
    Guide { x: f64, y_top: f64, y_bottom: f64 },
    Path { points: Vec<Point>, style: PathStyle },
    Point { point: Point, marker: Marker },
}

/// A surface that stores commands instead of drawing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Labels in draw order, as a string.
    #[must_use]
    pub fn labels(&self) -> String {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { letter, .. } => Some(*letter),
                _ => None,
            })
            .collect()
    }

    /// Points drawn with the given marker.
    #[must_use]
    pub fn points(&self, marker: Marker) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Point { point, marker: m } if *m == marker => Some(*point),
                _ => None,
            })
            .collect()
    }
}

impl Surface for Recorder {
    fn begin(&mut self, width: f64, height: f64) {
        self.commands.clear();
        self.commands.push(DrawCommand::Begin { width, height });
    }

    fn begin_guides(&mut self, hidden: bool) {
        self.commands.push(DrawCommand::BeginGuides { hidden });
    }

    fn end_guides(&mut self) {
        self.commands.push(DrawCommand::EndGuides);
    }

    fn draw_label(&mut self, x: f64, y: f64, letter: char) {
        self.commands.push(DrawCommand::Label { x, y, letter });
    }

    fn draw_guide(&mut self, x: f64, y_top: f64, y_bottom: f64) {
        self.commands.push(DrawCommand::Guide { x, y_top, y_bottom });
    }

    fn draw_path(&mut self, points: &[Point], style: PathStyle) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            style,
        });
    }

    fn draw_point(&mut self, point: Point, marker: Marker) {
        self.commands.push(DrawCommand::Point { point, marker });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_discards_previous_commands() {
        let mut rec = Recorder::new();
        rec.begin(10.0, 10.0);
        rec.draw_label(1.0, 2.0, 'A');
        rec.begin(20.0, 20.0);
        assert_eq!(
            rec.commands(),
            &[DrawCommand::Begin {
                width: 20.0,
                height: 20.0
            }]
        );
    }

    #[test]
    fn marker_radii() {
        assert_eq!(Marker::Normal.radius(), 4.2);
        assert_eq!(Marker::Step.radius(), 5.2);
    }

    #[test]
    fn point_filter_by_marker() {
        let mut rec = Recorder::new();
        rec.draw_point(Point::new(1.0, 1.0), Marker::Normal);
        rec.draw_point(Point::new(2.0, 2.0), Marker::Step);
        assert_eq!(rec.points(Marker::Step), vec![Point::new(2.0, 2.0)]);
    }
}
