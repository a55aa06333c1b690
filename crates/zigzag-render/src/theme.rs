#![forbid(unsafe_code)]

//! Light and dark color themes.
//!
//! The stylesheet produced here is the one embedded in SVG downloads, so a
//! saved file looks the same as the live view it was taken from.

use std::fmt::{self, Write};
use std::str::FromStr;

use thiserror::Error;

/// Visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Returned when a stored theme name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0:?} (expected \"light\" or \"dark\")")]
pub struct ThemeParseError(pub String);

impl Theme {
    /// Name used for persistence and the `data-theme` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Theme matching the host's ambient preference.
    #[must_use]
    pub const fn from_dark_flag(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Light => Palette::LIGHT,
            Self::Dark => Palette::DARK,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeParseError(other.to_owned())),
        }
    }
}

/// Colors for every drawn element, as CSS color strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Canvas fill. `None` leaves the document transparent.
    pub background: Option<&'static str>,
    pub key_letter: &'static str,
    pub guide_line: &'static str,
    pub polyline: &'static str,
    pub point_fill: &'static str,
    pub point_stroke: &'static str,
    pub step_fill: &'static str,
}

impl Palette {
    pub const LIGHT: Self = Self {
        background: None,
        key_letter: "#1e293b",
        guide_line: "#cbd5e1",
        polyline: "#0ea5e9",
        point_fill: "#10b981",
        point_stroke: "#ffffff",
        step_fill: "#ffd166",
    };

    pub const DARK: Self = Self {
        background: Some("#0f172a"),
        key_letter: "#e2e8f0",
        guide_line: "#334155",
        polyline: "#38bdf8",
        point_fill: "#34d399",
        point_stroke: "#0f172a",
        step_fill: "#ffd166",
    };

    /// CSS rules for the classes the SVG surface emits.
    #[must_use]
    pub fn stylesheet(&self) -> String {
        let mut css = String::with_capacity(480);
        let _ = write!(
            css,
            ".key-letter {{ font-size: 18px; fill: {}; opacity: 0.9; }}\n\
             .guide-line {{ stroke: {}; stroke-width: 1.2; stroke-dasharray: 6 6; }}\n\
             .polyline {{ fill: none; stroke: {}; stroke-width: 2.5; }}\n\
             .point {{ fill: {}; stroke: {}; stroke-width: 1; }}\n\
             .point.step {{ fill: {}; }}\n\
             .hidden-guides .key-letter,\n\
             .hidden-guides .guide-line {{ display: none; }}\n",
            self.key_letter,
            self.guide_line,
            self.polyline,
            self.point_fill,
            self.point_stroke,
            self.step_fill,
        );
        css
    }
}
