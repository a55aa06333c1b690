#![forbid(unsafe_code)]

//! Parsing of hand-entered coordinate text.
//!
//! Input is whitespace-separated `x,y` tokens. Parsing is all-or-nothing:
//! either every token is accepted and the full point list is returned, or
//! every problem is collected and no points are returned.
//!
//! # Limits
//!
//! - Input longer than [`MAX_INPUT_LEN`] characters is rejected outright.
//! - At most [`MAX_POINTS`] points; each extra token is reported.
//! - `x` must lie in `[0, 2000]` and `y` in `[0, 5000]`.
//! - Numbers are plain decimals: optional `-`, digits, optional `.digits`.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use thiserror::Error;

use crate::point::Point;

/// Maximum raw input length in characters.
pub const MAX_INPUT_LEN: usize = 50_000;

/// Maximum number of accepted points.
pub const MAX_POINTS: usize = 1000;

/// Accepted `x` range (inclusive).
pub const X_RANGE: (f64, f64) = (0.0, 2000.0);

/// Accepted `y` range (inclusive).
pub const Y_RANGE: (f64, f64) = (0.0, 5000.0);

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)$").expect("coordinate token regex")
});

/// A single rejected token or input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointParseError {
    #[error("input too long (max 50,000 characters)")]
    InputTooLong,

    #[error("too many points (max 1000): \"{token}\" (position {position})")]
    TooManyPoints { token: String, position: usize },

    #[error("invalid format: \"{token}\" (position {position})")]
    Malformed { token: String, position: usize },

    #[error("invalid number: \"{token}\"")]
    NonFinite { token: String },

    #[error("value out of range: \"{token}\" (x: 0-2000, y: 0-5000)")]
    OutOfRange { token: String },
}

impl PointParseError {
    /// The offending token, when the error refers to one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::InputTooLong => None,
            Self::TooManyPoints { token, .. }
            | Self::Malformed { token, .. }
            | Self::NonFinite { token }
            | Self::OutOfRange { token } => Some(token),
        }
    }
}

/// Every problem found in one input. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointParseErrors(Vec<PointParseError>);

impl PointParseErrors {
    #[must_use]
    pub fn errors(&self) -> &[PointParseError] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable descriptions, one per error.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<PointParseError> {
        self.0
    }
}

impl fmt::Display for PointParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PointParseErrors {}

/// Parse coordinate text into points.
///
/// Blank input yields an empty list. Token positions in errors are 1-based.
pub fn parse_points(raw: &str) -> Result<Vec<Point>, PointParseErrors> {
    if raw.chars().count() > MAX_INPUT_LEN {
        return Err(PointParseErrors(vec![PointParseError::InputTooLong]));
    }

    let mut points = Vec::new();
    let mut errors = Vec::new();

    for (index, token) in raw.split_whitespace().enumerate() {
        match parse_token(token, index + 1, points.len()) {
            Ok(point) => points.push(point),
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(points)
    } else {
        tracing::debug!(errors = errors.len(), "rejected coordinate input");
        Err(PointParseErrors(errors))
    }
}

fn parse_token(token: &str, position: usize, accepted: usize) -> Result<Point, PointParseError> {
    if accepted >= MAX_POINTS {
        return Err(PointParseError::TooManyPoints {
            token: token.to_owned(),
            position,
        });
    }

    let malformed = || PointParseError::Malformed {
        token: token.to_owned(),
        position,
    };
    let caps = TOKEN.captures(token).ok_or_else(malformed)?;
    let x: f64 = caps[1].parse().map_err(|_| malformed())?;
    let y: f64 = caps[2].parse().map_err(|_| malformed())?;

    if !x.is_finite() || !y.is_finite() {
        return Err(PointParseError::NonFinite {
            token: token.to_owned(),
        });
    }
    if !(X_RANGE.0..=X_RANGE.1).contains(&x) || !(Y_RANGE.0..=Y_RANGE.1).contains(&y) {
        return Err(PointParseError::OutOfRange {
            token: token.to_owned(),
        });
    }
    Ok(Point::new(x, y))
}
