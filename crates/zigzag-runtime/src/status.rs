#![forbid(unsafe_code)]

//! Transient status messages.
//!
//! A [`StatusLine`] shows one message at a time. A message either stays
//! until replaced or cleared, or counts down and disappears once its time to
//! live has elapsed on the host clock.

use web_time::Duration;

/// A single-message status area with optional expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: Option<String>,
    /// Time left before the message clears. `None` means it stays.
    remaining: Option<Duration>,
}

impl StatusLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` until replaced or cleared.
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.remaining = None;
    }

    /// Show `text` for `ttl` of host time.
    pub fn flash(&mut self, text: impl Into<String>, ttl: Duration) {
        self.text = Some(text.into());
        self.remaining = Some(ttl);
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.remaining = None;
    }

    /// The visible message, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Count down by `dt`. Returns `true` if the message expired on this call.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let left = remaining.saturating_sub(dt);
        if left.is_zero() {
            self.clear();
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }
}
