#![forbid(unsafe_code)]

//! Step-by-step playback state machine.
//!
//! A [`Playback`] walks a fixed list of items, releasing one per timer tick.
//! It owns the timer it was started with and cancels it when it finishes or
//! is stopped. What an item *means* (a planned encode symbol, a decode
//! point) is up to the caller; the caller runs the same per-element logic
//! the bulk path uses, so playback output equals bulk output.
//!
//! ```text
//!          start (items non-empty)
//!   Idle ───────────────────────────▶ Running
//!    ▲                                  │
//!    │  stop / tick emits last item     │ tick: emit next item
//!    └──────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `start` while running is a no-op.
//! 2. `stop` is idempotent and cancels the owned timer.
//! 3. The tick that emits the last item also returns to `Idle`.
//! 4. Ticks from any timer other than the owned one are ignored.

use web_time::Duration;

use crate::scheduler::{TickScheduler, TimerId};

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
}

/// One item released by [`Playback::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<T> {
    pub item: T,
    /// Zero-based index of the item.
    pub index: usize,
    /// Whether this was the last item.
    pub finished: bool,
}

/// Timed reveal of a list of items.
#[derive(Debug, Clone)]
pub struct Playback<T> {
    items: Vec<T>,
    cursor: usize,
    timer: Option<TimerId>,
}

impl<T> Default for Playback<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            timer: None,
        }
    }
}

impl<T: Clone> Playback<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Running
        } else {
            PlaybackState::Idle
        }
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// The timer driving this playback, while running.
    #[must_use]
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Number of items already emitted.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Begin playing `items`, one per `interval`.
    ///
    /// Returns `false` without changing anything if already running or if
    /// `items` is empty.
    pub fn start<S: TickScheduler + ?Sized>(
        &mut self,
        items: Vec<T>,
        scheduler: &mut S,
        interval: Duration,
    ) -> bool {
        if self.is_running() || items.is_empty() {
            return false;
        }
        self.items = items;
        self.cursor = 0;
        self.timer = Some(scheduler.schedule_every(interval));
        tracing::debug!(total = self.items.len(), "playback started");
        true
    }

    /// Stop playing. Returns `true` if it was running.
    pub fn stop<S: TickScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        let Some(timer) = self.timer.take() else {
            return false;
        };
        scheduler.cancel(timer);
        tracing::debug!(emitted = self.cursor, total = self.items.len(), "playback stopped");
        true
    }

    /// Handle a firing of `timer`.
    ///
    /// Returns the next item if `timer` is the one this playback owns.
    pub fn tick<S: TickScheduler + ?Sized>(
        &mut self,
        timer: TimerId,
        scheduler: &mut S,
    ) -> Option<Step<T>> {
        if self.timer != Some(timer) {
            return None;
        }
        let Some(item) = self.items.get(self.cursor).cloned() else {
            self.stop(scheduler);
            return None;
        };
        let index = self.cursor;
        self.cursor += 1;
        let finished = self.cursor == self.items.len();
        if finished {
            self.timer = None;
            scheduler.cancel(timer);
            tracing::debug!(total = self.items.len(), "playback finished");
        }
        Some(Step {
            item,
            index,
            finished,
        })
    }
}
