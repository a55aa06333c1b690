#![forbid(unsafe_code)]

//! Recurring tick sources.
//!
//! Playback never blocks. It asks a [`TickScheduler`] for a recurring timer
//! and does one step of work each time the host reports that timer firing.
//!
//! [`DeterministicScheduler`] keeps time as plain data. The host (a test, the
//! CLI loop, or the browser's animation frame callback) moves the clock
//! forward with [`DeterministicScheduler::pop_due`], so playback is testable
//! without real time passing.
//!
//! # Invariants
//!
//! 1. A cancelled timer never fires again, even if it was already due.
//! 2. Due timers fire in due-time order; equal due times fire in creation order.
//! 3. Cancelling an unknown or already cancelled timer is a no-op.

use web_time::Duration;

/// Shortest accepted interval. Zero would make a timer due forever.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle for one scheduled recurring timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Something that can run a callback on a fixed cadence.
pub trait TickScheduler {
    /// Start a recurring timer. The first firing is one `interval` from now.
    fn schedule_every(&mut self, interval: Duration) -> TimerId;

    /// Stop a timer. Returns `true` if it was active.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Whether `id` is still active.
    fn is_scheduled(&self, id: TimerId) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    id: TimerId,
    interval: Duration,
    next_due: Duration,
}

/// Host-driven scheduler with a manual clock.
#[derive(Debug, Clone, Default)]
pub struct DeterministicScheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<Scheduled>,
}

impl DeterministicScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current monotonic time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of active timers.
    #[must_use]
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Earliest due time among active timers.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.next_due).min()
    }

    /// Fire the earliest timer due at or before `until`.
    ///
    /// Moves the clock to that timer's due time, re-arms it, and returns its
    /// id. Returns `None` (clock unchanged) when nothing is due by `until`.
    /// Callers handle each firing before asking for the next, so a firing
    /// that cancels another timer takes effect immediately.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let slot = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due <= until)
            .min_by_key(|(_, t)| (t.next_due, t.id))
            .map(|(i, _)| i)?;
        let timer = &mut self.timers[slot];
        self.now = self.now.max(timer.next_due);
        timer.next_due = timer.next_due.saturating_add(timer.interval);
        Some(timer.id)
    }

    /// Move the clock forward without firing anything.
    ///
    /// Timers that became due stay due and fire on the next [`pop_due`](Self::pop_due).
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance by `dt`, collecting every firing in order.
    ///
    /// Only safe when no firing cancels another timer; callers that react to
    /// firings should loop on [`pop_due`](Self::pop_due) instead.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        let until = self.now.saturating_add(dt);
        let mut fired = Vec::new();
        while let Some(id) = self.pop_due(until) {
            fired.push(id);
        }
        self.set_now(until);
        fired
    }
}

impl TickScheduler for DeterministicScheduler {
    fn schedule_every(&mut self, interval: Duration) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Scheduled {
            id,
            interval,
            next_due: self.now.saturating_add(interval),
        });
        tracing::debug!(timer = id.0, interval_ms = whole_millis(interval), "timer scheduled");
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        let removed = self.timers.len() != before;
        if removed {
            tracing::debug!(timer = id.0, "timer cancelled");
        }
        removed
    }

    fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
