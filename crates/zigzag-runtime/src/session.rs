#![forbid(unsafe_code)]

//! Cipher session state.
//!
//! [`CipherSession`] is everything the lab shows at one moment: the key, the
//! encode view (plaintext, plotted points, ciphertext text), the decode view
//! (coordinate text, points, decoded output), the two guide toggles, the two
//! playbacks, and the status lines. Host events map one-to-one onto methods;
//! views are read back as [`ViewFrame`] snapshots.
//!
//! # Invariants
//!
//! 1. Replacing the key stops both playbacks and empties the column cache.
//! 2. Encode playback and bulk encoding share one [`IndexResolver`], and
//!    playback resolves each symbol at its true plaintext position, so a
//!    finished (or stopped then redrawn) playback matches bulk output.
//! 3. Coordinate text that fails to parse never changes decode points.
//! 4. Nothing here blocks; playback advances only when the host reports a
//!    timer firing via [`CipherSession::fire`] or [`CipherSession::advance`].

use rand::Rng;
use web_time::Duration;
use zigzag_core::{
    IndexResolver, Key, KeyStats, Layout, PlannedSymbol, Point, PointParseErrors, RandomPicker,
    decoder, encoder, format_points, parse_points,
};
use zigzag_render::{GuideMode, PathStyle, SvgExporter, Theme, ViewFrame};

use crate::clipboard::Clipboard;
use crate::config::LabConfig;
use crate::playback::{Playback, PlaybackState};
use crate::scheduler::{DeterministicScheduler, TickScheduler, TimerId};
use crate::status::StatusLine;

pub const NOTHING_TO_EXPORT: &str = "Nothing to export.";
pub const COPIED: &str = "Copied.";
pub const COPY_FAILED: &str = "Copy failed.";
pub const NO_CIPHERTEXT: &str = "No ciphertext in the encode tab.";

/// Result of [`CipherSession::copy_points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// No encode points; nothing was written.
    Empty,
    Copied,
    /// The clipboard rejected the write.
    Failed,
}

/// One element released by a playback tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    Encode {
        index: usize,
        point: Point,
        finished: bool,
    },
    Decode {
        index: usize,
        point: Point,
        /// `None` only for an empty key.
        letter: Option<char>,
        finished: bool,
    },
}

impl PlaybackEvent {
    #[must_use]
    pub fn finished(&self) -> bool {
        match self {
            Self::Encode { finished, .. } | Self::Decode { finished, .. } => *finished,
        }
    }
}

/// Partial view shown while (or after) a playback runs.
#[derive(Debug, Clone, Default, PartialEq)]
struct Reveal {
    points: Vec<Point>,
    highlight: Option<Point>,
    /// Fixed for the whole playback so the canvas does not grow per step.
    canvas_height: f64,
}

#[derive(Debug, Default)]
struct EncodeView {
    plaintext: String,
    points: Vec<Point>,
    ciphertext: String,
    guides_hidden: bool,
    playback: Playback<PlannedSymbol>,
    reveal: Option<Reveal>,
    status: StatusLine,
}

#[derive(Debug, Default)]
struct DecodeView {
    input: String,
    points: Vec<Point>,
    output: String,
    guides_hidden: bool,
    playback: Playback<Point>,
    reveal: Option<Reveal>,
    errors: StatusLine,
}

/// The full interactive state of the lab.
#[derive(Debug)]
pub struct CipherSession<S: TickScheduler = DeterministicScheduler> {
    config: LabConfig,
    key: Key,
    resolver: IndexResolver<RandomPicker>,
    realtime: bool,
    enc: EncodeView,
    dec: DecodeView,
    scheduler: S,
}

impl CipherSession<DeterministicScheduler> {
    /// A session driven by a manual clock.
    #[must_use]
    pub fn new(config: LabConfig, picker: RandomPicker) -> Self {
        Self::with_scheduler(config, picker, DeterministicScheduler::new())
    }

    /// Move the host clock forward by `dt`.
    ///
    /// Fires every playback tick due in that window, one at a time and in
    /// order, then counts down status messages. Returns the emitted steps.
    pub fn advance(&mut self, dt: Duration) -> Vec<PlaybackEvent> {
        let until = self.scheduler.now().saturating_add(dt);
        let mut events = Vec::new();
        while let Some(timer) = self.scheduler.pop_due(until) {
            if let Some(event) = self.fire(timer) {
                events.push(event);
            }
        }
        self.scheduler.set_now(until);
        self.tick_status(dt);
        events
    }
}

impl<S: TickScheduler> CipherSession<S> {
    /// A session using the given tick source.
    pub fn with_scheduler(config: LabConfig, picker: RandomPicker, scheduler: S) -> Self {
        let key = config.normalized_key();
        let realtime = config.realtime;
        let mut session = Self {
            config,
            key,
            resolver: IndexResolver::new(picker),
            realtime,
            enc: EncodeView::default(),
            dec: DecodeView::default(),
            scheduler,
        };
        session.redraw_encode();
        session
    }

    // ── Key ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub fn key_stats(&self) -> KeyStats {
        self.key.stats()
    }

    /// Normalize `raw` and make it the active key.
    pub fn apply_key(&mut self, raw: &str) -> &Key {
        self.set_key(Key::normalize(raw));
        &self.key
    }

    /// Shuffle the letters of `raw` (or of the current key when `raw` is
    /// empty) and make the result the active key.
    pub fn shuffle_key<R: Rng + ?Sized>(&mut self, raw: &str, rng: &mut R) -> &Key {
        let base = if raw.is_empty() {
            self.key.clone()
        } else {
            Key::normalize(raw)
        };
        self.set_key(base.shuffled(rng));
        &self.key
    }

    /// Restore the `A..Z` key.
    pub fn reset_key(&mut self) -> &Key {
        self.set_key(Key::alphabet());
        &self.key
    }

    /// Replace the key: stop playbacks, drop every cached column choice,
    /// and redraw both views.
    pub fn set_key(&mut self, key: Key) {
        self.enc.playback.stop(&mut self.scheduler);
        self.dec.playback.stop(&mut self.scheduler);
        self.dec.reveal = None;
        self.key = key;
        self.resolver.invalidate();
        tracing::debug!(key = %self.key, len = self.key.len(), "key replaced");
        self.redraw_encode();
    }

    // ── Encode ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn plaintext(&self) -> &str {
        &self.enc.plaintext
    }

    /// Replace the plaintext. Redraws immediately when realtime is on.
    pub fn set_plaintext(&mut self, text: &str) {
        self.enc.plaintext = text.to_owned();
        if self.realtime {
            self.redraw_encode();
        }
    }

    #[must_use]
    pub fn realtime(&self) -> bool {
        self.realtime
    }

    /// Turning realtime on redraws at once.
    pub fn set_realtime(&mut self, on: bool) {
        self.realtime = on;
        if on {
            self.redraw_encode();
        }
    }

    /// Stop any encode playback and re-encode the plaintext in bulk.
    pub fn redraw_encode(&mut self) -> &[Point] {
        self.enc.playback.stop(&mut self.scheduler);
        self.enc.reveal = None;
        self.enc.points = encoder::encode(
            &self.enc.plaintext,
            &self.key,
            &mut self.resolver,
            &self.config.layout,
        );
        &self.enc.points
    }

    /// Points of the last bulk encode.
    #[must_use]
    pub fn encode_points(&self) -> &[Point] {
        &self.enc.points
    }

    /// Fill the ciphertext text from the last bulk encode.
    pub fn encrypt_text(&mut self) -> &str {
        self.enc.ciphertext = format_points(&self.enc.points);
        &self.enc.ciphertext
    }

    #[must_use]
    pub fn ciphertext(&self) -> &str {
        &self.enc.ciphertext
    }

    /// Copy the encode points as text. Clipboard failures become a status
    /// message, never an error.
    pub fn copy_points(&mut self, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        let ttl = self.config.status_ttl();
        if self.enc.points.is_empty() {
            self.enc.status.flash(NOTHING_TO_EXPORT, ttl);
            return CopyOutcome::Empty;
        }
        match clipboard.write_text(&format_points(&self.enc.points)) {
            Ok(()) => {
                self.enc.status.flash(COPIED, ttl);
                CopyOutcome::Copied
            }
            Err(e) => {
                tracing::warn!(error = %e, "copy to clipboard failed");
                self.enc.status.flash(COPY_FAILED, ttl);
                CopyOutcome::Failed
            }
        }
    }

    /// Standalone SVG document of the current encode view.
    ///
    /// Exports whatever the view shows, including a playback reveal. `None`
    /// when the view has no points; the export status then reads
    /// "Nothing to export.".
    pub fn export_svg(&mut self, theme: Theme) -> Option<String> {
        let frame = self.encode_frame();
        if frame.points.is_empty() {
            self.enc
                .status
                .flash(NOTHING_TO_EXPORT, self.config.status_ttl());
            return None;
        }
        Some(SvgExporter::new(theme).export(&frame))
    }

    /// Export status message, if one is showing.
    #[must_use]
    pub fn export_status(&self) -> Option<&str> {
        self.enc.status.text()
    }

    /// Empty the encode view, show guides again, and forget cached columns.
    pub fn clear_encode(&mut self) {
        self.enc.plaintext.clear();
        self.enc.ciphertext.clear();
        self.enc.guides_hidden = false;
        self.resolver.invalidate();
        self.redraw_encode();
    }

    pub fn set_encode_guides_visible(&mut self, visible: bool) {
        self.enc.guides_hidden = !visible;
    }

    #[must_use]
    pub fn encode_guides_visible(&self) -> bool {
        !self.enc.guides_hidden
    }

    // ── Decode ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn points_input(&self) -> &str {
        &self.dec.input
    }

    /// Live plotting of coordinate text.
    ///
    /// On success the points replace the decode points and errors clear.
    /// On failure the errors are shown and the old points stay.
    pub fn set_points_input(&mut self, raw: &str) -> Result<(), PointParseErrors> {
        self.dec.input = raw.to_owned();
        let points = self.parse_decode_input(raw)?;
        self.stop_decode_playback();
        self.dec.points = points;
        Ok(())
    }

    /// Decode coordinate text at once.
    pub fn decode_now(&mut self, raw: &str) -> Result<&str, PointParseErrors> {
        self.dec.input = raw.to_owned();
        let points = self.parse_decode_input(raw)?;
        self.stop_decode_playback();
        if points.is_empty() {
            self.dec.output.clear();
        } else {
            self.dec.output = decoder::decode(&points, &self.key, &self.config.layout);
            self.dec.points = points;
        }
        Ok(&self.dec.output)
    }

    /// Copy the encode points into the decode view.
    ///
    /// Returns the coordinate text, or `None` (and flashes an error) when
    /// there is nothing encoded.
    pub fn sync_from_encode(&mut self) -> Option<&str> {
        if self.enc.points.is_empty() {
            self.dec
                .errors
                .flash(NO_CIPHERTEXT, self.config.sync_error_ttl());
            return None;
        }
        self.stop_decode_playback();
        self.dec.input = format_points(&self.enc.points);
        self.dec.errors.clear();
        self.dec.points = self.enc.points.clone();
        Some(&self.dec.input)
    }

    /// Empty the decode view and stop its playback.
    pub fn clear_decode(&mut self) {
        self.stop_decode_playback();
        self.dec.points.clear();
        self.dec.input.clear();
        self.dec.output.clear();
        self.dec.errors.clear();
    }

    #[must_use]
    pub fn decode_points(&self) -> &[Point] {
        &self.dec.points
    }

    #[must_use]
    pub fn decoded_text(&self) -> &str {
        &self.dec.output
    }

    /// Decode error line (`" / "`-joined parse errors or the sync error).
    #[must_use]
    pub fn decode_error(&self) -> Option<&str> {
        self.dec.errors.text()
    }

    pub fn set_decode_guides_visible(&mut self, visible: bool) {
        self.dec.guides_hidden = !visible;
    }

    #[must_use]
    pub fn decode_guides_visible(&self) -> bool {
        !self.dec.guides_hidden
    }

    fn parse_decode_input(&mut self, raw: &str) -> Result<Vec<Point>, PointParseErrors> {
        match parse_points(raw) {
            Ok(points) => {
                self.dec.errors.clear();
                Ok(points)
            }
            Err(errors) => {
                self.dec.errors.show(errors.to_string());
                Err(errors)
            }
        }
    }

    fn stop_decode_playback(&mut self) {
        self.dec.playback.stop(&mut self.scheduler);
        self.dec.reveal = None;
    }

    // ── Playback ─────────────────────────────────────────────────────────

    /// Start revealing the encode path one symbol per tick.
    ///
    /// Returns `false` if already running or if nothing would be plotted.
    pub fn play_encode(&mut self) -> bool {
        if self.enc.playback.is_running() || self.enc.plaintext.is_empty() {
            return false;
        }
        let prepared = encoder::prepare_plaintext(&self.enc.plaintext);
        let symbols = encoder::plan(&prepared, &self.key);
        if symbols.is_empty() {
            return false;
        }
        let canvas_height = self.config.layout.canvas_height_for_rows(symbols.len());
        let interval = self.config.tick_interval();
        if !self
            .enc
            .playback
            .start(symbols, &mut self.scheduler, interval)
        {
            return false;
        }
        self.enc.reveal = Some(Reveal {
            canvas_height,
            ..Reveal::default()
        });
        true
    }

    /// Stop encode playback and show the full bulk encoding.
    pub fn stop_encode(&mut self) {
        self.redraw_encode();
    }

    /// Parse `raw` and start revealing the decode one point per tick.
    ///
    /// `Ok(false)` if already running or there are no points.
    pub fn play_decode(&mut self, raw: &str) -> Result<bool, PointParseErrors> {
        if self.dec.playback.is_running() {
            return Ok(false);
        }
        self.dec.input = raw.to_owned();
        let points = self.parse_decode_input(raw)?;
        if points.is_empty() {
            return Ok(false);
        }
        let sorted = decoder::sort_by_row(&points);
        let canvas_height = self.config.layout.canvas_height(&sorted);
        self.dec.points = sorted.clone();
        self.dec.output.clear();
        let interval = self.config.tick_interval();
        self.dec.playback.start(sorted, &mut self.scheduler, interval);
        self.dec.reveal = Some(Reveal {
            canvas_height,
            ..Reveal::default()
        });
        Ok(true)
    }

    /// Stop decode playback and show the full decode point set.
    pub fn stop_decode(&mut self) {
        self.stop_decode_playback();
    }

    #[must_use]
    pub fn encode_state(&self) -> PlaybackState {
        self.enc.playback.state()
    }

    #[must_use]
    pub fn decode_state(&self) -> PlaybackState {
        self.dec.playback.state()
    }

    /// Handle one firing of `timer`. Unknown timers are ignored.
    pub fn fire(&mut self, timer: TimerId) -> Option<PlaybackEvent> {
        if let Some(step) = self.enc.playback.tick(timer, &mut self.scheduler) {
            let Some(point) = encoder::plot_symbol(
                step.item,
                step.index,
                &self.key,
                &mut self.resolver,
                &self.config.layout,
            ) else {
                self.enc.playback.stop(&mut self.scheduler);
                return None;
            };
            if let Some(reveal) = self.enc.reveal.as_mut() {
                reveal.points.push(point);
                reveal.highlight = Some(point);
            }
            return Some(PlaybackEvent::Encode {
                index: step.index,
                point,
                finished: step.finished,
            });
        }

        if let Some(step) = self.dec.playback.tick(timer, &mut self.scheduler) {
            let point = step.item;
            let letter = decoder::decode_point(point, &self.key, &self.config.layout);
            if let Some(c) = letter {
                self.dec.output.push(c);
            }
            if let Some(reveal) = self.dec.reveal.as_mut() {
                reveal.points.push(point);
                reveal.highlight = Some(point);
            }
            return Some(PlaybackEvent::Decode {
                index: step.index,
                point,
                letter,
                finished: step.finished,
            });
        }

        tracing::trace!(timer = timer.as_raw(), "ignoring stale timer");
        None
    }

    /// Count down status messages by `dt` of host time.
    pub fn tick_status(&mut self, dt: Duration) {
        self.enc.status.tick(dt);
        self.dec.errors.tick(dt);
    }

    // ── Views ────────────────────────────────────────────────────────────

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.config.layout
    }

    #[must_use]
    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The encode view: the playback reveal if one is showing, else the bulk path.
    #[must_use]
    pub fn encode_frame(&self) -> ViewFrame {
        let guides = GuideMode::encode(self.enc.guides_hidden);
        self.frame(&self.enc.points, self.enc.reveal.as_ref(), guides, PathStyle::Encode)
    }

    /// The decode view: the playback reveal if one is showing, else all points.
    #[must_use]
    pub fn decode_frame(&self) -> ViewFrame {
        let guides = GuideMode::decode(self.dec.guides_hidden);
        self.frame(&self.dec.points, self.dec.reveal.as_ref(), guides, PathStyle::Decode)
    }

    /// Key labels and guides only.
    #[must_use]
    pub fn key_preview_frame(&self) -> ViewFrame {
        ViewFrame::key_preview(self.key.clone(), self.config.layout)
    }

    fn frame(
        &self,
        points: &[Point],
        reveal: Option<&Reveal>,
        guides: GuideMode,
        style: PathStyle,
    ) -> ViewFrame {
        let key = self.key.clone();
        let layout = self.config.layout;
        match reveal {
            Some(r) => ViewFrame::fitted(key, layout, r.points.clone(), guides, style)
                .with_canvas_height(r.canvas_height)
                .with_highlight(r.highlight),
            None => ViewFrame::fitted(key, layout, points.to_vec(), guides, style),
        }
    }
}
