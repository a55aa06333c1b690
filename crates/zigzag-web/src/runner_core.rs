#![forbid(unsafe_code)]

//! Platform-independent runner core.
//!
//! This module contains the logic for driving a [`CipherSession`] from a
//! browser host without any JS/WASM-specific types, enabling native unit
//! testing. Every input is a string, number, or flag; every output is a
//! string (SVG markup, coordinate text, JSON) so the wasm layer only has to
//! convert types.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};
use zigzag_core::{Key, RandomPicker};
use zigzag_render::{Theme, render_svg};
use zigzag_runtime::{
    CipherSession, Clipboard, ClipboardError, CopyOutcome, LabConfig, LabConfigError,
    MemoryClipboard, PlaybackEvent, PlaybackState, PreferenceStore, resolve_theme, toggle_theme,
};

/// A clipboard that rejects every write with the host's reason.
///
/// Browser clipboard writes settle asynchronously; when the host's promise
/// rejects, replaying the copy through this adapter records the failure.
struct RejectingClipboard<'a>(&'a str);

impl Clipboard for RejectingClipboard<'_> {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError(self.0.to_owned()))
    }
}

/// Session plus host-facing state: theme preference, shuffle randomness,
/// and playback steps not yet collected by the host.
pub struct RunnerCore {
    session: CipherSession,
    store: Box<dyn PreferenceStore>,
    theme: Theme,
    rng: SmallRng,
    pending: Vec<PlaybackEvent>,
}

impl RunnerCore {
    /// Create a runner with the default configuration.
    ///
    /// `seed` feeds both the column picker and the shuffle generator;
    /// `ambient_dark` is the host's color-scheme preference, used when the
    /// store holds no valid theme.
    pub fn new(seed: u64, store: Box<dyn PreferenceStore>, ambient_dark: bool) -> Self {
        Self::with_config(LabConfig::default(), seed, store, ambient_dark)
    }

    /// Create a runner from a JSON configuration document.
    pub fn from_config_json(
        json: &str,
        seed: u64,
        store: Box<dyn PreferenceStore>,
        ambient_dark: bool,
    ) -> Result<Self, LabConfigError> {
        let config = LabConfig::from_json_str(json)?;
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(LabConfigError::Validation(problems));
        }
        Ok(Self::with_config(config, seed, store, ambient_dark))
    }

    fn with_config(
        config: LabConfig,
        seed: u64,
        store: Box<dyn PreferenceStore>,
        ambient_dark: bool,
    ) -> Self {
        let theme = resolve_theme(store.as_ref(), ambient_dark);
        tracing::debug!(seed, theme = %theme, "runner created");
        Self {
            session: CipherSession::new(config, RandomPicker::seeded(seed)),
            store,
            theme,
            rng: SmallRng::seed_from_u64(seed.rotate_left(32)),
            pending: Vec::new(),
        }
    }

    /// Advance the host clock by `dt_ms` milliseconds.
    ///
    /// Returns how many playback steps fired; collect them with
    /// [`Self::take_events_json`].
    pub fn advance_time_ms(&mut self, dt_ms: f64) -> usize {
        // Host input can be noisy (NaN/inf/negative spikes). Ignore anything
        // that is not a finite positive duration.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        let max_secs = Duration::MAX.as_secs_f64();
        let secs = (dt_ms / 1000.0).min(max_secs);
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        let events = self.session.advance(duration);
        let fired = events.len();
        self.pending.extend(events);
        fired
    }

    /// Drain collected playback steps as a JSON array.
    pub fn take_events_json(&mut self) -> String {
        let events: Vec<Value> = self.pending.drain(..).map(event_json).collect();
        Value::Array(events).to_string()
    }

    // ── Key ──────────────────────────────────────────────────────────────

    pub fn key(&self) -> String {
        self.session.key().as_str().to_owned()
    }

    pub fn apply_key(&mut self, raw: &str) -> String {
        self.session.apply_key(raw).as_str().to_owned()
    }

    pub fn shuffle_key(&mut self, raw: &str) -> String {
        self.session.shuffle_key(raw, &mut self.rng).as_str().to_owned()
    }

    pub fn reset_key(&mut self) -> String {
        self.session.reset_key().as_str().to_owned()
    }

    /// Key statistics for the key typed so far (not yet applied).
    pub fn key_stats_json(&self, raw: &str) -> String {
        let stats = Key::normalize(raw).stats();
        json!({
            "length": stats.length,
            "duplicates": stats.duplicate_count,
            "missing": stats.missing_count,
        })
        .to_string()
    }

    // ── Encode ───────────────────────────────────────────────────────────

    pub fn set_plaintext(&mut self, text: &str) {
        self.session.set_plaintext(text);
    }

    pub fn set_realtime(&mut self, on: bool) {
        self.session.set_realtime(on);
    }

    pub fn redraw_encode(&mut self) {
        self.session.redraw_encode();
    }

    pub fn encrypt_text(&mut self) -> String {
        self.session.encrypt_text().to_owned()
    }

    /// Coordinate text for the host to place on the clipboard.
    ///
    /// `None` when there is nothing to copy. The export status reads
    /// "Copied." until the host reports a failure via [`Self::copy_failed`].
    pub fn copy_text(&mut self) -> Option<String> {
        let mut clipboard = MemoryClipboard::new();
        match self.session.copy_points(&mut clipboard) {
            CopyOutcome::Copied => clipboard.contents().map(str::to_owned),
            CopyOutcome::Empty | CopyOutcome::Failed => None,
        }
    }

    /// The host's clipboard write rejected.
    pub fn copy_failed(&mut self, reason: &str) {
        self.session.copy_points(&mut RejectingClipboard(reason));
    }

    /// Standalone SVG download of the encode view in the current theme.
    ///
    /// `None` (with a "Nothing to export." status) when there are no points.
    pub fn export_svg(&mut self) -> Option<String> {
        self.session.export_svg(self.theme)
    }

    pub fn export_status(&self) -> Option<String> {
        self.session.export_status().map(str::to_owned)
    }

    pub fn clear_encode(&mut self) {
        self.session.clear_encode();
    }

    pub fn set_encode_guides_visible(&mut self, visible: bool) {
        self.session.set_encode_guides_visible(visible);
    }

    // ── Decode ───────────────────────────────────────────────────────────

    /// Live-plot typed coordinates. Returns the parse errors, empty on success.
    pub fn set_points_input(&mut self, raw: &str) -> Vec<String> {
        match self.session.set_points_input(raw) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.messages(),
        }
    }

    pub fn decode_now(&mut self, raw: &str) -> Result<String, Vec<String>> {
        self.session
            .decode_now(raw)
            .map(str::to_owned)
            .map_err(|errors| errors.messages())
    }

    /// Copy the encode points into the decode view; returns the coordinate text.
    pub fn sync_from_encode(&mut self) -> Option<String> {
        self.session.sync_from_encode().map(str::to_owned)
    }

    pub fn points_input(&self) -> String {
        self.session.points_input().to_owned()
    }

    pub fn decoded_text(&self) -> String {
        self.session.decoded_text().to_owned()
    }

    pub fn decode_error(&self) -> Option<String> {
        self.session.decode_error().map(str::to_owned)
    }

    pub fn clear_decode(&mut self) {
        self.session.clear_decode();
    }

    pub fn set_decode_guides_visible(&mut self, visible: bool) {
        self.session.set_decode_guides_visible(visible);
    }

    // ── Playback ─────────────────────────────────────────────────────────

    pub fn play_encode(&mut self) -> bool {
        self.session.play_encode()
    }

    pub fn stop_encode(&mut self) {
        self.session.stop_encode();
    }

    pub fn play_decode(&mut self, raw: &str) -> Result<bool, Vec<String>> {
        self.session
            .play_decode(raw)
            .map_err(|errors| errors.messages())
    }

    pub fn stop_decode(&mut self) {
        self.session.stop_decode();
    }

    pub fn encode_running(&self) -> bool {
        self.session.encode_state() == PlaybackState::Running
    }

    pub fn decode_running(&self) -> bool {
        self.session.decode_state() == PlaybackState::Running
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn encode_svg(&self) -> String {
        render_svg(&self.session.encode_frame())
    }

    pub fn decode_svg(&self) -> String {
        render_svg(&self.session.decode_frame())
    }

    pub fn key_preview_svg(&self) -> String {
        render_svg(&self.session.key_preview_frame())
    }

    // ── Theme ────────────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip and persist the theme. A failed write still switches the theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = toggle_theme(self.store.as_mut(), Some(self.theme));
        self.theme
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &CipherSession {
        &self.session
    }
}

fn event_json(event: PlaybackEvent) -> Value {
    match event {
        PlaybackEvent::Encode {
            index,
            point,
            finished,
        } => json!({
            "view": "encode",
            "index": index,
            "x": point.x,
            "y": point.y,
            "finished": finished,
        }),
        PlaybackEvent::Decode {
            index,
            point,
            letter,
            finished,
        } => json!({
            "view": "decode",
            "index": index,
            "x": point.x,
            "y": point.y,
            "letter": letter.map(String::from),
            "finished": finished,
        }),
    }
}
