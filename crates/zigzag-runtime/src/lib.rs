#![forbid(unsafe_code)]

//! Interactive runtime for the zigzag cipher lab.
//!
//! # Key Components
//!
//! - [`CipherSession`] - Key, encode view, decode view, and their playbacks
//! - [`TickScheduler`] / [`DeterministicScheduler`] - Recurring tick sources
//! - [`Playback`] - Idle/running step reveal state machine
//! - [`StatusLine`] - Expiring status messages
//! - [`preferences`] - Theme persistence with ambient fallback
//! - [`LabConfig`] - TOML/JSON configuration
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use zigzag_core::RandomPicker;
//! use zigzag_runtime::{CipherSession, LabConfig};
//!
//! let mut session = CipherSession::new(LabConfig::default(), RandomPicker::seeded(0));
//! session.set_plaintext("zig zag");
//! assert!(session.play_encode());
//!
//! let events = session.advance(Duration::from_millis(300 * 6));
//! assert_eq!(events.len(), 6);
//! assert_eq!(session.encode_frame().points, session.encode_points());
//! ```

pub mod clipboard;
pub mod config;
pub mod playback;
pub mod preferences;
pub mod scheduler;
pub mod session;
pub mod status;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use config::{LabConfig, LabConfigError};
pub use playback::{Playback, PlaybackState, Step};
pub use preferences::{
    FileStore, MemoryStore, PreferenceError, PreferenceStore, THEME_KEY, resolve_theme,
    toggle_theme,
};
pub use scheduler::{DeterministicScheduler, MIN_INTERVAL, TickScheduler, TimerId};
pub use session::{CipherSession, CopyOutcome, PlaybackEvent};
pub use status::StatusLine;
