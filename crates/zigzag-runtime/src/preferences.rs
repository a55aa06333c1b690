#![forbid(unsafe_code)]

//! Named preference storage and the theme preference.
//!
//! The lab persists exactly one value, the visual theme, under
//! [`THEME_KEY`]. Reading falls back to the host's ambient light/dark
//! setting when nothing valid is stored. A failed write is logged and
//! otherwise ignored; the toggled theme still takes effect.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "values": { "zigzag-theme": "dark" }
//! }
//! ```
//!
//! # Atomic Writes
//!
//! [`FileStore`] writes use a temp-file-then-rename pattern to prevent
//! corruption on crash.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zigzag_render::Theme;

/// Preference name for the theme.
pub const THEME_KEY: &str = "zigzag-theme";

/// Current file format version.
const FORMAT_VERSION: u64 = 1;

/// Errors from a preference store.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed preference file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported preference file version: {found} (expected {expected})", expected = FORMAT_VERSION)]
    UnsupportedVersion { found: u64 },
}

/// String key/value preference storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// On-disk representation of stored preferences.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    version: u64,
    values: BTreeMap<String, String>,
}

/// JSON file store. The parent directory must already exist.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored value.
    ///
    /// - **Missing file** yields an empty map (not an error).
    /// - **Corrupted file** yields [`PreferenceError::Json`].
    /// - **Version mismatch** yields [`PreferenceError::UnsupportedVersion`].
    fn load(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        let file: PreferenceFile = serde_json::from_str(&contents)?;
        if file.version != FORMAT_VERSION {
            return Err(PreferenceError::UnsupportedVersion {
                found: file.version,
            });
        }
        Ok(file.values)
    }

    fn save(&self, values: BTreeMap<String, String>) -> Result<(), PreferenceError> {
        let file = PreferenceFile {
            version: FORMAT_VERSION,
            values,
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Atomic write: temp file then rename
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());
        self.save(values)
    }
}

/// Startup theme: the stored value if valid, otherwise the ambient preference.
pub fn resolve_theme(store: &dyn PreferenceStore, ambient_dark: bool) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => match raw.parse() {
            Ok(theme) => return theme,
            Err(e) => tracing::warn!(error = %e, "ignoring stored theme"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read theme preference"),
    }
    Theme::from_dark_flag(ambient_dark)
}

/// Flip `current` and persist the result.
///
/// An unset current theme counts as dark. The new theme is returned even
/// when the write fails.
pub fn toggle_theme(store: &mut dyn PreferenceStore, current: Option<Theme>) -> Theme {
    let next = current.unwrap_or(Theme::Dark).toggled();
    if let Err(e) = store.set(THEME_KEY, next.as_str()) {
        tracing::warn!(error = %e, theme = %next, "could not save theme preference");
    }
    next
}
