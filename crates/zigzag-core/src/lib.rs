#![forbid(unsafe_code)]

//! Core mapping logic for the zigzag cipher lab.
//!
//! Plaintext letters are mapped to columns of a key alphabet and plotted as
//! a connected path of points, one row per plotted letter. Decoding sorts a
//! set of points by row and maps each back to the nearest key column.
//!
//! # Key Components
//!
//! - [`Key`] - Normalized key alphabet (A–Z only, up to 1000 letters)
//! - [`Layout`] - Column/row geometry shared by encoder, decoder and renderers
//! - [`IndexResolver`] - Stable-under-redraw choice among duplicate key columns
//! - [`encoder`] - Plaintext to ordered [`Point`] sequence
//! - [`decoder`] - Unordered [`Point`] set back to lowercase plaintext
//! - [`parse`] - All-or-nothing parsing of `x,y` coordinate text
//!
//! # Example
//!
//! ```
//! use zigzag_core::{IndexResolver, Key, Layout, LowestPicker, decoder, encoder};
//!
//! let key = Key::normalize("zyxwvutsrqponmlkjihgfedcba");
//! let layout = Layout::default();
//! let mut resolver = IndexResolver::new(LowestPicker);
//!
//! let points = encoder::encode("Hello!", &key, &mut resolver, &layout);
//! assert_eq!(points.len(), 5);
//! assert_eq!(decoder::decode(&points, &key, &layout), "hello");
//! ```
//!
//! # Role in the lab
//! `zigzag-core` owns every rule that decides *where* a letter is drawn.
//! Rendering (`zigzag-render`) and timed playback (`zigzag-runtime`) only
//! consume what this crate computes.

pub mod decoder;
pub mod encoder;
pub mod key;
pub mod layout;
pub mod parse;
pub mod point;
pub mod resolver;

pub use encoder::PlannedSymbol;
pub use key::{ALPHABET, Key, KeyStats, MAX_KEY_LEN};
pub use layout::Layout;
pub use parse::{PointParseError, PointParseErrors, parse_points};
pub use point::{Point, format_points};
pub use resolver::{
    CacheKey, IndexPicker, IndexResolver, LowestPicker, RandomPicker, Resolution,
    ResolutionCache, resolve_or_assign,
};
