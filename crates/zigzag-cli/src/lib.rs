#![forbid(unsafe_code)]

//! The `zigzag` command-line tool.
//!
//! Every subcommand reads from a generic input and writes to a generic
//! output so tests can drive [`cli::execute`] without a terminal.

pub mod cipher;
pub mod cli;
pub mod error;
pub mod play;
pub mod theme;

pub use cli::{Cli, Commands, Context, execute, run, run_from_env};
pub use error::{CliError, Result};
