use thiserror::Error;
use zigzag_core::PointParseErrors;
use zigzag_runtime::{LabConfigError, PreferenceError};

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for rejected coordinate text.
pub const PARSE_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] LabConfigError),

    #[error("preference error: {0}")]
    Preferences(#[from] PreferenceError),

    /// One line per rejected token.
    #[error("{}", .0.messages().join("\n"))]
    Parse(#[from] PointParseErrors),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::Parse(_) => PARSE_EXIT_CODE,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
