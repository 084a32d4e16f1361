//! Error types and error code constants for minipy.
//!
//! Three layers:
//! - [`RenderError`]: the printer met a structurally invalid tree. Fatal.
//! - [`CodecError`]: one codec failed. The selector logs it and skips the
//!   candidate, so it only surfaces on its own through [`crate::codec`].
//! - [`MinipyError`]: the crate-level error for library callers and the CLI,
//!   bridging the above plus JSON, config, I/O and parser failures.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad CLI input, unreadable config)
//! - `3`: Malformed input (bad JSON, invalid tree, parser failure)
//! - `4`: I/O errors (reading inputs, writing outputs)
//! - `10`: Internal errors (a codec failed outside selection)

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::Codec;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// The input could not be parsed or describes an invalid tree.
    MalformedInput = 3,
    /// Reading or writing files failed.
    IoError = 4,
    /// A codec failed where no fallback exists.
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Printer errors
// ============================================================================

/// The tree cannot be printed as valid source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("malformed {node} node: {reason}")]
    Malformed { node: &'static str, reason: String },
}

impl RenderError {
    pub fn malformed(node: &'static str, reason: impl Into<String>) -> Self {
        RenderError::Malformed {
            node,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Codec errors
// ============================================================================

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{codec} compression failed: {source}")]
    Compress {
        codec: Codec,
        #[source]
        source: io::Error,
    },

    #[error("{codec} decompression failed: {source}")]
    Decompress {
        codec: Codec,
        #[source]
        source: io::Error,
    },

    #[error("not a decompression stub: {reason}")]
    NotAStub { reason: String },

    #[error("unknown codec module '{module}'")]
    UnknownModule { module: String },
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Crate-level error for library callers and the CLI.
#[derive(Debug, Error)]
pub enum MinipyError {
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("parse failed: {0}")]
    Parse(#[from] ParseFailure),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MinipyError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MinipyError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by a [`crate::SourceParser`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        ParseFailure {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&MinipyError> for OutputErrorCode {
    fn from(err: &MinipyError) -> Self {
        match err {
            MinipyError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            MinipyError::Config { .. } => OutputErrorCode::InvalidArguments,
            MinipyError::Render(_) => OutputErrorCode::MalformedInput,
            MinipyError::Json(_) => OutputErrorCode::MalformedInput,
            MinipyError::Parse(_) => OutputErrorCode::MalformedInput,
            MinipyError::Io { .. } => OutputErrorCode::IoError,
            MinipyError::Codec(_) => OutputErrorCode::InternalError,
        }
    }
}

impl From<MinipyError> for OutputErrorCode {
    fn from(err: MinipyError) -> Self {
        OutputErrorCode::from(&err)
    }
}

/// Crate-level result alias.
pub type Result<T, E = MinipyError> = std::result::Result<T, E>;
