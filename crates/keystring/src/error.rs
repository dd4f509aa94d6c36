//! KeyString decoder error type.

use resumetoken_buffers::BufferError;
use thiserror::Error;

/// Error type for KeyString decoding operations.
///
/// Every variant is fatal to the decode in progress; there are no partial
/// results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyStringError {
    #[error("unexpected end of input")]
    OutOfData,
    #[error("unknown keystring ctype {0}")]
    UnknownCType(u8),
    #[error("unreachable decoder state")]
    Unreachable,
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
    #[error("invalid hex digit at position {position}")]
    InvalidHex { position: usize },
}

impl From<BufferError> for KeyStringError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => KeyStringError::OutOfData,
            BufferError::InvalidHex { position } => KeyStringError::InvalidHex { position },
        }
    }
}
