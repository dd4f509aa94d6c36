//! Binary buffer utilities for resumetoken-rs.
//!
//! This crate provides the low-level plumbing the KeyString decoder is built
//! on: a forward-only, bounds-checked cursor over a byte slice, and helpers
//! for converting between bytes and their hexadecimal text form.
//!
//! # Overview
//!
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking;
//!   every read is bounds-checked and returns a [`Result`]
//! - [`from_hex`] / [`to_hex`] - Hexadecimal text conversions
//!
//! # Example
//!
//! ```
//! use resumetoken_buffers::{from_hex, Reader};
//!
//! let data = from_hex("612f653e").unwrap();
//! let mut reader = Reader::new(&data);
//!
//! assert_eq!(reader.u32(), Ok(0x612f653e));
//! assert!(reader.is_empty());
//! ```

mod hex;
mod reader;


pub use hex::{from_hex, to_hex};
pub use reader::Reader;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer,
    /// A character in a hex string was not a hexadecimal digit.
    InvalidHex {
        /// Offset of the offending character in the input string.
        position: usize,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
            BufferError::InvalidHex { position } => {
                write!(f, "invalid hex digit at position {}", position)
            }
        }
    }
}

impl std::error::Error for BufferError {}
