//! Decoder for the KeyString binary encoding.
//!
//! KeyString is the order-preserving encoding a document database uses for
//! composite index keys: a sequence of typed values serialized so that a
//! plain memcmp of two encoded keys agrees with the sort order of the values
//! inside them. Change-stream resume tokens reuse the same encoding for
//! their `_data` payload, which is how this crate gets its main audience.
//!
//! The encoding is decode-only here. Field order information (ascending vs
//! descending columns) is discarded, and the extended decimal precision some
//! numeric encodings carry is consumed but not reconstructed.
//!
//! # Example
//!
//! ```
//! use resumetoken_keystring::{decode_keystring_hex, KeyStringValue, Version};
//!
//! let values = decode_keystring_hex(Version::V1, "2B0A").unwrap();
//! assert_eq!(values, vec![KeyStringValue::Integer(5)]);
//! ```

pub mod ctype;
pub mod decoder;
pub mod ejson;
pub mod error;
pub mod value;

mod numeric;


pub use ctype::CType;
pub use decoder::{decode_keystring, decode_keystring_hex, KeyStringDecoder, Version, MAX_DEPTH};
pub use ejson::{to_ejson, EjsonMode};
pub use error::KeyStringError;
pub use value::{KeyStringValue, ObjectId, Timestamp};
