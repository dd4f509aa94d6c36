//! Change-stream resume token decoder.
//!
//! A resume token is the `_data` payload a change stream hands out with
//! every event so a consumer can resume from that point. The payload is a
//! hex-encoded KeyString (always the V1 layout) holding up to seven values
//! in a fixed order: cluster timestamp, format version, token type,
//! transaction operation index, invalidate flag, collection UUID, and the
//! document key of the event. Later fields are simply absent in shorter or
//! older tokens.
//!
//! # Example
//!
//! ```
//! use resumetoken::decode_resume_token;
//!
//! let token = decode_resume_token("82612F653E000000022B0229296E04").unwrap();
//! let ts = token.timestamp.unwrap();
//! assert_eq!((ts.seconds, ts.increment), (1630496062, 2));
//! assert_eq!(token.version, Some(1));
//! assert_eq!(token.uuid, None);
//! ```

pub mod cli;

mod token;

pub use token::{
    decode_resume_token, decode_resume_token_bytes, ResumeToken, ResumeTokenError, Uuid,
};
