//! Logic behind the `resumetoken-decode` binary.

use resumetoken_keystring::{decode_keystring_hex, to_ejson, EjsonMode, KeyStringError, Version};
use serde_json::Value;
use thiserror::Error;

use crate::token::{decode_resume_token, ResumeTokenError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    KeyString(#[from] KeyStringError),
    #[error("{0}")]
    Token(#[from] ResumeTokenError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a resume token and renders its fields as pretty-printed JSON.
pub fn decode_token_to_json(hex: &str, mode: EjsonMode) -> Result<String, CliError> {
    let token = decode_resume_token(hex)?;
    Ok(serde_json::to_string_pretty(&token.to_ejson(mode))?)
}

/// Decodes a bare keystring and renders its values as a pretty-printed
/// JSON array.
pub fn decode_keystring_to_json(
    hex: &str,
    version: Version,
    mode: EjsonMode,
) -> Result<String, CliError> {
    let values = decode_keystring_hex(version, hex)?;
    let rendered: Vec<Value> = values.iter().map(|value| to_ejson(value, mode)).collect();
    Ok(serde_json::to_string_pretty(&Value::Array(rendered))?)
}
