//! Hexadecimal text conversions.

use crate::BufferError;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Encodes bytes as a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decodes a hex string into bytes.
///
/// Digits are case-insensitive and consumed in pairs from left to right; a
/// trailing unpaired character is ignored rather than rejected. Any character
/// that is not a hexadecimal digit fails with [`BufferError::InvalidHex`]
/// carrying its offset.
pub fn from_hex(s: &str) -> Result<Vec<u8>, BufferError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 2);
    let mut i = 0;
    while i + 1 < bytes.len() {
        let hi = digit(bytes[i], i)?;
        let lo = digit(bytes[i + 1], i + 1)?;
        out.push((hi << 4) | lo);
        i += 2;
    }
    Ok(out)
}

#[inline]
fn digit(b: u8, position: usize) -> Result<u8, BufferError> {
    (b as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(BufferError::InvalidHex { position })
}
