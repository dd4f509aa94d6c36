//! Numeric field reconstruction.
//!
//! The numeric tag range covers doubles, signed integers of one to eight
//! magnitude bytes, and decimal values whose extra precision is consumed but
//! not reconstructed. The two format revisions encode all of these
//! differently; each revision has its own pure decoding functions ([`v0`],
//! [`v1`]) and the functions here dispatch on the revision exactly once.
//!
//! Negative values store their payload bytes bitwise-complemented so that
//! byte comparison still sorts them correctly; every decode path therefore
//! starts by undoing the complement.

mod v0;
mod v1;

use resumetoken_buffers::Reader;

use crate::decoder::Version;
use crate::error::KeyStringError;
use crate::value::KeyStringValue;

/// Largest integer magnitude that is exact in a double.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Decodes a large-magnitude numeric (2^63 and above, including the
/// infinities).
pub(crate) fn large_magnitude(
    version: Version,
    reader: &mut Reader<'_>,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    match version {
        Version::V0 => v0::double_bits(reader, negative),
        Version::V1 => v1::large_magnitude(reader, negative),
    }
}

/// Decodes a small-magnitude numeric (strictly between -1 and 1, zero
/// excluded).
pub(crate) fn small_magnitude(
    version: Version,
    reader: &mut Reader<'_>,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    match version {
        Version::V0 => v0::double_bits(reader, negative),
        Version::V1 => v1::small_magnitude(reader, negative),
    }
}

/// Decodes a sized-integer numeric of `width` magnitude bytes.
///
/// Bit 0 of the magnitude flags a fractional part. Without one the value is
/// an integer; with one the remaining encoding differs per revision.
pub(crate) fn sized_int(
    version: Version,
    reader: &mut Reader<'_>,
    width: u32,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    let mut encoded = 0u64;
    for _ in 0..width {
        let mut byte = reader.u8()?;
        if negative {
            byte = !byte;
        }
        encoded = (encoded << 8) | byte as u64;
    }
    let has_fraction = encoded & 1 != 0;
    let integer_part = encoded >> 1;
    if !has_fraction {
        return Ok(finish_int(integer_part, negative));
    }
    match version {
        Version::V0 => v0::int_fraction(reader, integer_part, negative),
        Version::V1 => v1::int_fraction(reader, integer_part, width, negative),
    }
}

/// Reads the 64-bit word of a magnitude-class numeric, undoing the
/// complement of negative values.
fn adjusted_word(reader: &mut Reader<'_>, negative: bool) -> Result<u64, KeyStringError> {
    let word = reader.u64()?;
    Ok(if negative { !word } else { word })
}

fn finish_int(magnitude: u64, negative: bool) -> KeyStringValue {
    if magnitude <= MAX_SAFE_INTEGER {
        let n = magnitude as i64;
        KeyStringValue::Integer(if negative { -n } else { n })
    } else {
        let n = magnitude as i128;
        KeyStringValue::BigInt(if negative { -n } else { n })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(version: Version, data: &[u8], width: u32, negative: bool) -> KeyStringValue {
        let mut reader = Reader::new(data);
        sized_int(version, &mut reader, width, negative).unwrap()
    }

    #[test]
    fn test_one_byte_int() {
        assert_eq!(
            int(Version::V1, &[0x0a], 1, false),
            KeyStringValue::Integer(5)
        );
        assert_eq!(
            int(Version::V1, &[0xf5], 1, true),
            KeyStringValue::Integer(-5)
        );
        assert_eq!(
            int(Version::V0, &[0x02], 1, false),
            KeyStringValue::Integer(1)
        );
    }

    #[test]
    fn test_multi_byte_int() {
        // -256 as a two-byte magnitude, bytes complemented.
        assert_eq!(
            int(Version::V1, &[0xfd, 0xff], 2, true),
            KeyStringValue::Integer(-256)
        );
        // 2^32 as a five-byte magnitude.
        assert_eq!(
            int(Version::V1, &[0x02, 0x00, 0x00, 0x00, 0x00], 5, false),
            KeyStringValue::Integer(4294967296)
        );
    }

    #[test]
    fn test_int_double_exact_boundary() {
        // 2^53 - 1 is the last magnitude that stays an Integer.
        assert_eq!(
            int(
                Version::V1,
                &[0x3f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe],
                7,
                false
            ),
            KeyStringValue::Integer(9007199254740991)
        );
        assert_eq!(
            int(
                Version::V1,
                &[0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
                7,
                false
            ),
            KeyStringValue::BigInt(9007199254740992)
        );
    }

    #[test]
    fn test_big_int() {
        assert_eq!(
            int(
                Version::V1,
                &[0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
                8,
                false
            ),
            KeyStringValue::BigInt(1 << 60)
        );
        assert_eq!(
            int(
                Version::V1,
                &[0xdf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
                8,
                true
            ),
            KeyStringValue::BigInt(-(1 << 60))
        );
    }

    #[test]
    fn test_int_truncated() {
        let mut reader = Reader::new(&[0x01]);
        assert_eq!(
            sized_int(Version::V1, &mut reader, 2, false),
            Err(KeyStringError::OutOfData)
        );
    }
}
