//! Revision 1 numerics.
//!
//! Unlike revision 0 this layout never stores raw IEEE words. Magnitude
//! classes pack a marker into the top bits and the double bits (or a scaled
//! mantissa) below it, with bit 0 acting as a decimal continuation marker:
//! when set, eight extra bytes of decimal precision follow and are consumed
//! without affecting the value. Negation is applied explicitly after
//! reconstruction.

use resumetoken_buffers::Reader;

use crate::error::KeyStringError;
use crate::value::KeyStringValue;

/// 2^-256, the scale of the mantissa-coded small-magnitude range.
const SMALL_MAGNITUDE_SCALE: f64 = f64::from_bits(0x2ff0_0000_0000_0000);

pub(super) fn large_magnitude(
    reader: &mut Reader<'_>,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    let encoded = super::adjusted_word(reader, negative)?;
    if encoded & (1u64 << 63) == 0 {
        // Magnitudes up to the largest finite double: the word holds the
        // double bits shifted down by one, with the implied exponent top
        // bit restored.
        let dcm = encoded & 1;
        let mut value = f64::from_bits((encoded >> 1) | (1u64 << 62));
        if negative {
            value = -value;
        }
        if dcm != 0 {
            reader.u64()?;
        }
        return Ok(KeyStringValue::Double(value));
    }
    if encoded != u64::MAX {
        // Decimal magnitudes beyond the double range carry their own
        // continuation word.
        reader.u64()?;
    }
    Ok(KeyStringValue::Double(if negative {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }))
}

pub(super) fn small_magnitude(
    reader: &mut Reader<'_>,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    let encoded = super::adjusted_word(reader, negative)?;
    match encoded >> 62 {
        0 => {
            // Decimal magnitudes below the subnormal range round to zero
            // and keep their precision in the continuation word.
            reader.u64()?;
            Ok(KeyStringValue::Integer(0))
        }
        1 | 2 => {
            let dcm = encoded & 1;
            let bits = (encoded - (1u64 << 62)) >> 1;
            let mut value = f64::from_bits(bits) * SMALL_MAGNITUDE_SCALE;
            if dcm != 0 {
                reader.u64()?;
            }
            if negative {
                value = -value;
            }
            Ok(KeyStringValue::Double(value))
        }
        3 => {
            let mut value = f64::from_bits(encoded >> 2);
            if negative {
                value = -value;
            }
            Ok(KeyStringValue::Double(value))
        }
        _ => Err(KeyStringError::Unreachable),
    }
}

/// Rebuilds a double from a sized-integer magnitude plus the fraction bytes
/// that pad the encoding out to eight bytes.
pub(super) fn int_fraction(
    reader: &mut Reader<'_>,
    integer_part: u64,
    width: u32,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    let frac_bytes = 8 - width;
    let mut encoded_fraction = integer_part;
    for _ in 0..frac_bytes {
        let mut byte = reader.u8()?;
        if negative {
            byte = !byte;
        }
        encoded_fraction = (encoded_fraction << 8) | byte as u64;
    }
    // The low two bits are the continuation marker, not value bits. An
    // eight-byte integer leaves no room for them, which forces a
    // continuation word.
    let mut value = ((encoded_fraction & !3u64) as f64) * 2f64.powi(-8 * frac_bytes as i32);
    let dcm = if frac_bytes != 0 {
        encoded_fraction & 3
    } else {
        3
    };
    if dcm != 0 && dcm != 2 {
        reader.u64()?;
    }
    if negative {
        value = -value;
    }
    Ok(KeyStringValue::Double(value))
}
