//! Revision 0 numerics.
//!
//! Both magnitude classes store the raw IEEE 754 bits of the double, so the
//! sign lives inside the word and no explicit negation happens here.
//! Fractional parts of sized integers store the mantissa bytes that did not
//! fit in the integer part.

use resumetoken_buffers::Reader;

use crate::error::KeyStringError;
use crate::value::KeyStringValue;

pub(super) fn double_bits(
    reader: &mut Reader<'_>,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    let word = super::adjusted_word(reader, negative)?;
    Ok(KeyStringValue::Double(f64::from_bits(word)))
}

/// Rebuilds a double from a sized-integer magnitude plus trailing mantissa
/// bytes.
///
/// The integer part fixes the exponent and the high mantissa bits; the
/// encoding then stores exactly the mantissa bytes below it.
pub(super) fn int_fraction(
    reader: &mut Reader<'_>,
    integer_part: u64,
    negative: bool,
) -> Result<KeyStringValue, KeyStringError> {
    let exponent = 63 - integer_part.leading_zeros() as i32;
    let fractional_bits = 52 - exponent;
    let fractional_bytes = if fractional_bits > 0 {
        ((fractional_bits + 7) / 8) as u32
    } else {
        0
    };
    let mut bits = if fractional_bits >= 0 {
        integer_part << fractional_bits
    } else {
        integer_part >> -fractional_bits
    };
    bits &= !(1u64 << 52);
    bits |= ((exponent + 1023) as u64) << 52;
    if negative {
        bits |= 1u64 << 63;
    }
    for i in 0..fractional_bytes {
        let mut byte = reader.u8()?;
        if negative {
            byte = !byte;
        }
        bits |= (byte as u64) << ((fractional_bytes - i - 1) * 8);
    }
    Ok(KeyStringValue::Double(f64::from_bits(bits)))
}
