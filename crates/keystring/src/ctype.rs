//! KeyString type tags.
//!
//! Each encoded value starts with a one-byte tag. Tag values grow with the
//! sort rank of the type they mark, which is what makes the encoding
//! order-preserving; the numeric range additionally splits by sign and
//! magnitude class so that byte comparison orders numbers correctly.

use crate::error::KeyStringError;

/// Terminates a container. Nested objects and arrays also accept a plain
/// zero byte in the tag position as their terminator.
pub const K_END: u8 = 4;

/// Ordering bracket marking an exclusive lower bound. Carries no value; the
/// byte after it is the real tag.
pub const K_LESS: u8 = 1;

/// Ordering bracket marking an exclusive upper bound. Carries no value; the
/// byte after it is the real tag.
pub const K_GREATER: u8 = 254;

/// One-byte type tag of an encoded KeyString value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CType {
    MinKey = 10,
    Undefined = 15,
    Null = 20,
    NumericNaN = 30,
    /// Magnitude of 2^63 or above, including negative infinity.
    NumericNegativeLargeMagnitude = 31,
    NumericNegative8ByteInt = 32,
    NumericNegative7ByteInt = 33,
    NumericNegative6ByteInt = 34,
    NumericNegative5ByteInt = 35,
    NumericNegative4ByteInt = 36,
    NumericNegative3ByteInt = 37,
    NumericNegative2ByteInt = 38,
    NumericNegative1ByteInt = 39,
    /// Strictly between -1 and 0.
    NumericNegativeSmallMagnitude = 40,
    NumericZero = 41,
    /// Strictly between 0 and 1.
    NumericPositiveSmallMagnitude = 42,
    NumericPositive1ByteInt = 43,
    NumericPositive2ByteInt = 44,
    NumericPositive3ByteInt = 45,
    NumericPositive4ByteInt = 46,
    NumericPositive5ByteInt = 47,
    NumericPositive6ByteInt = 48,
    NumericPositive7ByteInt = 49,
    NumericPositive8ByteInt = 50,
    /// Magnitude of 2^63 or above, including positive infinity.
    NumericPositiveLargeMagnitude = 51,
    StringLike = 60,
    Object = 70,
    Array = 80,
    BinData = 90,
    ObjectId = 100,
    BoolFalse = 110,
    BoolTrue = 111,
    Date = 120,
    Timestamp = 130,
    RegEx = 140,
    DbRef = 150,
    Code = 160,
    CodeWithScope = 170,
    MaxKey = 240,
}

impl CType {
    /// Maps a raw tag byte to its `CType`. The framing bytes ([`K_END`],
    /// [`K_LESS`], [`K_GREATER`], and the zero terminator) are not value
    /// tags and fail here like any other unknown byte.
    pub fn from_u8(byte: u8) -> Result<CType, KeyStringError> {
        Ok(match byte {
            10 => CType::MinKey,
            15 => CType::Undefined,
            20 => CType::Null,
            30 => CType::NumericNaN,
            31 => CType::NumericNegativeLargeMagnitude,
            32 => CType::NumericNegative8ByteInt,
            33 => CType::NumericNegative7ByteInt,
            34 => CType::NumericNegative6ByteInt,
            35 => CType::NumericNegative5ByteInt,
            36 => CType::NumericNegative4ByteInt,
            37 => CType::NumericNegative3ByteInt,
            38 => CType::NumericNegative2ByteInt,
            39 => CType::NumericNegative1ByteInt,
            40 => CType::NumericNegativeSmallMagnitude,
            41 => CType::NumericZero,
            42 => CType::NumericPositiveSmallMagnitude,
            43 => CType::NumericPositive1ByteInt,
            44 => CType::NumericPositive2ByteInt,
            45 => CType::NumericPositive3ByteInt,
            46 => CType::NumericPositive4ByteInt,
            47 => CType::NumericPositive5ByteInt,
            48 => CType::NumericPositive6ByteInt,
            49 => CType::NumericPositive7ByteInt,
            50 => CType::NumericPositive8ByteInt,
            51 => CType::NumericPositiveLargeMagnitude,
            60 => CType::StringLike,
            70 => CType::Object,
            80 => CType::Array,
            90 => CType::BinData,
            100 => CType::ObjectId,
            110 => CType::BoolFalse,
            111 => CType::BoolTrue,
            120 => CType::Date,
            130 => CType::Timestamp,
            140 => CType::RegEx,
            150 => CType::DbRef,
            160 => CType::Code,
            170 => CType::CodeWithScope,
            240 => CType::MaxKey,
            _ => return Err(KeyStringError::UnknownCType(byte)),
        })
    }

    /// For the sized-integer tags, the count of magnitude bytes that follow
    /// the tag; `None` for every other tag.
    pub fn int_byte_len(self) -> Option<u32> {
        let v = self as u8;
        match v {
            32..=39 => Some((40 - v) as u32),
            43..=50 => Some((v - 42) as u32),
            _ => None,
        }
    }

    /// True for the tags that encode values below zero.
    pub fn is_negative(self) -> bool {
        let v = self as u8;
        (31..=40).contains(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_round_trips_discriminants() {
        for byte in 0..=255u8 {
            if let Ok(ctype) = CType::from_u8(byte) {
                assert_eq!(ctype as u8, byte);
            }
        }
    }

    #[test]
    fn test_from_u8_rejects_framing_bytes() {
        assert_eq!(CType::from_u8(0), Err(KeyStringError::UnknownCType(0)));
        assert_eq!(
            CType::from_u8(K_END),
            Err(KeyStringError::UnknownCType(K_END))
        );
        assert_eq!(
            CType::from_u8(K_LESS),
            Err(KeyStringError::UnknownCType(K_LESS))
        );
        assert_eq!(
            CType::from_u8(K_GREATER),
            Err(KeyStringError::UnknownCType(K_GREATER))
        );
    }

    #[test]
    fn test_int_byte_len() {
        assert_eq!(CType::NumericPositive1ByteInt.int_byte_len(), Some(1));
        assert_eq!(CType::NumericPositive8ByteInt.int_byte_len(), Some(8));
        assert_eq!(CType::NumericNegative1ByteInt.int_byte_len(), Some(1));
        assert_eq!(CType::NumericNegative8ByteInt.int_byte_len(), Some(8));
        assert_eq!(CType::NumericZero.int_byte_len(), None);
        assert_eq!(CType::StringLike.int_byte_len(), None);
    }

    #[test]
    fn test_is_negative() {
        assert!(CType::NumericNegativeLargeMagnitude.is_negative());
        assert!(CType::NumericNegative4ByteInt.is_negative());
        assert!(CType::NumericNegativeSmallMagnitude.is_negative());
        assert!(!CType::NumericZero.is_negative());
        assert!(!CType::NumericPositive1ByteInt.is_negative());
        assert!(!CType::NumericNaN.is_negative());
    }
}
