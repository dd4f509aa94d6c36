//! KeyString decoding.
//!
//! A key is a concatenation of encoded values, each introduced by a one-byte
//! type tag. Two framing details sit outside the tag table:
//!
//! - The bytes [`K_LESS`] and [`K_GREATER`] may precede a tag. They adjust
//!   ordering against otherwise-equal keys and carry no value; the real tag
//!   is the byte after them.
//! - [`K_END`] terminates the key. Inside named containers a zero byte
//!   terminates the field list as well.
//!
//! Named fields are stored as tag, key string, then the tag a second time.
//! The second copy is the one that drives decoding.

use resumetoken_buffers::Reader;

use crate::ctype::{CType, K_END, K_GREATER, K_LESS};
use crate::error::KeyStringError;
use crate::numeric;
use crate::value::{KeyStringValue, ObjectId, Timestamp};

/// Binary layout revision of a key.
///
/// The revision is not recorded in the key itself; callers must know which
/// one produced the bytes. Resume tokens are always [`Version::V1`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// Legacy layout. Doubles are stored as raw IEEE 754 words.
    V0,
    /// Current layout, with decimal continuation markers.
    #[default]
    V1,
}

/// Maximum container nesting depth accepted by the decoder.
pub const MAX_DEPTH: usize = 200;

/// Decodes every value of a key, stopping at the end marker or the end of
/// the input.
pub fn decode_keystring(
    version: Version,
    data: &[u8],
) -> Result<Vec<KeyStringValue>, KeyStringError> {
    KeyStringDecoder::new(version, data).read_top_level()
}

/// Decodes a hex-encoded key. See [`decode_keystring`].
pub fn decode_keystring_hex(
    version: Version,
    hex: &str,
) -> Result<Vec<KeyStringValue>, KeyStringError> {
    let data = resumetoken_buffers::from_hex(hex)?;
    decode_keystring(version, &data)
}

/// Streaming decoder over one key.
///
/// A decoder is single-use: [`read_top_level`](Self::read_top_level) runs
/// the cursor to the end marker and subsequent calls see an exhausted
/// input.
pub struct KeyStringDecoder<'a> {
    version: Version,
    reader: Reader<'a>,
    depth: usize,
}

impl<'a> KeyStringDecoder<'a> {
    pub fn new(version: Version, data: &'a [u8]) -> Self {
        Self {
            version,
            reader: Reader::new(data),
            depth: 0,
        }
    }

    /// Reads values until the end marker or the end of the input. Bytes
    /// after the end marker are ignored.
    pub fn read_top_level(&mut self) -> Result<Vec<KeyStringValue>, KeyStringError> {
        let mut values = Vec::new();
        while !self.reader.is_empty() {
            let tag = self.read_tag_byte()?;
            if tag == K_END {
                break;
            }
            values.push(self.read_value(tag)?);
        }
        Ok(values)
    }

    /// Reads a type tag, skipping at most one ordering bracket before it.
    fn read_tag_byte(&mut self) -> Result<u8, KeyStringError> {
        let byte = self.reader.u8()?;
        if byte == K_LESS || byte == K_GREATER {
            return Ok(self.reader.u8()?);
        }
        Ok(byte)
    }

    /// Reads one element of an unnamed container.
    fn read_single(&mut self) -> Result<KeyStringValue, KeyStringError> {
        let tag = self.read_tag_byte()?;
        if tag == K_END {
            // A lone end marker decodes as an empty array.
            return Ok(KeyStringValue::Array(Vec::new()));
        }
        self.read_value(tag)
    }

    /// Reads the fields of a named container up to its terminator.
    fn read_named(&mut self) -> Result<Vec<(String, KeyStringValue)>, KeyStringError> {
        let mut fields = Vec::new();
        while !self.reader.is_empty() {
            let tag = self.read_tag_byte()?;
            if tag == K_END || tag == 0 {
                break;
            }
            let key = self.reader.cstring();
            // The tag is stored again after the key; the second copy is the
            // authoritative one.
            let tag = self.reader.u8()?;
            fields.push((key, self.read_value(tag)?));
        }
        Ok(fields)
    }

    fn read_value(&mut self, tag: u8) -> Result<KeyStringValue, KeyStringError> {
        let ctype = CType::from_u8(tag)?;
        match ctype {
            CType::MinKey => Ok(KeyStringValue::MinKey),
            CType::MaxKey => Ok(KeyStringValue::MaxKey),
            CType::Undefined => Ok(KeyStringValue::Undefined),
            CType::Null => Ok(KeyStringValue::Null),
            CType::BoolFalse => Ok(KeyStringValue::Bool(false)),
            CType::BoolTrue => Ok(KeyStringValue::Bool(true)),
            CType::NumericNaN => Ok(KeyStringValue::Double(f64::NAN)),
            CType::NumericZero => Ok(KeyStringValue::Integer(0)),
            CType::Date => {
                // Milliseconds are stored with the sign bit flipped.
                let word = self.reader.u64()?;
                Ok(KeyStringValue::DateTime((word ^ (1u64 << 63)) as i64))
            }
            CType::Timestamp => {
                let seconds = self.reader.u32()?;
                let increment = self.reader.u32()?;
                Ok(KeyStringValue::Timestamp(Timestamp { seconds, increment }))
            }
            CType::ObjectId => Ok(KeyStringValue::ObjectId(self.read_object_id()?)),
            CType::StringLike => Ok(KeyStringValue::Str(self.reader.cstring_with_nuls())),
            CType::Code => Ok(KeyStringValue::Code {
                code: self.reader.cstring_with_nuls(),
                scope: None,
            }),
            CType::CodeWithScope => {
                let code = self.reader.cstring_with_nuls();
                self.enter()?;
                let scope = self.read_named()?;
                self.depth -= 1;
                Ok(KeyStringValue::Code {
                    code,
                    scope: Some(scope),
                })
            }
            CType::BinData => {
                let mut size = self.reader.u8()? as usize;
                if size == 0xff {
                    size = self.reader.u32()? as usize;
                }
                let subtype = self.reader.u8()?;
                let data = self.reader.buf(size)?.to_vec();
                Ok(KeyStringValue::Binary { subtype, data })
            }
            CType::RegEx => {
                let pattern = self.reader.cstring();
                let flags = self.reader.cstring();
                Ok(KeyStringValue::Regex { pattern, flags })
            }
            CType::DbRef => {
                let len = self.reader.u32()? as usize;
                let namespace = String::from_utf8_lossy(self.reader.buf(len)?).into_owned();
                let id = self.read_object_id()?;
                Ok(KeyStringValue::DbRef { namespace, id })
            }
            CType::Object => {
                self.enter()?;
                let fields = self.read_named()?;
                self.depth -= 1;
                Ok(KeyStringValue::Object(fields))
            }
            CType::Array => {
                self.enter()?;
                let mut items = Vec::new();
                while self.reader.peek()? != 0 {
                    items.push(self.read_single()?);
                }
                self.reader.u8()?;
                self.depth -= 1;
                Ok(KeyStringValue::Array(items))
            }
            CType::NumericNegativeLargeMagnitude | CType::NumericPositiveLargeMagnitude => {
                numeric::large_magnitude(self.version, &mut self.reader, ctype.is_negative())
            }
            CType::NumericNegativeSmallMagnitude | CType::NumericPositiveSmallMagnitude => {
                numeric::small_magnitude(self.version, &mut self.reader, ctype.is_negative())
            }
            _ => {
                let width = ctype.int_byte_len().ok_or(KeyStringError::Unreachable)?;
                numeric::sized_int(self.version, &mut self.reader, width, ctype.is_negative())
            }
        }
    }

    fn read_object_id(&mut self) -> Result<ObjectId, KeyStringError> {
        let mut id = [0u8; 12];
        id.copy_from_slice(self.reader.buf(12)?);
        Ok(ObjectId(id))
    }

    fn enter(&mut self) -> Result<(), KeyStringError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(KeyStringError::DepthLimitExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(hex: &str) -> Result<Vec<KeyStringValue>, KeyStringError> {
        decode_keystring_hex(Version::V1, hex)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decode(""), Ok(vec![]));
    }

    #[test]
    fn test_end_marker_ignores_trailing_bytes() {
        assert_eq!(decode("04ff"), Ok(vec![]));
        assert_eq!(
            decode("2b0a04ff"),
            Ok(vec![KeyStringValue::Integer(5)])
        );
    }

    #[test]
    fn test_multiple_top_level_values() {
        assert_eq!(
            decode("2b0a2b14"),
            Ok(vec![KeyStringValue::Integer(5), KeyStringValue::Integer(10)])
        );
    }

    #[test]
    fn test_ordering_brackets_skipped() {
        assert_eq!(decode("012b0a"), Ok(vec![KeyStringValue::Integer(5)]));
        assert_eq!(decode("fe2b0a"), Ok(vec![KeyStringValue::Integer(5)]));
    }

    #[test]
    fn test_ordering_bracket_skipped_only_once() {
        assert_eq!(decode("01fe2b0a"), Err(KeyStringError::UnknownCType(254)));
    }

    #[test]
    fn test_object_fields() {
        assert_eq!(
            decode("462b61002b0a00"),
            Ok(vec![KeyStringValue::Object(vec![(
                "a".to_owned(),
                KeyStringValue::Integer(5)
            )])])
        );
        assert_eq!(decode("4600"), Ok(vec![KeyStringValue::Object(vec![])]));
    }

    #[test]
    fn test_object_duplicate_keys_preserved() {
        assert_eq!(
            decode("462b61002b022b61002b0400"),
            Ok(vec![KeyStringValue::Object(vec![
                ("a".to_owned(), KeyStringValue::Integer(1)),
                ("a".to_owned(), KeyStringValue::Integer(2)),
            ])])
        );
    }

    #[test]
    fn test_object_second_tag_is_authoritative() {
        // The tag after the key is read raw, so a bracket byte there is an
        // unknown type.
        assert_eq!(decode("462b6100010a00"), Err(KeyStringError::UnknownCType(1)));
    }

    #[test]
    fn test_object_terminated_by_end_marker() {
        assert_eq!(
            decode("462b61002b0a04"),
            Ok(vec![KeyStringValue::Object(vec![(
                "a".to_owned(),
                KeyStringValue::Integer(5)
            )])])
        );
    }

    #[test]
    fn test_array_elements() {
        assert_eq!(
            decode("502b0a00"),
            Ok(vec![KeyStringValue::Array(vec![KeyStringValue::Integer(5)])])
        );
        assert_eq!(decode("5000"), Ok(vec![KeyStringValue::Array(vec![])]));
        // Brackets apply to array elements as well.
        assert_eq!(
            decode("50012b0a00"),
            Ok(vec![KeyStringValue::Array(vec![KeyStringValue::Integer(5)])])
        );
    }

    #[test]
    fn test_array_lone_end_marker_element() {
        assert_eq!(
            decode("500400"),
            Ok(vec![KeyStringValue::Array(vec![KeyStringValue::Array(
                vec![]
            )])])
        );
    }

    #[test]
    fn test_array_truncated() {
        assert_eq!(decode("502b0a"), Err(KeyStringError::OutOfData));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let nested = "50".repeat(MAX_DEPTH) + &"00".repeat(MAX_DEPTH);
        let values = decode(&nested).unwrap();
        assert_eq!(values.len(), 1);

        let too_deep = "50".repeat(MAX_DEPTH + 1);
        assert_eq!(decode(&too_deep), Err(KeyStringError::DepthLimitExceeded));
    }

    #[test]
    fn test_unknown_ctype() {
        assert_eq!(decode("05"), Err(KeyStringError::UnknownCType(5)));
        assert_eq!(decode("ff"), Err(KeyStringError::UnknownCType(255)));
    }

    #[test]
    fn test_binary_truncated() {
        assert_eq!(decode("5aff00000003000102"), Err(KeyStringError::OutOfData));
    }

    #[test]
    fn test_invalid_hex_digit() {
        assert_eq!(
            decode_keystring_hex(Version::V1, "2bzz"),
            Err(KeyStringError::InvalidHex { position: 2 })
        );
    }
}
