//! Resume token field extraction.

use resumetoken_buffers::to_hex;
use resumetoken_keystring::{
    decode_keystring, decode_keystring_hex, to_ejson, EjsonMode, KeyStringError, KeyStringValue,
    Timestamp, Version,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Error type for resume token decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResumeTokenError {
    #[error("keystring decode failed: {0}")]
    KeyString(#[from] KeyStringError),
    /// A value slot held a value of the wrong type for its position. The
    /// payload names the token field.
    #[error("malformed resume token field {0}")]
    MalformedField(&'static str),
}

/// Collection UUID carried by event tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uuid(pub [u8; 16]);

impl std::fmt::Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = to_hex(&self.0);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

/// Decoded resume token fields, in stream order.
///
/// Every field is optional: a token only stores a prefix of them, and two
/// of them additionally exist only in version 1 and later. An absent field
/// is `None`, never a default value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResumeToken {
    /// Cluster time of the event.
    pub timestamp: Option<Timestamp>,
    /// Token format generation. 0, 1, and 2 occur in the wild.
    pub version: Option<i64>,
    /// 0 for high-water-mark tokens, 128 for event tokens. Only stored
    /// from version 1 on.
    pub token_type: Option<i64>,
    /// Index of the operation within its transaction.
    pub txn_op_index: Option<i64>,
    /// Whether the token came from an invalidate event. Only stored from
    /// version 1 on.
    pub from_invalidate: Option<bool>,
    /// UUID of the collection the event applies to.
    pub uuid: Option<Uuid>,
    /// Document key of the changed document, usually an `_id` object.
    pub document_key: Option<KeyStringValue>,
}

/// Decodes a hex-encoded resume token `_data` payload.
pub fn decode_resume_token(hex: &str) -> Result<ResumeToken, ResumeTokenError> {
    from_values(decode_keystring_hex(Version::V1, hex)?)
}

/// Decodes a resume token from raw bytes. See [`decode_resume_token`].
pub fn decode_resume_token_bytes(data: &[u8]) -> Result<ResumeToken, ResumeTokenError> {
    from_values(decode_keystring(Version::V1, data)?)
}

fn from_values(values: Vec<KeyStringValue>) -> Result<ResumeToken, ResumeTokenError> {
    let mut values = values.into_iter();

    let timestamp = match values.next() {
        None => None,
        Some(KeyStringValue::Timestamp(ts)) => Some(ts),
        Some(_) => return Err(ResumeTokenError::MalformedField("timestamp")),
    };
    let version = next_integer(&mut values, "version")?;
    // The token type and invalidate flag slots only exist from version 1.
    let recent = version.map_or(false, |v| v >= 1);
    let token_type = if recent {
        next_integer(&mut values, "tokenType")?
    } else {
        None
    };
    let txn_op_index = next_integer(&mut values, "txnOpIndex")?;
    let from_invalidate = if recent {
        next_bool(&mut values, "fromInvalidate")?
    } else {
        None
    };
    let uuid = next_uuid(&mut values)?;
    let document_key = values.next();

    Ok(ResumeToken {
        timestamp,
        version,
        token_type,
        txn_op_index,
        from_invalidate,
        uuid,
        document_key,
    })
}

fn next_integer(
    values: &mut impl Iterator<Item = KeyStringValue>,
    field: &'static str,
) -> Result<Option<i64>, ResumeTokenError> {
    match values.next() {
        None => Ok(None),
        Some(KeyStringValue::Integer(n)) => Ok(Some(n)),
        Some(_) => Err(ResumeTokenError::MalformedField(field)),
    }
}

fn next_bool(
    values: &mut impl Iterator<Item = KeyStringValue>,
    field: &'static str,
) -> Result<Option<bool>, ResumeTokenError> {
    match values.next() {
        None => Ok(None),
        Some(KeyStringValue::Bool(b)) => Ok(Some(b)),
        Some(_) => Err(ResumeTokenError::MalformedField(field)),
    }
}

fn next_uuid(
    values: &mut impl Iterator<Item = KeyStringValue>,
) -> Result<Option<Uuid>, ResumeTokenError> {
    match values.next() {
        None => Ok(None),
        // The UUID slot is binary subtype 4 and exactly 16 bytes.
        Some(KeyStringValue::Binary { subtype: 4, data }) if data.len() == 16 => {
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(&data);
            Ok(Some(Uuid(bytes)))
        }
        Some(_) => Err(ResumeTokenError::MalformedField("uuid")),
    }
}

impl ResumeToken {
    /// Renders the token as an Extended JSON object.
    ///
    /// All seven fields are always present, in stream order, with absent
    /// fields rendered as `null`.
    pub fn to_ejson(&self, mode: EjsonMode) -> Value {
        let mut map = Map::new();
        map.insert(
            "timestamp".to_owned(),
            self.timestamp.map_or(Value::Null, |ts| {
                to_ejson(&KeyStringValue::Timestamp(ts), mode)
            }),
        );
        map.insert(
            "version".to_owned(),
            self.version
                .map_or(Value::Null, |n| to_ejson(&KeyStringValue::Integer(n), mode)),
        );
        map.insert(
            "tokenType".to_owned(),
            self.token_type
                .map_or(Value::Null, |n| to_ejson(&KeyStringValue::Integer(n), mode)),
        );
        map.insert(
            "txnOpIndex".to_owned(),
            self.txn_op_index
                .map_or(Value::Null, |n| to_ejson(&KeyStringValue::Integer(n), mode)),
        );
        map.insert(
            "fromInvalidate".to_owned(),
            self.from_invalidate.map_or(Value::Null, Value::Bool),
        );
        map.insert(
            "uuid".to_owned(),
            self.uuid
                .map_or(Value::Null, |u| json!({"$uuid": u.to_string()})),
        );
        map.insert(
            "documentKey".to_owned(),
            self.document_key
                .as_ref()
                .map_or(Value::Null, |v| to_ejson(v, mode)),
        );
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(seconds: u32, increment: u32) -> KeyStringValue {
        KeyStringValue::Timestamp(Timestamp { seconds, increment })
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(from_values(vec![]), Ok(ResumeToken::default()));
    }

    #[test]
    fn test_prefix_only_token() {
        let token = from_values(vec![ts(1, 2)]).unwrap();
        assert_eq!(token.timestamp, Some(Timestamp { seconds: 1, increment: 2 }));
        assert_eq!(token.version, None);
        assert_eq!(token.document_key, None);
    }

    #[test]
    fn test_version_zero_skips_gated_fields() {
        let token = from_values(vec![
            ts(1, 2),
            KeyStringValue::Integer(0),
            KeyStringValue::Integer(5),
        ])
        .unwrap();
        assert_eq!(token.version, Some(0));
        assert_eq!(token.token_type, None);
        assert_eq!(token.txn_op_index, Some(5));
        assert_eq!(token.from_invalidate, None);
    }

    #[test]
    fn test_version_one_reads_gated_fields() {
        let token = from_values(vec![
            ts(1, 2),
            KeyStringValue::Integer(1),
            KeyStringValue::Integer(128),
            KeyStringValue::Integer(0),
            KeyStringValue::Bool(true),
        ])
        .unwrap();
        assert_eq!(token.token_type, Some(128));
        assert_eq!(token.txn_op_index, Some(0));
        assert_eq!(token.from_invalidate, Some(true));
    }

    #[test]
    fn test_wrong_type_in_slot() {
        assert_eq!(
            from_values(vec![KeyStringValue::Integer(1)]),
            Err(ResumeTokenError::MalformedField("timestamp"))
        );
        assert_eq!(
            from_values(vec![ts(1, 2), KeyStringValue::Str("x".to_owned())]),
            Err(ResumeTokenError::MalformedField("version"))
        );
    }

    #[test]
    fn test_uuid_slot_validation() {
        let bad_subtype = vec![
            ts(1, 2),
            KeyStringValue::Integer(0),
            KeyStringValue::Integer(0),
            KeyStringValue::Binary {
                subtype: 0,
                data: vec![0; 16],
            },
        ];
        assert_eq!(
            from_values(bad_subtype),
            Err(ResumeTokenError::MalformedField("uuid"))
        );

        let bad_len = vec![
            ts(1, 2),
            KeyStringValue::Integer(0),
            KeyStringValue::Integer(0),
            KeyStringValue::Binary {
                subtype: 4,
                data: vec![0; 12],
            },
        ];
        assert_eq!(
            from_values(bad_len),
            Err(ResumeTokenError::MalformedField("uuid"))
        );
    }

    #[test]
    fn test_uuid_display() {
        let uuid = Uuid([
            0xbf, 0xfd, 0xb6, 0x17, 0x40, 0x0e, 0x48, 0x60, 0x99, 0x00, 0x7c, 0x0e, 0x00, 0x48,
            0xb3, 0x05,
        ]);
        assert_eq!(uuid.to_string(), "bffdb617-400e-4860-9900-7c0e0048b305");
    }

    #[test]
    fn test_ejson_renders_absent_fields_as_null() {
        let token = ResumeToken::default();
        assert_eq!(
            token.to_ejson(EjsonMode::Relaxed),
            serde_json::json!({
                "timestamp": null,
                "version": null,
                "tokenType": null,
                "txnOpIndex": null,
                "fromInvalidate": null,
                "uuid": null,
                "documentKey": null,
            })
        );
    }

    #[test]
    fn test_ejson_field_order() {
        let rendered =
            serde_json::to_string(&ResumeToken::default().to_ejson(EjsonMode::Relaxed)).unwrap();
        assert_eq!(
            rendered,
            r#"{"timestamp":null,"version":null,"tokenType":null,"txnOpIndex":null,"fromInvalidate":null,"uuid":null,"documentKey":null}"#
        );
    }
}
