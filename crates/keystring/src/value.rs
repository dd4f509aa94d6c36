//! Decoded KeyString value tree.

use resumetoken_buffers::to_hex;

/// Object identifier: 12 raw bytes, conventionally shown as 24 lowercase hex
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId(pub [u8; 12]);

impl ObjectId {
    /// Hex form of the identifier.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Internal replication timestamp: seconds since epoch plus an ordinal
/// distinguishing operations within the same second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: u32,
    pub increment: u32,
}

/// A value decoded from a KeyString buffer.
///
/// Containers own their children; decoding builds the tree strictly
/// forward, so values never alias each other.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyStringValue {
    /// Sort-order minimum sentinel (tag 10)
    MinKey,
    /// Undefined (tag 15)
    Undefined,
    /// Null (tag 20)
    Null,
    /// Double-precision float, including NaN and the infinities
    /// (numeric tags 30-51)
    Double(f64),
    /// Integer whose magnitude is exact in a double, at most 2^53 - 1
    /// (numeric tags 32-50)
    Integer(i64),
    /// Integer beyond the double-exact range (numeric tags 32-33 and
    /// 49-50)
    BigInt(i128),
    /// UTF-8 string (tag 60)
    Str(String),
    /// Document with field order as it appeared in the stream; duplicate
    /// keys are preserved (tag 70)
    Object(Vec<(String, KeyStringValue)>),
    /// Array (tag 80)
    Array(Vec<KeyStringValue>),
    /// Binary data with its subtype byte (tag 90)
    Binary { subtype: u8, data: Vec<u8> },
    /// Object identifier (tag 100)
    ObjectId(ObjectId),
    /// Boolean (tags 110 and 111)
    Bool(bool),
    /// Signed milliseconds since the Unix epoch (tag 120)
    DateTime(i64),
    /// Replication timestamp (tag 130)
    Timestamp(Timestamp),
    /// Regular expression with its flags string (tag 140)
    Regex { pattern: String, flags: String },
    /// Legacy cross-collection reference (tag 150). The encoding always
    /// stores a namespace plus a 12-byte object id; references whose
    /// identifier is some other shape cannot appear in it.
    DbRef { namespace: String, id: ObjectId },
    /// JavaScript code, optionally with a scope document
    /// (tags 160 and 170)
    Code {
        code: String,
        scope: Option<Vec<(String, KeyStringValue)>>,
    },
    /// Sort-order maximum sentinel (tag 240)
    MaxKey,
}
