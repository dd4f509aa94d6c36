//! Extended JSON rendering of decoded values.
//!
//! Types without a native JSON form become `$`-prefixed wrapper objects
//! (e.g. `{"$oid":"..."}`). Relaxed mode keeps finite numbers as plain JSON
//! numbers; canonical mode wraps every number with its type.

use base64::Engine;
use serde_json::{json, Map, Value};

use crate::value::KeyStringValue;

/// Output flavor of [`to_ejson`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EjsonMode {
    /// Finite numbers render as plain JSON numbers.
    #[default]
    Relaxed,
    /// Every number renders as a typed wrapper object.
    Canonical,
}

/// Renders a decoded value as an Extended JSON tree.
///
/// Object field order follows decode order. Duplicate keys collapse to the
/// last occurrence, since a JSON object cannot hold both.
pub fn to_ejson(value: &KeyStringValue, mode: EjsonMode) -> Value {
    match value {
        KeyStringValue::MinKey => json!({"$minKey": 1}),
        KeyStringValue::MaxKey => json!({"$maxKey": 1}),
        KeyStringValue::Undefined => json!({"$undefined": true}),
        KeyStringValue::Null => Value::Null,
        KeyStringValue::Bool(b) => Value::Bool(*b),
        KeyStringValue::Integer(n) => integer_to_ejson(*n, mode),
        KeyStringValue::BigInt(n) => json!({"$numberLong": n.to_string()}),
        KeyStringValue::Double(f) => double_to_ejson(*f, mode),
        KeyStringValue::Str(s) => Value::String(s.clone()),
        KeyStringValue::DateTime(ms) => json!({"$date": {"$numberLong": ms.to_string()}}),
        KeyStringValue::Timestamp(ts) => {
            json!({"$timestamp": {"t": ts.seconds, "i": ts.increment}})
        }
        KeyStringValue::ObjectId(id) => json!({"$oid": id.to_hex()}),
        KeyStringValue::Binary { subtype, data } => {
            let b64 = base64::engine::general_purpose::STANDARD.encode(data);
            json!({"$binary": {"base64": b64, "subType": format!("{subtype:02x}")}})
        }
        KeyStringValue::Regex { pattern, flags } => {
            json!({"$regularExpression": {"pattern": pattern, "options": flags}})
        }
        KeyStringValue::DbRef { namespace, id } => {
            json!({"$dbPointer": {"$ref": namespace, "$id": {"$oid": id.to_hex()}}})
        }
        KeyStringValue::Code { code, scope } => match scope {
            None => json!({"$code": code}),
            Some(fields) => {
                let mut obj = Map::new();
                obj.insert("$code".to_owned(), Value::String(code.clone()));
                obj.insert("$scope".to_owned(), fields_to_ejson(fields, mode));
                Value::Object(obj)
            }
        },
        KeyStringValue::Object(fields) => fields_to_ejson(fields, mode),
        KeyStringValue::Array(items) => {
            Value::Array(items.iter().map(|item| to_ejson(item, mode)).collect())
        }
    }
}

fn fields_to_ejson(fields: &[(String, KeyStringValue)], mode: EjsonMode) -> Value {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.clone(), to_ejson(value, mode));
    }
    Value::Object(map)
}

fn integer_to_ejson(n: i64, mode: EjsonMode) -> Value {
    match mode {
        EjsonMode::Relaxed => json!(n),
        EjsonMode::Canonical => {
            if n >= i32::MIN as i64 && n <= i32::MAX as i64 {
                json!({"$numberInt": n.to_string()})
            } else {
                json!({"$numberLong": n.to_string()})
            }
        }
    }
}

fn double_to_ejson(value: f64, mode: EjsonMode) -> Value {
    if mode == EjsonMode::Canonical || !value.is_finite() {
        json!({"$numberDouble": double_string(value)})
    } else {
        json!(value)
    }
}

fn double_string(value: f64) -> String {
    if value == f64::INFINITY {
        "Infinity".to_owned()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_owned()
    } else if value.is_nan() {
        "NaN".to_owned()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
