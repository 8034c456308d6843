//! JSON front end: thin adapters between `serde_json` documents and the
//! canonical [`Value`] model, plus direct document-to-bytes conversion.
//!
//! Both encode paths share the tag policy of
//! [`MsgPackEncoder`](crate::MsgPackEncoder), so [`encode`] and encoding
//! [`to_zone`]'s output produce byte-identical MessagePack.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::msgpack::{self, DecodeError, MsgPackEncoder};
use crate::{Value, Zone};

/// Prefix used when a binary payload has to surface in JSON as a string.
const BIN_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Builds a canonical value tree for a `serde_json` document, copying all
/// strings into `zone`. Non-negative numbers become `UInt`, negative
/// integers `Int`, everything else `Float`.
pub fn to_zone<'z>(value: &serde_json::Value, zone: &'z Zone) -> Value<'z> {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::str_in(zone, s),
        serde_json::Value::Array(items) => {
            Value::Arr(zone.alloc_slice_fill(items.len(), |i| to_zone(&items[i], zone)))
        }
        serde_json::Value::Object(obj) => {
            let entries: Vec<(&str, &serde_json::Value)> =
                obj.iter().map(|(k, v)| (k.as_str(), v)).collect();
            Value::Map(zone.alloc_slice_fill(entries.len(), |i| {
                let (key, val) = entries[i];
                (Value::str_in(zone, key), to_zone(val, zone))
            }))
        }
    }
}

/// Renders a canonical value back into a `serde_json` document.
///
/// Binary payloads become base64 data-URI strings. Non-string map keys
/// are stringified through their own JSON rendering; duplicate keys
/// collapse last-write-wins here, on the JSON side only. A non-finite
/// float (NaN or an infinity decoded from the wire) becomes JSON `null`,
/// since JSON has no representation for it.
pub fn from_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::UInt(u) => serde_json::Value::from(*u),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::Str(s) => serde_json::Value::String((*s).to_owned()),
        Value::Bin(b) => {
            serde_json::Value::String(format!("{}{}", BIN_URI_PREFIX, BASE64.encode(b)))
        }
        Value::Arr(items) => serde_json::Value::Array(items.iter().map(from_value).collect()),
        Value::Map(pairs) => serde_json::Value::Object(
            pairs
                .iter()
                .map(|(key, val)| (key_string(key), from_value(val)))
                .collect(),
        ),
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::Str(s) => (*s).to_owned(),
        other => from_value(other).to_string(),
    }
}

/// Encodes a `serde_json` document straight to MessagePack bytes.
pub fn encode(value: &serde_json::Value) -> Vec<u8> {
    let mut encoder = MsgPackEncoder::new();
    encoder.encode_json(value)
}

/// Decodes MessagePack bytes into a `serde_json` document through a
/// scratch zone.
pub fn decode(data: &[u8]) -> Result<serde_json::Value, DecodeError> {
    let zone = Zone::new();
    let value = msgpack::decode(data, &zone)?;
    Ok(from_value(&value))
}
