//! Convenience MessagePack helpers.

use crate::{Value, Zone};

use super::{DecodeError, MsgPackDecoder, MsgPackEncoder};

/// Encode one value tree to MessagePack bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut encoder = MsgPackEncoder::new();
    encoder.encode(value)
}

/// Decode one value out of `data` into `zone`. Trailing bytes are
/// ignored.
pub fn decode<'z>(data: &[u8], zone: &'z Zone) -> Result<Value<'z>, DecodeError> {
    MsgPackDecoder::new(data, zone).decode()
}

/// Decode one value out of `data` into `zone`, rejecting trailing bytes.
pub fn decode_exact<'z>(data: &[u8], zone: &'z Zone) -> Result<Value<'z>, DecodeError> {
    MsgPackDecoder::new(data, zone).decode_exact()
}
