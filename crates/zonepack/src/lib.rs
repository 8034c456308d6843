//! Lossless JSON ⇄ MessagePack conversion over zone-allocated value trees.
//!
//! The crate is built from three pieces:
//!
//! - [`Zone`] — a bump allocator that owns every node of one decoded tree;
//! - [`Value`] — the canonical dynamic value model, a `Copy` tagged variant
//!   borrowing all heap data from a zone;
//! - the [`msgpack`] engine — a recursive encoder/decoder pair with a
//!   narrowest-fit tag policy, plus the [`json`] front end bridging
//!   `serde_json` documents through the same policy.
//!
//! ```
//! use zonepack::{json, msgpack, Zone};
//!
//! let doc: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":[true,null,"x"]}"#).unwrap();
//! let bytes = json::encode(&doc);
//! let zone = Zone::new();
//! let value = msgpack::decode(&bytes, &zone).unwrap();
//! assert_eq!(json::from_value(&value), doc);
//! ```

pub mod json;
pub mod msgpack;
mod value;
mod zone;

pub use msgpack::{DecodeError, MsgPackDecoder, MsgPackEncoder};
pub use value::{Kind, TypeError, Value};
pub use zone::Zone;
