//! MessagePack conversion engine: encoder, zone-allocating decoder, and
//! convenience helpers.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod util;

pub use decoder::{MsgPackDecoder, MAX_DEPTH};
pub use encoder::MsgPackEncoder;
pub use error::DecodeError;
pub use util::{decode, decode_exact, encode};
