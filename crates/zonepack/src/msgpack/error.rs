//! MessagePack decode error type.

use thiserror::Error;

/// A decode fault. The whole decode call fails; no partial tree is
/// returned. Faults are deterministic for a given input and never worth
/// retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid MessagePack byte at offset {0}")]
    InvalidByte(usize),
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("container nesting exceeds the depth limit")]
    DepthLimit,
    #[error("trailing bytes after the value at offset {0}")]
    TrailingBytes(usize),
}
