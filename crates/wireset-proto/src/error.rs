// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Protocol error taxonomy.

use std::io;

use thiserror::Error;

use crate::TType;

/// Errors raised while reading or writing wire values.
///
/// Container adapters pass element errors through unchanged, so a failure deep
/// inside a nested set surfaces with the same variant the element produced.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A container declared an element type other than the one the reader expects.
    #[error("unexpected element type: expected {expected}, got {actual}")]
    UnexpectedElementType {
        /// Tag the reader was built for.
        expected: TType,
        /// Tag found on the wire.
        actual: TType,
    },

    /// Byte does not name a known wire type.
    #[error("invalid type tag {0:#04x}")]
    InvalidType(u8),

    /// Boolean byte outside the protocol's accepted encodings.
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// Container or string length was negative.
    #[error("negative size {0}")]
    NegativeSize(i64),

    /// Declared length exceeds the configured bound.
    #[error("size {declared} exceeds limit {max}")]
    SizeLimit {
        /// Length found on the wire (or requested by the writer).
        declared: usize,
        /// Configured maximum.
        max: usize,
    },

    /// String payload is not valid UTF-8.
    #[error("invalid utf-8")]
    InvalidUtf8,

    /// Varint ran past the width of its target integer.
    #[error("varint overflow")]
    VarintOverflow,

    /// Bytes left over after a complete value was decoded.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// Input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),
}

impl From<io::Error> for ProtocolError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Transport(err)
        }
    }
}

/// Result alias for protocol operations.
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;
