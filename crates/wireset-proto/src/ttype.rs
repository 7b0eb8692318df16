// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire type tags.
//!
//! Every container written to the wire carries the tag of its element type so
//! a reader can reject a payload without sharing schema knowledge with the
//! writer. Discriminants match the byte the binary protocol emits.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Serialized type of a value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TType {
    /// End-of-struct marker.
    Stop = 0,
    /// No value.
    Void = 1,
    /// Boolean.
    Bool = 2,
    /// Signed 8-bit integer.
    I08 = 3,
    /// IEEE-754 double.
    Double = 4,
    /// Signed 16-bit integer.
    I16 = 6,
    /// Signed 32-bit integer.
    I32 = 8,
    /// Signed 64-bit integer.
    I64 = 10,
    /// UTF-8 string or opaque binary.
    String = 11,
    /// Struct.
    Struct = 12,
    /// Map container.
    Map = 13,
    /// Set container.
    Set = 14,
    /// List container.
    List = 15,
}

impl TType {
    /// All tags, in wire-byte order.
    pub const ALL: [Self; 13] = [
        Self::Stop,
        Self::Void,
        Self::Bool,
        Self::I08,
        Self::Double,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::String,
        Self::Struct,
        Self::Map,
        Self::Set,
        Self::List,
    ];

    /// Byte written by the binary protocol for this tag.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Short upper-case name used in diagnostics (e.g. `I32`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::Void => "VOID",
            Self::Bool => "BOOL",
            Self::I08 => "I08",
            Self::Double => "DOUBLE",
            Self::I16 => "I16",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::String => "STRING",
            Self::Struct => "STRUCT",
            Self::Map => "MAP",
            Self::Set => "SET",
            Self::List => "LIST",
        }
    }
}

impl TryFrom<u8> for TType {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.to_byte() == byte)
            .ok_or(ProtocolError::InvalidType(byte))
    }
}

impl fmt::Display for TType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
