// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Protocol selection and read limits.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Result};

/// Default bound on declared container sizes (16 Mi elements).
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 16 * 1024 * 1024;

/// Default bound on string and binary payloads (64 MiB).
pub const DEFAULT_MAX_STRING_LEN: usize = 64 * 1024 * 1024;

/// Limits enforced by readers before trusting a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Maximum declared element count of a single container.
    pub max_container_len: usize,
    /// Maximum byte length of a single string or binary value.
    pub max_string_len: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }
}

impl ProtocolConfig {
    pub(crate) fn check_container_len(&self, declared: usize) -> Result<usize> {
        if declared > self.max_container_len {
            return Err(ProtocolError::SizeLimit {
                declared,
                max: self.max_container_len,
            });
        }
        Ok(declared)
    }

    pub(crate) fn check_string_len(&self, declared: usize) -> Result<usize> {
        if declared > self.max_string_len {
            return Err(ProtocolError::SizeLimit {
                declared,
                max: self.max_string_len,
            });
        }
        Ok(declared)
    }
}

/// Concrete protocol encodings shipped with this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    /// Fixed-width big-endian encoding.
    #[default]
    Binary,
    /// Varint/zigzag encoding with packed container headers.
    Compact,
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Compact => f.write_str("compact"),
        }
    }
}

/// Error returned when a protocol name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protocol {0:?} (expected \"binary\" or \"compact\")")]
pub struct UnknownProtocol(pub String);

impl FromStr for ProtocolKind {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Self::Binary),
            "compact" => Ok(Self::Compact),
            other => Err(UnknownProtocol(other.to_string())),
        }
    }
}
