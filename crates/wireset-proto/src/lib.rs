// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structured wire protocol for self-describing values.
//!
//! - [`TType`] tags identify the serialized type of container elements.
//! - [`InputProtocol`] / [`OutputProtocol`] are the typed read/write surface a
//!   container adapter drives; framing is `set_begin` / `set_end`.
//! - [`WireElement`] is the capability a type needs to live inside a container.
//! - [`binary`] and [`compact`] are the two shipped byte layouts;
//!   [`recording`] logs typed calls for tests.

mod config;
mod element;
mod error;
mod protocol;
mod ttype;

pub mod binary;
pub mod compact;
pub mod recording;

pub use binary::{BinaryInputProtocol, BinaryOutputProtocol};
pub use compact::{CompactInputProtocol, CompactOutputProtocol};
pub use config::{
    ProtocolConfig, ProtocolKind, UnknownProtocol, DEFAULT_MAX_CONTAINER_LEN,
    DEFAULT_MAX_STRING_LEN,
};
pub use element::WireElement;
pub use error::{ProtocolError, Result};
pub use protocol::{InputProtocol, OutputProtocol, SetHeader};
pub use recording::{RecordingProtocol, WireEvent};
pub use ttype::TType;

/// Encode a value into a fresh buffer using the selected protocol.
pub fn encode_to_vec<T: WireElement>(
    kind: ProtocolKind,
    value: &T,
) -> Result<Vec<u8>> {
    match kind {
        ProtocolKind::Binary => {
            let mut out = BinaryOutputProtocol::new(Vec::new());
            value.encode(&mut out)?;
            Ok(out.into_inner())
        }
        ProtocolKind::Compact => {
            let mut out = CompactOutputProtocol::new(Vec::new());
            value.encode(&mut out)?;
            Ok(out.into_inner())
        }
    }
}

/// Decode exactly one value from `bytes`; leftover input is an error.
pub fn decode_from_bytes<T: WireElement>(
    kind: ProtocolKind,
    config: &ProtocolConfig,
    bytes: &[u8],
) -> Result<T> {
    let mut rest = bytes;
    let value = match kind {
        ProtocolKind::Binary => {
            T::decode(&mut BinaryInputProtocol::with_config(&mut rest, *config))?
        }
        ProtocolKind::Compact => {
            T::decode(&mut CompactInputProtocol::with_config(&mut rest, *config))?
        }
    };
    if !rest.is_empty() {
        return Err(ProtocolError::TrailingBytes(rest.len()));
    }
    Ok(value)
}
