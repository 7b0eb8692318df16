// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializable set container.
//!
//! [`SerializableSet`] behaves like a native set (membership, set algebra,
//! iteration) and also moves itself across a structured wire protocol: each
//! encoding carries the element type tag and element count, and decoding
//! validates the tag before reading any element.
//!
//! ```
//! use wireset::{SerializableSet, ProtocolKind, ProtocolConfig};
//!
//! let set = SerializableSet::from([3i32, 1, 2]);
//! let bytes = wireset::encode_to_vec(ProtocolKind::Binary, &set)?;
//! let back: SerializableSet<i32> =
//!     wireset::decode_from_bytes(ProtocolKind::Binary, &ProtocolConfig::default(), &bytes)?;
//! assert_eq!(back, set);
//!
//! // Same payload, wrong element type.
//! let wrong = wireset::decode_from_bytes::<SerializableSet<i64>>(
//!     ProtocolKind::Binary,
//!     &ProtocolConfig::default(),
//!     &bytes,
//! );
//! assert!(wrong.is_err());
//! # Ok::<(), wireset::ProtocolError>(())
//! ```

mod set;
pub mod wire;

#[cfg(feature = "serde")]
mod serde_impl;

pub use set::SerializableSet;
pub use std::collections::hash_set::{IntoIter, Iter};
pub use wireset_proto::{
    decode_from_bytes, encode_to_vec, InputProtocol, OutputProtocol, ProtocolConfig, ProtocolError,
    ProtocolKind, SetHeader, TType, WireElement,
};
