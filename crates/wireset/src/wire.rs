// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Protocol adapter for [`SerializableSet`].
//!
//! Decode: `set_begin` → validate element tag → `size` element reads (equal
//! elements collapse) → `set_end`. Encode: `set_begin(E::WIRE_TYPE, len)` →
//! one write per element → `set_end`. Element errors pass through unchanged
//! and abort the whole call; no partial set is ever returned.

use core::hash::Hash;
use std::collections::HashSet;

use tracing::debug;
use wireset_proto::{
    InputProtocol, OutputProtocol, ProtocolError, Result, SetHeader, TType, WireElement,
};

use crate::SerializableSet;

/// Upper bound on capacity reserved from an untrusted declared size.
const PREALLOC_LIMIT: usize = 4096;

impl<E: WireElement + Eq + Hash> WireElement for SerializableSet<E> {
    const WIRE_TYPE: TType = TType::Set;

    fn decode<P: InputProtocol + ?Sized>(input: &mut P) -> Result<Self> {
        let header = input.read_set_begin()?;
        if header.element_type != E::WIRE_TYPE {
            debug!(
                expected = %E::WIRE_TYPE,
                actual = %header.element_type,
                "set element type mismatch"
            );
            return Err(ProtocolError::UnexpectedElementType {
                expected: E::WIRE_TYPE,
                actual: header.element_type,
            });
        }

        let mut storage = HashSet::with_capacity(header.size.min(PREALLOC_LIMIT));
        for _ in 0..header.size {
            storage.insert(E::decode(input)?);
        }
        input.read_set_end()?;

        let collapsed = header.size - storage.len();
        if collapsed > 0 {
            debug!(declared = header.size, collapsed, "duplicate set elements collapsed");
        }
        Ok(Self::from(storage))
    }

    fn encode<P: OutputProtocol + ?Sized>(&self, output: &mut P) -> Result<()> {
        output.write_set_begin(SetHeader::new(E::WIRE_TYPE, self.len()))?;
        for item in self {
            item.encode(output)?;
        }
        output.write_set_end()
    }
}

impl<E: WireElement + Eq + Hash> SerializableSet<E> {
    /// Element tag every encoding of this set type carries.
    pub const ELEMENT_WIRE_TYPE: TType = E::WIRE_TYPE;

    /// Read a set from `input`.
    ///
    /// Fails with [`ProtocolError::UnexpectedElementType`] when the payload
    /// declares a different element tag than `E`'s.
    pub fn decode_from<P: InputProtocol + ?Sized>(input: &mut P) -> Result<Self> {
        <Self as WireElement>::decode(input)
    }

    /// Write this set to `output`.
    pub fn encode_to<P: OutputProtocol + ?Sized>(&self, output: &mut P) -> Result<()> {
        <Self as WireElement>::encode(self, output)
    }
}
