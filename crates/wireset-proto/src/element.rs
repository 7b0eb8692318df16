// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Self-describing wire values.

use crate::{InputProtocol, OutputProtocol, Result, TType};

/// A type that knows its own wire tag and how to move itself across a protocol.
///
/// Containers write `WIRE_TYPE` once in their header and then dispatch every
/// element through [`WireElement::decode`] / [`WireElement::encode`], so
/// implementations may themselves be containers.
pub trait WireElement: Sized {
    /// Tag written in the header of any container holding this type.
    const WIRE_TYPE: TType;

    /// Read one value.
    fn decode<P: InputProtocol + ?Sized>(input: &mut P) -> Result<Self>;

    /// Write one value.
    fn encode<P: OutputProtocol + ?Sized>(&self, output: &mut P) -> Result<()>;
}

macro_rules! scalar_element {
    ($ty:ty, $tag:ident, $read:ident, $write:ident) => {
        impl WireElement for $ty {
            const WIRE_TYPE: TType = TType::$tag;

            #[inline]
            fn decode<P: InputProtocol + ?Sized>(input: &mut P) -> Result<Self> {
                input.$read()
            }

            #[inline]
            fn encode<P: OutputProtocol + ?Sized>(&self, output: &mut P) -> Result<()> {
                output.$write(*self)
            }
        }
    };
}

scalar_element!(bool, Bool, read_bool, write_bool);
scalar_element!(i8, I08, read_i8, write_i8);
scalar_element!(i16, I16, read_i16, write_i16);
scalar_element!(i32, I32, read_i32, write_i32);
scalar_element!(i64, I64, read_i64, write_i64);
scalar_element!(f64, Double, read_double, write_double);

impl WireElement for String {
    const WIRE_TYPE: TType = TType::String;

    fn decode<P: InputProtocol + ?Sized>(input: &mut P) -> Result<Self> {
        input.read_string()
    }

    fn encode<P: OutputProtocol + ?Sized>(&self, output: &mut P) -> Result<()> {
        output.write_string(self)
    }
}

/// Opaque bytes share the string tag; only the UTF-8 check differs.
impl WireElement for Vec<u8> {
    const WIRE_TYPE: TType = TType::String;

    fn decode<P: InputProtocol + ?Sized>(input: &mut P) -> Result<Self> {
        input.read_binary()
    }

    fn encode<P: OutputProtocol + ?Sized>(&self, output: &mut P) -> Result<()> {
        output.write_binary(self)
    }
}
