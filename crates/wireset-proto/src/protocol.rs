// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Abstract structured-protocol interface.
//!
//! A protocol owns the byte layout; callers only see typed reads and writes
//! plus container framing. Readers and writers are synchronous and block on
//! their transport for the duration of each call.

use crate::{Result, TType};

/// Payload of a set begin marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetHeader {
    /// Declared element type.
    pub element_type: TType,
    /// Declared element count.
    pub size: usize,
}

impl SetHeader {
    /// Build a header.
    #[inline]
    pub const fn new(element_type: TType, size: usize) -> Self {
        Self { element_type, size }
    }
}

/// Read side of a structured protocol.
pub trait InputProtocol {
    /// Consume a set begin marker.
    fn read_set_begin(&mut self) -> Result<SetHeader>;
    /// Consume a set end marker.
    fn read_set_end(&mut self) -> Result<()>;
    /// Read a boolean.
    fn read_bool(&mut self) -> Result<bool>;
    /// Read a signed byte.
    fn read_i8(&mut self) -> Result<i8>;
    /// Read a 16-bit integer.
    fn read_i16(&mut self) -> Result<i16>;
    /// Read a 32-bit integer.
    fn read_i32(&mut self) -> Result<i32>;
    /// Read a 64-bit integer.
    fn read_i64(&mut self) -> Result<i64>;
    /// Read a double.
    fn read_double(&mut self) -> Result<f64>;
    /// Read a UTF-8 string.
    fn read_string(&mut self) -> Result<String>;
    /// Read an opaque byte string.
    fn read_binary(&mut self) -> Result<Vec<u8>>;
}

/// Write side of a structured protocol.
pub trait OutputProtocol {
    /// Emit a set begin marker.
    fn write_set_begin(&mut self, header: SetHeader) -> Result<()>;
    /// Emit a set end marker.
    fn write_set_end(&mut self) -> Result<()>;
    /// Write a boolean.
    fn write_bool(&mut self, value: bool) -> Result<()>;
    /// Write a signed byte.
    fn write_i8(&mut self, value: i8) -> Result<()>;
    /// Write a 16-bit integer.
    fn write_i16(&mut self, value: i16) -> Result<()>;
    /// Write a 32-bit integer.
    fn write_i32(&mut self, value: i32) -> Result<()>;
    /// Write a 64-bit integer.
    fn write_i64(&mut self, value: i64) -> Result<()>;
    /// Write a double.
    fn write_double(&mut self, value: f64) -> Result<()>;
    /// Write a UTF-8 string.
    fn write_string(&mut self, value: &str) -> Result<()>;
    /// Write an opaque byte string.
    fn write_binary(&mut self, value: &[u8]) -> Result<()>;
    /// Flush buffered bytes to the transport.
    fn flush(&mut self) -> Result<()>;
}

impl<P: InputProtocol + ?Sized> InputProtocol for &mut P {
    fn read_set_begin(&mut self) -> Result<SetHeader> {
        (**self).read_set_begin()
    }
    fn read_set_end(&mut self) -> Result<()> {
        (**self).read_set_end()
    }
    fn read_bool(&mut self) -> Result<bool> {
        (**self).read_bool()
    }
    fn read_i8(&mut self) -> Result<i8> {
        (**self).read_i8()
    }
    fn read_i16(&mut self) -> Result<i16> {
        (**self).read_i16()
    }
    fn read_i32(&mut self) -> Result<i32> {
        (**self).read_i32()
    }
    fn read_i64(&mut self) -> Result<i64> {
        (**self).read_i64()
    }
    fn read_double(&mut self) -> Result<f64> {
        (**self).read_double()
    }
    fn read_string(&mut self) -> Result<String> {
        (**self).read_string()
    }
    fn read_binary(&mut self) -> Result<Vec<u8>> {
        (**self).read_binary()
    }
}

impl<P: OutputProtocol + ?Sized> OutputProtocol for &mut P {
    fn write_set_begin(&mut self, header: SetHeader) -> Result<()> {
        (**self).write_set_begin(header)
    }
    fn write_set_end(&mut self) -> Result<()> {
        (**self).write_set_end()
    }
    fn write_bool(&mut self, value: bool) -> Result<()> {
        (**self).write_bool(value)
    }
    fn write_i8(&mut self, value: i8) -> Result<()> {
        (**self).write_i8(value)
    }
    fn write_i16(&mut self, value: i16) -> Result<()> {
        (**self).write_i16(value)
    }
    fn write_i32(&mut self, value: i32) -> Result<()> {
        (**self).write_i32(value)
    }
    fn write_i64(&mut self, value: i64) -> Result<()> {
        (**self).write_i64(value)
    }
    fn write_double(&mut self, value: f64) -> Result<()> {
        (**self).write_double(value)
    }
    fn write_string(&mut self, value: &str) -> Result<()> {
        (**self).write_string(value)
    }
    fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        (**self).write_binary(value)
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
