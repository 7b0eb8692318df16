// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Binary protocol (fixed-width, big-endian).
//!
//! Layout:
//!
//! ```text
//! set begin   element_type: u8 || size: i32 BE
//! set end     (nothing)
//! bool        u8 (0 | 1)
//! i8..i64     1 / 2 / 4 / 8 bytes BE
//! double      IEEE-754 bits, u64 BE
//! string      len: i32 BE || bytes
//! ```

use std::io::{Read, Write};

use tracing::trace;

use crate::{
    InputProtocol, OutputProtocol, ProtocolConfig, ProtocolError, Result, SetHeader, TType,
};

/// Largest length a signed 32-bit size prefix can carry.
#[allow(clippy::cast_sign_loss)]
pub(crate) const MAX_WIRE_LEN: usize = i32::MAX as usize;

/// Binary protocol reader over any blocking byte source.
#[derive(Debug)]
pub struct BinaryInputProtocol<R> {
    transport: R,
    config: ProtocolConfig,
}

impl<R: Read> BinaryInputProtocol<R> {
    /// Create a reader with default limits.
    pub fn new(transport: R) -> Self {
        Self::with_config(transport, ProtocolConfig::default())
    }

    /// Create a reader with explicit limits.
    pub fn with_config(transport: R, config: ProtocolConfig) -> Self {
        Self { transport, config }
    }

    /// Return the underlying transport.
    pub fn into_inner(self) -> R {
        self.transport
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.transport.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_size(&mut self) -> Result<usize> {
        let raw = i32::from_be_bytes(self.read_array()?);
        usize::try_from(raw).map_err(|_| ProtocolError::NegativeSize(i64::from(raw)))
    }

    fn read_payload(&mut self) -> Result<Vec<u8>> {
        let len = self.read_size()?;
        let len = self.config.check_string_len(len)?;
        read_exactly(&mut self.transport, len)
    }
}

/// Read `len` bytes without trusting `len` for the allocation.
pub(crate) fn read_exactly<R: Read>(transport: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    transport.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(ProtocolError::UnexpectedEof);
    }
    Ok(buf)
}

impl<R: Read> InputProtocol for BinaryInputProtocol<R> {
    fn read_set_begin(&mut self) -> Result<SetHeader> {
        let [tag] = self.read_array()?;
        let element_type = TType::try_from(tag)?;
        let size = self.read_size()?;
        let size = self.config.check_container_len(size)?;
        trace!(%element_type, size, "binary: set begin");
        Ok(SetHeader::new(element_type, size))
    }

    fn read_set_end(&mut self) -> Result<()> {
        trace!("binary: set end");
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool> {
        match self.read_array::<1>()? {
            [0] => Ok(false),
            [1] => Ok(true),
            [other] => Err(ProtocolError::InvalidBool(other)),
        }
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    fn read_double(&mut self) -> Result<f64> {
        Ok(f64::from_bits(u64::from_be_bytes(self.read_array()?)))
    }

    fn read_string(&mut self) -> Result<String> {
        String::from_utf8(self.read_payload()?).map_err(|_| ProtocolError::InvalidUtf8)
    }

    fn read_binary(&mut self) -> Result<Vec<u8>> {
        self.read_payload()
    }
}

/// Binary protocol writer over any blocking byte sink.
#[derive(Debug)]
pub struct BinaryOutputProtocol<W> {
    transport: W,
}

impl<W: Write> BinaryOutputProtocol<W> {
    /// Create a writer.
    pub fn new(transport: W) -> Self {
        Self { transport }
    }

    /// Return the underlying transport.
    pub fn into_inner(self) -> W {
        self.transport
    }

    fn write_size(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| ProtocolError::SizeLimit {
            declared: len,
            max: MAX_WIRE_LEN,
        })?;
        self.write_i32(len)
    }
}

impl<W: Write> OutputProtocol for BinaryOutputProtocol<W> {
    fn write_set_begin(&mut self, header: SetHeader) -> Result<()> {
        trace!(element_type = %header.element_type, size = header.size, "binary: set begin");
        self.transport.write_all(&[header.element_type.to_byte()])?;
        self.write_size(header.size)
    }

    fn write_set_end(&mut self) -> Result<()> {
        trace!("binary: set end");
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.transport.write_all(&[u8::from(value)])?;
        Ok(())
    }

    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.transport.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_i16(&mut self, value: i16) -> Result<()> {
        self.transport.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.transport.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.transport.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<()> {
        self.transport.write_all(&value.to_bits().to_be_bytes())?;
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        self.write_size(value.len())?;
        self.transport.write_all(value)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.transport.flush()?;
        Ok(())
    }
}
