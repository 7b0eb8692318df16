// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compact protocol (varint/zigzag integers, packed container headers).
//!
//! Layout:
//!
//! ```text
//! set begin   size < 15 : (size << 4) | ctype
//!             otherwise : 0xF0 | ctype || size: ULEB128
//! set end     (nothing)
//! bool        u8 (1 = true, 2 = false; 0 read as false)
//! i8          raw byte
//! i16..i64    zigzag || ULEB128
//! double      IEEE-754 bits, u64 LE
//! string      len: ULEB128 || bytes
//! ```

use std::io::{Read, Write};

use tracing::trace;

use crate::binary::{read_exactly, MAX_WIRE_LEN};
use crate::{
    InputProtocol, OutputProtocol, ProtocolConfig, ProtocolError, Result, SetHeader, TType,
};

const CT_BOOL_TRUE: u8 = 0x01;
const CT_BOOL_FALSE: u8 = 0x02;

/// Headers with this size nibble carry the real size as a trailing varint.
const SIZE_ESCAPE: u8 = 0x0f;

fn compact_type(ty: TType) -> Result<u8> {
    Ok(match ty {
        TType::Stop => 0x00,
        TType::Bool => CT_BOOL_TRUE,
        TType::I08 => 0x03,
        TType::I16 => 0x04,
        TType::I32 => 0x05,
        TType::I64 => 0x06,
        TType::Double => 0x07,
        TType::String => 0x08,
        TType::List => 0x09,
        TType::Set => 0x0a,
        TType::Map => 0x0b,
        TType::Struct => 0x0c,
        TType::Void => return Err(ProtocolError::InvalidType(ty.to_byte())),
    })
}

fn ttype_from_compact(ct: u8) -> Result<TType> {
    Ok(match ct {
        0x00 => TType::Stop,
        CT_BOOL_TRUE | CT_BOOL_FALSE => TType::Bool,
        0x03 => TType::I08,
        0x04 => TType::I16,
        0x05 => TType::I32,
        0x06 => TType::I64,
        0x07 => TType::Double,
        0x08 => TType::String,
        0x09 => TType::List,
        0x0a => TType::Set,
        0x0b => TType::Map,
        0x0c => TType::Struct,
        other => return Err(ProtocolError::InvalidType(other)),
    })
}

// Zigzag is a bit-level reinterpretation; the casts are lossless by construction.
#[inline]
#[allow(clippy::cast_sign_loss)]
const fn zigzag_32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

#[inline]
#[allow(clippy::cast_sign_loss)]
const fn zigzag_64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
const fn unzigzag_32(n: u32) -> i32 {
    (n >> 1) as i32 ^ -((n & 1) as i32)
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
const fn unzigzag_64(n: u64) -> i64 {
    (n >> 1) as i64 ^ -((n & 1) as i64)
}

/// Varint sizes are signed 32-bit on the wire.
fn size_from_varint(raw: u32) -> Result<usize> {
    let signed = i32::from_ne_bytes(raw.to_ne_bytes());
    usize::try_from(signed).map_err(|_| ProtocolError::NegativeSize(i64::from(signed)))
}

/// Compact protocol reader over any blocking byte source.
#[derive(Debug)]
pub struct CompactInputProtocol<R> {
    transport: R,
    config: ProtocolConfig,
}

impl<R: Read> CompactInputProtocol<R> {
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

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.transport.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_varint_u64(&mut self) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_byte()?;
            let bits = u64::from(byte & 0x7f);
            if shift == 63 && bits > 1 {
                return Err(ProtocolError::VarintOverflow);
            }
            result |= bits << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift > 63 {
                return Err(ProtocolError::VarintOverflow);
            }
        }
    }

    fn read_varint_u32(&mut self) -> Result<u32> {
        u32::try_from(self.read_varint_u64()?).map_err(|_| ProtocolError::VarintOverflow)
    }

    fn read_payload(&mut self) -> Result<Vec<u8>> {
        let len = size_from_varint(self.read_varint_u32()?)?;
        let len = self.config.check_string_len(len)?;
        read_exactly(&mut self.transport, len)
    }
}

impl<R: Read> InputProtocol for CompactInputProtocol<R> {
    fn read_set_begin(&mut self) -> Result<SetHeader> {
        let header = self.read_byte()?;
        let element_type = ttype_from_compact(header & 0x0f)?;
        let nibble = header >> 4;
        let size = if nibble == SIZE_ESCAPE {
            size_from_varint(self.read_varint_u32()?)?
        } else {
            usize::from(nibble)
        };
        let size = self.config.check_container_len(size)?;
        trace!(%element_type, size, "compact: set begin");
        Ok(SetHeader::new(element_type, size))
    }

    fn read_set_end(&mut self) -> Result<()> {
        trace!("compact: set end");
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool> {
        match self.read_byte()? {
            CT_BOOL_TRUE => Ok(true),
            0x00 | CT_BOOL_FALSE => Ok(false),
            other => Err(ProtocolError::InvalidBool(other)),
        }
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_ne_bytes([self.read_byte()?]))
    }

    fn read_i16(&mut self) -> Result<i16> {
        let wide = self.read_i32()?;
        i16::try_from(wide).map_err(|_| ProtocolError::VarintOverflow)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(unzigzag_32(self.read_varint_u32()?))
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(unzigzag_64(self.read_varint_u64()?))
    }

    fn read_double(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.transport.read_exact(&mut buf)?;
        Ok(f64::from_bits(u64::from_le_bytes(buf)))
    }

    fn read_string(&mut self) -> Result<String> {
        String::from_utf8(self.read_payload()?).map_err(|_| ProtocolError::InvalidUtf8)
    }

    fn read_binary(&mut self) -> Result<Vec<u8>> {
        self.read_payload()
    }
}

/// Compact protocol writer over any blocking byte sink.
#[derive(Debug)]
pub struct CompactOutputProtocol<W> {
    transport: W,
}

impl<W: Write> CompactOutputProtocol<W> {
    /// Create a writer.
    pub fn new(transport: W) -> Self {
        Self { transport }
    }

    /// Return the underlying transport.
    pub fn into_inner(self) -> W {
        self.transport
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.transport.write_all(&[byte])?;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_varint(&mut self, mut n: u64) -> Result<()> {
        let mut buf = [0u8; 10];
        let mut len = 0;
        while n >= 0x80 {
            buf[len] = (n as u8 & 0x7f) | 0x80;
            n >>= 7;
            len += 1;
        }
        buf[len] = n as u8;
        self.transport.write_all(&buf[..=len])?;
        Ok(())
    }

    fn write_size(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| ProtocolError::SizeLimit {
            declared: len,
            max: MAX_WIRE_LEN,
        })?;
        self.write_varint(u64::from(len.unsigned_abs()))
    }
}

impl<W: Write> OutputProtocol for CompactOutputProtocol<W> {
    fn write_set_begin(&mut self, header: SetHeader) -> Result<()> {
        trace!(element_type = %header.element_type, size = header.size, "compact: set begin");
        let ct = compact_type(header.element_type)?;
        match u8::try_from(header.size) {
            Ok(small) if small < SIZE_ESCAPE => self.write_byte((small << 4) | ct),
            _ => {
                self.write_byte((SIZE_ESCAPE << 4) | ct)?;
                self.write_size(header.size)
            }
        }
    }

    fn write_set_end(&mut self) -> Result<()> {
        trace!("compact: set end");
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_byte(if value { CT_BOOL_TRUE } else { CT_BOOL_FALSE })
    }

    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.transport.write_all(&value.to_ne_bytes())?;
        Ok(())
    }

    fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_i32(i32::from(value))
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_varint(u64::from(zigzag_32(value)))
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_varint(zigzag_64(value))
    }

    fn write_double(&mut self, value: f64) -> Result<()> {
        self.transport.write_all(&value.to_bits().to_le_bytes())?;
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

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_maps_small_magnitudes_to_small_codes() {
        assert_eq!(zigzag_32(0), 0);
        assert_eq!(zigzag_32(-1), 1);
        assert_eq!(zigzag_32(1), 2);
        assert_eq!(zigzag_32(i32::MIN), u32::MAX);
        assert_eq!(unzigzag_32(u32::MAX), i32::MIN);
        assert_eq!(unzigzag_64(zigzag_64(i64::MIN)), i64::MIN);
        assert_eq!(unzigzag_64(zigzag_64(i64::MAX)), i64::MAX);
    }

    #[test]
    fn short_set_header_packs_size_into_high_nibble() {
        let mut out = CompactOutputProtocol::new(Vec::new());
        out.write_set_begin(SetHeader::new(TType::I32, 3))
            .expect("begin");
        assert_eq!(out.into_inner(), vec![0x35]);
    }

    #[test]
    fn long_set_header_escapes_to_varint() {
        let mut out = CompactOutputProtocol::new(Vec::new());
        out.write_set_begin(SetHeader::new(TType::String, 300))
            .expect("begin");
        let bytes = out.into_inner();
        assert_eq!(bytes, vec![0xf8, 0xac, 0x02]);

        let mut input = CompactInputProtocol::new(bytes.as_slice());
        assert_eq!(
            input.read_set_begin().expect("begin"),
            SetHeader::new(TType::String, 300)
        );
    }

    #[test]
    fn both_bool_type_nibbles_read_as_bool() {
        for header in [0x11u8, 0x12] {
            let buf = [header];
            let mut input = CompactInputProtocol::new(&buf[..]);
            assert_eq!(
                input.read_set_begin().expect("begin"),
                SetHeader::new(TType::Bool, 1)
            );
        }
    }

    #[test]
    fn void_cannot_be_a_set_element() {
        let mut out = CompactOutputProtocol::new(Vec::new());
        assert!(matches!(
            out.write_set_begin(SetHeader::new(TType::Void, 0)),
            Err(ProtocolError::InvalidType(1))
        ));
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let bytes = [0xffu8; 11];
        let mut input = CompactInputProtocol::new(&bytes[..]);
        assert!(matches!(
            input.read_i64(),
            Err(ProtocolError::VarintOverflow)
        ));
    }

    #[test]
    fn i16_out_of_range_is_rejected() {
        let mut out = CompactOutputProtocol::new(Vec::new());
        out.write_i32(40_000).expect("i32");
        let bytes = out.into_inner();
        let mut input = CompactInputProtocol::new(bytes.as_slice());
        assert!(matches!(
            input.read_i16(),
            Err(ProtocolError::VarintOverflow)
        ));
    }

    #[test]
    fn scalars_round_trip() {
        let mut out = CompactOutputProtocol::new(Vec::new());
        out.write_i8(-7).expect("i8");
        out.write_i16(-300).expect("i16");
        out.write_i64(i64::MIN).expect("i64");
        out.write_double(-0.25).expect("double");
        out.write_bool(false).expect("bool");
        let bytes = out.into_inner();

        let mut input = CompactInputProtocol::new(bytes.as_slice());
        assert_eq!(input.read_i8().expect("i8"), -7);
        assert_eq!(input.read_i16().expect("i16"), -300);
        assert_eq!(input.read_i64().expect("i64"), i64::MIN);
        assert_eq!(input.read_double().expect("double").to_bits(), (-0.25f64).to_bits());
        assert!(!input.read_bool().expect("bool"));
    }
}
