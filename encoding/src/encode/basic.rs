//! This module provides implementations for basic encoders:
//! little endian and big endian.

use super::BasicEncode;
use byteordered::{ByteOrdered, Endianness};
use std::io::Write;

type Result<T> = std::io::Result<T>;

/// A basic encoder of DICOM primitive elements in little endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct LittleEndianBasicEncoder;

impl BasicEncode for LittleEndianBasicEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn encode_us<W>(&self, to: W, value: u16) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_u16(value)
    }

    fn encode_ul<W>(&self, to: W, value: u32) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_u32(value)
    }

    fn encode_uv<W>(&self, to: W, value: u64) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_u64(value)
    }

    fn encode_ss<W>(&self, to: W, value: i16) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_i16(value)
    }

    fn encode_sl<W>(&self, to: W, value: i32) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_i32(value)
    }

    fn encode_sv<W>(&self, to: W, value: i64) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_i64(value)
    }

    fn encode_fl<W>(&self, to: W, value: f32) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_f32(value)
    }

    fn encode_fd<W>(&self, to: W, value: f64) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::le(to).write_f64(value)
    }
}

/// A basic encoder of DICOM primitive elements in big endian.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BigEndianBasicEncoder;

impl BasicEncode for BigEndianBasicEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Big
    }

    fn encode_us<W>(&self, to: W, value: u16) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_u16(value)
    }

    fn encode_ul<W>(&self, to: W, value: u32) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_u32(value)
    }

    fn encode_uv<W>(&self, to: W, value: u64) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_u64(value)
    }

    fn encode_ss<W>(&self, to: W, value: i16) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_i16(value)
    }

    fn encode_sl<W>(&self, to: W, value: i32) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_i32(value)
    }

    fn encode_sv<W>(&self, to: W, value: i64) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_i64(value)
    }

    fn encode_fl<W>(&self, to: W, value: f32) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_f32(value)
    }

    fn encode_fd<W>(&self, to: W, value: f64) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::be(to).write_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::smallvec::smallvec;
    use rdcm_core::PrimitiveValue;

    #[test]
    fn primitive_encoding_respects_endianness() {
        let v = PrimitiveValue::U16(smallvec![0x0102]);
        let mut out = Vec::new();
        let n = LittleEndianBasicEncoder.encode_primitive(&mut out, &v).unwrap();
        assert_eq!((n, out.as_slice()), (2, &[0x02u8, 0x01][..]));

        let mut out = Vec::new();
        BigEndianBasicEncoder.encode_primitive(&mut out, &v).unwrap();
        assert_eq!(out, [0x01, 0x02]);
    }

    #[test]
    fn strings_join_with_backslash() {
        let v = PrimitiveValue::Strs(smallvec!["ORIGINAL".into(), "PRIMARY".into()]);
        let mut out = Vec::new();
        let n = LittleEndianBasicEncoder.encode_primitive(&mut out, &v).unwrap();
        assert_eq!(out, b"ORIGINAL\\PRIMARY");
        assert_eq!(n, 16);
    }
}
