//! This module contains the traits and implementations for encoding
//! DICOM element headers and primitive values back into a byte sink.

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

use byteordered::Endianness;
use rdcm_core::header::DataElementHeader;
use rdcm_core::value::PrimitiveValue;
use rdcm_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::Write;

/// Module-level error type:
/// an enumeration of the possible failures when encoding
/// DICOM content to a byte sink.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not write element tag"))]
    WriteTag {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write element VR"))]
    WriteVr {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write element length"))]
    WriteLength {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write item header"))]
    WriteItemHeader {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write value data"))]
    WriteValueData {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Trait for encoding basic data values into a byte sink,
/// based on the destination's endianness.
pub trait BasicEncode {
    /// Retrieve the sink's endianness, as expected by this encoder.
    fn endianness(&self) -> Endianness;

    /// Encode an unsigned short value to the given sink.
    fn encode_us<W>(&self, to: W, value: u16) -> std::io::Result<()>
    where
        W: Write;

    /// Encode an unsigned long value to the given sink.
    fn encode_ul<W>(&self, to: W, value: u32) -> std::io::Result<()>
    where
        W: Write;

    /// Encode an unsigned very long value to the given sink.
    fn encode_uv<W>(&self, to: W, value: u64) -> std::io::Result<()>
    where
        W: Write;

    /// Encode a signed short value to the given sink.
    fn encode_ss<W>(&self, to: W, value: i16) -> std::io::Result<()>
    where
        W: Write;

    /// Encode a signed long value to the given sink.
    fn encode_sl<W>(&self, to: W, value: i32) -> std::io::Result<()>
    where
        W: Write;

    /// Encode a signed very long value to the given sink.
    fn encode_sv<W>(&self, to: W, value: i64) -> std::io::Result<()>
    where
        W: Write;

    /// Encode a single precision float value to the given sink.
    fn encode_fl<W>(&self, to: W, value: f32) -> std::io::Result<()>
    where
        W: Write;

    /// Encode a double precision float value to the given sink.
    fn encode_fd<W>(&self, to: W, value: f64) -> std::io::Result<()>
    where
        W: Write;

    /// Encode a full primitive value to the given sink,
    /// in the encoder's endianness.
    /// String components are written in UTF-8,
    /// joined by a backslash, without trailing padding.
    /// Returns the number of bytes written.
    fn encode_primitive<W>(&self, mut to: W, value: &PrimitiveValue) -> std::io::Result<usize>
    where
        W: Write,
    {
        use PrimitiveValue::*;
        match value {
            Empty => Ok(0),
            Str(s) => {
                to.write_all(s.as_bytes())?;
                Ok(s.len())
            }
            Strs(c) => {
                let mut n = 0;
                for (i, s) in c.iter().enumerate() {
                    if i > 0 {
                        to.write_all(b"\\")?;
                        n += 1;
                    }
                    to.write_all(s.as_bytes())?;
                    n += s.len();
                }
                Ok(n)
            }
            Tags(c) => {
                for tag in c {
                    self.encode_us(&mut to, tag.group())?;
                    self.encode_us(&mut to, tag.element())?;
                }
                Ok(c.len() * 4)
            }
            U8(c) => {
                to.write_all(c)?;
                Ok(c.len())
            }
            I16(c) => {
                for v in c {
                    self.encode_ss(&mut to, *v)?;
                }
                Ok(c.len() * 2)
            }
            U16(c) => {
                for v in c {
                    self.encode_us(&mut to, *v)?;
                }
                Ok(c.len() * 2)
            }
            I32(c) => {
                for v in c {
                    self.encode_sl(&mut to, *v)?;
                }
                Ok(c.len() * 4)
            }
            U32(c) => {
                for v in c {
                    self.encode_ul(&mut to, *v)?;
                }
                Ok(c.len() * 4)
            }
            I64(c) => {
                for v in c {
                    self.encode_sv(&mut to, *v)?;
                }
                Ok(c.len() * 8)
            }
            U64(c) => {
                for v in c {
                    self.encode_uv(&mut to, *v)?;
                }
                Ok(c.len() * 8)
            }
            F32(c) => {
                for v in c {
                    self.encode_fl(&mut to, *v)?;
                }
                Ok(c.len() * 4)
            }
            F64(c) => {
                for v in c {
                    self.encode_fd(&mut to, *v)?;
                }
                Ok(c.len() * 8)
            }
        }
    }
}

/// Trait for encoding the header portions of DICOM content
/// under a specific transfer syntax.
pub trait Encode: BasicEncode {
    /// Encode and write an element tag.
    fn encode_tag<W>(&self, to: &mut W, tag: Tag) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write a data element header to the given destination.
    /// Returns the number of bytes effectively written on success.
    fn encode_element_header<W>(&self, to: &mut W, de: DataElementHeader) -> Result<usize>
    where
        W: ?Sized + Write;

    /// Encode and write a DICOM sequence item header to the given destination.
    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write a DICOM sequence item delimiter.
    fn encode_item_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write;

    /// Encode and write a DICOM sequence delimiter.
    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write;
}

