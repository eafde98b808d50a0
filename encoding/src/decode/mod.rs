//! This module contains the traits and implementations for decoding
//! DICOM element headers from a byte source, independently of the
//! value reading strategy.

pub mod basic;
pub mod explicit_be;
pub mod explicit_le;
pub mod implicit_le;

use byteordered::Endianness;
use rdcm_core::header::{DataElementHeader, SequenceItemHeader, Tag};
use snafu::{Backtrace, Snafu};
use std::io::Read;

/// Module-level error type:
/// an enumeration of the possible failures when decoding
/// the header portions of a data element.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not read tag of element header"))]
    ReadHeaderTag {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read explicit VR of element header"))]
    ReadVr {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read reserved bytes of element header"))]
    ReadReserved {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read value length of element header"))]
    ReadLength {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read item header"))]
    ReadItemHeader {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read item value length"))]
    ReadItemLength {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read tag"))]
    ReadTag {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Bad sequence item header"))]
    BadSequenceHeader {
        source: rdcm_core::header::SequenceItemHeaderError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Trait for reading and decoding basic data values from a data source.
///
/// This trait aims to provide methods for reading binary numbers based on
/// the source's endianness.
pub trait BasicDecode {
    /// Retrieve the source's endianness, as expected by this decoder.
    fn endianness(&self) -> Endianness;

    /// Decode an unsigned short value from the given source.
    fn decode_us<S>(&self, source: S) -> std::io::Result<u16>
    where
        S: Read;

    /// Decode a sequence of unsigned shorts from the given source.
    fn decode_us_into<S>(&self, source: S, target: &mut [u16]) -> std::io::Result<()>
    where
        S: Read;

    /// Decode an unsigned long value from the given source.
    fn decode_ul<S>(&self, source: S) -> std::io::Result<u32>
    where
        S: Read;

    /// Decode a sequence of unsigned longs from the given source.
    fn decode_ul_into<S>(&self, source: S, target: &mut [u32]) -> std::io::Result<()>
    where
        S: Read;

    /// Decode an unsigned very long value from the given source.
    fn decode_uv<S>(&self, source: S) -> std::io::Result<u64>
    where
        S: Read;

    /// Decode a signed short value from the given source.
    fn decode_ss<S>(&self, source: S) -> std::io::Result<i16>
    where
        S: Read;

    /// Decode a signed long value from the given source.
    fn decode_sl<S>(&self, source: S) -> std::io::Result<i32>
    where
        S: Read;

    /// Decode a signed very long value from the given source.
    fn decode_sv<S>(&self, source: S) -> std::io::Result<i64>
    where
        S: Read;

    /// Decode a single precision float value from the given source.
    fn decode_fl<S>(&self, source: S) -> std::io::Result<f32>
    where
        S: Read;

    /// Decode a double precision float value from the given source.
    fn decode_fd<S>(&self, source: S) -> std::io::Result<f64>
    where
        S: Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, mut source: S) -> std::io::Result<Tag>
    where
        S: Read,
    {
        let g = self.decode_us(&mut source)?;
        let e = self.decode_us(&mut source)?;
        Ok(Tag(g, e))
    }
}

/// Trait for decoding the header portions of DICOM content
/// under a specific transfer syntax.
pub trait Decode {
    /// Fetch and decode the next data element header from the given source.
    /// The value is not decoded and not fetched;
    /// the returned count is the number of bytes the header occupied.
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next sequence item head from the given source.
    /// It is a separate method
    /// because item headers are always decoded the same way,
    /// regardless of the explicitness of the value representation.
    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;
}

/// Obtain the decoder for the file meta group,
/// which is always encoded in Explicit VR Little Endian.
pub fn file_header_decoder() -> explicit_le::ExplicitVRLittleEndianDecoder {
    explicit_le::ExplicitVRLittleEndianDecoder::default()
}
