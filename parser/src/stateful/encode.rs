//! A stateful encoder: owns the data sink and the codecs negotiated
//! for the object's transfer syntax, and writes element headers and
//! values, applying the even-length padding rule.

use rdcm_core::header::{DataElementHeader, Length};
use rdcm_core::value::PrimitiveValue;
use rdcm_encoding::encode::explicit_be::ExplicitVRBigEndianEncoder;
use rdcm_encoding::encode::explicit_le::ExplicitVRLittleEndianEncoder;
use rdcm_encoding::encode::implicit_le::ImplicitVRLittleEndianEncoder;
use rdcm_encoding::encode::{BasicEncode, Encode};
use rdcm_encoding::transfer_syntax::TransferSyntax;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Write;

/// Module-level error type:
/// failures of the stateful encoding process.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not encode element header"))]
    EncodeElementHeader {
        #[snafu(backtrace)]
        source: rdcm_encoding::encode::Error,
    },
    #[snafu(display("Could not encode element value"))]
    EncodeValue {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write value padding"))]
    WritePadding {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The element header encoder negotiated for an object's transfer
/// syntax, mirroring the decoder side's closed set.
#[derive(Debug, Clone)]
enum ElementEncoder {
    ImplicitVRLittleEndian(ImplicitVRLittleEndianEncoder),
    ExplicitVRLittleEndian(ExplicitVRLittleEndianEncoder),
    ExplicitVRBigEndian(ExplicitVRBigEndianEncoder),
}

macro_rules! dispatch {
    ($s: expr, |$e: ident| $f: expr) => {
        match $s {
            ElementEncoder::ImplicitVRLittleEndian($e) => $f,
            ElementEncoder::ExplicitVRLittleEndian($e) => $f,
            ElementEncoder::ExplicitVRBigEndian($e) => $f,
        }
    };
}

impl ElementEncoder {
    fn new(ts: TransferSyntax) -> Self {
        match ts {
            TransferSyntax::ImplicitVRLittleEndian => {
                ElementEncoder::ImplicitVRLittleEndian(ImplicitVRLittleEndianEncoder::default())
            }
            TransferSyntax::ExplicitVRLittleEndian => {
                ElementEncoder::ExplicitVRLittleEndian(ExplicitVRLittleEndianEncoder::default())
            }
            TransferSyntax::ExplicitVRBigEndian => {
                ElementEncoder::ExplicitVRBigEndian(ExplicitVRBigEndianEncoder::default())
            }
        }
    }

    fn encode_element_header<W>(
        &self,
        to: &mut W,
        de: DataElementHeader,
    ) -> rdcm_encoding::encode::Result<usize>
    where
        W: ?Sized + Write,
    {
        dispatch!(self, |e| e.encode_element_header(to, de))
    }

    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> rdcm_encoding::encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch!(self, |e| e.encode_item_header(to, len))
    }

    fn encode_item_delimiter<W>(&self, to: &mut W) -> rdcm_encoding::encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch!(self, |e| e.encode_item_delimiter(to))
    }

    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> rdcm_encoding::encode::Result<()>
    where
        W: ?Sized + Write,
    {
        dispatch!(self, |e| e.encode_sequence_delimiter(to))
    }

    fn encode_primitive<W>(&self, to: &mut W, value: &PrimitiveValue) -> std::io::Result<usize>
    where
        W: ?Sized + Write,
    {
        dispatch!(self, |e| e.encode_primitive(to, value))
    }
}

/// A stateful abstraction for encoding DICOM content to a sink.
pub struct StatefulEncoder<W> {
    to: W,
    encoder: ElementEncoder,
    bytes_written: u64,
}

impl<W> std::fmt::Debug for StatefulEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatefulEncoder")
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl<W> StatefulEncoder<W>
where
    W: Write,
{
    /// Create a new stateful encoder for the given transfer syntax.
    pub fn new_with(to: W, ts: TransferSyntax) -> Self {
        StatefulEncoder {
            to,
            encoder: ElementEncoder::new(ts),
            bytes_written: 0,
        }
    }

    /// Retrieve the number of bytes written so far.
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.to
    }

    /// Encode a full primitive element:
    /// header (with the length padded to an even number of bytes),
    /// value data, and the padding byte if required.
    /// Text values are padded with a space, binary values with NUL.
    pub fn encode_element(
        &mut self,
        header: &DataElementHeader,
        value: &PrimitiveValue,
    ) -> Result<()> {
        let byte_len = value.calculate_byte_len() as u32;
        let padded = byte_len + (byte_len & 1);
        let header = DataElementHeader::new(header.tag, header.vr, Length(padded));
        let n = self
            .encoder
            .encode_element_header(&mut self.to, header)
            .context(EncodeElementHeaderSnafu)?;
        self.bytes_written += n as u64;
        let n = self
            .encoder
            .encode_primitive(&mut self.to, value)
            .context(EncodeValueSnafu)?;
        self.bytes_written += n as u64;
        if byte_len & 1 == 1 {
            let pad = if header.vr.is_ascii() { b" " } else { b"\0" };
            self.to.write_all(pad).context(WritePaddingSnafu)?;
            self.bytes_written += 1;
        }
        Ok(())
    }

    /// Encode a sequence element header
    /// (no value; the items follow as separate tokens).
    pub fn encode_sequence_start(&mut self, header: &DataElementHeader) -> Result<()> {
        let n = self
            .encoder
            .encode_element_header(&mut self.to, *header)
            .context(EncodeElementHeaderSnafu)?;
        self.bytes_written += n as u64;
        Ok(())
    }

    /// Encode a sequence item header with the given length.
    pub fn encode_item_start(&mut self, len: Length) -> Result<()> {
        self.encoder
            .encode_item_header(&mut self.to, len.0)
            .context(EncodeElementHeaderSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode an item delimiter.
    pub fn encode_item_delimiter(&mut self) -> Result<()> {
        self.encoder
            .encode_item_delimiter(&mut self.to)
            .context(EncodeElementHeaderSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode a sequence delimiter.
    pub fn encode_sequence_delimiter(&mut self) -> Result<()> {
        self.encoder
            .encode_sequence_delimiter(&mut self.to)
            .context(EncodeElementHeaderSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Write raw bytes (an encapsulated pixel data fragment).
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.to.write_all(data).context(WritePaddingSnafu)?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    /// Write the entries of a basic offset table
    /// (the item header is encoded separately).
    pub fn write_offset_table(&mut self, table: &PrimitiveValue) -> Result<()> {
        let n = self
            .encoder
            .encode_primitive(&mut self.to, table)
            .context(EncodeValueSnafu)?;
        self.bytes_written += n as u64;
        Ok(())
    }
}
