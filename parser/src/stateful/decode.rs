//! A stateful decoder: owns the data source and the codecs negotiated
//! for the object's transfer syntax, fetches element headers and values,
//! and tracks the number of bytes consumed.

use rdcm_core::header::{DataElementHeader, SequenceItemHeader, Tag, VR};
use rdcm_core::value::{PrimitiveValue, C};
use rdcm_encoding::decode::basic::BasicDecoder;
use rdcm_encoding::decode::explicit_be::ExplicitVRBigEndianDecoder;
use rdcm_encoding::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use rdcm_encoding::decode::implicit_le::ImplicitVRLittleEndianDecoder;
use rdcm_encoding::decode::{BasicDecode, Decode};
use rdcm_encoding::text::{
    DefaultCharacterSetCodec, DecodeTextError, SpecificCharacterSet, TextCodec,
};
use rdcm_encoding::transfer_syntax::TransferSyntax;
use smallvec::smallvec;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Read;

/// Module-level error type:
/// failures of the stateful decoding process.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not decode data element header"))]
    DecodeElementHeader {
        #[snafu(backtrace)]
        source: rdcm_encoding::decode::Error,
    },
    #[snafu(display("Could not decode item header"))]
    DecodeItemHeader {
        #[snafu(backtrace)]
        source: rdcm_encoding::decode::Error,
    },
    #[snafu(display("Could not read value of element tagged {}", tag))]
    ReadValueData {
        tag: Tag,
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode text in element tagged {}", tag))]
    DecodeText {
        tag: Tag,
        #[snafu(backtrace)]
        source: DecodeTextError,
    },
    #[snafu(display("Undefined length in element tagged {} is not allowed here", tag))]
    UndefinedLength { tag: Tag, backtrace: Backtrace },
    #[snafu(display("Element tagged {} does not have a primitive value", tag))]
    ValueNotPrimitive { tag: Tag, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The initial capacity of the value reading buffer.
const BUFFER_CAPACITY: usize = 2048;

fn require_known_length(header: &DataElementHeader) -> Result<usize> {
    header
        .len
        .get()
        .map(|len| len as usize)
        .ok_or_else(|| UndefinedLengthSnafu { tag: header.tag }.build())
}

/// The element header decoder negotiated for an object's transfer
/// syntax. The set of supported syntaxes is closed,
/// so run-time selection is a plain enum rather than a trait object.
#[derive(Debug, Clone)]
enum ElementDecoder {
    ImplicitVRLittleEndian(ImplicitVRLittleEndianDecoder),
    ExplicitVRLittleEndian(ExplicitVRLittleEndianDecoder),
    ExplicitVRBigEndian(ExplicitVRBigEndianDecoder),
}

macro_rules! dispatch {
    ($s: expr, |$d: ident| $f: expr) => {
        match $s {
            ElementDecoder::ImplicitVRLittleEndian($d) => $f,
            ElementDecoder::ExplicitVRLittleEndian($d) => $f,
            ElementDecoder::ExplicitVRBigEndian($d) => $f,
        }
    };
}

impl ElementDecoder {
    fn new(ts: TransferSyntax) -> Self {
        match ts {
            TransferSyntax::ImplicitVRLittleEndian => {
                ElementDecoder::ImplicitVRLittleEndian(ImplicitVRLittleEndianDecoder::with_std_dict())
            }
            TransferSyntax::ExplicitVRLittleEndian => {
                ElementDecoder::ExplicitVRLittleEndian(ExplicitVRLittleEndianDecoder::default())
            }
            TransferSyntax::ExplicitVRBigEndian => {
                ElementDecoder::ExplicitVRBigEndian(ExplicitVRBigEndianDecoder::default())
            }
        }
    }

    fn decode_header<S>(
        &self,
        source: &mut S,
    ) -> rdcm_encoding::decode::Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        dispatch!(self, |d| d.decode_header(source))
    }

    fn decode_item_header<S>(
        &self,
        source: &mut S,
    ) -> rdcm_encoding::decode::Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        dispatch!(self, |d| d.decode_item_header(source))
    }
}

/// A stateful abstraction for the DICOM content reading process.
/// This type encapsulates the necessary codecs
/// in order to be as autonomous as possible
/// in the content reading process.
pub struct StatefulDecoder<S> {
    from: S,
    decoder: ElementDecoder,
    basic: BasicDecoder,
    text: Box<dyn TextCodec>,
    buffer: Vec<u8>,
    bytes_read: u64,
}

impl<S> std::fmt::Debug for StatefulDecoder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatefulDecoder")
            .field("bytes_read", &self.bytes_read)
            .finish_non_exhaustive()
    }
}

impl<S> StatefulDecoder<S>
where
    S: Read,
{
    /// Create a new stateful decoder
    /// for the given transfer syntax and character set.
    pub fn new_with(source: S, ts: TransferSyntax, cs: SpecificCharacterSet) -> Self {
        StatefulDecoder {
            from: source,
            decoder: ElementDecoder::new(ts),
            basic: ts.basic_decoder(),
            text: cs.codec(),
            buffer: Vec::with_capacity(BUFFER_CAPACITY),
            bytes_read: 0,
        }
    }

    /// Create a new stateful decoder with a base offset,
    /// for sources which do not start at the beginning of the object.
    pub fn new_with_offset(
        source: S,
        ts: TransferSyntax,
        cs: SpecificCharacterSet,
        base_offset: u64,
    ) -> Self {
        let mut this = Self::new_with(source, ts, cs);
        this.bytes_read = base_offset;
        this
    }

    /// Replace the text codec
    /// once the Specific Character Set element has been read.
    pub fn set_character_set(&mut self, cs: SpecificCharacterSet) {
        self.text = cs.codec();
    }

    /// Retrieve the number of bytes read so far.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Decode the next data element header.
    pub fn decode_header(&mut self) -> Result<DataElementHeader> {
        let (header, bytes_read) = self
            .decoder
            .decode_header(&mut self.from)
            .context(DecodeElementHeaderSnafu)?;
        self.bytes_read += bytes_read as u64;
        if let Some(len) = header.len.get() {
            // the encoding mandates even value lengths;
            // tolerate the violation, it is common in the wild
            if len % 2 == 1 {
                tracing::warn!("odd length {} in element tagged {}", len, header.tag);
            }
        }
        Ok(header)
    }

    /// Decode the next sequence item header.
    pub fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        let header = self
            .decoder
            .decode_item_header(&mut self.from)
            .context(DecodeItemHeaderSnafu)?;
        self.bytes_read += 8;
        Ok(header)
    }

    /// Eagerly read the following data in the source
    /// as a primitive data value.
    /// Textual values are kept in their original string form;
    /// word-sized binary values are read according to
    /// the negotiated byte order.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O problems,
    /// or if the header describes a sequence,
    /// in which case this method should not be used.
    pub fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        match header.vr {
            VR::AE | VR::AS | VR::CS | VR::DA | VR::DS | VR::DT | VR::IS | VR::LO | VR::PN
            | VR::SH | VR::TM | VR::UC | VR::UI => self.read_value_strs(header),
            VR::LT | VR::ST | VR::UT | VR::UR => self.read_value_str(header),
            VR::AT => self.read_value_tag(header),
            VR::OB | VR::UN => self.read_value_ob(header),
            VR::US | VR::OW => self.read_value_us(header),
            VR::SS => self.read_value_ss(header),
            VR::UL | VR::OL => self.read_value_ul(header),
            VR::SL => self.read_value_sl(header),
            VR::UV | VR::OV => self.read_value_uv(header),
            VR::SV => self.read_value_sv(header),
            VR::FL | VR::OF => self.read_value_fl(header),
            VR::FD | VR::OD => self.read_value_fd(header),
            VR::SQ => ValueNotPrimitiveSnafu { tag: header.tag }.fail(),
        }
    }

    /// Consume and discard exactly the value bytes of the given element,
    /// without materializing them.
    pub fn skip_value(&mut self, header: &DataElementHeader) -> Result<()> {
        let len = require_known_length(header)?;
        let copied = std::io::copy(
            &mut (&mut self.from).take(len as u64),
            &mut std::io::sink(),
        )
        .context(ReadValueDataSnafu { tag: header.tag })?;
        if copied != len as u64 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "value data ended prematurely",
            ))
            .context(ReadValueDataSnafu { tag: header.tag });
        }
        self.bytes_read += len as u64;
        Ok(())
    }

    /// Read a sequence of unsigned 32-bit integers into `target`
    /// (the basic offset table of an encapsulated pixel stream).
    pub fn read_u32_to_vec(&mut self, n_bytes: u32, target: &mut Vec<u32>) -> Result<()> {
        let n = n_bytes as usize / 4;
        target.reserve(n);
        for _ in 0..n {
            let v = self
                .basic
                .decode_ul(&mut self.from)
                .context(ReadValueDataSnafu {
                    tag: Tag(0xFFFE, 0xE000),
                })?;
            target.push(v);
        }
        self.bytes_read += (n * 4) as u64;
        Ok(())
    }

    /// Read exactly `n_bytes` raw bytes into `target`.
    pub fn read_to_vec(&mut self, n_bytes: u32, target: &mut Vec<u8>) -> Result<()> {
        target.resize(n_bytes as usize, 0);
        self.from
            .read_exact(target)
            .context(ReadValueDataSnafu {
                tag: Tag(0xFFFE, 0xE000),
            })?;
        self.bytes_read += n_bytes as u64;
        Ok(())
    }

    // ---------------- per-VR value readers ---------------------

    fn read_value_strs(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        self.buffer.resize(len, 0);
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu { tag: header.tag })?;

        let parts: Result<C<_>, _> = match header.vr {
            // the structural VRs are always in the default repertoire
            VR::AE | VR::AS | VR::CS | VR::UI => self
                .buffer
                .split(|v| *v == b'\\')
                .map(|slice| DefaultCharacterSetCodec.decode(slice))
                .collect(),
            _ => self
                .buffer
                .split(|v| *v == b'\\')
                .map(|slice| self.text.decode(slice))
                .collect(),
        };

        self.bytes_read += len as u64;
        Ok(PrimitiveValue::Strs(
            parts.context(DecodeTextSnafu { tag: header.tag })?,
        ))
    }

    fn read_value_str(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        self.buffer.resize(len, 0);
        self.from
            .read_exact(&mut self.buffer)
            .context(ReadValueDataSnafu { tag: header.tag })?;
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::Str(
            self.text
                .decode(&self.buffer)
                .context(DecodeTextSnafu { tag: header.tag })?,
        ))
    }

    fn read_value_tag(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 2;
        let mut parts = C::with_capacity(n);
        for _ in 0..n {
            let g = self
                .basic
                .decode_us(&mut self.from)
                .context(ReadValueDataSnafu { tag: header.tag })?;
            let e = self
                .basic
                .decode_us(&mut self.from)
                .context(ReadValueDataSnafu { tag: header.tag })?;
            parts.push(Tag(g, e));
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::Tags(parts))
    }

    fn read_value_ob(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let mut buf = smallvec![0u8; len];
        self.from
            .read_exact(&mut buf)
            .context(ReadValueDataSnafu { tag: header.tag })?;
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::U8(buf))
    }

    fn read_value_us(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 1;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_us(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::U16(vec))
    }

    fn read_value_ss(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 1;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_ss(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::I16(vec))
    }

    fn read_value_ul(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 2;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_ul(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::U32(vec))
    }

    fn read_value_sl(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 2;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_sl(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::I32(vec))
    }

    fn read_value_uv(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 3;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_uv(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::U64(vec))
    }

    fn read_value_sv(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 3;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_sv(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::I64(vec))
    }

    fn read_value_fl(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 2;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_fl(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::F32(vec))
    }

    fn read_value_fd(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = require_known_length(header)?;
        let n = len >> 3;
        let mut vec = C::with_capacity(n);
        for _ in 0..n {
            vec.push(
                self.basic
                    .decode_fd(&mut self.from)
                    .context(ReadValueDataSnafu { tag: header.tag })?,
            );
        }
        self.bytes_read += len as u64;
        Ok(PrimitiveValue::F64(vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // (0008,0060) CS "MR", then (0028,0010) US 512
    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'M', b'R',
        0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, 0x00, 0x02,
    ];

    #[test]
    fn decode_and_read_values() {
        let mut dec = StatefulDecoder::new_with(
            Cursor::new(RAW),
            TransferSyntax::ExplicitVRLittleEndian,
            SpecificCharacterSet::Default,
        );

        let header = dec.decode_header().unwrap();
        assert_eq!(header.tag, Tag(0x0008, 0x0060));
        let value = dec.read_value(&header).unwrap();
        assert_eq!(value.to_str(), "MR");

        let header = dec.decode_header().unwrap();
        let value = dec.read_value(&header).unwrap();
        assert_eq!(value.to_int::<u16>().unwrap(), 512);

        assert_eq!(dec.bytes_read(), RAW.len() as u64);
    }

    #[test]
    fn skip_value_consumes_exactly_the_length() {
        let mut dec = StatefulDecoder::new_with(
            Cursor::new(RAW),
            TransferSyntax::ExplicitVRLittleEndian,
            SpecificCharacterSet::Default,
        );
        let header = dec.decode_header().unwrap();
        dec.skip_value(&header).unwrap();
        assert_eq!(dec.bytes_read(), 10);
        // the next element decodes cleanly after the skip
        let header = dec.decode_header().unwrap();
        assert_eq!(header.tag, Tag(0x0028, 0x0010));
    }

    #[test]
    fn truncated_value_is_an_error() {
        let mut dec = StatefulDecoder::new_with(
            Cursor::new(&RAW[..9]),
            TransferSyntax::ExplicitVRLittleEndian,
            SpecificCharacterSet::Default,
        );
        let header = dec.decode_header().unwrap();
        assert!(dec.read_value(&header).is_err());
    }
}
