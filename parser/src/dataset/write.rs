//! A mid-level writer which consumes a stream of data set tokens
//! and encodes them back into bytes under a chosen transfer syntax.

use crate::dataset::DataToken;
use crate::stateful::encode::{Error as EncoderError, StatefulEncoder};
use rdcm_core::header::{DataElementHeader, Length};
use rdcm_core::value::PrimitiveValue;
use rdcm_core::{Tag, VR};
use rdcm_encoding::transfer_syntax::TransferSyntax;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Write;

/// Module-level error type for data set writing.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not encode data set content"))]
    EncodeToken {
        #[snafu(backtrace)]
        source: EncoderError,
    },
    #[snafu(display("Value token without a preceding element header"))]
    MissingHeader { backtrace: Backtrace },
    #[snafu(display("Token {} cannot be written", token))]
    UnsupportedToken {
        token: DataToken,
        backtrace: Backtrace,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Whether a nesting level was started with an undefined length,
/// requiring an explicit delimiter on close.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Nesting {
    Defined,
    Undefined,
}

/// A writer for DICOM data sets, consuming [`DataToken`]s.
#[derive(Debug)]
pub struct DataSetWriter<W> {
    encoder: StatefulEncoder<W>,
    last_header: Option<DataElementHeader>,
    nesting: Vec<Nesting>,
}

impl<W> DataSetWriter<W>
where
    W: Write,
{
    /// Create a new data set writer for the given transfer syntax.
    pub fn new_with_ts(to: W, ts: TransferSyntax) -> Self {
        DataSetWriter {
            encoder: StatefulEncoder::new_with(to, ts),
            last_header: None,
            nesting: Vec::new(),
        }
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.encoder.into_inner()
    }

    /// Write every token of the given iterator.
    pub fn write_sequence<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = DataToken>,
    {
        for token in tokens {
            self.write(token)?;
        }
        Ok(())
    }

    /// Write a single data set token.
    pub fn write(&mut self, token: DataToken) -> Result<()> {
        match token {
            DataToken::ElementHeader(header) => {
                self.last_header = Some(header);
                Ok(())
            }
            DataToken::PrimitiveValue(ref value) => {
                let header = self
                    .last_header
                    .take()
                    .ok_or_else(|| MissingHeaderSnafu.build())?;
                self.encoder
                    .encode_element(&header, value)
                    .context(EncodeTokenSnafu)
            }
            DataToken::SequenceStart { tag, len } => {
                self.push_nesting(len);
                self.encoder
                    .encode_sequence_start(&DataElementHeader::new(tag, VR::SQ, len))
                    .context(EncodeTokenSnafu)
            }
            DataToken::PixelSequenceStart => {
                self.nesting.push(Nesting::Undefined);
                self.encoder
                    .encode_sequence_start(&DataElementHeader::new(
                        Tag(0x7FE0, 0x0010),
                        VR::OB,
                        Length::UNDEFINED,
                    ))
                    .context(EncodeTokenSnafu)
            }
            DataToken::SequenceEnd => self.close_nesting(CloseKind::Sequence),
            DataToken::ItemStart { len } => {
                self.push_nesting(len);
                self.encoder.encode_item_start(len).context(EncodeTokenSnafu)
            }
            DataToken::ItemEnd => self.close_nesting(CloseKind::Item),
            DataToken::OffsetTable(ref table) => {
                let value = PrimitiveValue::U32(table.iter().copied().collect());
                self.encoder
                    .write_offset_table(&value)
                    .context(EncodeTokenSnafu)
            }
            DataToken::ItemValue(ref data) => {
                self.encoder.write_bytes(data).context(EncodeTokenSnafu)
            }
            DataToken::SkippedValue(_) => UnsupportedTokenSnafu { token }.fail(),
        }
    }

    fn push_nesting(&mut self, len: Length) {
        self.nesting.push(if len.is_undefined() {
            Nesting::Undefined
        } else {
            Nesting::Defined
        });
    }

    fn close_nesting(&mut self, kind: CloseKind) -> Result<()> {
        match self.nesting.pop() {
            Some(Nesting::Undefined) => match kind {
                CloseKind::Sequence => self
                    .encoder
                    .encode_sequence_delimiter()
                    .context(EncodeTokenSnafu),
                CloseKind::Item => self
                    .encoder
                    .encode_item_delimiter()
                    .context(EncodeTokenSnafu),
            },
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum CloseKind {
    Sequence,
    Item,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read::DataSetReader;
    use rdcm_encoding::text::SpecificCharacterSet;

    #[rustfmt::skip]
    const FLAT: &[u8] = &[
        0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'M', b'R',
        0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00,
            b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
    ];

    #[rustfmt::skip]
    const NESTED: &[u8] = &[
        0x08, 0x00, 0x10, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
                0x08, 0x00, 0x50, 0x11, b'U', b'I', 0x04, 0x00, b'1', b'.', b'2', b'\0',
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    ];

    #[rustfmt::skip]
    const PIXEL_SEQUENCE: &[u8] = &[
        0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00,
                0x99, 0xAA,
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
    ];

    fn round_trip(data: &[u8]) -> Vec<u8> {
        let ts = TransferSyntax::ExplicitVRLittleEndian;
        let reader = DataSetReader::new_with_ts_cs(data, ts, SpecificCharacterSet::Default);
        let mut writer = DataSetWriter::new_with_ts(Vec::new(), ts);
        writer
            .write_sequence(reader.map(|t| t.expect("valid token")))
            .expect("write should succeed");
        writer.into_inner()
    }

    #[test]
    fn flat_data_set_round_trips_to_identical_bytes() {
        assert_eq!(round_trip(FLAT), FLAT);
    }

    #[test]
    fn nested_data_set_round_trips_to_identical_bytes() {
        assert_eq!(round_trip(NESTED), NESTED);
    }

    #[test]
    fn pixel_sequence_round_trips_to_identical_bytes() {
        assert_eq!(round_trip(PIXEL_SEQUENCE), PIXEL_SEQUENCE);
    }
}
