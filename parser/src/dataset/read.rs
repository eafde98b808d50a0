//! A mid-level reader which interprets a DICOM data set
//! as a stream of tokens.
//!
//! Sequence and item boundaries are tracked on an explicit delimiter
//! stack, so the depth of nested content is bounded by heap memory
//! rather than by the call stack, and maliciously deep nesting cannot
//! crash the process.

use crate::dataset::{DataToken, SeqTokenType};
use crate::stateful::decode::{Error as DecoderError, StatefulDecoder};
use rdcm_core::header::{DataElementHeader, Header, Length, SequenceItemHeader};
use rdcm_core::{Tag, VR};
use rdcm_encoding::text::SpecificCharacterSet;
use rdcm_encoding::transfer_syntax::TransferSyntax;
use snafu::{Backtrace, ResultExt, Snafu};
use std::collections::BTreeSet;
use std::io::Read;

/// Module-level error type:
/// structural violations found while interpreting the token stream.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not read item header"))]
    ReadItemHeader {
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read element header"))]
    ReadHeader {
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read value for element tagged {}", tag))]
    ReadValue {
        tag: Tag,
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read item value"))]
    ReadItemValue {
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display(
        "Inconsistent sequence end: expected end at {} bytes but read {}",
        end_of_sequence,
        bytes_read
    ))]
    InconsistentSequenceEnd {
        end_of_sequence: u64,
        bytes_read: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Undefined length in element tagged {} is only legal for sequences", tag))]
    UndefinedElementLength { tag: Tag, backtrace: Backtrace },
    /// Undefined pixel item length
    UndefinedItemLength { backtrace: Backtrace },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A reader-specific token representing a sequence or item start.
#[derive(Debug, Copy, Clone, PartialEq)]
struct SeqToken {
    /// Whether it is the start of a sequence or the start of an item.
    typ: SeqTokenType,
    /// The length of the value, as indicated by the starting element;
    /// can be unknown.
    len: Length,
    /// Whether this token is part of an encapsulated pixel data.
    pixel_data: bool,
    /// The number of bytes the parser had read when it reached the
    /// beginning of the sequence or item value data.
    base_offset: u64,
}

/// The value reading strategy for the data set reader.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ValueReadStrategy {
    /// Value bytes are decoded eagerly into primitive values.
    /// Text is kept in its original string form.
    #[default]
    Preserved,
    /// Value bytes are consumed and discarded;
    /// value tokens carry only the skipped length.
    /// This is the strategy of the structural validation pass.
    Skipped,
}

/// The set of options for the data set reader.
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct DataSetReaderOptions {
    /// the value reading strategy
    pub value_read: ValueReadStrategy,
    /// stop the token stream after the element with this tag
    /// (or the first element past it) has been fully consumed;
    /// the stopping element itself is delivered
    pub read_until: Option<Tag>,
    /// top-level elements whose value bytes are consumed
    /// but never materialized
    pub skip_tags: BTreeSet<Tag>,
}

impl DataSetReaderOptions {
    /// Replace the value reading strategy of the options.
    pub fn value_read(mut self, value_read: ValueReadStrategy) -> Self {
        self.value_read = value_read;
        self
    }

    /// Replace the stop tag of the options.
    pub fn read_until(mut self, tag: Tag) -> Self {
        self.read_until = Some(tag);
        self
    }

    /// Replace the skip set of the options.
    pub fn skip_tags(mut self, tags: BTreeSet<Tag>) -> Self {
        self.skip_tags = tags;
        self
    }
}

/// A higher-level reader for retrieving structure
/// in a DICOM data set from an arbitrary data source.
#[derive(Debug)]
pub struct DataSetReader<S> {
    /// the stateful decoder
    parser: StatefulDecoder<S>,
    /// the options of this reader
    options: DataSetReaderOptions,
    /// whether the reader is expecting an item header next
    /// (or a sequence delimiter)
    in_sequence: bool,
    /// whether the reader is expecting the first item value of a
    /// pixel sequence next (the basic offset table)
    offset_table_next: bool,
    /// whether a check for a sequence or item delimitation is pending
    delimiter_check_pending: bool,
    /// whether the stop tag has been reached and the stream should fuse
    /// once the current element is fully consumed
    stop_pending: bool,
    /// whether the value of the last decoded header must be discarded
    skip_value_next: bool,
    /// a stack of delimiters
    seq_delimiters: Vec<SeqToken>,
    /// fuse the iteration process if true
    hard_break: bool,
    /// last decoded header
    last_header: Option<DataElementHeader>,
}

impl<S> DataSetReader<S>
where
    S: Read,
{
    /// Create a new token reader over the given source,
    /// considering the given transfer syntax and character set.
    pub fn new_with_ts_cs(source: S, ts: TransferSyntax, cs: SpecificCharacterSet) -> Self {
        Self::new_with_ts_cs_options(source, ts, cs, Default::default())
    }

    /// Create a new token reader with the given options.
    pub fn new_with_ts_cs_options(
        source: S,
        ts: TransferSyntax,
        cs: SpecificCharacterSet,
        options: DataSetReaderOptions,
    ) -> Self {
        let parser = StatefulDecoder::new_with(source, ts, cs);
        DataSetReader {
            parser,
            options,
            seq_delimiters: Vec::new(),
            delimiter_check_pending: false,
            stop_pending: false,
            skip_value_next: false,
            offset_table_next: false,
            in_sequence: false,
            hard_break: false,
            last_header: None,
        }
    }

    /// Retrieve the number of bytes the underlying decoder has consumed.
    pub fn bytes_read(&self) -> u64 {
        self.parser.bytes_read()
    }

    fn push_sequence_token(&mut self, typ: SeqTokenType, len: Length, pixel_data: bool) {
        self.seq_delimiters.push(SeqToken {
            typ,
            len,
            pixel_data,
            base_offset: self.parser.bytes_read(),
        })
    }

    /// Pop delimiters of explicit-length sequences and items
    /// once the decoder has consumed their declared extent.
    fn update_seq_delimiters(&mut self) -> Result<Option<DataToken>> {
        if let Some(sd) = self.seq_delimiters.last() {
            if let Some(len) = sd.len.get() {
                let end_of_sequence = sd.base_offset + u64::from(len);
                let bytes_read = self.parser.bytes_read();
                if bytes_read > end_of_sequence {
                    return InconsistentSequenceEndSnafu {
                        end_of_sequence,
                        bytes_read,
                    }
                    .fail();
                }
                if bytes_read == end_of_sequence {
                    let token = match sd.typ {
                        SeqTokenType::Item => {
                            self.in_sequence = true;
                            DataToken::ItemEnd
                        }
                        SeqTokenType::Sequence => {
                            self.in_sequence = false;
                            DataToken::SequenceEnd
                        }
                    };
                    self.seq_delimiters.pop();
                    // the enclosing delimiter may end at the same position
                    self.delimiter_check_pending = true;
                    return Ok(Some(token));
                }
            }
        }
        self.delimiter_check_pending = false;
        Ok(None)
    }

    /// Whether the given top-level element tag triggers the stop
    /// condition (inclusive: the element is still delivered).
    fn reaches_stop_tag(&self, tag: Tag) -> bool {
        self.seq_delimiters.is_empty()
            && self
                .options
                .read_until
                .map(|stop| tag >= stop)
                .unwrap_or(false)
    }

    fn value_is_skipped(&self, tag: Tag) -> bool {
        self.options.value_read == ValueReadStrategy::Skipped
            || (self.seq_delimiters.is_empty() && self.options.skip_tags.contains(&tag))
    }
}

impl<S> Iterator for DataSetReader<S>
where
    S: Read,
{
    type Item = Result<DataToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.hard_break {
            return None;
        }

        // item or sequence delimitation logic for explicit lengths
        if self.delimiter_check_pending {
            match self.update_seq_delimiters() {
                Err(e) => {
                    self.hard_break = true;
                    return Some(Err(e));
                }
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => { /* no-op */ }
            }
        }

        // the stop element has been fully consumed
        if self.stop_pending
            && self.seq_delimiters.is_empty()
            && self.last_header.is_none()
            && !self.in_sequence
        {
            self.hard_break = true;
            return None;
        }

        if self.in_sequence {
            // at sequence level, expecting an item header or delimiter
            match self.parser.decode_item_header() {
                Ok(header) => match header {
                    SequenceItemHeader::Item { len } => {
                        // entered a new item
                        self.in_sequence = false;
                        let pixel_data = self
                            .seq_delimiters
                            .last()
                            .map(|t| t.pixel_data)
                            .unwrap_or(false);
                        self.push_sequence_token(SeqTokenType::Item, len, pixel_data);
                        // items can be empty
                        if len == Length(0) {
                            self.delimiter_check_pending = true;
                            // an empty first pixel item is an empty
                            // offset table; the fragments follow
                            if pixel_data {
                                self.offset_table_next = false;
                            }
                        }
                        Some(Ok(DataToken::ItemStart { len }))
                    }
                    SequenceItemHeader::ItemDelimiter => {
                        // closed an item
                        self.seq_delimiters.pop();
                        self.in_sequence = true;
                        // the enclosing sequence can end after an item delimiter
                        self.delimiter_check_pending = true;
                        Some(Ok(DataToken::ItemEnd))
                    }
                    SequenceItemHeader::SequenceDelimiter => {
                        // closed a sequence
                        self.seq_delimiters.pop();
                        self.in_sequence = false;
                        // the enclosing item can end after a nested sequence ends
                        self.delimiter_check_pending = true;
                        Some(Ok(DataToken::SequenceEnd))
                    }
                },
                Err(e) => {
                    self.hard_break = true;
                    Some(Err(e).context(ReadItemHeaderSnafu))
                }
            }
        } else if let Some(SeqToken {
            typ: SeqTokenType::Item,
            pixel_data: true,
            len,
            ..
        }) = self.seq_delimiters.last()
        {
            // a pixel data item value is expected
            let len = match len.get() {
                Some(len) => len,
                None => {
                    self.hard_break = true;
                    return Some(UndefinedItemLengthSnafu.fail());
                }
            };

            // the item delimiter is popped on the next iteration
            self.delimiter_check_pending = true;

            if self.offset_table_next {
                self.offset_table_next = false;
                let mut offset_table = Vec::new();
                Some(match self.parser.read_u32_to_vec(len, &mut offset_table) {
                    Ok(()) => Ok(DataToken::OffsetTable(offset_table)),
                    Err(e) => {
                        self.hard_break = true;
                        Err(e).context(ReadItemValueSnafu)
                    }
                })
            } else {
                let mut value = Vec::new();
                Some(match self.parser.read_to_vec(len, &mut value) {
                    Ok(()) => Ok(DataToken::ItemValue(value)),
                    Err(e) => {
                        self.hard_break = true;
                        Err(e).context(ReadItemValueSnafu)
                    }
                })
            }
        } else if let Some(header) = self.last_header.take() {
            // a plain element header was read, so a value is expected
            let token = if self.skip_value_next {
                self.skip_value_next = false;
                let len = header.len.0;
                match self.parser.skip_value(&header) {
                    Ok(()) => Ok(DataToken::SkippedValue(len)),
                    Err(e) => {
                        self.hard_break = true;
                        return Some(Err(e).context(ReadValueSnafu { tag: header.tag }));
                    }
                }
            } else {
                match self.parser.read_value(&header) {
                    Ok(value) => Ok(DataToken::PrimitiveValue(value)),
                    Err(e) => {
                        self.hard_break = true;
                        return Some(Err(e).context(ReadValueSnafu { tag: header.tag }));
                    }
                }
            };

            // sequences can end after this token
            self.delimiter_check_pending = true;

            Some(token)
        } else {
            // a data element header or item delimiter is expected
            match self.parser.decode_header() {
                Ok(DataElementHeader {
                    tag,
                    vr: VR::SQ,
                    len,
                }) => {
                    if self.reaches_stop_tag(tag) {
                        self.stop_pending = true;
                    }
                    self.in_sequence = true;
                    self.push_sequence_token(SeqTokenType::Sequence, len, false);

                    // sequences can end right after they start
                    if len == Length(0) {
                        self.delimiter_check_pending = true;
                    }

                    Some(Ok(DataToken::SequenceStart { tag, len }))
                }
                Ok(DataElementHeader {
                    tag: Tag(0xFFFE, 0xE00D),
                    ..
                }) => {
                    // closed an undefined-length item at element level
                    self.seq_delimiters.pop();
                    self.in_sequence = true;
                    self.delimiter_check_pending = true;
                    Some(Ok(DataToken::ItemEnd))
                }
                Ok(header) if header.is_encapsulated_pixeldata() => {
                    if self.reaches_stop_tag(header.tag()) {
                        self.stop_pending = true;
                    }
                    self.push_sequence_token(SeqTokenType::Sequence, Length::UNDEFINED, true);
                    self.in_sequence = true;
                    self.offset_table_next = true;
                    Some(Ok(DataToken::PixelSequenceStart))
                }
                Ok(header) if header.len.is_undefined() => {
                    // a plain element with undefined length is a
                    // structural violation
                    self.hard_break = true;
                    Some(UndefinedElementLengthSnafu { tag: header.tag }.fail())
                }
                Ok(header) => {
                    if self.reaches_stop_tag(header.tag()) {
                        self.stop_pending = true;
                    }
                    self.skip_value_next = self.value_is_skipped(header.tag());
                    self.last_header = Some(header);
                    Some(Ok(DataToken::ElementHeader(header)))
                }
                Err(DecoderError::DecodeElementHeader { source, .. })
                    if self.seq_delimiters.is_empty() && is_eof(&source) =>
                {
                    // end of the data set
                    self.hard_break = true;
                    None
                }
                Err(e) => {
                    self.hard_break = true;
                    Some(Err(e).context(ReadHeaderSnafu))
                }
            }
        }
    }
}

fn is_eof(error: &rdcm_encoding::decode::Error) -> bool {
    matches!(
        error,
        rdcm_encoding::decode::Error::ReadHeaderTag { source, .. }
            if source.kind() == std::io::ErrorKind::UnexpectedEof
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::PrimitiveValue;

    fn ts() -> TransferSyntax {
        TransferSyntax::ExplicitVRLittleEndian
    }

    fn read_all(data: &[u8], options: DataSetReaderOptions) -> Vec<DataToken> {
        let reader =
            DataSetReader::new_with_ts_cs_options(data, ts(), SpecificCharacterSet::Default, options);
        reader.map(|t| t.expect("token stream should be valid")).collect()
    }

    // (0008,0060) CS "MR", (0010,0010) PN "Doe^John", (0010,0020) LO "C123"
    #[rustfmt::skip]
    const FLAT: &[u8] = &[
        0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'M', b'R',
        0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00,
            b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
        0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'C', b'1', b'2', b'3',
    ];

    #[test]
    fn flat_data_set_tokens() {
        let tokens = read_all(FLAT, Default::default());
        assert_eq!(tokens.len(), 6);
        assert!(matches!(
            tokens[0],
            DataToken::ElementHeader(h) if h.tag == Tag(0x0008, 0x0060)
        ));
        assert_eq!(
            tokens[3],
            DataToken::PrimitiveValue(PrimitiveValue::Strs(
                rdcm_core::smallvec::smallvec!["Doe^John".to_string()]
            ))
        );
    }

    #[test]
    fn read_until_is_inclusive() {
        let options = DataSetReaderOptions::default().read_until(Tag(0x0010, 0x0010));
        let tokens = read_all(FLAT, options);
        // the stop element itself is decoded, the one after it is not
        assert_eq!(tokens.len(), 4);
        assert!(matches!(
            tokens[2],
            DataToken::ElementHeader(h) if h.tag == Tag(0x0010, 0x0010)
        ));
    }

    #[test]
    fn skip_tags_discard_the_value() {
        let mut skip = BTreeSet::new();
        skip.insert(Tag(0x0010, 0x0010));
        let options = DataSetReaderOptions::default().skip_tags(skip);
        let tokens = read_all(FLAT, options);
        assert_eq!(tokens[3], DataToken::SkippedValue(8));
        // the following element is still decoded normally
        assert!(matches!(
            tokens[4],
            DataToken::ElementHeader(h) if h.tag == Tag(0x0010, 0x0020)
        ));
    }

    #[test]
    fn skipped_strategy_materializes_nothing() {
        let options =
            DataSetReaderOptions::default().value_read(ValueReadStrategy::Skipped);
        let tokens = read_all(FLAT, options);
        assert!(tokens
            .iter()
            .all(|t| !matches!(t, DataToken::PrimitiveValue(_))));
    }

    // (0008,1110) SQ of undefined length holding one undefined-length item
    // with a single element, closed by explicit delimiters
    #[rustfmt::skip]
    const NESTED: &[u8] = &[
        0x08, 0x00, 0x10, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, // item, undefined length
                0x08, 0x00, 0x50, 0x11, b'U', b'I', 0x04, 0x00, b'1', b'.', b'2', b'\0',
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, // item delimiter
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,     // sequence delimiter
    ];

    #[test]
    fn nested_sequence_tokens() {
        let tokens = read_all(NESTED, Default::default());
        assert_eq!(
            tokens,
            vec![
                DataToken::SequenceStart {
                    tag: Tag(0x0008, 0x1110),
                    len: Length::UNDEFINED,
                },
                DataToken::ItemStart {
                    len: Length::UNDEFINED,
                },
                DataToken::ElementHeader(DataElementHeader::new(
                    Tag(0x0008, 0x1150),
                    VR::UI,
                    Length(4),
                )),
                DataToken::PrimitiveValue(PrimitiveValue::Strs(
                    rdcm_core::smallvec::smallvec!["1.2\0".to_string()]
                )),
                DataToken::ItemEnd,
                DataToken::SequenceEnd,
            ]
        );
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        // 256 levels of undefined-length sequences, each holding one
        // undefined-length item, with matching delimiters
        const DEPTH: usize = 256;
        let mut data = Vec::new();
        for _ in 0..DEPTH {
            data.extend_from_slice(&[
                0x08, 0x00, 0x10, 0x11, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            ]);
            data.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF]);
        }
        for _ in 0..DEPTH {
            data.extend_from_slice(&[0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00]);
            data.extend_from_slice(&[0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00]);
        }
        let tokens = read_all(&data, Default::default());
        assert_eq!(tokens.len(), DEPTH * 4);
    }

    // (7FE0,0010) OB, undefined length: offset table item + one fragment
    #[rustfmt::skip]
    const PIXEL_SEQUENCE: &[u8] = &[
        0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, // offset table, 1 entry
                0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00, // fragment of 2 bytes
                0x99, 0xAA,
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,     // sequence delimiter
    ];

    #[test]
    fn pixel_sequence_tokens() {
        let tokens = read_all(PIXEL_SEQUENCE, Default::default());
        assert_eq!(
            tokens,
            vec![
                DataToken::PixelSequenceStart,
                DataToken::ItemStart { len: Length(4) },
                DataToken::OffsetTable(vec![0]),
                DataToken::ItemEnd,
                DataToken::ItemStart { len: Length(2) },
                DataToken::ItemValue(vec![0x99, 0xAA]),
                DataToken::ItemEnd,
                DataToken::SequenceEnd,
            ]
        );
    }

    #[test]
    fn empty_offset_table_is_not_mistaken_for_a_fragment() {
        #[rustfmt::skip]
        let data = [
            0xE0u8, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFE, 0xFF, 0x00, 0xE0, 0x00, 0x00, 0x00, 0x00, // empty offset table
                0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00, // fragment of 2 bytes
                    0x01, 0x02,
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];
        let tokens = read_all(&data, Default::default());
        assert!(tokens.contains(&DataToken::ItemValue(vec![0x01, 0x02])));
        assert!(!tokens.iter().any(|t| matches!(t, DataToken::OffsetTable(_))));
    }

    #[test]
    fn truncated_length_field_fails() {
        // element header cut short in the middle of the length field
        let data = &FLAT[..6];
        let mut reader = DataSetReader::new_with_ts_cs(
            &data[..],
            ts(),
            SpecificCharacterSet::Default,
        );
        assert!(reader.next().unwrap().is_err());
        // the stream is fused afterwards
        assert!(reader.next().is_none());
    }

    #[test]
    fn undefined_length_on_primitive_vr_fails() {
        #[rustfmt::skip]
        let data = [
            0x10u8, 0x00, 0x10, 0x00, b'U', b'N', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        let mut reader = DataSetReader::new_with_ts_cs(
            &data[..],
            ts(),
            SpecificCharacterSet::Default,
        );
        let err = reader.next().unwrap();
        assert!(matches!(err, Err(Error::UndefinedElementLength { .. })));
    }
}
