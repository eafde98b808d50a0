//! Module containing data structures and readers of DICOM file meta
//! information tables.
//!
//! The file meta group is always encoded in Explicit VR Little Endian,
//! regardless of the transfer syntax it declares for the rest of the
//! file, and is bounded by its own group length element.

use byteordered::byteorder::{ByteOrder, LittleEndian};
use rdcm_core::header::{HasLength, Header, Length};
use rdcm_core::{Tag, VR};
use rdcm_encoding::decode::{self, Decode};
use rdcm_encoding::encode::explicit_le::ExplicitVRLittleEndianEncoder;
use rdcm_encoding::encode::Encode;
use rdcm_encoding::text::{DefaultCharacterSetCodec, TextCodec};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{Read, Write};

const DICM_MAGIC_CODE: [u8; 4] = [b'D', b'I', b'C', b'M'];

/// Module-level error type for file meta group reading and writing.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The file meta group parser could not read
    /// the magic code `DICM` from its source.
    #[snafu(display("Could not start reading DICOM data"))]
    ReadMagicCode {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The file meta group parser could not fetch
    /// the value of a data element from its source.
    #[snafu(display("Could not read data value"))]
    ReadValueData {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The file meta group parser could not decode
    /// the text in one of its data elements.
    #[snafu(display("Could not decode text in {}", name))]
    DecodeText {
        name: &'static str,
        #[snafu(backtrace)]
        source: rdcm_encoding::text::DecodeTextError,
    },

    /// Invalid DICOM data, detected from checking the `DICM` code.
    #[snafu(display("Invalid DICOM data"))]
    NotDicom { backtrace: Backtrace },

    /// An issue occurred while decoding the next data element
    /// in the file meta data set.
    #[snafu(display("Could not decode data element"))]
    DecodeElement {
        #[snafu(backtrace)]
        source: rdcm_encoding::decode::Error,
    },

    /// A data element with an unexpected tag was retrieved:
    /// the parser was expecting another tag first,
    /// or at least one that is part of the file meta group.
    #[snafu(display("Unexpected data element tagged {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },

    /// A required file meta data element is missing.
    #[snafu(display("Missing data element `{}`", alias))]
    MissingElement {
        alias: &'static str,
        backtrace: Backtrace,
    },

    /// The value length of a data element in the file meta group
    /// was unexpected.
    #[snafu(display("Unexpected length {} for data element tagged {}", length, tag))]
    UnexpectedDataValueLength {
        tag: Tag,
        length: Length,
        backtrace: Backtrace,
    },

    /// The value length of a data element is undefined,
    /// but knowing the length is required in its context.
    #[snafu(display("Undefined value length for data element tagged {}", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },

    /// The file meta group could not be written to the destination.
    #[snafu(display("Could not write file meta group"))]
    WriteSet {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A data element could not be encoded.
    #[snafu(display("Could not encode data element"))]
    EncodeElement {
        #[snafu(backtrace)]
        source: rdcm_encoding::encode::Error,
    },
}

type Result<T> = std::result::Result<T, Error>;

/// DICOM File Meta Information Table.
///
/// This data type contains the relevant parts of the file meta
/// information table, as specified in PS3.10.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaTable {
    /// File Meta Information Group Length
    pub information_group_length: u32,
    /// File Meta Information Version
    pub information_version: [u8; 2],
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: String,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: String,
    /// Transfer Syntax UID
    pub transfer_syntax: String,
    /// Implementation Class UID
    pub implementation_class_uid: String,
    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
    /// Source Application Entity Title
    pub source_application_entity_title: Option<String>,
}

/// Utility function for reading the body of a DICOM element as a string.
fn read_str_body<S, T>(
    source: &mut S,
    text: &T,
    group_length_remaining: &mut u32,
    header_len: u32,
    len: u32,
) -> Result<String>
where
    S: Read,
    T: TextCodec,
{
    let mut v = vec![0; len as usize];
    source.read_exact(&mut v).context(ReadValueDataSnafu)?;
    *group_length_remaining = group_length_remaining
        .saturating_sub(header_len + len);
    text.decode(&v).context(DecodeTextSnafu { name: text.name() })
}

impl FileMetaTable {
    /// Read a file meta table from the given source,
    /// which must be positioned at the `DICM` magic code
    /// (past the 128-byte preamble, if any).
    pub fn from_reader<R: Read>(file: R) -> Result<Self> {
        FileMetaTable::read_from(file)
    }

    /// The transfer syntax UID with trailing padding removed.
    pub fn transfer_syntax_uid(&self) -> &str {
        self.transfer_syntax.trim_end_matches(['\0', ' '])
    }

    /// Fetch the value of a meta group element by tag,
    /// in its raw string form (padding included),
    /// for the elements with a textual representation.
    pub fn element_value(&self, tag: Tag) -> Option<&str> {
        match tag {
            Tag(0x0002, 0x0002) => Some(&self.media_storage_sop_class_uid),
            Tag(0x0002, 0x0003) => Some(&self.media_storage_sop_instance_uid),
            Tag(0x0002, 0x0010) => Some(&self.transfer_syntax),
            Tag(0x0002, 0x0012) => Some(&self.implementation_class_uid),
            Tag(0x0002, 0x0013) => self.implementation_version_name.as_deref(),
            Tag(0x0002, 0x0016) => self.source_application_entity_title.as_deref(),
            _ => None,
        }
    }

    fn read_from<S: Read>(mut file: S) -> Result<Self> {
        let mut buff: [u8; 4] = [0; 4];
        {
            // check magic code
            file.read_exact(&mut buff).context(ReadMagicCodeSnafu)?;
            ensure!(buff == DICM_MAGIC_CODE, NotDicomSnafu);
        }

        let decoder = decode::file_header_decoder();
        let text = DefaultCharacterSetCodec;

        let group_length: u32 = {
            let (elem, _) = decoder.decode_header(&mut file).context(DecodeElementSnafu)?;
            ensure!(
                elem.tag() == Tag(0x0002, 0x0000),
                UnexpectedTagSnafu { tag: elem.tag() }
            );
            ensure!(
                elem.length() == Length(4),
                UnexpectedDataValueLengthSnafu {
                    tag: elem.tag(),
                    length: elem.length(),
                }
            );
            let mut buff: [u8; 4] = [0; 4];
            file.read_exact(&mut buff).context(ReadValueDataSnafu)?;
            LittleEndian::read_u32(&buff)
        };

        let mut group_length_remaining = group_length;
        let mut builder = FileMetaTableBuilder::new().group_length(group_length);

        while group_length_remaining > 0 {
            let (elem, header_len) =
                decoder.decode_header(&mut file).context(DecodeElementSnafu)?;
            let header_len = header_len as u32;
            let elem_len = elem
                .length()
                .get()
                .context(UndefinedValueLengthSnafu { tag: elem.tag() })?;
            builder = match elem.tag() {
                Tag(0x0002, 0x0001) => {
                    // File Meta Information Version
                    ensure!(
                        elem.length() == Length(2),
                        UnexpectedDataValueLengthSnafu {
                            tag: elem.tag(),
                            length: elem.length(),
                        }
                    );
                    let mut hbuf = [0u8; 2];
                    file.read_exact(&mut hbuf[..]).context(ReadValueDataSnafu)?;
                    group_length_remaining =
                        group_length_remaining.saturating_sub(header_len + 2);
                    builder.information_version(hbuf)
                }
                Tag(0x0002, 0x0002) => builder.media_storage_sop_class_uid(read_str_body(
                    &mut file,
                    &text,
                    &mut group_length_remaining,
                    header_len,
                    elem_len,
                )?),
                Tag(0x0002, 0x0003) => builder.media_storage_sop_instance_uid(read_str_body(
                    &mut file,
                    &text,
                    &mut group_length_remaining,
                    header_len,
                    elem_len,
                )?),
                Tag(0x0002, 0x0010) => builder.transfer_syntax(read_str_body(
                    &mut file,
                    &text,
                    &mut group_length_remaining,
                    header_len,
                    elem_len,
                )?),
                Tag(0x0002, 0x0012) => builder.implementation_class_uid(read_str_body(
                    &mut file,
                    &text,
                    &mut group_length_remaining,
                    header_len,
                    elem_len,
                )?),
                Tag(0x0002, 0x0013) => builder.implementation_version_name(read_str_body(
                    &mut file,
                    &text,
                    &mut group_length_remaining,
                    header_len,
                    elem_len,
                )?),
                Tag(0x0002, 0x0016) => builder.source_application_entity_title(read_str_body(
                    &mut file,
                    &text,
                    &mut group_length_remaining,
                    header_len,
                    elem_len,
                )?),
                tag => {
                    // unrecognized group 0002 element: skip over it
                    ensure!(tag.group() == 0x0002, UnexpectedTagSnafu { tag });
                    let mut v = vec![0; elem_len as usize];
                    file.read_exact(&mut v).context(ReadValueDataSnafu)?;
                    group_length_remaining =
                        group_length_remaining.saturating_sub(header_len + elem_len);
                    builder
                }
            };
        }

        builder.build()
    }

    /// Write the file meta group,
    /// starting with the `DICM` magic code,
    /// to the given destination.
    pub fn write_to<W: Write>(&self, mut to: W) -> Result<()> {
        let encoder = ExplicitVRLittleEndianEncoder::default();

        to.write_all(&DICM_MAGIC_CODE).context(WriteSetSnafu)?;

        let mut write_str = |to: &mut W, tag: Tag, vr: VR, value: &str| -> Result<()> {
            encoder
                .encode_element_header(
                    to,
                    rdcm_core::header::DataElementHeader::new(tag, vr, Length(value.len() as u32)),
                )
                .context(EncodeElementSnafu)?;
            to.write_all(value.as_bytes()).context(WriteSetSnafu)
        };

        encoder
            .encode_element_header(
                &mut to,
                rdcm_core::header::DataElementHeader::new(
                    Tag(0x0002, 0x0000),
                    VR::UL,
                    Length(4),
                ),
            )
            .context(EncodeElementSnafu)?;
        to.write_all(&self.information_group_length.to_le_bytes())
            .context(WriteSetSnafu)?;

        encoder
            .encode_element_header(
                &mut to,
                rdcm_core::header::DataElementHeader::new(
                    Tag(0x0002, 0x0001),
                    VR::OB,
                    Length(2),
                ),
            )
            .context(EncodeElementSnafu)?;
        to.write_all(&self.information_version).context(WriteSetSnafu)?;

        write_str(
            &mut to,
            Tag(0x0002, 0x0002),
            VR::UI,
            &self.media_storage_sop_class_uid,
        )?;
        write_str(
            &mut to,
            Tag(0x0002, 0x0003),
            VR::UI,
            &self.media_storage_sop_instance_uid,
        )?;
        write_str(&mut to, Tag(0x0002, 0x0010), VR::UI, &self.transfer_syntax)?;
        write_str(
            &mut to,
            Tag(0x0002, 0x0012),
            VR::UI,
            &self.implementation_class_uid,
        )?;
        if let Some(v) = &self.implementation_version_name {
            write_str(&mut to, Tag(0x0002, 0x0013), VR::SH, v)?;
        }
        if let Some(v) = &self.source_application_entity_title {
            write_str(&mut to, Tag(0x0002, 0x0016), VR::AE, v)?;
        }
        Ok(())
    }
}

/// A builder for a file meta information table.
///
/// String values are padded to an even length on [`build`](Self::build):
/// unique identifiers with a NUL byte, other texts with a space.
#[derive(Debug, Default, Clone)]
pub struct FileMetaTableBuilder {
    group_length: Option<u32>,
    information_version: Option<[u8; 2]>,
    media_storage_sop_class_uid: Option<String>,
    media_storage_sop_instance_uid: Option<String>,
    transfer_syntax: Option<String>,
    implementation_class_uid: Option<String>,
    implementation_version_name: Option<String>,
    source_application_entity_title: Option<String>,
}

fn pad_even(mut value: String, pad: char) -> String {
    if value.len() % 2 == 1 {
        value.push(pad);
    }
    value
}

impl FileMetaTableBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        FileMetaTableBuilder::default()
    }

    /// Define the file meta group length.
    /// When not given, it is computed on build.
    pub fn group_length(mut self, value: u32) -> Self {
        self.group_length = Some(value);
        self
    }

    /// Define the file meta information version.
    pub fn information_version(mut self, value: [u8; 2]) -> Self {
        self.information_version = Some(value);
        self
    }

    /// Define the media storage SOP class UID.
    pub fn media_storage_sop_class_uid<S: Into<String>>(mut self, value: S) -> Self {
        self.media_storage_sop_class_uid = Some(value.into());
        self
    }

    /// Define the media storage SOP instance UID.
    pub fn media_storage_sop_instance_uid<S: Into<String>>(mut self, value: S) -> Self {
        self.media_storage_sop_instance_uid = Some(value.into());
        self
    }

    /// Define the transfer syntax UID.
    pub fn transfer_syntax<S: Into<String>>(mut self, value: S) -> Self {
        self.transfer_syntax = Some(value.into());
        self
    }

    /// Define the implementation class UID.
    pub fn implementation_class_uid<S: Into<String>>(mut self, value: S) -> Self {
        self.implementation_class_uid = Some(value.into());
        self
    }

    /// Define the implementation version name.
    pub fn implementation_version_name<S: Into<String>>(mut self, value: S) -> Self {
        self.implementation_version_name = Some(value.into());
        self
    }

    /// Define the source application entity title.
    pub fn source_application_entity_title<S: Into<String>>(mut self, value: S) -> Self {
        self.source_application_entity_title = Some(value.into());
        self
    }

    /// Build the table, failing if a mandatory element is missing.
    pub fn build(self) -> Result<FileMetaTable> {
        let media_storage_sop_class_uid = pad_even(
            self.media_storage_sop_class_uid
                .context(MissingElementSnafu {
                    alias: "MediaStorageSOPClassUID",
                })?,
            '\0',
        );
        let media_storage_sop_instance_uid = pad_even(
            self.media_storage_sop_instance_uid
                .context(MissingElementSnafu {
                    alias: "MediaStorageSOPInstanceUID",
                })?,
            '\0',
        );
        let transfer_syntax = pad_even(
            self.transfer_syntax.context(MissingElementSnafu {
                alias: "TransferSyntaxUID",
            })?,
            '\0',
        );
        let implementation_class_uid = pad_even(
            self.implementation_class_uid.context(MissingElementSnafu {
                alias: "ImplementationClassUID",
            })?,
            '\0',
        );
        let implementation_version_name =
            self.implementation_version_name.map(|v| pad_even(v, ' '));
        let source_application_entity_title = self
            .source_application_entity_title
            .map(|v| pad_even(v, ' '));

        let information_version = self.information_version.unwrap_or([0x00, 0x01]);

        // group length: every element after (0002,0000) itself
        let mut length = 0u32;
        length += 12 + 2; // information version, OB long form header
        length += 8 + media_storage_sop_class_uid.len() as u32;
        length += 8 + media_storage_sop_instance_uid.len() as u32;
        length += 8 + transfer_syntax.len() as u32;
        length += 8 + implementation_class_uid.len() as u32;
        if let Some(v) = &implementation_version_name {
            length += 8 + v.len() as u32;
        }
        if let Some(v) = &source_application_entity_title {
            length += 8 + v.len() as u32;
        }
        let information_group_length = self.group_length.unwrap_or(length);

        Ok(FileMetaTable {
            information_group_length,
            information_version,
            media_storage_sop_class_uid,
            media_storage_sop_instance_uid,
            transfer_syntax,
            implementation_class_uid,
            implementation_version_name,
            source_application_entity_title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> FileMetaTable {
        FileMetaTableBuilder::new()
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
            .media_storage_sop_instance_uid("1.2.3.4.5.6")
            .transfer_syntax("1.2.840.10008.1.2.1")
            .implementation_class_uid("1.2.345.6.7890.1.234567890")
            .build()
            .unwrap()
    }

    #[test]
    fn builder_pads_odd_values() {
        let table = sample_table();
        assert_eq!(table.media_storage_sop_class_uid, "1.2.840.10008.5.1.4.1.1.4\0");
        assert_eq!(table.transfer_syntax, "1.2.840.10008.1.2.1\0");
        assert_eq!(table.transfer_syntax_uid(), "1.2.840.10008.1.2.1");
    }

    #[test]
    fn missing_transfer_syntax_fails() {
        let result = FileMetaTableBuilder::new()
            .media_storage_sop_class_uid("1.2")
            .media_storage_sop_instance_uid("1.2.3")
            .implementation_class_uid("1.2.3.4")
            .build();
        assert!(matches!(result, Err(Error::MissingElement { .. })));
    }

    #[test]
    fn meta_table_round_trips() {
        let table = sample_table();
        let mut encoded = Vec::new();
        table.write_to(&mut encoded).unwrap();
        let decoded = FileMetaTable::from_reader(&encoded[..]).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn bad_magic_code_is_not_dicom() {
        let data = b"NOPE....";
        assert!(matches!(
            FileMetaTable::from_reader(&data[..]),
            Err(Error::NotDicom { .. })
        ));
    }
}
