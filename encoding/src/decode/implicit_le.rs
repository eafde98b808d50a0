//! Implicit VR Little Endian decoding.
//!
//! The stream carries no VR symbol, so every element's representation
//! comes from a data dictionary lookup. Unknown attributes decode as UN.

use crate::decode::basic::LittleEndianBasicDecoder;
use crate::decode::{
    BadSequenceHeaderSnafu, BasicDecode, Decode, ReadHeaderTagSnafu, ReadItemHeaderSnafu,
    ReadLengthSnafu, ReadTagSnafu, Result,
};
use byteordered::byteorder::{ByteOrder, LittleEndian};
use rdcm_core::dictionary::{DataDictionary, DictionaryEntry};
use rdcm_core::header::{DataElementHeader, Length, SequenceItemHeader};
use rdcm_core::{Tag, VR};
use rdcm_dictionary_std::StandardDataDictionary;
use snafu::ResultExt;
use std::io::Read;

/// A data element decoder for the Implicit VR Little Endian transfer syntax,
/// which retrieves value representations from the data dictionary `D`.
#[derive(Debug, Default, Clone)]
pub struct ImplicitVRLittleEndianDecoder<D = StandardDataDictionary> {
    dict: D,
    basic: LittleEndianBasicDecoder,
}

impl ImplicitVRLittleEndianDecoder<StandardDataDictionary> {
    /// Create an implicit VR decoder
    /// backed by the standard attribute dictionary.
    pub fn with_std_dict() -> Self {
        ImplicitVRLittleEndianDecoder::default()
    }
}

impl<D> ImplicitVRLittleEndianDecoder<D>
where
    D: DataDictionary,
{
    /// Create an implicit VR decoder backed by the given dictionary.
    pub fn with_dict(dictionary: D) -> Self {
        ImplicitVRLittleEndianDecoder {
            dict: dictionary,
            basic: LittleEndianBasicDecoder,
        }
    }
}

impl<D> Decode for ImplicitVRLittleEndianDecoder<D>
where
    D: DataDictionary,
{
    fn decode_header<S>(&self, mut source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut source)
            .context(ReadHeaderTagSnafu)?;

        let mut buf = [0u8; 4];
        source.read_exact(&mut buf).context(ReadLengthSnafu)?;
        let len = LittleEndian::read_u32(&buf);

        if tag.group() == 0xFFFE {
            return Ok((DataElementHeader::new(tag, VR::UN, Length(len)), 8));
        }

        // the VR of the element is not in the data,
        // so it must come from the dictionary;
        // without an entry, UN is assumed,
        // except that an undefined length always implies a sequence
        let mut vr = self
            .dict
            .by_tag(tag)
            .map(|entry| entry.vr())
            .unwrap_or(VR::UN);
        if Length(len).is_undefined() && tag != Tag(0x7FE0, 0x0010) {
            vr = VR::SQ;
        }
        Ok((DataElementHeader::new(tag, vr, Length(len)), 8))
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 8];
        source.read_exact(&mut buf).context(ReadItemHeaderSnafu)?;
        let group = LittleEndian::read_u16(&buf[0..2]);
        let element = LittleEndian::read_u16(&buf[2..4]);
        let len = LittleEndian::read_u32(&buf[4..8]);

        SequenceItemHeader::new((group, element), Length(len)).context(BadSequenceHeaderSnafu)
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        let mut buf = [0u8; 4];
        source.read_exact(&mut buf).context(ReadTagSnafu)?;
        Ok(Tag(
            LittleEndian::read_u16(&buf[0..2]),
            LittleEndian::read_u16(&buf[2..4]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::ImplicitVRLittleEndianDecoder;
    use crate::decode::Decode;
    use rdcm_core::header::{HasLength, Header, Length};
    use rdcm_core::{Tag, VR};
    use std::io::{Cursor, Seek, SeekFrom};

    // (0008,0060) length 2, "MR"; (0010,0010) length 8, "Doe^John"
    #[rustfmt::skip]
    const RAW: &[u8] = &[
        0x08, 0x00, 0x60, 0x00,
        0x02, 0x00, 0x00, 0x00,
            b'M', b'R',
        0x10, 0x00, 0x10, 0x00,
        0x08, 0x00, 0x00, 0x00,
            b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
    ];

    #[test]
    fn vr_comes_from_the_dictionary() {
        let dec = ImplicitVRLittleEndianDecoder::with_std_dict();
        let mut cursor = Cursor::new(RAW);

        let (header, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(header.tag(), Tag(0x0008, 0x0060));
        assert_eq!(header.vr(), VR::CS);
        assert_eq!(header.length(), Length(2));
        assert_eq!(bytes_read, 8);
        cursor.seek(SeekFrom::Current(2)).unwrap();

        let (header, _) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(header.tag(), Tag(0x0010, 0x0010));
        assert_eq!(header.vr(), VR::PN);
    }

    #[test]
    fn unknown_attribute_decodes_as_un() {
        let dec = ImplicitVRLittleEndianDecoder::with_std_dict();
        #[rustfmt::skip]
        let raw = [
            0x08u8, 0x00, 0x00, 0xFF, // not in the dictionary
            0x04, 0x00, 0x00, 0x00,
        ];
        let (header, _) = dec.decode_header(&mut Cursor::new(&raw[..])).unwrap();
        assert_eq!(header.vr(), VR::UN);
        assert_eq!(header.length(), Length(4));
    }
}
