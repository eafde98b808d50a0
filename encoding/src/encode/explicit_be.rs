//! Explicit VR Big Endian encoding.

use crate::encode::basic::BigEndianBasicEncoder;
use crate::encode::{
    BasicEncode, Encode, Result, WriteItemHeaderSnafu, WriteLengthSnafu, WriteTagSnafu,
    WriteVrSnafu,
};
use byteordered::Endianness;
use rdcm_core::header::DataElementHeader;
use rdcm_core::{Tag, VR};
use snafu::ResultExt;
use std::io::Write;

/// A data element encoder for the Explicit VR Big Endian transfer syntax.
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRBigEndianEncoder {
    basic: BigEndianBasicEncoder,
}

impl BasicEncode for ExplicitVRBigEndianEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Big
    }

    fn encode_us<W>(&self, to: W, value: u16) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_us(to, value)
    }

    fn encode_ul<W>(&self, to: W, value: u32) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_ul(to, value)
    }

    fn encode_uv<W>(&self, to: W, value: u64) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_uv(to, value)
    }

    fn encode_ss<W>(&self, to: W, value: i16) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_ss(to, value)
    }

    fn encode_sl<W>(&self, to: W, value: i32) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_sl(to, value)
    }

    fn encode_sv<W>(&self, to: W, value: i64) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_sv(to, value)
    }

    fn encode_fl<W>(&self, to: W, value: f32) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_fl(to, value)
    }

    fn encode_fd<W>(&self, to: W, value: f64) -> std::io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_fd(to, value)
    }
}

impl Encode for ExplicitVRBigEndianEncoder {
    fn encode_tag<W>(&self, to: &mut W, tag: Tag) -> Result<()>
    where
        W: ?Sized + Write,
    {
        let mut buf = [0u8; 4];
        buf[0..2].copy_from_slice(&tag.group().to_be_bytes());
        buf[2..4].copy_from_slice(&tag.element().to_be_bytes());
        to.write_all(&buf).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, to: &mut W, de: DataElementHeader) -> Result<usize>
    where
        W: ?Sized + Write,
    {
        self.encode_tag(to, de.tag)?;
        to.write_all(&de.vr.to_bytes()).context(WriteVrSnafu)?;
        match de.vr {
            VR::AE
            | VR::AS
            | VR::AT
            | VR::CS
            | VR::DA
            | VR::DS
            | VR::DT
            | VR::FL
            | VR::FD
            | VR::IS
            | VR::LO
            | VR::LT
            | VR::PN
            | VR::SH
            | VR::SL
            | VR::SS
            | VR::ST
            | VR::TM
            | VR::UI
            | VR::UL
            | VR::US => {
                let len = de.len.0 as u16;
                to.write_all(&len.to_be_bytes()).context(WriteLengthSnafu)?;
                Ok(8)
            }
            _ => {
                to.write_all(&[0u8; 2]).context(WriteVrSnafu)?;
                to.write_all(&de.len.0.to_be_bytes())
                    .context(WriteLengthSnafu)?;
                Ok(12)
            }
        }
    }

    fn encode_item_header<W>(&self, to: &mut W, len: u32) -> Result<()>
    where
        W: ?Sized + Write,
    {
        self.encode_tag(to, Tag(0xFFFE, 0xE000))?;
        to.write_all(&len.to_be_bytes()).context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write,
    {
        self.encode_tag(to, Tag(0xFFFE, 0xE00D))?;
        to.write_all(&[0u8; 4]).context(WriteItemHeaderSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: ?Sized + Write,
    {
        self.encode_tag(to, Tag(0xFFFE, 0xE0DD))?;
        to.write_all(&[0u8; 4]).context(WriteItemHeaderSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::explicit_be::ExplicitVRBigEndianDecoder;
    use crate::decode::Decode;
    use rdcm_core::header::Length;
    use std::io::Cursor;

    #[test]
    fn header_round_trip() {
        let enc = ExplicitVRBigEndianEncoder::default();
        let dec = ExplicitVRBigEndianDecoder::default();

        let header = DataElementHeader::new(Tag(0x0028, 0x0011), VR::US, Length(2));
        let mut out = Vec::new();
        let n = enc.encode_element_header(&mut out, header).unwrap();
        let (decoded, m) = dec.decode_header(&mut Cursor::new(&out)).unwrap();
        assert_eq!(m, n);
        assert_eq!(decoded.tag, header.tag);
        assert_eq!(decoded.vr, header.vr);
        assert_eq!(decoded.len, header.len);
    }
}
