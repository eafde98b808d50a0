//! Module containing the transfer syntax specifier.
//!
//! Only the uncompressed syntaxes are built in:
//! the element grammar of every compressed syntax is the explicit VR
//! little endian one, with pixel data handled through the codec
//! boundary in [`adapters`](crate::adapters).

use crate::decode::basic::BasicDecoder;

pub use byteordered::Endianness;

/// A DICOM transfer syntax specifier:
/// byte order plus explicitness of the value representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransferSyntax {
    /// 1.2.840.10008.1.2
    ImplicitVRLittleEndian,
    /// 1.2.840.10008.1.2.1
    ExplicitVRLittleEndian,
    /// 1.2.840.10008.1.2.2 (retired, still encountered in archives)
    ExplicitVRBigEndian,
}

impl TransferSyntax {
    /// Resolve a transfer syntax from its unique identifier,
    /// tolerating the trailing NUL or space padding
    /// the meta group value may carry.
    pub fn from_uid(uid: &str) -> Option<Self> {
        match uid.trim_end_matches(['\0', ' ']) {
            "1.2.840.10008.1.2" => Some(TransferSyntax::ImplicitVRLittleEndian),
            "1.2.840.10008.1.2.1" => Some(TransferSyntax::ExplicitVRLittleEndian),
            "1.2.840.10008.1.2.2" => Some(TransferSyntax::ExplicitVRBigEndian),
            _ => None,
        }
    }

    /// The unique identifier of the transfer syntax.
    pub fn uid(self) -> &'static str {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => "1.2.840.10008.1.2",
            TransferSyntax::ExplicitVRLittleEndian => "1.2.840.10008.1.2.1",
            TransferSyntax::ExplicitVRBigEndian => "1.2.840.10008.1.2.2",
        }
    }

    /// The name of the transfer syntax.
    pub fn name(self) -> &'static str {
        match self {
            TransferSyntax::ImplicitVRLittleEndian => "Implicit VR Little Endian",
            TransferSyntax::ExplicitVRLittleEndian => "Explicit VR Little Endian",
            TransferSyntax::ExplicitVRBigEndian => "Explicit VR Big Endian",
        }
    }

    /// The byte order of data.
    pub fn endianness(self) -> Endianness {
        match self {
            TransferSyntax::ExplicitVRBigEndian => Endianness::Big,
            _ => Endianness::Little,
        }
    }

    /// Whether the transfer syntax mandates an explicit value
    /// representation, or the VR is implicit.
    pub fn explicit_vr(self) -> bool {
        !matches!(self, TransferSyntax::ImplicitVRLittleEndian)
    }

    /// Obtain a basic decoder matching the syntax's byte order.
    pub fn basic_decoder(self) -> BasicDecoder {
        BasicDecoder::from(self.endianness())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_resolution_trims_padding() {
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.1\0"),
            Some(TransferSyntax::ExplicitVRLittleEndian)
        );
        assert_eq!(TransferSyntax::from_uid("1.2.840.10008.1.2.4.50"), None);
    }

    #[test]
    fn syntax_properties() {
        let ts = TransferSyntax::ImplicitVRLittleEndian;
        assert!(!ts.explicit_vr());
        assert_eq!(ts.endianness(), Endianness::Little);
        assert_eq!(
            TransferSyntax::ExplicitVRBigEndian.endianness(),
            Endianness::Big
        );
        for ts in [
            TransferSyntax::ImplicitVRLittleEndian,
            TransferSyntax::ExplicitVRLittleEndian,
            TransferSyntax::ExplicitVRBigEndian,
        ] {
            assert_eq!(TransferSyntax::from_uid(ts.uid()), Some(ts));
        }
    }
}
