//! Private (vendor-reserved) attribute dictionaries.
//!
//! Vendors reserve blocks of odd-group elements at run time by writing a
//! private creator element; the attributes inside a block are therefore
//! identified by the creator string plus the low byte of the element
//! number, not by the raw tag alone.

use once_cell::sync::Lazy;
use rdcm_core::dictionary::ValueMultiplicity;
use rdcm_core::header::PrivateTag;
use rdcm_core::VR;
use std::collections::HashMap;

/// One attribute of a vendor-reserved element block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateDictEntry {
    /// The group the block lives in.
    pub group: u16,
    /// The element number within the reserved block (low byte).
    pub element_offset: u8,
    /// The reserving creator's identification string.
    pub creator: &'static str,
    /// Human-readable attribute name.
    pub alias: &'static str,
    /// The typical value representation of the attribute.
    pub vr: VR,
    /// The value multiplicity constraint.
    pub vm: ValueMultiplicity,
}

const ONE: ValueMultiplicity = ValueMultiplicity::Fixed(1);
const ONE_N: ValueMultiplicity = ValueMultiplicity::AtLeast(1);

const fn p(
    group: u16,
    element_offset: u8,
    creator: &'static str,
    alias: &'static str,
    vr: VR,
    vm: ValueMultiplicity,
) -> PrivateDictEntry {
    PrivateDictEntry {
        group,
        element_offset,
        creator,
        alias,
        vr,
        vm,
    }
}

/// Registered private attribute entries, by creator.
#[rustfmt::skip]
pub const PRIVATE_ENTRIES: &[PrivateDictEntry] = &[
    p(0x0029, 0x08, "SIEMENS CSA HEADER", "CSAImageHeaderType", VR::CS, ONE),
    p(0x0029, 0x09, "SIEMENS CSA HEADER", "CSAImageHeaderVersion", VR::LO, ONE),
    p(0x0029, 0x10, "SIEMENS CSA HEADER", "CSAImageHeaderInfo", VR::OB, ONE),
    p(0x0029, 0x18, "SIEMENS CSA HEADER", "CSASeriesHeaderType", VR::CS, ONE),
    p(0x0029, 0x19, "SIEMENS CSA HEADER", "CSASeriesHeaderVersion", VR::LO, ONE),
    p(0x0029, 0x20, "SIEMENS CSA HEADER", "CSASeriesHeaderInfo", VR::OB, ONE),
    p(0x0029, 0x08, "SIEMENS MEDCOM HEADER", "MedComHeaderType", VR::CS, ONE),
    p(0x0029, 0x09, "SIEMENS MEDCOM HEADER", "MedComHeaderVersion", VR::LO, ONE),
    p(0x0029, 0x10, "SIEMENS MEDCOM HEADER", "MedComHeaderInfo", VR::OB, ONE),
    p(0x0019, 0x0C, "SIEMENS MR HEADER", "BValue", VR::IS, ONE),
    p(0x0019, 0x0E, "SIEMENS MR HEADER", "DiffusionGradientDirection", VR::FD, ValueMultiplicity::Fixed(3)),
    p(0x0051, 0x08, "SIEMENS MR HEADER", "AcquisitionMatrixText", VR::SH, ONE),
    p(0x0019, 0x23, "GEMS_ACQU_01", "TableSpeed", VR::DS, ONE),
    p(0x0019, 0x24, "GEMS_ACQU_01", "MidScanTime", VR::DS, ONE),
    p(0x0019, 0x27, "GEMS_ACQU_01", "RotationSpeed", VR::DS, ONE),
    p(0x0043, 0x27, "GEMS_PARM_01", "ScanPitchRatio", VR::SH, ONE),
    p(0x0045, 0x01, "GEMS_HELIOS_01", "NumberOfMacroRowsInDetector", VR::SS, ONE),
    p(0x2001, 0x03, "Philips Imaging DD 001", "DiffusionBFactor", VR::FL, ONE),
    p(0x2001, 0x08, "Philips Imaging DD 001", "PhaseNumber", VR::IS, ONE),
    p(0x2001, 0x0A, "Philips Imaging DD 001", "SliceNumber", VR::IS, ONE),
    p(0x2005, 0x0D, "Philips MR Imaging DD 001", "ScaleIntercept", VR::FL, ONE),
    p(0x2005, 0x0E, "Philips MR Imaging DD 001", "ScaleSlope", VR::FL, ONE),
    p(0x7053, 0x00, "Philips PET Private Group", "SUVFactor", VR::DS, ONE),
    p(0x0009, 0x01, "ELSCINT1", "TamarCompressionType", VR::CS, ONE_N),
];

/// Creator-keyed lookup over [`PRIVATE_ENTRIES`].
#[derive(Debug)]
pub struct PrivateDictionary {
    by_creator: HashMap<&'static str, HashMap<(u16, u8), &'static PrivateDictEntry>>,
}

static DICT: Lazy<PrivateDictionary> = Lazy::new(|| {
    let mut by_creator: HashMap<&'static str, HashMap<(u16, u8), &'static PrivateDictEntry>> =
        HashMap::new();
    for entry in PRIVATE_ENTRIES {
        by_creator
            .entry(entry.creator)
            .or_default()
            .insert((entry.group, entry.element_offset), entry);
    }
    PrivateDictionary { by_creator }
});

/// Retrieve a singleton instance of the private dictionary.
#[inline]
pub fn registry() -> &'static PrivateDictionary {
    &DICT
}

impl PrivateDictionary {
    /// Resolve a creator-qualified tag into its entry, if registered.
    ///
    /// The block byte of the element number is the part reserved
    /// at run time, so only the low byte participates in the match.
    pub fn get(&self, tag: &PrivateTag) -> Option<&'static PrivateDictEntry> {
        self.by_creator
            .get(tag.creator())?
            .get(&(tag.tag().group(), tag.element_offset()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::header::Tag;

    #[test]
    fn csa_header_block_resolves_regardless_of_block_byte() {
        let dict = registry();
        // reserved into block 0x10
        let t = PrivateTag::new(Tag(0x0029, 0x1010), "SIEMENS CSA HEADER");
        assert_eq!(dict.get(&t).unwrap().alias, "CSAImageHeaderInfo");
        // same attribute reserved into block 0x11
        let t = PrivateTag::new(Tag(0x0029, 0x1110), "SIEMENS CSA HEADER");
        assert_eq!(dict.get(&t).unwrap().alias, "CSAImageHeaderInfo");
    }

    #[test]
    fn creator_disambiguates() {
        let dict = registry();
        let csa = PrivateTag::new(Tag(0x0029, 0x1008), "SIEMENS CSA HEADER");
        let medcom = PrivateTag::new(Tag(0x0029, 0x1008), "SIEMENS MEDCOM HEADER");
        assert_eq!(dict.get(&csa).unwrap().alias, "CSAImageHeaderType");
        assert_eq!(dict.get(&medcom).unwrap().alias, "MedComHeaderType");
        let unknown = PrivateTag::new(Tag(0x0029, 0x1008), "ACME INTERNAL");
        assert!(dict.get(&unknown).is_none());
    }
}
