//! Name-keyed dictionaries for vendor proprietary sub-headers.
//!
//! The Siemens CSA header packs its own attribute list into the payload
//! of a single private OB element; those attributes are identified by
//! name. The entries below cover the attributes consulted in practice.

use rdcm_core::dictionary::{ValueMultiplicity, VendorDict, VendorDictEntry};
use rdcm_core::VR;

const ONE: ValueMultiplicity = ValueMultiplicity::Fixed(1);

fn v(name: &str, vr: VR, vm: ValueMultiplicity, description: &str) -> VendorDictEntry {
    VendorDictEntry {
        name: name.to_string(),
        vr,
        vm,
        description: description.to_string(),
    }
}

/// Build the CSA header attribute dictionary.
///
/// The attribute list is fixed, so every insertion is expected to
/// succeed; a duplicate would be a defect in the table itself.
pub fn csa_header_dict() -> VendorDict {
    let mut dict = VendorDict::new();
    let entries = [
        v("EchoLinePosition", VR::IS, ONE, "Echo line position"),
        v("EchoColumnPosition", VR::IS, ONE, "Echo column position"),
        v("EchoPartitionPosition", VR::IS, ONE, "Echo partition position"),
        v("UsedChannelMask", VR::UL, ONE, "Used channel mask"),
        v("Actual3DImaPartNumber", VR::IS, ONE, "Actual 3D image part number"),
        v("ICE_Dims", VR::LO, ONE, "ICE dimensions"),
        v("B_value", VR::IS, ONE, "Diffusion b-value"),
        v("Filter1", VR::IS, ONE, "Filter 1"),
        v("Filter2", VR::IS, ONE, "Filter 2"),
        v("ProtocolSliceNumber", VR::IS, ONE, "Protocol slice number"),
        v("RealDwellTime", VR::IS, ONE, "Real dwell time"),
        v("PixelFile", VR::UN, ONE, "Pixel file"),
        v("PixelFileName", VR::UN, ONE, "Pixel file name"),
        v("SliceMeasurementDuration", VR::DS, ONE, "Slice measurement duration"),
        v("SequenceMask", VR::UL, ONE, "Sequence mask"),
        v("AcquisitionMatrixText", VR::SH, ONE, "Acquisition matrix text"),
        v("MeasuredFourierLines", VR::IS, ONE, "Measured Fourier lines"),
        v(
            "FlowEncodingDirection",
            VR::IS,
            ONE,
            "Flow encoding direction",
        ),
        v(
            "NumberOfImagesInMosaic",
            VR::US,
            ONE,
            "Number of images in a mosaic frame",
        ),
        v(
            "DiffusionGradientDirection",
            VR::FD,
            ValueMultiplicity::Fixed(3),
            "Diffusion gradient direction vector",
        ),
        v(
            "SliceNormalVector",
            VR::FD,
            ValueMultiplicity::Fixed(3),
            "Slice normal vector",
        ),
        v("DiffusionDirectionality", VR::CS, ONE, "Diffusion directionality"),
        v(
            "TimeAfterStart",
            VR::DS,
            ONE,
            "Acquisition time offset from series start",
        ),
        v(
            "MosaicRefAcqTimes",
            VR::FD,
            ValueMultiplicity::AtLeast(1),
            "Per-slice acquisition times of a mosaic frame",
        ),
        v(
            "BandwidthPerPixelPhaseEncode",
            VR::FD,
            ONE,
            "Bandwidth per pixel in the phase encode direction",
        ),
    ];
    for entry in entries {
        dict.add(entry)
            .unwrap_or_else(|e| panic!("CSA header table is inconsistent: {}", e));
    }
    dict
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csa_dict_loads_and_resolves() {
        let dict = csa_header_dict();
        assert!(!dict.is_empty());
        assert_eq!(dict.entry("B_value").unwrap().vr, VR::IS);
        assert_eq!(
            dict.entry("DiffusionGradientDirection").unwrap().vr,
            VR::FD
        );
        assert!(dict.entry("NotACsaAttribute").is_err());
    }
}
