//! The raw table of standard attribute entries.
//!
//! Collected from the registry of DICOM data elements (PS3.6 part 6),
//! covering the attribute groups this toolkit consults at run time.
//! Repeating groups (overlays, curves) are recorded once with the
//! variable digits zeroed; the registry masks tags on lookup.

use rdcm_core::dictionary::{DictionaryEntryRef, ValueMultiplicity};
use rdcm_core::header::Tag;
use rdcm_core::VR;

const fn e(
    group: u16,
    elem: u16,
    alias: &'static str,
    vr: VR,
    vm: ValueMultiplicity,
) -> DictionaryEntryRef<'static> {
    DictionaryEntryRef {
        tag: Tag(group, elem),
        alias,
        vr,
        vm,
    }
}

const ONE: ValueMultiplicity = ValueMultiplicity::Fixed(1);
const TWO: ValueMultiplicity = ValueMultiplicity::Fixed(2);
const THREE: ValueMultiplicity = ValueMultiplicity::Fixed(3);
const SIX: ValueMultiplicity = ValueMultiplicity::Fixed(6);
const ONE_N: ValueMultiplicity = ValueMultiplicity::AtLeast(1);
const TWO_N: ValueMultiplicity = ValueMultiplicity::AtLeast(2);

/// All registered standard attribute entries.
#[rustfmt::skip]
pub const ENTRIES: &[DictionaryEntryRef<'static>] = &[
    // group 0002: file meta information
    e(0x0002, 0x0000, "FileMetaInformationGroupLength", VR::UL, ONE),
    e(0x0002, 0x0001, "FileMetaInformationVersion", VR::OB, ONE),
    e(0x0002, 0x0002, "MediaStorageSOPClassUID", VR::UI, ONE),
    e(0x0002, 0x0003, "MediaStorageSOPInstanceUID", VR::UI, ONE),
    e(0x0002, 0x0010, "TransferSyntaxUID", VR::UI, ONE),
    e(0x0002, 0x0012, "ImplementationClassUID", VR::UI, ONE),
    e(0x0002, 0x0013, "ImplementationVersionName", VR::SH, ONE),
    e(0x0002, 0x0016, "SourceApplicationEntityTitle", VR::AE, ONE),
    e(0x0002, 0x0017, "SendingApplicationEntityTitle", VR::AE, ONE),
    e(0x0002, 0x0018, "ReceivingApplicationEntityTitle", VR::AE, ONE),
    e(0x0002, 0x0100, "PrivateInformationCreatorUID", VR::UI, ONE),
    e(0x0002, 0x0102, "PrivateInformation", VR::OB, ONE),

    // group 0008: identification
    e(0x0008, 0x0005, "SpecificCharacterSet", VR::CS, ONE_N),
    e(0x0008, 0x0008, "ImageType", VR::CS, TWO_N),
    e(0x0008, 0x0012, "InstanceCreationDate", VR::DA, ONE),
    e(0x0008, 0x0013, "InstanceCreationTime", VR::TM, ONE),
    e(0x0008, 0x0014, "InstanceCreatorUID", VR::UI, ONE),
    e(0x0008, 0x0016, "SOPClassUID", VR::UI, ONE),
    e(0x0008, 0x0018, "SOPInstanceUID", VR::UI, ONE),
    e(0x0008, 0x0020, "StudyDate", VR::DA, ONE),
    e(0x0008, 0x0021, "SeriesDate", VR::DA, ONE),
    e(0x0008, 0x0022, "AcquisitionDate", VR::DA, ONE),
    e(0x0008, 0x0023, "ContentDate", VR::DA, ONE),
    e(0x0008, 0x002A, "AcquisitionDateTime", VR::DT, ONE),
    e(0x0008, 0x0030, "StudyTime", VR::TM, ONE),
    e(0x0008, 0x0031, "SeriesTime", VR::TM, ONE),
    e(0x0008, 0x0032, "AcquisitionTime", VR::TM, ONE),
    e(0x0008, 0x0033, "ContentTime", VR::TM, ONE),
    e(0x0008, 0x0050, "AccessionNumber", VR::SH, ONE),
    e(0x0008, 0x0052, "QueryRetrieveLevel", VR::CS, ONE),
    e(0x0008, 0x0054, "RetrieveAETitle", VR::AE, ONE_N),
    e(0x0008, 0x0056, "InstanceAvailability", VR::CS, ONE),
    e(0x0008, 0x0060, "Modality", VR::CS, ONE),
    e(0x0008, 0x0061, "ModalitiesInStudy", VR::CS, ONE_N),
    e(0x0008, 0x0064, "ConversionType", VR::CS, ONE),
    e(0x0008, 0x0068, "PresentationIntentType", VR::CS, ONE),
    e(0x0008, 0x0070, "Manufacturer", VR::LO, ONE),
    e(0x0008, 0x0080, "InstitutionName", VR::LO, ONE),
    e(0x0008, 0x0081, "InstitutionAddress", VR::ST, ONE),
    e(0x0008, 0x0090, "ReferringPhysicianName", VR::PN, ONE),
    e(0x0008, 0x0100, "CodeValue", VR::SH, ONE),
    e(0x0008, 0x0102, "CodingSchemeDesignator", VR::SH, ONE),
    e(0x0008, 0x0103, "CodingSchemeVersion", VR::SH, ONE),
    e(0x0008, 0x0104, "CodeMeaning", VR::LO, ONE),
    e(0x0008, 0x0201, "TimezoneOffsetFromUTC", VR::SH, ONE),
    e(0x0008, 0x1010, "StationName", VR::SH, ONE),
    e(0x0008, 0x1030, "StudyDescription", VR::LO, ONE),
    e(0x0008, 0x103E, "SeriesDescription", VR::LO, ONE),
    e(0x0008, 0x1040, "InstitutionalDepartmentName", VR::LO, ONE),
    e(0x0008, 0x1048, "PhysiciansOfRecord", VR::PN, ONE_N),
    e(0x0008, 0x1050, "PerformingPhysicianName", VR::PN, ONE_N),
    e(0x0008, 0x1060, "NameOfPhysiciansReadingStudy", VR::PN, ONE_N),
    e(0x0008, 0x1070, "OperatorsName", VR::PN, ONE_N),
    e(0x0008, 0x1080, "AdmittingDiagnosesDescription", VR::LO, ONE_N),
    e(0x0008, 0x1090, "ManufacturerModelName", VR::LO, ONE),
    e(0x0008, 0x1110, "ReferencedStudySequence", VR::SQ, ONE),
    e(0x0008, 0x1111, "ReferencedPerformedProcedureStepSequence", VR::SQ, ONE),
    e(0x0008, 0x1115, "ReferencedSeriesSequence", VR::SQ, ONE),
    e(0x0008, 0x1120, "ReferencedPatientSequence", VR::SQ, ONE),
    e(0x0008, 0x1140, "ReferencedImageSequence", VR::SQ, ONE),
    e(0x0008, 0x1150, "ReferencedSOPClassUID", VR::UI, ONE),
    e(0x0008, 0x1155, "ReferencedSOPInstanceUID", VR::UI, ONE),
    e(0x0008, 0x1160, "ReferencedFrameNumber", VR::IS, ONE_N),
    e(0x0008, 0x2111, "DerivationDescription", VR::ST, ONE),
    e(0x0008, 0x2112, "SourceImageSequence", VR::SQ, ONE),
    e(0x0008, 0x2218, "AnatomicRegionSequence", VR::SQ, ONE),
    e(0x0008, 0x9215, "DerivationCodeSequence", VR::SQ, ONE),

    // group 0010: patient
    e(0x0010, 0x0010, "PatientName", VR::PN, ONE),
    e(0x0010, 0x0020, "PatientID", VR::LO, ONE),
    e(0x0010, 0x0021, "IssuerOfPatientID", VR::LO, ONE),
    e(0x0010, 0x0030, "PatientBirthDate", VR::DA, ONE),
    e(0x0010, 0x0032, "PatientBirthTime", VR::TM, ONE),
    e(0x0010, 0x0040, "PatientSex", VR::CS, ONE),
    e(0x0010, 0x1000, "OtherPatientIDs", VR::LO, ONE_N),
    e(0x0010, 0x1001, "OtherPatientNames", VR::PN, ONE_N),
    e(0x0010, 0x1010, "PatientAge", VR::AS, ONE),
    e(0x0010, 0x1020, "PatientSize", VR::DS, ONE),
    e(0x0010, 0x1030, "PatientWeight", VR::DS, ONE),
    e(0x0010, 0x2160, "EthnicGroup", VR::SH, ONE),
    e(0x0010, 0x2180, "Occupation", VR::SH, ONE),
    e(0x0010, 0x21B0, "AdditionalPatientHistory", VR::LT, ONE),
    e(0x0010, 0x4000, "PatientComments", VR::LT, ONE),

    // group 0012: clinical trial
    e(0x0012, 0x0062, "PatientIdentityRemoved", VR::CS, ONE),
    e(0x0012, 0x0063, "DeidentificationMethod", VR::LO, ONE_N),

    // group 0018: acquisition
    e(0x0018, 0x0010, "ContrastBolusAgent", VR::LO, ONE),
    e(0x0018, 0x0015, "BodyPartExamined", VR::CS, ONE),
    e(0x0018, 0x0020, "ScanningSequence", VR::CS, ONE_N),
    e(0x0018, 0x0021, "SequenceVariant", VR::CS, ONE_N),
    e(0x0018, 0x0022, "ScanOptions", VR::CS, ONE_N),
    e(0x0018, 0x0023, "MRAcquisitionType", VR::CS, ONE),
    e(0x0018, 0x0024, "SequenceName", VR::SH, ONE),
    e(0x0018, 0x0050, "SliceThickness", VR::DS, ONE),
    e(0x0018, 0x0060, "KVP", VR::DS, ONE),
    e(0x0018, 0x0080, "RepetitionTime", VR::DS, ONE),
    e(0x0018, 0x0081, "EchoTime", VR::DS, ONE),
    e(0x0018, 0x0082, "InversionTime", VR::DS, ONE),
    e(0x0018, 0x0083, "NumberOfAverages", VR::DS, ONE),
    e(0x0018, 0x0084, "ImagingFrequency", VR::DS, ONE),
    e(0x0018, 0x0085, "ImagedNucleus", VR::SH, ONE),
    e(0x0018, 0x0086, "EchoNumbers", VR::IS, ONE_N),
    e(0x0018, 0x0087, "MagneticFieldStrength", VR::DS, ONE),
    e(0x0018, 0x0088, "SpacingBetweenSlices", VR::DS, ONE),
    e(0x0018, 0x0089, "NumberOfPhaseEncodingSteps", VR::IS, ONE),
    e(0x0018, 0x0090, "DataCollectionDiameter", VR::DS, ONE),
    e(0x0018, 0x0091, "EchoTrainLength", VR::IS, ONE),
    e(0x0018, 0x0093, "PercentSampling", VR::DS, ONE),
    e(0x0018, 0x0094, "PercentPhaseFieldOfView", VR::DS, ONE),
    e(0x0018, 0x0095, "PixelBandwidth", VR::DS, ONE),
    e(0x0018, 0x1000, "DeviceSerialNumber", VR::LO, ONE),
    e(0x0018, 0x1016, "SecondaryCaptureDeviceManufacturer", VR::LO, ONE),
    e(0x0018, 0x1020, "SoftwareVersions", VR::LO, ONE_N),
    e(0x0018, 0x1030, "ProtocolName", VR::LO, ONE),
    e(0x0018, 0x1050, "SpatialResolution", VR::DS, ONE),
    e(0x0018, 0x1060, "TriggerTime", VR::DS, ONE),
    e(0x0018, 0x1088, "HeartRate", VR::IS, ONE),
    e(0x0018, 0x1090, "CardiacNumberOfImages", VR::IS, ONE),
    e(0x0018, 0x1094, "TriggerWindow", VR::IS, ONE),
    e(0x0018, 0x1100, "ReconstructionDiameter", VR::DS, ONE),
    e(0x0018, 0x1110, "DistanceSourceToDetector", VR::DS, ONE),
    e(0x0018, 0x1111, "DistanceSourceToPatient", VR::DS, ONE),
    e(0x0018, 0x1120, "GantryDetectorTilt", VR::DS, ONE),
    e(0x0018, 0x1130, "TableHeight", VR::DS, ONE),
    e(0x0018, 0x1140, "RotationDirection", VR::CS, ONE),
    e(0x0018, 0x1150, "ExposureTime", VR::IS, ONE),
    e(0x0018, 0x1151, "XRayTubeCurrent", VR::IS, ONE),
    e(0x0018, 0x1152, "Exposure", VR::IS, ONE),
    e(0x0018, 0x1160, "FilterType", VR::SH, ONE),
    e(0x0018, 0x1170, "GeneratorPower", VR::IS, ONE),
    e(0x0018, 0x1190, "FocalSpots", VR::DS, ONE_N),
    e(0x0018, 0x1200, "DateOfLastCalibration", VR::DA, ONE_N),
    e(0x0018, 0x1201, "TimeOfLastCalibration", VR::TM, ONE_N),
    e(0x0018, 0x1210, "ConvolutionKernel", VR::SH, ONE_N),
    e(0x0018, 0x1250, "ReceiveCoilName", VR::SH, ONE),
    e(0x0018, 0x1251, "TransmitCoilName", VR::SH, ONE),
    e(0x0018, 0x1310, "AcquisitionMatrix", VR::US, ValueMultiplicity::Fixed(4)),
    e(0x0018, 0x1312, "InPlanePhaseEncodingDirection", VR::CS, ONE),
    e(0x0018, 0x1314, "FlipAngle", VR::DS, ONE),
    e(0x0018, 0x1315, "VariableFlipAngleFlag", VR::CS, ONE),
    e(0x0018, 0x1316, "SAR", VR::DS, ONE),
    e(0x0018, 0x1318, "dBdt", VR::DS, ONE),
    e(0x0018, 0x5100, "PatientPosition", VR::CS, ONE),
    e(0x0018, 0x6011, "SequenceOfUltrasoundRegions", VR::SQ, ONE),
    e(0x0018, 0x6012, "RegionSpatialFormat", VR::US, ONE),
    e(0x0018, 0x6014, "RegionDataType", VR::US, ONE),
    e(0x0018, 0x6016, "RegionFlags", VR::UL, ONE),
    e(0x0018, 0x6018, "RegionLocationMinX0", VR::UL, ONE),
    e(0x0018, 0x601A, "RegionLocationMinY0", VR::UL, ONE),
    e(0x0018, 0x601C, "RegionLocationMaxX1", VR::UL, ONE),
    e(0x0018, 0x601E, "RegionLocationMaxY1", VR::UL, ONE),
    e(0x0018, 0x6024, "PhysicalUnitsXDirection", VR::US, ONE),
    e(0x0018, 0x6026, "PhysicalUnitsYDirection", VR::US, ONE),
    e(0x0018, 0x602C, "PhysicalDeltaX", VR::FD, ONE),
    e(0x0018, 0x602E, "PhysicalDeltaY", VR::FD, ONE),
    e(0x0018, 0x9087, "DiffusionBValue", VR::FD, ONE),

    // group 0020: relationship
    e(0x0020, 0x000D, "StudyInstanceUID", VR::UI, ONE),
    e(0x0020, 0x000E, "SeriesInstanceUID", VR::UI, ONE),
    e(0x0020, 0x0010, "StudyID", VR::SH, ONE),
    e(0x0020, 0x0011, "SeriesNumber", VR::IS, ONE),
    e(0x0020, 0x0012, "AcquisitionNumber", VR::IS, ONE),
    e(0x0020, 0x0013, "InstanceNumber", VR::IS, ONE),
    e(0x0020, 0x0020, "PatientOrientation", VR::CS, TWO),
    e(0x0020, 0x0032, "ImagePositionPatient", VR::DS, THREE),
    e(0x0020, 0x0037, "ImageOrientationPatient", VR::DS, SIX),
    e(0x0020, 0x0052, "FrameOfReferenceUID", VR::UI, ONE),
    e(0x0020, 0x0060, "Laterality", VR::CS, ONE),
    e(0x0020, 0x0100, "TemporalPositionIdentifier", VR::IS, ONE),
    e(0x0020, 0x0105, "NumberOfTemporalPositions", VR::IS, ONE),
    e(0x0020, 0x1002, "ImagesInAcquisition", VR::IS, ONE),
    e(0x0020, 0x1040, "PositionReferenceIndicator", VR::LO, ONE),
    e(0x0020, 0x1041, "SliceLocation", VR::DS, ONE),
    e(0x0020, 0x4000, "ImageComments", VR::LT, ONE),
    e(0x0020, 0x9056, "StackID", VR::SH, ONE),
    e(0x0020, 0x9057, "InStackPositionNumber", VR::UL, ONE),
    e(0x0020, 0x9113, "PlanePositionSequence", VR::SQ, ONE),
    e(0x0020, 0x9116, "PlaneOrientationSequence", VR::SQ, ONE),

    // group 0028: image presentation
    e(0x0028, 0x0002, "SamplesPerPixel", VR::US, ONE),
    e(0x0028, 0x0004, "PhotometricInterpretation", VR::CS, ONE),
    e(0x0028, 0x0006, "PlanarConfiguration", VR::US, ONE),
    e(0x0028, 0x0008, "NumberOfFrames", VR::IS, ONE),
    e(0x0028, 0x0009, "FrameIncrementPointer", VR::AT, ONE_N),
    e(0x0028, 0x0010, "Rows", VR::US, ONE),
    e(0x0028, 0x0011, "Columns", VR::US, ONE),
    e(0x0028, 0x0030, "PixelSpacing", VR::DS, TWO),
    e(0x0028, 0x0034, "PixelAspectRatio", VR::IS, TWO),
    e(0x0028, 0x0100, "BitsAllocated", VR::US, ONE),
    e(0x0028, 0x0101, "BitsStored", VR::US, ONE),
    e(0x0028, 0x0102, "HighBit", VR::US, ONE),
    e(0x0028, 0x0103, "PixelRepresentation", VR::US, ONE),
    e(0x0028, 0x0106, "SmallestImagePixelValue", VR::US, ONE),
    e(0x0028, 0x0107, "LargestImagePixelValue", VR::US, ONE),
    e(0x0028, 0x0120, "PixelPaddingValue", VR::US, ONE),
    e(0x0028, 0x0301, "BurnedInAnnotation", VR::CS, ONE),
    e(0x0028, 0x1050, "WindowCenter", VR::DS, ONE_N),
    e(0x0028, 0x1051, "WindowWidth", VR::DS, ONE_N),
    e(0x0028, 0x1052, "RescaleIntercept", VR::DS, ONE),
    e(0x0028, 0x1053, "RescaleSlope", VR::DS, ONE),
    e(0x0028, 0x1054, "RescaleType", VR::LO, ONE),
    e(0x0028, 0x1055, "WindowCenterWidthExplanation", VR::LO, ONE_N),
    e(0x0028, 0x1101, "RedPaletteColorLookupTableDescriptor", VR::US, THREE),
    e(0x0028, 0x1102, "GreenPaletteColorLookupTableDescriptor", VR::US, THREE),
    e(0x0028, 0x1103, "BluePaletteColorLookupTableDescriptor", VR::US, THREE),
    e(0x0028, 0x1201, "RedPaletteColorLookupTableData", VR::OW, ONE),
    e(0x0028, 0x1202, "GreenPaletteColorLookupTableData", VR::OW, ONE),
    e(0x0028, 0x1203, "BluePaletteColorLookupTableData", VR::OW, ONE),
    e(0x0028, 0x2110, "LossyImageCompression", VR::CS, ONE),
    e(0x0028, 0x2112, "LossyImageCompressionRatio", VR::DS, ONE_N),
    e(0x0028, 0x2114, "LossyImageCompressionMethod", VR::CS, ONE_N),

    // group 0032: study
    e(0x0032, 0x1032, "RequestingPhysician", VR::PN, ONE),
    e(0x0032, 0x1060, "RequestedProcedureDescription", VR::LO, ONE),
    e(0x0032, 0x4000, "StudyComments", VR::LT, ONE),

    // group 0040: procedure step
    e(0x0040, 0x0244, "PerformedProcedureStepStartDate", VR::DA, ONE),
    e(0x0040, 0x0245, "PerformedProcedureStepStartTime", VR::TM, ONE),
    e(0x0040, 0x0253, "PerformedProcedureStepID", VR::SH, ONE),
    e(0x0040, 0x0254, "PerformedProcedureStepDescription", VR::LO, ONE),
    e(0x0040, 0x0260, "PerformedProtocolCodeSequence", VR::SQ, ONE),
    e(0x0040, 0x0275, "RequestAttributesSequence", VR::SQ, ONE),
    e(0x0040, 0xA124, "UID", VR::UI, ONE),

    // group 0054: nuclear medicine
    e(0x0054, 0x0081, "NumberOfSlices", VR::US, ONE),
    e(0x0054, 0x1000, "SeriesType", VR::CS, TWO),
    e(0x0054, 0x1330, "ImageIndex", VR::US, ONE),

    // repeating group 50xx: curves (retired, still encountered)
    e(0x5000, 0x0005, "CurveDimensions", VR::US, ONE),
    e(0x5000, 0x0010, "NumberOfPoints", VR::US, ONE),
    e(0x5000, 0x0020, "TypeOfData", VR::CS, ONE),
    e(0x5000, 0x0103, "DataValueRepresentation", VR::US, ONE),
    e(0x5000, 0x3000, "CurveData", VR::OB, ONE),

    // repeating group 60xx: overlays
    e(0x6000, 0x0010, "OverlayRows", VR::US, ONE),
    e(0x6000, 0x0011, "OverlayColumns", VR::US, ONE),
    e(0x6000, 0x0015, "NumberOfFramesInOverlay", VR::IS, ONE),
    e(0x6000, 0x0022, "OverlayDescription", VR::LO, ONE),
    e(0x6000, 0x0040, "OverlayType", VR::CS, ONE),
    e(0x6000, 0x0050, "OverlayOrigin", VR::SS, TWO),
    e(0x6000, 0x0100, "OverlayBitsAllocated", VR::US, ONE),
    e(0x6000, 0x0102, "OverlayBitPosition", VR::US, ONE),
    e(0x6000, 0x3000, "OverlayData", VR::OB, ONE),

    // group 7FE0: pixel data
    e(0x7FE0, 0x0008, "FloatPixelData", VR::OF, ONE),
    e(0x7FE0, 0x0009, "DoubleFloatPixelData", VR::OD, ONE),
    e(0x7FE0, 0x0010, "PixelData", VR::OW, ONE),

    // data set trailing padding
    e(0xFFFC, 0xFFFC, "DataSetTrailingPadding", VR::OB, ONE),
];
