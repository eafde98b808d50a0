//! End-to-end scanning workflows over synthetic files on disk.

use rdcm_core::header::{DataElementHeader, Length, PrivateTag, Tag};
use rdcm_core::{PrimitiveValue, VR};
use rdcm_encoding::transfer_syntax::TransferSyntax;
use rdcm_object::FileMetaTableBuilder;
use rdcm_parser::dataset::DataToken;
use rdcm_parser::DataSetWriter;
use rdcm_scanner::observer::RecordingObserver;
use rdcm_scanner::Scanner;
use std::path::{Path, PathBuf};

const MODALITY: Tag = Tag(0x0008, 0x0060);
const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);

fn str_element(tokens: &mut Vec<DataToken>, tag: Tag, vr: VR, value: &str) {
    tokens.push(DataToken::ElementHeader(DataElementHeader::new(
        tag,
        vr,
        Length(value.len() as u32),
    )));
    tokens.push(DataToken::PrimitiveValue(PrimitiveValue::from(value)));
}

/// Write a synthetic explicit VR little endian file with the given
/// modality and patient name, a private creator reservation, and one
/// private CSA header type element.
fn write_file(dir: &Path, name: &str, modality: &str, patient: &str) -> PathBuf {
    let path = dir.join(name);
    let meta = FileMetaTableBuilder::new()
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
        .media_storage_sop_instance_uid("1.2.3.4")
        .transfer_syntax(TransferSyntax::ExplicitVRLittleEndian.uid())
        .implementation_class_uid("1.2.345.6.7890")
        .build()
        .unwrap();

    let mut out = vec![0u8; 128];
    meta.write_to(&mut out).unwrap();

    let mut tokens = Vec::new();
    str_element(&mut tokens, MODALITY, VR::CS, modality);
    str_element(&mut tokens, PATIENT_NAME, VR::PN, patient);
    str_element(
        &mut tokens,
        Tag(0x0029, 0x0010),
        VR::LO,
        "SIEMENS CSA HEADER",
    );
    str_element(&mut tokens, Tag(0x0029, 0x1008), VR::CS, "IMAGE NUM 4 ");

    let mut writer = DataSetWriter::new_with_ts(Vec::new(), TransferSyntax::ExplicitVRLittleEndian);
    writer.write_sequence(tokens).unwrap();
    out.extend_from_slice(&writer.into_inner());
    std::fs::write(&path, &out).unwrap();
    path
}

/// A file that fails the structural check:
/// valid preamble and meta group, then an element whose declared
/// length runs past the end of the file.
fn write_corrupt_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let meta = FileMetaTableBuilder::new()
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
        .media_storage_sop_instance_uid("1.2.3.4")
        .transfer_syntax(TransferSyntax::ExplicitVRLittleEndian.uid())
        .implementation_class_uid("1.2.345.6.7890")
        .build()
        .unwrap();
    let mut out = vec![0u8; 128];
    meta.write_to(&mut out).unwrap();
    // (0008,0060) CS declares 100 value bytes, only 2 are present
    out.extend_from_slice(&[0x08, 0x00, 0x60, 0x00, b'C', b'S', 100, 0x00]);
    out.extend_from_slice(b"MR");
    std::fs::write(&path, &out).unwrap();
    path
}

fn scanner_with_defaults() -> Scanner {
    let mut scanner = Scanner::default();
    scanner.add_tag(MODALITY);
    scanner.add_tag(PATIENT_NAME);
    scanner
}

#[test]
fn corrupt_file_does_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dcm", "MR", "Doe^John");
    let bad = write_corrupt_file(dir.path(), "bad.dcm");
    let b = write_file(dir.path(), "b.dcm", "CT", "Roe^Jane");
    let files: Vec<String> = [&a, &bad, &b]
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let mut scanner = scanner_with_defaults();
    let mut events = RecordingObserver::default();
    assert!(scanner.scan_with(&files, &mut events));

    // all three files drive progress, in input order
    assert!(events.started && events.ended);
    assert_eq!(events.files, files);
    assert_eq!(events.fractions.len(), 3);
    assert!((events.fractions[2] - 1.0).abs() < 1e-9);
    assert!(events.fractions.windows(2).all(|w| w[0] < w[1]));

    // only the two readable files are indexed, order preserved
    let keys = scanner.keys();
    assert_eq!(keys, vec![files[0].as_str(), files[2].as_str()]);
    assert!(!scanner.is_key(&files[1]));

    assert_eq!(scanner.value(&files[0], MODALITY), Some("MR"));
    assert_eq!(scanner.value(&files[2], MODALITY), Some("CT"));
    // the corrupt file yields the standing empty mapping
    assert!(scanner.mapping(&files[1]).is_empty());
}

#[test]
fn equal_values_share_one_backing_string() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dcm", "MR", "Doe^John");
    let b = write_file(dir.path(), "b.dcm", "MR", "Doe^John");
    let c = write_file(dir.path(), "c.dcm", "CT", "Roe^Jane");
    let files: Vec<String> = [&a, &b, &c]
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let mut scanner = scanner_with_defaults();
    scanner.scan(&files);

    let v1 = scanner.value(&files[0], MODALITY).unwrap();
    let v2 = scanner.value(&files[1], MODALITY).unwrap();
    assert_eq!(v1, "MR");
    // interning: the same pool instance backs both mappings
    assert_eq!(v1.as_ptr(), v2.as_ptr());

    // distinct values only
    let values = scanner.values_of(MODALITY);
    assert_eq!(values.len(), 2);
    assert!(values.contains("MR") && values.contains("CT"));
}

#[test]
fn ordered_values_keep_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<String> = [
        write_file(dir.path(), "a.dcm", "US", "P1"),
        write_file(dir.path(), "b.dcm", "MR", "P2"),
        write_file(dir.path(), "c.dcm", "US", "P3"),
        write_file(dir.path(), "d.dcm", "CT", "P4"),
    ]
    .iter()
    .map(|p| p.to_string_lossy().into_owned())
    .collect();

    let mut scanner = scanner_with_defaults();
    scanner.scan(&files);

    // first-seen order, duplicates removed; not sorted
    assert_eq!(scanner.ordered_values_of(MODALITY), vec!["US", "MR", "CT"]);
}

#[test]
fn prefix_and_exact_lookups_intentionally_differ() {
    let dir = tempfile::tempdir().unwrap();
    // a patient name with a trailing space, as archives often carry
    let a = write_file(dir.path(), "a.dcm", "MR", "ABC ");
    let b = write_file(dir.path(), "b.dcm", "CT", "ABCDEF");
    let files: Vec<String> = [&a, &b]
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let mut scanner = scanner_with_defaults();
    scanner.scan(&files);

    // stringified values are trimmed of trailing padding
    assert_eq!(scanner.value(&files[0], PATIENT_NAME), Some("ABC"));

    // the single-result lookup is a prefix match:
    // "AB" matches the first file in input order
    assert_eq!(
        scanner.filename_for(PATIENT_NAME, "AB"),
        Some(files[0].as_str())
    );
    // one trailing space in the query is discarded before matching
    assert_eq!(
        scanner.filename_for(PATIENT_NAME, "ABC "),
        Some(files[0].as_str())
    );

    // the all-results lookup is exact on trimmed values:
    // "AB" matches nothing, "ABC" matches only the first file
    assert!(scanner.all_filenames_for(PATIENT_NAME, "AB").is_empty());
    assert_eq!(
        scanner.all_filenames_for(PATIENT_NAME, "ABC"),
        vec![files[0].as_str()]
    );
    assert_eq!(
        scanner.all_filenames_for(PATIENT_NAME, "ABCDEF"),
        vec![files[1].as_str()]
    );
}

#[test]
fn meta_group_tags_route_to_the_meta_block() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dcm", "MR", "Doe^John");
    let files = vec![a.to_string_lossy().into_owned()];

    let mut scanner = Scanner::default();
    scanner.add_tag(TRANSFER_SYNTAX_UID);
    scanner.add_tag(MODALITY);
    scanner.scan(&files);

    assert_eq!(
        scanner.value(&files[0], TRANSFER_SYNTAX_UID),
        Some("1.2.840.10008.1.2.1")
    );
    assert_eq!(scanner.value(&files[0], MODALITY), Some("MR"));
}

#[test]
fn private_tags_resolve_through_the_creator_block() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dcm", "MR", "Doe^John");
    let files = vec![a.to_string_lossy().into_owned()];

    let mut scanner = Scanner::default();
    scanner.add_private_tag(PrivateTag::new(Tag(0x0029, 0x1008), "SIEMENS CSA HEADER"));
    scanner.scan(&files);

    assert_eq!(
        scanner.value(&files[0], Tag(0x0029, 0x1008)),
        Some("IMAGE NUM 4")
    );
}

#[test]
fn rescan_rebuilds_the_index() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dcm", "MR", "Doe^John");
    let b = write_file(dir.path(), "b.dcm", "CT", "Roe^Jane");
    let fa = vec![a.to_string_lossy().into_owned()];
    let fb = vec![b.to_string_lossy().into_owned()];

    let mut scanner = scanner_with_defaults();
    scanner.scan(&fa);
    assert!(scanner.is_key(&fa[0]));

    scanner.scan(&fb);
    // the previous index is gone, the new one stands
    assert!(!scanner.is_key(&fa[0]));
    assert!(scanner.is_key(&fb[0]));
    assert_eq!(scanner.value(&fb[0], MODALITY), Some("CT"));
}

#[test]
fn skip_tags_are_honored_during_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.dcm", "MR", "Doe^John");
    let files = vec![a.to_string_lossy().into_owned()];

    let mut scanner = scanner_with_defaults();
    scanner.add_skip_tag(PATIENT_NAME);
    scanner.scan(&files);

    // the skipped element was never materialized, so it has no value,
    // while later elements are unaffected
    assert!(scanner.value(&files[0], PATIENT_NAME).is_none());
    assert_eq!(scanner.value(&files[0], MODALITY), Some("MR"));
}
