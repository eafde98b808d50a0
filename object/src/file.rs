//! Whole-file reading: the pairing of a file meta table with the data
//! set it declares, plus the bounded read and structural pre-check
//! entry points used by batch scanning.

use crate::mem::{DataSet, DataSetBuildError};
use crate::meta::FileMetaTable;
use rdcm_core::Tag;
use rdcm_encoding::text::SpecificCharacterSet;
use rdcm_encoding::transfer_syntax::TransferSyntax;
use rdcm_parser::dataset::read::{
    DataSetReader, DataSetReaderOptions, Error as ReadTokenError, ValueReadStrategy,
};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::collections::BTreeSet;
use std::fs::File as FsFile;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// The size of the DICOM file preamble, which this reader discards.
const PREAMBLE_SIZE: usize = 128;

/// Module-level error type for whole-file reading.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReadError {
    /// The file could not be opened.
    #[snafu(display("Could not open file {}", path.display()))]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The file preamble could not be read.
    #[snafu(display("Could not read file preamble"))]
    ReadPreamble {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The file meta group could not be decoded.
    #[snafu(display("Could not read file meta group"))]
    ReadMeta {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },

    /// The declared transfer syntax is not supported.
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },

    /// The data set was structurally malformed.
    #[snafu(display("Could not read data set"))]
    ReadDataSet {
        #[snafu(backtrace)]
        source: ReadTokenError,
    },

    /// The token stream was inconsistent during assembly.
    #[snafu(display("Could not build data set"))]
    BuildDataSet {
        source: crate::mem::BuildError,
        backtrace: Backtrace,
    },
}

type Result<T, E = ReadError> = std::result::Result<T, E>;

/// A DICOM file fully decoded into memory:
/// the file meta information table and the main data set.
///
/// A `File` is exclusively owned by the caller of the read operation
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    meta: FileMetaTable,
    dataset: DataSet,
}

impl File {
    /// Create a file object from its decoded parts.
    pub fn new(meta: FileMetaTable, dataset: DataSet) -> Self {
        File { meta, dataset }
    }

    /// The file meta information table.
    pub fn meta(&self) -> &FileMetaTable {
        &self.meta
    }

    /// The main data set.
    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    /// Disassemble into the meta table and the data set.
    pub fn into_parts(self) -> (FileMetaTable, DataSet) {
        (self.meta, self.dataset)
    }
}

fn open_source(path: &Path) -> Result<(BufReader<FsFile>, FileMetaTable, TransferSyntax)> {
    let file = FsFile::open(path).context(OpenFileSnafu { path })?;
    let mut source = BufReader::new(file);

    let mut preamble = [0u8; PREAMBLE_SIZE];
    source.read_exact(&mut preamble).context(ReadPreambleSnafu)?;

    let meta = FileMetaTable::from_reader(&mut source).context(ReadMetaSnafu)?;
    let uid = meta.transfer_syntax_uid();
    let ts = TransferSyntax::from_uid(uid).context(UnsupportedTransferSyntaxSnafu { uid })?;
    Ok((source, meta, ts))
}

/// Read the complete object at `path` into memory.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let (source, meta, ts) = open_source(path.as_ref())?;
    let reader = DataSetReader::new_with_ts_cs(source, ts, SpecificCharacterSet::Default);
    build_file(meta, reader)
}

/// Read the object at `path` up to and including the element tagged
/// `last`. Top-level elements whose tags are in `skip` are recognized
/// but their values are discarded rather than materialized.
pub fn open_file_up_to<P: AsRef<Path>>(
    path: P,
    last: Tag,
    skip: &BTreeSet<Tag>,
) -> Result<File> {
    let (source, meta, ts) = open_source(path.as_ref())?;
    let options = DataSetReaderOptions::default()
        .read_until(last)
        .skip_tags(skip.clone());
    let reader =
        DataSetReader::new_with_ts_cs_options(source, ts, SpecificCharacterSet::Default, options);
    build_file(meta, reader)
}

/// Structurally validate the object at `path` up to and including the
/// element tagged `last`, without materializing any value.
///
/// This is the cheap first pass of a batch scan:
/// it accepts every file [`open_file_up_to`] accepts
/// and rejects truncated or structurally inconsistent streams.
pub fn check_file_up_to<P: AsRef<Path>>(
    path: P,
    last: Tag,
    skip: &BTreeSet<Tag>,
) -> Result<()> {
    let (source, _meta, ts) = open_source(path.as_ref())?;
    let options = DataSetReaderOptions::default()
        .read_until(last)
        .skip_tags(skip.clone())
        .value_read(ValueReadStrategy::Skipped);
    let reader =
        DataSetReader::new_with_ts_cs_options(source, ts, SpecificCharacterSet::Default, options);
    for token in reader {
        token.context(ReadDataSetSnafu)?;
    }
    Ok(())
}

fn build_file<S: Read>(meta: FileMetaTable, reader: DataSetReader<S>) -> Result<File> {
    match DataSet::from_tokens(reader) {
        Ok(dataset) => Ok(File { meta, dataset }),
        Err(DataSetBuildError::Read(e)) => Err(e).context(ReadDataSetSnafu),
        Err(DataSetBuildError::Build(e)) => Err(e).context(BuildDataSetSnafu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::header::Length;
    use rdcm_core::{PrimitiveValue, VR};
    use rdcm_parser::dataset::DataToken;
    use rdcm_parser::DataSetWriter;
    use std::io::Write;

    fn meta_table() -> FileMetaTable {
        crate::meta::FileMetaTableBuilder::new()
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
            .media_storage_sop_instance_uid("1.2.3.4")
            .transfer_syntax(TransferSyntax::ExplicitVRLittleEndian.uid())
            .implementation_class_uid("1.2.345.6.7890")
            .build()
            .unwrap()
    }

    fn str_element_tokens(tag: Tag, vr: VR, value: &str) -> Vec<DataToken> {
        let header =
            rdcm_core::header::DataElementHeader::new(tag, vr, Length(value.len() as u32));
        vec![
            DataToken::ElementHeader(header),
            DataToken::PrimitiveValue(PrimitiveValue::from(value)),
        ]
    }

    /// Assemble a complete synthetic file on disk:
    /// preamble, meta group, and a small explicit VR LE data set.
    fn write_test_file(dir: &Path, name: &str, modality: &str) -> PathBuf {
        let path = dir.join(name);
        let mut out = Vec::new();
        out.extend_from_slice(&[0u8; PREAMBLE_SIZE]);
        meta_table().write_to(&mut out).unwrap();

        let mut writer =
            DataSetWriter::new_with_ts(Vec::new(), TransferSyntax::ExplicitVRLittleEndian);
        let mut tokens = Vec::new();
        tokens.extend(str_element_tokens(Tag(0x0008, 0x0060), VR::CS, modality));
        tokens.extend(str_element_tokens(
            Tag(0x0010, 0x0010),
            VR::PN,
            "Doe^John",
        ));
        tokens.extend(str_element_tokens(Tag(0x0010, 0x0020), VR::LO, "C123"));
        writer.write_sequence(tokens).unwrap();
        out.extend_from_slice(&writer.into_inner());

        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(&out))
            .unwrap();
        path
    }

    #[test]
    fn open_file_reads_meta_and_data_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "a.dcm", "MR");
        let file = open_file(&path).unwrap();
        assert_eq!(
            file.meta().transfer_syntax_uid(),
            "1.2.840.10008.1.2.1"
        );
        assert_eq!(
            file.dataset()
                .element(Tag(0x0008, 0x0060))
                .unwrap()
                .to_str()
                .unwrap(),
            "MR"
        );
        assert_eq!(file.dataset().len(), 3);
    }

    #[test]
    fn open_file_up_to_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "b.dcm", "CT");
        let file = open_file_up_to(&path, Tag(0x0010, 0x0010), &Default::default()).unwrap();
        // the stop element itself is present
        assert!(file.dataset().find(Tag(0x0010, 0x0010)).is_some());
        // the element past it is not
        assert!(file.dataset().find(Tag(0x0010, 0x0020)).is_none());
    }

    #[test]
    fn skip_set_drops_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "c.dcm", "CT");
        let mut skip = BTreeSet::new();
        skip.insert(Tag(0x0010, 0x0010));
        let file = open_file_up_to(&path, Tag(0x0010, 0x0020), &skip).unwrap();
        assert!(file.dataset().find(Tag(0x0010, 0x0010)).is_none());
        assert!(file.dataset().find(Tag(0x0010, 0x0020)).is_some());
    }

    #[test]
    fn check_accepts_what_open_accepts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "d.dcm", "US");
        check_file_up_to(&path, Tag(0x0010, 0x0020), &Default::default()).unwrap();
    }

    #[test]
    fn truncated_file_fails_both_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "e.dcm", "MR");
        let full = std::fs::read(&path).unwrap();
        let cut = dir.path().join("cut.dcm");
        // cut in the middle of the last element's value
        std::fs::write(&cut, &full[..full.len() - 2]).unwrap();

        let last = Tag(0x0010, 0x0020);
        assert!(check_file_up_to(&cut, last, &Default::default()).is_err());
        assert!(open_file_up_to(&cut, last, &Default::default()).is_err());
    }

    #[test]
    fn not_dicom_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.dcm");
        std::fs::write(&path, vec![0x42u8; 400]).unwrap();
        assert!(matches!(
            open_file(&path),
            Err(ReadError::ReadMeta { .. })
        ));
    }

    #[test]
    fn sequence_elements_survive_a_full_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.dcm");
        let mut out = Vec::new();
        out.extend_from_slice(&[0u8; PREAMBLE_SIZE]);
        meta_table().write_to(&mut out).unwrap();
        let mut writer =
            DataSetWriter::new_with_ts(Vec::new(), TransferSyntax::ExplicitVRLittleEndian);
        let mut tokens = vec![DataToken::SequenceStart {
            tag: Tag(0x0008, 0x1110),
            len: Length::UNDEFINED,
        }];
        tokens.push(DataToken::ItemStart {
            len: Length::UNDEFINED,
        });
        tokens.extend(str_element_tokens(Tag(0x0008, 0x1150), VR::UI, "1.2"));
        tokens.push(DataToken::ItemEnd);
        tokens.push(DataToken::SequenceEnd);
        writer.write_sequence(tokens).unwrap();
        out.extend_from_slice(&writer.into_inner());
        std::fs::write(&path, &out).unwrap();

        let file = open_file(&path).unwrap();
        let seq = file.dataset().element(Tag(0x0008, 0x1110)).unwrap();
        assert_eq!(seq.value().items().unwrap().len(), 1);
    }

    #[test]
    fn file_ownership_transfers_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "f.dcm", "MR");
        let file = open_file(&path).unwrap();
        let (meta, dataset) = file.into_parts();
        assert!(!meta.media_storage_sop_class_uid.is_empty());
        assert_eq!(dataset.len(), 3);
    }
}
