//! This crate contains a high-level abstraction for reading DICOM
//! objects from files.
//!
//! At this level, an object is a [`DataSet`]:
//! an ordered collection of data elements keyed by tag,
//! in which some elements can hold nested data sets themselves.
//! A [`File`] pairs a data set with the [`FileMetaTable`]
//! decoded from the file's meta information group,
//! which declares the transfer syntax of everything that follows.
//!
//! Reading can be bounded by a stop tag (inclusive) and a skip set:
//!
//! ```no_run
//! use rdcm_core::Tag;
//! # fn main() -> Result<(), rdcm_object::ReadError> {
//! let file = rdcm_object::open_file_up_to(
//!     "0001.dcm",
//!     Tag(0x0010, 0x0020),
//!     &Default::default(),
//! )?;
//! if let Some(element) = file.dataset().find(Tag(0x0010, 0x0010)) {
//!     println!("{}", element.to_str().expect("value should be primitive"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod mem;
pub mod meta;

pub use file::{check_file_up_to, open_file, open_file_up_to, File, ReadError};
pub use mem::{AccessError, DataSet, InMemElement};
pub use meta::{FileMetaTable, FileMetaTableBuilder};
