//! An implementation of a DICOM data element toolkit in Rust.
//!
//! This crate simply re-exports the crates of the `rdcm` workspace
//! under a single name:
//!
//! - [`core`] for the tag, value representation and element data types;
//! - [`dictionary`] for the standard, private and vendor attribute
//!   dictionaries;
//! - [`encoding`] for the transfer syntax decoders and encoders and
//!   the pixel data codec boundary;
//! - [`parser`] for token-based data set reading and writing;
//! - [`object`] for whole-file reading into memory;
//! - [`scanner`] for the batch scanning engine.
//!
//! The types used most often are re-exported at the root.

pub use rdcm_core as core;
pub use rdcm_dictionary_std as dictionary;
pub use rdcm_encoding as encoding;
pub use rdcm_object as object;
pub use rdcm_parser as parser;
pub use rdcm_scanner as scanner;

pub use rdcm_core::{DataElement, Length, PrivateTag, Tag, VR};
pub use rdcm_dictionary_std::{dicts, StandardDataDictionary};
pub use rdcm_object::{open_file, open_file_up_to, DataSet, File};
pub use rdcm_scanner::Scanner;
