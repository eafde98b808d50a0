#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! This is the core library of the `rdcm` workspace,
//! containing the data structures and traits shared by every other crate:
//!
//! - [`header`] holds the DICOM attribute tag, value representation,
//!   element length and element header types.
//! - [`dictionary`] describes the common behavior of DICOM data dictionaries,
//!   which translate attribute tags and/or names into entries
//!   carrying the attribute's typical value representation and multiplicity.
//! - [`value`] holds the in-memory representation of element values,
//!   with awareness of multiplicity, nested data sets,
//!   and encapsulated pixel data fragments.

pub mod dictionary;
pub mod header;
pub mod value;

pub use dictionary::{DataDictionary, DictionaryEntry};
pub use header::{DataElement, DataElementHeader, Length, PrivateTag, Tag, VR};
pub use value::{PrimitiveValue, Value};

// re-export crates that are part of the public API
pub use smallvec;
