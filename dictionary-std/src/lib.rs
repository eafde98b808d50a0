//! This crate implements the run-time DICOM dictionaries of the `rdcm`
//! workspace:
//!
//! - [`data_element`] holds the standard attribute dictionary,
//!   collected from PS3.6 part 6, with the structural rules
//!   (group lengths, private creators, repeating groups) applied on lookup.
//! - [`private`] holds creator-keyed dictionaries for vendor-reserved
//!   element blocks.
//! - [`vendor`] loads name-keyed dictionaries for vendor proprietary
//!   sub-headers (currently the Siemens CSA header attributes).
//! - [`registry`] bundles all of the above into a single read-only
//!   [`Dicts`](registry::Dicts) value, also available as a lazily
//!   initialized process-wide instance.
//!
//! Each dictionary is provided as a singleton behind a unit type or a
//! shared reference for efficiency and ease of use, but all consumers
//! accept an explicit reference, so alternate registries can be injected.

mod entries;

pub mod data_element;
pub mod private;
pub mod registry;
pub mod vendor;

pub use data_element::StandardDataDictionary;
pub use registry::{dicts, Dicts};
