//! Vendor name-keyed dictionaries.
//!
//! Some manufacturers embed an entire proprietary sub-header
//! inside the payload of a single standard element
//! (the Siemens CSA header is the canonical case).
//! The attributes of such a sub-header are identified by *name*
//! rather than by tag, so the dictionary describing them
//! is keyed by strings.

use crate::dictionary::ValueMultiplicity;
use crate::header::VR;
use snafu::{ensure, Backtrace, Snafu};
use std::collections::BTreeMap;

/// Error type for vendor dictionary operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum VendorDictError {
    /// An entry with the same name is already present.
    /// Vendor dictionaries are append-only:
    /// overwriting an existing entry is a programming error,
    /// never a recoverable run-time condition.
    #[snafu(display("duplicate vendor dictionary entry \"{}\"", name))]
    DuplicateEntry { name: String, backtrace: Backtrace },

    /// No entry under the given name.
    #[snafu(display("unknown vendor attribute \"{}\"", name))]
    UnknownName { name: String },
}

type Result<T, E = VendorDictError> = std::result::Result<T, E>;

/// One attribute of a vendor proprietary sub-header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDictEntry {
    /// The attribute's name, as spelled in the sub-header.
    pub name: String,
    /// The typical value representation of the attribute.
    pub vr: VR,
    /// The value multiplicity constraint.
    pub vm: ValueMultiplicity,
    /// Free-form description.
    pub description: String,
}

/// A dictionary of vendor sub-header attributes, keyed by name.
///
/// The set is append-only. Inserting a name twice fails with
/// [`VendorDictError::DuplicateEntry`] and leaves the dictionary unchanged.
#[derive(Debug, Default)]
pub struct VendorDict {
    entries: BTreeMap<String, VendorDictEntry>,
}

impl VendorDict {
    /// Create an empty vendor dictionary.
    pub fn new() -> Self {
        VendorDict::default()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert a new entry.
    ///
    /// Every insertion must strictly grow the set.
    pub fn add(&mut self, entry: VendorDictEntry) -> Result<()> {
        debug_assert!(
            !self.entries.contains_key(&entry.name),
            "duplicate vendor dictionary entry \"{}\"",
            entry.name
        );
        ensure!(
            !self.entries.contains_key(&entry.name),
            DuplicateEntrySnafu { name: entry.name }
        );
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Fetch the entry under the given name.
    pub fn entry(&self, name: &str) -> Result<&VendorDictEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| VendorDictError::UnknownName { name: name.into() })
    }

    /// Fetch the entry under the given name, if present.
    pub fn get(&self, name: &str) -> Option<&VendorDictEntry> {
        self.entries.get(name)
    }

    /// Iterate over the entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &VendorDictEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> VendorDictEntry {
        VendorDictEntry {
            name: name.to_string(),
            vr: VR::IS,
            vm: ValueMultiplicity::Fixed(1),
            description: String::new(),
        }
    }

    #[test]
    fn lookup_by_name() {
        let mut dict = VendorDict::new();
        dict.add(entry("NumberOfImagesInMosaic")).unwrap();
        assert_eq!(dict.entry("NumberOfImagesInMosaic").unwrap().vr, VR::IS);
        assert!(matches!(
            dict.entry("NoSuchAttribute"),
            Err(VendorDictError::UnknownName { .. })
        ));
    }

    // debug_assert fires first in debug builds; the release-mode contract
    // is the error return checked here
    #[test]
    #[cfg(not(debug_assertions))]
    fn duplicate_insert_is_rejected() {
        let mut dict = VendorDict::new();
        dict.add(entry("SliceMeasurementDuration")).unwrap();
        let before = dict.len();
        assert!(matches!(
            dict.add(entry("SliceMeasurementDuration")),
            Err(VendorDictError::DuplicateEntry { .. })
        ));
        assert_eq!(dict.len(), before);
    }

    #[test]
    fn insertion_strictly_grows() {
        let mut dict = VendorDict::new();
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            dict.add(entry(name)).unwrap();
            assert_eq!(dict.len(), i + 1);
        }
    }
}
