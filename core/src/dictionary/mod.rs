//! This module contains the concept of a DICOM data dictionary.
//!
//! A data dictionary translates attribute tags and/or names
//! into entries carrying the attribute's typical value representation,
//! value multiplicity, and alias.
//! The concrete standard dictionary lives in the `rdcm-dictionary-std`
//! crate; this module only defines the common behavior,
//! plus the vendor name-keyed dictionary used for proprietary
//! sub-headers embedded in standard elements.

mod vendor;

pub use self::vendor::{DuplicateEntrySnafu, VendorDict, VendorDictError, VendorDictEntry};

use crate::header::{Tag, VR};
use std::fmt::Debug;

/// Type trait for a dictionary of DICOM attributes.
///
/// Attribute dictionaries provide the means to convert a tag to an alias
/// and vice versa, as well as to retrieve the attribute's expected value
/// representation. The methods herein have no generic parameters,
/// so as to enable being used as a trait object.
pub trait DataDictionary: Debug {
    /// The type of the dictionary entry.
    type Entry: DictionaryEntry;

    /// Fetch an entry by its tag.
    ///
    /// A return of `None` means the dictionary has no knowledge of the
    /// attribute; decoders fall back to UN and scanners reject the tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its usual alias
    /// (e.g. "PatientName" or "SOPInstanceUID").
    /// Aliases are case sensitive and not separated by spaces.
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;
}

impl<T> DataDictionary for &T
where
    T: DataDictionary,
{
    type Entry = T::Entry;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        (**self).by_tag(tag)
    }

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        (**self).by_name(name)
    }
}

/// The dictionary entry data type, representing a DICOM attribute.
pub trait DictionaryEntry {
    /// The attribute tag.
    fn tag(&self) -> Tag;
    /// The alias of the attribute, with no spaces, usually in UpperCamelCase.
    fn alias(&self) -> &str;
    /// The _typical_ value representation of the attribute.
    fn vr(&self) -> VR;
    /// The attribute's value multiplicity constraint.
    fn vm(&self) -> ValueMultiplicity;
}

/// A declared constraint on the number of individual values
/// a DICOM attribute admits, as written in the standard's
/// "VM" column (`1`, `3`, `1-n`, `2-2n`, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueMultiplicity {
    /// Exactly this many values.
    Fixed(u32),
    /// Between the two bounds, inclusive.
    Range(u32, u32),
    /// At least this many values, unbounded above.
    AtLeast(u32),
}

impl ValueMultiplicity {
    /// Check whether the given number of values satisfies the constraint.
    pub fn contains(self, n: u32) -> bool {
        match self {
            ValueMultiplicity::Fixed(m) => n == m,
            ValueMultiplicity::Range(lo, hi) => n >= lo && n <= hi,
            ValueMultiplicity::AtLeast(lo) => n >= lo,
        }
    }
}

/// A data type for a dictionary entry using string slices for its data.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag.
    pub tag: Tag,
    /// The alias of the attribute, with no spaces, usually InCapitalizedCamelCase.
    pub alias: &'a str,
    /// The typical value representation of the attribute.
    pub vr: VR,
    /// The value multiplicity constraint.
    pub vm: ValueMultiplicity,
}

impl DictionaryEntry for DictionaryEntryRef<'_> {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VR {
        self.vr
    }
    fn vm(&self) -> ValueMultiplicity {
        self.vm
    }
}

/// A data type for a dictionary entry with full ownership.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryBuf {
    /// The attribute tag.
    pub tag: Tag,
    /// The alias of the attribute, with no spaces, usually InCapitalizedCamelCase.
    pub alias: String,
    /// The typical value representation of the attribute.
    pub vr: VR,
    /// The value multiplicity constraint.
    pub vm: ValueMultiplicity,
}

impl DictionaryEntry for DictionaryEntryBuf {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias.as_str()
    }
    fn vr(&self) -> VR {
        self.vr
    }
    fn vm(&self) -> ValueMultiplicity {
        self.vm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicity_bounds() {
        assert!(ValueMultiplicity::Fixed(1).contains(1));
        assert!(!ValueMultiplicity::Fixed(1).contains(2));
        assert!(ValueMultiplicity::Range(2, 4).contains(3));
        assert!(!ValueMultiplicity::Range(2, 4).contains(5));
        assert!(ValueMultiplicity::AtLeast(1).contains(100));
        assert!(!ValueMultiplicity::AtLeast(1).contains(0));
    }
}
