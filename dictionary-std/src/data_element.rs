//! The standard data element dictionary.
//!
//! The actual table lives in a lazily initialized registry;
//! the unit type [`StandardDataDictionary`] is the convenient,
//! copyable handle implementing [`DataDictionary`].

use crate::entries::ENTRIES;
use once_cell::sync::Lazy;
use rdcm_core::dictionary::{DataDictionary, DictionaryEntryRef, ValueMultiplicity};
use rdcm_core::header::Tag;
use rdcm_core::VR;
use std::collections::{HashMap, HashSet};

static DICT: Lazy<StandardDataDictionaryRegistry> = Lazy::new(init_dictionary);

/// Retrieve a singleton instance of the standard dictionary registry.
///
/// Initialization happens on first use and exactly once,
/// even under concurrent first access.
#[inline]
pub fn registry() -> &'static StandardDataDictionaryRegistry {
    &DICT
}

/// Generic group length dictionary entry,
/// returned for any `(gggg,0000)` tag without a dedicated entry.
static GROUP_LENGTH_ENTRY: DictionaryEntryRef<'static> = DictionaryEntryRef {
    tag: Tag(0x0000, 0x0000),
    alias: "GenericGroupLength",
    vr: VR::UL,
    vm: ValueMultiplicity::Fixed(1),
};

/// Generic private creator dictionary entry,
/// returned for `(gggg odd, 0010-00FF)` tags.
static PRIVATE_CREATOR_ENTRY: DictionaryEntryRef<'static> = DictionaryEntryRef {
    tag: Tag(0x0009, 0x0010),
    alias: "PrivateCreator",
    vr: VR::LO,
    vm: ValueMultiplicity::Fixed(1),
};

/// The data struct actually containing the standard dictionary.
///
/// This structure is usually accessed through the unit type
/// [`StandardDataDictionary`].
#[derive(Debug)]
pub struct StandardDataDictionaryRegistry {
    /// mapping: tag → entry
    by_tag: HashMap<Tag, &'static DictionaryEntryRef<'static>>,
    /// mapping: name → entry
    by_name: HashMap<&'static str, &'static DictionaryEntryRef<'static>>,
    /// groups of the form `ggxx` whose entries repeat across the
    /// `xx` range (overlays, curves); the variable digits are zeroed
    repeating_ggxx: HashSet<u16>,
}

impl StandardDataDictionaryRegistry {
    fn new() -> Self {
        StandardDataDictionaryRegistry {
            by_tag: HashMap::with_capacity(ENTRIES.len()),
            by_name: HashMap::with_capacity(ENTRIES.len()),
            repeating_ggxx: HashSet::new(),
        }
    }

    fn index(&mut self, entry: &'static DictionaryEntryRef<'static>) -> &mut Self {
        self.by_tag.insert(entry.tag, entry);
        self.by_name.insert(entry.alias, entry);
        // repeating groups are recorded with their base group number
        if matches!(entry.tag.group(), 0x5000 | 0x6000) {
            self.repeating_ggxx.insert(entry.tag.group());
        }
        self
    }

    /// Look a tag up, applying the structural rules of the encoding:
    /// exact entries first, then repeating-group normalization,
    /// then group lengths and private creators.
    pub fn get(&self, tag: Tag) -> Option<&'static DictionaryEntryRef<'static>> {
        if let Some(entry) = self.by_tag.get(&tag).copied() {
            return Some(entry);
        }
        // (5xxx,eeee) and (6xxx,eeee) repeat over the even low byte pairs
        let base = Tag(tag.group() & 0xFF00, tag.element());
        if self.repeating_ggxx.contains(&base.group()) && tag.group() & 0x00FF < 0x0020 {
            if let Some(entry) = self.by_tag.get(&base).copied() {
                return Some(entry);
            }
        }
        if tag.element() == 0x0000 {
            return Some(&GROUP_LENGTH_ENTRY);
        }
        if tag.is_private_creator() {
            return Some(&PRIVATE_CREATOR_ENTRY);
        }
        None
    }
}

/// A data element dictionary which consults
/// the contents of the DICOM standard data dictionary.
///
/// This is the default dictionary of the workspace. It is a unit type:
/// cheap to copy, with the heavy table behind a lazily initialized
/// shared registry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    type Entry = DictionaryEntryRef<'static>;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        registry().get(tag)
    }

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        registry().by_name.get(name).copied()
    }
}

fn init_dictionary() -> StandardDataDictionaryRegistry {
    let mut d = StandardDataDictionaryRegistry::new();
    for entry in ENTRIES {
        d.index(entry);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::dictionary::DictionaryEntry;

    #[test]
    fn all_registered_entries_resolve() {
        let dict = StandardDataDictionary;
        for entry in ENTRIES {
            let found = dict
                .by_tag(entry.tag)
                .unwrap_or_else(|| panic!("entry for {} should resolve", entry.tag));
            assert_eq!(found.alias, entry.alias);
        }
    }

    #[test]
    fn well_known_attributes() {
        let dict = StandardDataDictionary;
        let entry = dict.by_tag(Tag(0x0010, 0x0010)).unwrap();
        assert_eq!(entry.alias, "PatientName");
        assert_eq!(entry.vr, VR::PN);

        let entry = dict.by_name("TransferSyntaxUID").unwrap();
        assert_eq!(entry.tag(), Tag(0x0002, 0x0010));
    }

    #[test]
    fn repeating_overlay_groups_resolve() {
        let dict = StandardDataDictionary;
        // overlay group 6002 resolves through the 6000 base entry
        let entry = dict.by_tag(Tag(0x6002, 0x0010)).unwrap();
        assert_eq!(entry.alias, "OverlayRows");
        assert_eq!(entry.vr, VR::US);
        // but far-off groups do not
        assert!(dict.by_tag(Tag(0x60FF, 0x0010)).is_none());
    }

    #[test]
    fn structural_fallbacks() {
        let dict = StandardDataDictionary;
        assert_eq!(dict.by_tag(Tag(0x0008, 0x0000)).unwrap().vr, VR::UL);
        assert_eq!(dict.by_tag(Tag(0x0029, 0x0010)).unwrap().vr, VR::LO);
        // unknown public attribute: a genuine miss
        assert!(dict.by_tag(Tag(0x0008, 0xFF00)).is_none());
    }
}
