//! The top-level dictionary registry.
//!
//! [`Dicts`] bundles the standard dictionary, the private
//! creator-keyed dictionaries and the vendor name-keyed dictionaries
//! into one read-only value. A process-wide instance is available
//! through [`dicts`], lazily built on first use; consumers which want
//! a different registry (e.g. with extra vendor dictionaries) can build
//! their own and pass it around explicitly.

use crate::data_element::StandardDataDictionary;
use crate::private::{self, PrivateDictEntry};
use crate::vendor;
use once_cell::sync::Lazy;
use rdcm_core::dictionary::{DataDictionary, DictionaryEntryRef, VendorDict};
use rdcm_core::header::{PrivateTag, Tag};
use std::collections::BTreeMap;

static DICTS: Lazy<Dicts> = Lazy::new(Dicts::load_default);

/// Retrieve the process-wide dictionary registry.
#[inline]
pub fn dicts() -> &'static Dicts {
    &DICTS
}

/// The registry of all dictionaries known to the process:
/// public, private, and vendor-named. Read-only once constructed.
#[derive(Debug)]
pub struct Dicts {
    standard: StandardDataDictionary,
    vendor: BTreeMap<&'static str, VendorDict>,
}

impl Dicts {
    /// Build the registry with the default contents:
    /// the standard dictionary, the registered private entries,
    /// and the CSA header attribute dictionary.
    pub fn load_default() -> Self {
        let mut vendor = BTreeMap::new();
        vendor.insert("SIEMENS CSA HEADER", vendor::csa_header_dict());
        Dicts {
            standard: StandardDataDictionary,
            vendor,
        }
    }

    /// The public (standard) dictionary.
    #[inline]
    pub fn standard(&self) -> &StandardDataDictionary {
        &self.standard
    }

    /// Fetch the entry for a public tag.
    ///
    /// `None` means the registry has no knowledge of the attribute.
    pub fn entry(&self, tag: Tag) -> Option<&DictionaryEntryRef<'static>> {
        self.standard.by_tag(tag)
    }

    /// Fetch the entry for a creator-qualified private tag.
    pub fn private_entry(&self, tag: &PrivateTag) -> Option<&'static PrivateDictEntry> {
        private::registry().get(tag)
    }

    /// Fetch a vendor name-keyed dictionary by its identification string.
    pub fn vendor_dict(&self, name: &str) -> Option<&VendorDict> {
        self.vendor.get(name)
    }
}

impl Default for Dicts {
    fn default() -> Self {
        Dicts::load_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::VR;

    #[test]
    fn registry_routes_all_three_dictionaries() {
        let d = dicts();
        assert_eq!(d.entry(Tag(0x0008, 0x0060)).unwrap().vr, VR::CS);
        assert!(d.entry(Tag(0x0009, 0xFF00)).is_none());

        let t = PrivateTag::new(Tag(0x0029, 0x1010), "SIEMENS CSA HEADER");
        assert_eq!(d.private_entry(&t).unwrap().vr, VR::OB);

        let csa = d.vendor_dict("SIEMENS CSA HEADER").unwrap();
        assert!(csa.get("NumberOfImagesInMosaic").is_some());
        assert!(d.vendor_dict("NO SUCH VENDOR").is_none());
    }

    #[test]
    fn lazy_instance_is_shared() {
        let a = dicts() as *const Dicts;
        let b = dicts() as *const Dicts;
        assert_eq!(a, b);
    }
}
