//! Batch scanning engine:
//! drives the file reader across many files,
//! extracting the values of registered attributes into a
//! filename → (tag → value) index which can then be queried.
//!
//! Scanning is resilient by design:
//! each file goes through a cheap structural validation pass first,
//! then a full bounded read;
//! a corrupt file is recorded as unreadable and never aborts the batch.
//! Equal values are interned into a shared pool,
//! so large series with repeated attribute values
//! share one backing string.
//!
//! ```no_run
//! use rdcm_core::Tag;
//! use rdcm_scanner::Scanner;
//!
//! let mut scanner = Scanner::default();
//! scanner.add_tag(Tag(0x0010, 0x0010));
//! scanner.add_tag(Tag(0x0008, 0x0060));
//! scanner.scan(&["a.dcm", "b.dcm"]);
//! for filename in scanner.keys() {
//!     println!("{:?}", scanner.value(filename, Tag(0x0010, 0x0010)));
//! }
//! ```

pub mod observer;

pub use observer::ScanObserver;

use rdcm_core::dictionary::DictionaryEntry;
use rdcm_core::header::{PrivateTag, Tag};
use rdcm_dictionary_std::{dicts, Dicts};
use rdcm_object::{check_file_up_to, open_file_up_to, DataSet, File};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// The per-file extraction result: registered tag → interned value.
pub type TagToValue = BTreeMap<Tag, Arc<str>>;

/// The standing key representing a file that could not be read.
const UNREADABLE: &str = "";

/// The batch scanning engine.
///
/// Register the attributes of interest with
/// [`add_tag`](Self::add_tag) / [`add_private_tag`](Self::add_private_tag),
/// run [`scan`](Self::scan) over a list of filenames,
/// then query the per-file or per-tag views.
/// Each scan rebuilds the index from scratch;
/// the value pool persists for the scanner's lifetime.
#[derive(Debug)]
pub struct Scanner {
    dicts: &'static Dicts,
    tags: BTreeSet<Tag>,
    private_tags: BTreeSet<PrivateTag>,
    skip_tags: BTreeSet<Tag>,
    /// the filenames of the last scan, in input order
    filenames: Vec<String>,
    /// filename → extracted mapping; the empty filename holds the
    /// standing empty mapping for unreadable files
    mappings: HashMap<String, TagToValue>,
    /// the deduplicating pool of every extracted value
    values: HashSet<Arc<str>>,
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(dicts())
    }
}

impl Scanner {
    /// Create a scanner consulting the given dictionary registry.
    pub fn new(dicts: &'static Dicts) -> Self {
        let mut mappings = HashMap::new();
        mappings.insert(UNREADABLE.to_string(), TagToValue::new());
        Scanner {
            dicts,
            tags: BTreeSet::new(),
            private_tags: BTreeSet::new(),
            skip_tags: BTreeSet::new(),
            filenames: Vec::new(),
            mappings,
            values: HashSet::new(),
        }
    }

    /// Register a public attribute to extract.
    ///
    /// The tag must be known to the dictionary;
    /// an unknown tag is dropped with a warning, not an error.
    pub fn add_tag(&mut self, tag: Tag) {
        match self.dicts.entry(tag) {
            Some(entry) if entry.vr().is_ascii() || entry.vr().is_binary() => {
                self.tags.insert(tag);
            }
            Some(entry) => {
                warn!(
                    "tag {} has non-scalar VR {}, it will be discarded",
                    tag,
                    entry.vr()
                );
            }
            None => {
                warn!("only tags with known VR are allowed, tag {} will be discarded", tag);
            }
        }
    }

    /// Register a private (creator-qualified) attribute to extract.
    ///
    /// The attribute must be known to the private dictionary;
    /// an unknown one is dropped with a warning, not an error.
    pub fn add_private_tag(&mut self, tag: PrivateTag) {
        match self.dicts.private_entry(&tag) {
            Some(entry) if entry.vr.is_ascii() || entry.vr.is_binary() => {
                self.private_tags.insert(tag);
            }
            Some(entry) => {
                warn!(
                    "private tag {} has non-scalar VR {}, it will be discarded",
                    tag, entry.vr
                );
            }
            None => {
                warn!(
                    "only tags with known VR are allowed, tag {} will be discarded",
                    tag
                );
            }
        }
    }

    /// Register a tag whose value bytes are to be skipped during
    /// decoding rather than materialized.
    pub fn add_skip_tag(&mut self, tag: Tag) {
        self.skip_tags.insert(tag);
    }

    /// Forget every registered attribute.
    pub fn clear_tags(&mut self) {
        self.tags.clear();
        self.private_tags.clear();
    }

    /// Forget every registered skip tag.
    pub fn clear_skip_tags(&mut self) {
        self.skip_tags.clear();
    }

    /// Scan the given files in order, rebuilding the index.
    ///
    /// Emits no observations; see
    /// [`scan_with`](Self::scan_with) for progress reporting.
    pub fn scan<P: AsRef<Path>>(&mut self, filenames: &[P]) -> bool {
        self.scan_with(filenames, &mut ())
    }

    /// Scan the given files in order, rebuilding the index,
    /// reporting start, per-file progress and filename,
    /// and end to the observer.
    ///
    /// Files are processed strictly sequentially.
    /// A file that fails either the structural check or the extraction
    /// pass is recorded as unreadable; the batch always completes.
    pub fn scan_with<P, O>(&mut self, filenames: &[P], observer: &mut O) -> bool
    where
        P: AsRef<Path>,
        O: ScanObserver,
    {
        observer.on_start();
        if !self.tags.is_empty() || !self.private_tags.is_empty() {
            self.mappings.clear();
            self.mappings.insert(UNREADABLE.to_string(), TagToValue::new());
            self.filenames = filenames
                .iter()
                .map(|p| p.as_ref().to_string_lossy().into_owned())
                .collect();

            // the highest registered tag bounds how much of each file
            // must be decoded
            let last_public = self.tags.iter().next_back().copied();
            let last_private = self.private_tags.iter().next_back().map(|t| t.tag());
            let last = match (last_public, last_private) {
                (Some(a), Some(b)) => a.max(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => unreachable!("at least one tag is registered"),
            };

            let total = self.filenames.len();
            for (processed, filename) in self.filenames.clone().into_iter().enumerate() {
                let path = Path::new(&filename);
                // pass 1: check that the file is structurally sound
                // up to the bounding tag
                let sound = match check_file_up_to(path, last, &self.skip_tags) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("failed structural check of {}: {}", filename, e);
                        false
                    }
                };
                if sound {
                    // pass 2: the syntax is ok, retrieve the data now
                    match open_file_up_to(path, last, &self.skip_tags) {
                        Ok(file) => self.process_file(&filename, &file),
                        Err(e) => {
                            warn!("failed to read {}: {}", filename, e);
                        }
                    }
                }
                observer.on_progress((processed + 1) as f64 / total as f64);
                observer.on_file(&filename);
            }
        }
        observer.on_end();
        true
    }

    /// The mapping extracted for the given file.
    ///
    /// An unknown or unreadable filename yields the standing empty
    /// mapping.
    pub fn mapping(&self, filename: &str) -> &TagToValue {
        self.mappings
            .get(filename)
            .unwrap_or_else(|| &self.mappings[UNREADABLE])
    }

    /// Whether the given file was successfully indexed by the last scan.
    pub fn is_key(&self, filename: &str) -> bool {
        self.mappings.contains_key(filename)
    }

    /// The input filenames which were successfully indexed,
    /// preserving input order.
    pub fn keys(&self) -> Vec<&str> {
        let keys: Vec<&str> = self
            .filenames
            .iter()
            .map(String::as_str)
            .filter(|f| self.is_key(f))
            .collect();
        debug_assert!(keys.len() <= self.filenames.len());
        keys
    }

    /// The extracted value of `tag` for `filename`, if any.
    pub fn value(&self, filename: &str, tag: Tag) -> Option<&str> {
        self.mapping(filename).get(&tag).map(|v| &**v)
    }

    /// The distinct values of `tag` across all scanned files.
    pub fn values_of(&self, tag: Tag) -> BTreeSet<&str> {
        self.filenames
            .iter()
            .filter_map(|f| self.mapping(f).get(&tag))
            .map(|v| &**v)
            .collect()
    }

    /// The distinct values of `tag` across all scanned files,
    /// in order of first occurrence (input order, not sorted).
    pub fn ordered_values_of(&self, tag: Tag) -> Vec<&str> {
        let mut seen = Vec::new();
        for filename in &self.filenames {
            if let Some(value) = self.mapping(filename).get(&tag) {
                let value: &str = value;
                if !seen.contains(&value) {
                    seen.push(value);
                }
            }
        }
        seen
    }

    /// The first filename (in input order) whose value for `tag`
    /// starts with `valueref`, after discarding one trailing space
    /// from `valueref` if present.
    ///
    /// This is a deliberately loose prefix match;
    /// see [`all_filenames_for`](Self::all_filenames_for)
    /// for the exact-match variant.
    pub fn filename_for(&self, tag: Tag, valueref: &str) -> Option<&str> {
        let prefix = valueref.strip_suffix(' ').unwrap_or(valueref);
        self.filenames
            .iter()
            .map(String::as_str)
            .find(|f| {
                self.value(f, tag)
                    .map(|v| v.starts_with(prefix))
                    .unwrap_or(false)
            })
    }

    /// All filenames whose trimmed value for `tag` is exactly equal to
    /// trimmed `valueref`.
    ///
    /// Unlike [`filename_for`](Self::filename_for), this is an exact
    /// match on space-trimmed values. The asymmetry between the two
    /// lookups is long-standing observable behavior and is kept as is.
    pub fn all_filenames_for(&self, tag: Tag, valueref: &str) -> Vec<&str> {
        let wanted = valueref.trim_matches(' ');
        self.filenames
            .iter()
            .map(String::as_str)
            .filter(|f| {
                self.value(f, tag)
                    .map(|v| v.trim_matches(' ') == wanted)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// The mapping of the first file whose value for `tag` matches
    /// `valueref` under the prefix semantics of
    /// [`filename_for`](Self::filename_for).
    pub fn mapping_for(&self, tag: Tag, valueref: &str) -> &TagToValue {
        self.mapping(self.filename_for(tag, valueref).unwrap_or(UNREADABLE))
    }

    /// Iterate over the value pool.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| &**v)
    }

    // ---------------- private methods ---------------------

    /// Extract every registered tag from a decoded file
    /// into a fresh mapping for `filename`.
    fn process_file(&mut self, filename: &str, file: &File) {
        let mut mapping = TagToValue::new();

        for tag in self.tags.iter().copied() {
            // file meta elements are routed to the meta block,
            // everything else to the main data set
            let value = if tag.is_file_meta() {
                file.meta()
                    .element_value(tag)
                    .map(|s| s.trim_end_matches(['\0', ' ']).to_string())
            } else {
                stringify(file.dataset(), tag)
            };
            if let Some(value) = value {
                let interned = intern(&mut self.values, &value);
                mapping.insert(tag, interned);
            }
        }

        for ptag in &self.private_tags {
            if let Some(actual) = resolve_private(file.dataset(), ptag) {
                if let Some(value) = stringify(file.dataset(), actual) {
                    let interned = intern(&mut self.values, &value);
                    mapping.insert(ptag.tag(), interned);
                }
            }
        }

        self.mappings.insert(filename.to_string(), mapping);
    }
}

/// Intern a value into the pool, returning the shared instance.
fn intern(values: &mut HashSet<Arc<str>>, value: &str) -> Arc<str> {
    if let Some(existing) = values.get(value) {
        return existing.clone();
    }
    let shared: Arc<str> = Arc::from(value);
    values.insert(shared.clone());
    shared
}

/// Stringify the value of an element, if present and primitive.
fn stringify(dataset: &DataSet, tag: Tag) -> Option<String> {
    let element = dataset.find(tag)?;
    match element.to_str() {
        Ok(s) => Some(s.into_owned()),
        Err(e) => {
            warn!("cannot render element {} as a string: {}", tag, e);
            None
        }
    }
}

/// Resolve a creator-qualified private tag against the block the
/// creator actually reserved in this data set.
///
/// The creator element `(gggg,00xx)` holding the matching
/// identification string determines the block byte `xx`;
/// the attribute then lives at `(gggg,xx00 | offset)`.
fn resolve_private(dataset: &DataSet, ptag: &PrivateTag) -> Option<Tag> {
    let group = ptag.tag().group();
    for block in 0x10u16..=0xFF {
        let creator_tag = Tag(group, block);
        let Some(element) = dataset.find(creator_tag) else {
            continue;
        };
        let Ok(creator) = element.to_str() else {
            continue;
        };
        if creator.trim_matches(' ') == ptag.creator() {
            return Some(Tag(group, (block << 8) | u16::from(ptag.element_offset())));
        }
    }
    None
}

impl fmt::Display for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Values:")?;
        for value in &self.values {
            writeln!(f, "{}", value)?;
        }
        writeln!(f, "Mapping:")?;
        for filename in &self.filenames {
            let comment = if self.is_key(filename) {
                "could be read"
            } else {
                "could not be read"
            };
            writeln!(f, "Filename: {} ({})", filename, comment)?;
            if let Some(mapping) = self.mappings.get(filename) {
                for (tag, value) in mapping {
                    writeln!(f, "{} -> [{}]", tag, value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_are_dropped_on_registration() {
        let mut scanner = Scanner::default();
        scanner.add_tag(Tag(0x0008, 0x0060));
        // not in the dictionary
        scanner.add_tag(Tag(0x0008, 0xFF00));
        // known but a sequence
        scanner.add_tag(Tag(0x0008, 0x1110));
        assert_eq!(scanner.tags.len(), 1);

        scanner.add_private_tag(PrivateTag::new(
            Tag(0x0029, 0x1010),
            "SIEMENS CSA HEADER",
        ));
        scanner.add_private_tag(PrivateTag::new(Tag(0x0029, 0x1010), "ACME UNKNOWN"));
        assert_eq!(scanner.private_tags.len(), 1);
    }

    #[test]
    fn empty_mapping_for_unknown_files() {
        let scanner = Scanner::default();
        assert!(scanner.mapping("never-scanned.dcm").is_empty());
        assert!(scanner.value("never-scanned.dcm", Tag(0x0008, 0x0060)).is_none());
    }

    #[test]
    fn scan_without_registered_tags_is_a_no_op() {
        let mut scanner = Scanner::default();
        let mut events = observer::RecordingObserver::default();
        assert!(scanner.scan_with(&["a.dcm", "b.dcm"], &mut events));
        assert!(events.started && events.ended);
        assert!(events.files.is_empty());
    }
}
