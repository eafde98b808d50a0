//! In-memory representation of a DICOM data set:
//! an ordered collection of data elements keyed by tag.
//!
//! Data sets are assembled from a token stream with an explicit frame
//! stack, so nested sequences of any depth are built without native
//! recursion.

use rdcm_core::header::{DataElementHeader, Length};
use rdcm_core::value::{Value, C};
use rdcm_core::{DataElement, Tag, VR};
use rdcm_parser::dataset::DataToken;
use snafu::{Backtrace, Snafu};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// The type of data element effectively borne by a data set.
pub type InMemElement = DataElement<DataSet, Vec<u8>>;

/// Module-level error type for data set lookups.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum AccessError {
    /// No element with the requested tag.
    /// Use [`DataSet::find`] to probe for presence without failing.
    #[snafu(display("No such data element {}", tag))]
    NoSuchElement { tag: Tag, backtrace: Backtrace },
}

/// Module-level error type for data set assembly from a token stream.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum BuildError {
    /// A value token arrived without its element header.
    #[snafu(display("Value token without a preceding element header"))]
    UnexpectedValue { backtrace: Backtrace },
    /// An item or sequence boundary token arrived out of place.
    #[snafu(display("Unbalanced sequence structure token"))]
    UnbalancedStructure { backtrace: Backtrace },
    /// The token stream ended inside a sequence or item.
    #[snafu(display("Premature end of token stream"))]
    PrematureEnd { backtrace: Backtrace },
}

/// An in-memory DICOM data set:
/// an ordered collection of data elements,
/// with tag order defining iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    entries: BTreeMap<Tag, InMemElement>,
}

impl DataSet {
    /// Create an empty data set.
    pub fn new_empty() -> Self {
        DataSet::default()
    }

    /// Look up an element by tag, yielding its presence.
    pub fn find(&self, tag: Tag) -> Option<&InMemElement> {
        self.entries.get(&tag)
    }

    /// Look up an element by tag, failing when absent.
    /// Callers should [`find`](Self::find) first or accept the failure.
    pub fn element(&self, tag: Tag) -> Result<&InMemElement, AccessError> {
        self.entries
            .get(&tag)
            .ok_or_else(|| NoSuchElementSnafu { tag }.build())
    }

    /// Insert an element, replacing any previous entry under its tag.
    pub fn put(&mut self, elem: InMemElement) {
        use rdcm_core::header::Header;
        self.entries.insert(elem.tag(), elem);
    }

    /// The number of elements at this level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the elements in ascending tag order.
    pub fn iter(&self) -> btree_map::Values<'_, Tag, InMemElement> {
        self.entries.values()
    }

    /// Assemble a data set from a stream of data set tokens.
    ///
    /// Sequence nesting is tracked on an explicit frame stack.
    /// Skipped-value tokens drop their element;
    /// failed tokens abort the build with the reader's error.
    pub fn from_tokens<I, E>(tokens: I) -> Result<Self, DataSetBuildError<E>>
    where
        I: IntoIterator<Item = Result<DataToken, E>>,
    {
        let mut root = BTreeMap::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut pending_header: Option<DataElementHeader> = None;

        fn insert(
            root: &mut BTreeMap<Tag, InMemElement>,
            frames: &mut [Frame],
            elem: InMemElement,
        ) {
            use rdcm_core::header::Header;
            let target = frames.iter_mut().rev().find_map(|f| match f {
                Frame::Item { entries, .. } => Some(entries),
                _ => None,
            });
            match target {
                Some(entries) => {
                    entries.insert(elem.tag(), elem);
                }
                None => {
                    root.insert(elem.tag(), elem);
                }
            }
        }

        for token in tokens {
            let token = token.map_err(DataSetBuildError::Read)?;
            match token {
                DataToken::ElementHeader(header) => {
                    pending_header = Some(header);
                }
                DataToken::PrimitiveValue(value) => {
                    let header = pending_header
                        .take()
                        .ok_or_else(|| DataSetBuildError::Build(UnexpectedValueSnafu.build()))?;
                    let elem = DataElement::new_with_len(
                        header.tag,
                        header.vr,
                        header.len,
                        Value::Primitive(value),
                    );
                    insert(&mut root, &mut frames, elem);
                }
                DataToken::SkippedValue(_) => {
                    // recognized but deliberately not materialized
                    pending_header = None;
                }
                DataToken::SequenceStart { tag, len } => {
                    frames.push(Frame::Sequence {
                        tag,
                        len,
                        items: C::new(),
                    });
                }
                DataToken::PixelSequenceStart => {
                    frames.push(Frame::Pixel {
                        offset_table: C::new(),
                        fragments: C::new(),
                    });
                }
                DataToken::ItemStart { .. } => {
                    let top_is_pixel = matches!(frames.last(), Some(Frame::Pixel { .. }));
                    let top_is_sequence = matches!(frames.last(), Some(Frame::Sequence { .. }));
                    if top_is_sequence {
                        frames.push(Frame::Item {
                            entries: BTreeMap::new(),
                        });
                    } else if !top_is_pixel {
                        // pixel data items carry fragments, not data sets
                        return Err(DataSetBuildError::Build(
                            UnbalancedStructureSnafu.build(),
                        ));
                    }
                }
                DataToken::ItemEnd => {
                    if matches!(frames.last(), Some(Frame::Pixel { .. })) {
                        // a pixel fragment boundary, nothing to assemble
                    } else if let Some(Frame::Item { entries }) = frames.pop() {
                        match frames.last_mut() {
                            Some(Frame::Sequence { items, .. }) => {
                                items.push(DataSet { entries });
                            }
                            _ => {
                                return Err(DataSetBuildError::Build(
                                    UnbalancedStructureSnafu.build(),
                                ))
                            }
                        }
                    } else {
                        return Err(DataSetBuildError::Build(UnbalancedStructureSnafu.build()));
                    }
                }
                DataToken::SequenceEnd => {
                    let elem = match frames.pop() {
                        Some(Frame::Sequence { tag, len, items }) => DataElement::new_with_len(
                            tag,
                            VR::SQ,
                            len,
                            Value::Sequence { items, size: len },
                        ),
                        Some(Frame::Pixel {
                            offset_table,
                            fragments,
                        }) => DataElement::new_with_len(
                            Tag(0x7FE0, 0x0010),
                            VR::OB,
                            Length::UNDEFINED,
                            Value::PixelSequence {
                                offset_table,
                                fragments,
                            },
                        ),
                        _ => {
                            return Err(DataSetBuildError::Build(
                                UnbalancedStructureSnafu.build(),
                            ))
                        }
                    };
                    insert(&mut root, &mut frames, elem);
                }
                DataToken::OffsetTable(table) => match frames.last_mut() {
                    Some(Frame::Pixel { offset_table, .. }) => {
                        offset_table.extend(table);
                    }
                    _ => {
                        return Err(DataSetBuildError::Build(UnbalancedStructureSnafu.build()))
                    }
                },
                DataToken::ItemValue(data) => match frames.last_mut() {
                    Some(Frame::Pixel { fragments, .. }) => {
                        fragments.push(data);
                    }
                    _ => {
                        return Err(DataSetBuildError::Build(UnbalancedStructureSnafu.build()))
                    }
                },
            }
        }

        if !frames.is_empty() {
            return Err(DataSetBuildError::Build(PrematureEndSnafu.build()));
        }
        Ok(DataSet { entries: root })
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a InMemElement;
    type IntoIter = btree_map::Values<'a, Tag, InMemElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<InMemElement> for DataSet {
    fn from_iter<T: IntoIterator<Item = InMemElement>>(iter: T) -> Self {
        let mut ds = DataSet::new_empty();
        for elem in iter {
            ds.put(elem);
        }
        ds
    }
}

/// One level of pending structure during token assembly.
#[derive(Debug)]
enum Frame {
    Sequence {
        tag: Tag,
        len: Length,
        items: C<DataSet>,
    },
    Item {
        entries: BTreeMap<Tag, InMemElement>,
    },
    Pixel {
        offset_table: C<u32>,
        fragments: C<Vec<u8>>,
    },
}

/// Error type of [`DataSet::from_tokens`]:
/// either a reader error carried through,
/// or a structural violation found during assembly.
#[derive(Debug)]
pub enum DataSetBuildError<E> {
    /// The token source failed.
    Read(E),
    /// The token stream itself was inconsistent.
    Build(BuildError),
}

impl<E: std::fmt::Display> std::fmt::Display for DataSetBuildError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSetBuildError::Read(e) => write!(f, "could not read data set token: {}", e),
            DataSetBuildError::Build(e) => e.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for DataSetBuildError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataSetBuildError::Read(e) => Some(e),
            DataSetBuildError::Build(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdcm_core::value::PrimitiveValue;

    fn ok<T>(token: T) -> Result<T, std::convert::Infallible> {
        Ok(token)
    }

    #[test]
    fn find_and_element_lookups() {
        let mut ds = DataSet::new_empty();
        ds.put(DataElement::new(
            Tag(0x0008, 0x0060),
            VR::CS,
            Value::from("MR"),
        ));
        assert!(ds.find(Tag(0x0008, 0x0060)).is_some());
        assert!(ds.find(Tag(0x0010, 0x0010)).is_none());
        assert!(matches!(
            ds.element(Tag(0x0010, 0x0010)),
            Err(AccessError::NoSuchElement { .. })
        ));
    }

    #[test]
    fn iteration_is_in_tag_order() {
        let mut ds = DataSet::new_empty();
        for tag in [
            Tag(0x0010, 0x0020),
            Tag(0x0008, 0x0060),
            Tag(0x0010, 0x0010),
        ] {
            ds.put(DataElement::new(tag, VR::LO, Value::from("x")));
        }
        let tags: Vec<Tag> = ds.iter().map(rdcm_core::header::Header::tag).collect();
        assert_eq!(
            tags,
            vec![
                Tag(0x0008, 0x0060),
                Tag(0x0010, 0x0010),
                Tag(0x0010, 0x0020),
            ]
        );
    }

    #[test]
    fn build_nested_data_set_from_tokens() {
        let header = DataElementHeader::new(Tag(0x0008, 0x1150), VR::UI, Length(4));
        let tokens = vec![
            ok(DataToken::SequenceStart {
                tag: Tag(0x0008, 0x1110),
                len: Length::UNDEFINED,
            }),
            ok(DataToken::ItemStart {
                len: Length::UNDEFINED,
            }),
            ok(DataToken::ElementHeader(header)),
            ok(DataToken::PrimitiveValue(PrimitiveValue::from("1.2"))),
            ok(DataToken::ItemEnd),
            ok(DataToken::SequenceEnd),
        ];
        let ds = DataSet::from_tokens(tokens).unwrap();
        let seq = ds.element(Tag(0x0008, 0x1110)).unwrap();
        let items = seq.value().items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0]
                .element(Tag(0x0008, 0x1150))
                .unwrap()
                .to_str()
                .unwrap(),
            "1.2"
        );
    }

    #[test]
    fn skipped_values_are_not_materialized() {
        let header = DataElementHeader::new(Tag(0x0010, 0x0010), VR::PN, Length(8));
        let tokens = vec![
            ok(DataToken::ElementHeader(header)),
            ok(DataToken::SkippedValue(8)),
        ];
        let ds = DataSet::from_tokens(tokens).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn unbalanced_structure_is_rejected() {
        let tokens = vec![ok(DataToken::ItemEnd)];
        assert!(matches!(
            DataSet::from_tokens(tokens),
            Err(DataSetBuildError::Build(BuildError::UnbalancedStructure { .. }))
        ));

        let tokens = vec![ok(DataToken::SequenceStart {
            tag: Tag(0x0008, 0x1110),
            len: Length::UNDEFINED,
        })];
        assert!(matches!(
            DataSet::from_tokens(tokens),
            Err(DataSetBuildError::Build(BuildError::PrematureEnd { .. }))
        ));
    }
}
