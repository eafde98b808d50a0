//! This module contains a mid-level abstraction for reading DICOM
//! content sequentially: the content of a data set is presented as a
//! stream of tokens, which can be used to form a syntax tree of a full
//! data set.

pub mod read;
pub mod write;

use rdcm_core::header::{DataElementHeader, Length};
use rdcm_core::value::PrimitiveValue;
use rdcm_core::Tag;
use std::fmt;

/// A token of a DICOM data set stream.
///
/// This is part of the interpretation of a data set as a stream of
/// symbols, which may either represent data headers or actual value
/// data.
#[derive(Debug, Clone, PartialEq)]
pub enum DataToken {
    /// A data header of a primitive value.
    ElementHeader(DataElementHeader),
    /// A primitive data element value.
    PrimitiveValue(PrimitiveValue),
    /// A primitive value which was recognized but not materialized;
    /// the given number of value bytes was consumed and discarded.
    SkippedValue(u32),
    /// The beginning of a sequence element.
    SequenceStart {
        /// the sequence tag
        tag: Tag,
        /// the declared length of the sequence value
        len: Length,
    },
    /// The ending delimiter of a sequence.
    SequenceEnd,
    /// The beginning of a new item in the sequence.
    ItemStart {
        /// the declared length of the item
        len: Length,
    },
    /// The ending delimiter of an item.
    ItemEnd,
    /// The beginning of an encapsulated pixel data sequence.
    PixelSequenceStart,
    /// The basic offset table of an encapsulated pixel data sequence.
    OffsetTable(Vec<u32>),
    /// A raw item value (one encapsulated pixel data fragment).
    ItemValue(Vec<u8>),
}

impl fmt::Display for DataToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataToken::PrimitiveValue(v) => write!(f, "PrimitiveValue({} values)", v.multiplicity()),
            DataToken::ItemValue(data) => write!(f, "ItemValue({} bytes)", data.len()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// The type of delimiter the data set reader is currently tracking:
/// the start of a sequence or the start of an item.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SeqTokenType {
    /// Delimiter of a sequence value.
    Sequence,
    /// Delimiter of an item value.
    Item,
}
