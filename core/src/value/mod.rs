//! This module includes a high level abstraction over a DICOM data element's
//! value, with awareness of multiplicity, nested data sets, and encapsulated
//! pixel data fragments.

use crate::header::{HasLength, Length};
use smallvec::SmallVec;
use std::borrow::Cow;

mod primitive;

pub use self::primitive::{CastValueError, ConvertValueError, PrimitiveValue};

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// Type alias for the in-memory pixel data fragment data.
pub type InMemFragment = Vec<u8>;

/// Stub type representing a non-existing DICOM object.
///
/// This type implements `HasLength`, but cannot be instantiated.
/// This makes it so that `Value<EmptyObject>` is sure to be either a
/// primitive value or a pixel data fragment sequence.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum EmptyObject {}

impl HasLength for EmptyObject {
    fn length(&self) -> Length {
        match *self {}
    }
}

/// Representation of a full DICOM value, which may be either primitive or
/// another DICOM object.
///
/// `I` is the complex type for nested data set items,
/// which should usually implement [`HasLength`].
/// `P` is the encapsulated pixel data fragment type,
/// which should usually implement `AsRef<[u8]>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<I, P = InMemFragment> {
    /// Primitive value.
    Primitive(PrimitiveValue),
    /// A complex sequence of items.
    Sequence {
        /// Item collection.
        items: C<I>,
        /// The size in bytes (can be undefined).
        size: Length,
    },
    /// An encapsulated pixel data sequence.
    PixelSequence {
        /// The value contents of the offset table.
        offset_table: C<u32>,
        /// The sequence of compressed fragments.
        fragments: C<P>,
    },
}

impl<I, P> Value<I, P> {
    /// Construct a DICOM value from a primitive value.
    #[inline]
    pub fn new(value: PrimitiveValue) -> Self {
        Value::Primitive(value)
    }

    /// Construct a DICOM data set sequence value
    /// from a list of items and a length.
    #[inline]
    pub fn new_sequence<T>(items: T, size: Length) -> Self
    where
        T: Into<C<I>>,
    {
        Value::Sequence {
            items: items.into(),
            size,
        }
    }

    /// Construct an encapsulated pixel data sequence value
    /// from an offset table and a list of fragments.
    pub fn new_pixel_sequence<T>(offset_table: C<u32>, fragments: T) -> Self
    where
        T: Into<C<P>>,
    {
        Value::PixelSequence {
            offset_table,
            fragments: fragments.into(),
        }
    }

    /// Obtain the number of individual values.
    /// In a primitive, this is the number of individual elements in the
    /// value. In a sequence, this is the number of items.
    /// In a pixel sequence, this is currently set to 1
    /// regardless of the number of compressed fragments.
    pub fn multiplicity(&self) -> u32 {
        match self {
            Value::Primitive(v) => v.multiplicity(),
            Value::Sequence { items, .. } => items.len() as u32,
            Value::PixelSequence { .. } => 1,
        }
    }

    /// Gets a reference to the primitive value.
    pub fn primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Gets a reference to the items of a sequence.
    ///
    /// Returns `None` if the value is not a data set sequence.
    pub fn items(&self) -> Option<&[I]> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Gets a reference to the fragments of an encapsulated pixel data
    /// sequence.
    ///
    /// Returns `None` if the value is not a pixel sequence.
    pub fn fragments(&self) -> Option<&[P]> {
        match self {
            Value::PixelSequence { fragments, .. } => Some(fragments),
            _ => None,
        }
    }

    /// Retrieve the value as a single clean string,
    /// with trailing padding removed.
    ///
    /// Returns an error if the value is not primitive.
    pub fn to_str(&self) -> Result<Cow<'_, str>, CastValueError> {
        match self {
            Value::Primitive(v) => Ok(v.to_str()),
            Value::Sequence { .. } => Err(CastValueError {
                requested: "string",
                got: "sequence",
            }),
            Value::PixelSequence { .. } => Err(CastValueError {
                requested: "string",
                got: "pixel sequence",
            }),
        }
    }

    /// Retrieve the full primitive value as raw bytes.
    ///
    /// Returns an error if the value is not primitive.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>, CastValueError> {
        match self {
            Value::Primitive(v) => Ok(v.to_bytes()),
            Value::Sequence { .. } => Err(CastValueError {
                requested: "bytes",
                got: "sequence",
            }),
            Value::PixelSequence { .. } => Err(CastValueError {
                requested: "bytes",
                got: "pixel sequence",
            }),
        }
    }
}

impl<I, P> HasLength for Value<I, P> {
    fn length(&self) -> Length {
        match self {
            Value::Primitive(v) => v.length(),
            Value::Sequence { size, .. } => *size,
            Value::PixelSequence { .. } => Length::UNDEFINED,
        }
    }
}

impl<I, P> From<PrimitiveValue> for Value<I, P> {
    fn from(v: PrimitiveValue) -> Self {
        Value::Primitive(v)
    }
}

impl<I, P> From<&str> for Value<I, P> {
    fn from(v: &str) -> Self {
        Value::Primitive(v.into())
    }
}

impl<I, P> From<String> for Value<I, P> {
    fn from(v: String) -> Self {
        Value::Primitive(v.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn sequence_values_have_no_string_form() {
        let v: Value<EmptyObject> = Value::new_sequence(C::new(), Length(0));
        assert!(v.to_str().is_err());
    }

    #[test]
    fn pixel_sequence_exposes_fragments() {
        let v: Value<EmptyObject> =
            Value::new_pixel_sequence(smallvec![0], vec![vec![0xAAu8, 0xBB]]);
        assert_eq!(v.fragments().unwrap().len(), 1);
        assert!(v.length().is_undefined());
    }
}
