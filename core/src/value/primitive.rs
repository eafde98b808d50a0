//! Declaration and implementation of a DICOM primitive value.
//!
//! See [`PrimitiveValue`](./enum.PrimitiveValue.html).

use crate::header::{HasLength, Length, Tag};
use itertools::Itertools;
use num_traits::NumCast;
use smallvec::SmallVec;
use snafu::Snafu;
use std::borrow::Cow;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// An error type for casting a value into a form it does not have.
#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display("bad value cast: requested {} but value is {}", requested, got))]
pub struct CastValueError {
    /// The value form requested by the caller.
    pub requested: &'static str,
    /// A short description of the value's actual form.
    pub got: &'static str,
}

/// An error type for a failed conversion of a value into a target type.
#[derive(Debug, Snafu)]
#[snafu(display("could not convert value to {}: {}", target, reason))]
pub struct ConvertValueError {
    /// The name of the target type.
    pub target: &'static str,
    /// What went wrong.
    pub reason: String,
}

/// An enum representing a primitive value from a DICOM element.
/// The result of decoding an element's data value
/// may be one of the enumerated types
/// depending on its content and value representation.
///
/// Multiple elements are contained in a [`smallvec`] vector,
/// conveniently aliased to the type [`C`].
#[derive(Debug, PartialEq, Clone)]
pub enum PrimitiveValue {
    /// No data. Usually employed for zero-lengthed values.
    Empty,

    /// A sequence of strings.
    /// Used for AE, AS, PN, SH, CS, LO, UI and UC,
    /// as well as for IS, DS, DA, DT and TM
    /// when decoding with format preservation.
    Strs(C<String>),

    /// A single string.
    /// Used for ST, LT, UT and UR, which are never multi-valued.
    Str(String),

    /// A sequence of attribute tags.
    /// Used specifically for AT.
    Tags(C<Tag>),

    /// A sequence of unsigned 8-bit integers.
    /// Used for OB and UN.
    U8(C<u8>),

    /// A sequence of signed 16-bit integers.
    /// Used for SS.
    I16(C<i16>),

    /// A sequence of unsigned 16-bit integers.
    /// Used for US and OW.
    U16(C<u16>),

    /// A sequence of signed 32-bit integers.
    /// Used for SL.
    I32(C<i32>),

    /// A sequence of unsigned 32-bit integers.
    /// Used for UL and OL.
    U32(C<u32>),

    /// A sequence of signed 64-bit integers.
    /// Used for SV.
    I64(C<i64>),

    /// A sequence of unsigned 64-bit integers.
    /// Used for UV and OV.
    U64(C<u64>),

    /// A sequence of 32-bit floating point numbers.
    /// Used for OF and FL.
    F32(C<f32>),

    /// A sequence of 64-bit floating point numbers.
    /// Used for OD and FD.
    F64(C<f64>),
}

impl PrimitiveValue {
    /// Obtain the number of individual elements in the value.
    pub fn multiplicity(&self) -> u32 {
        use self::PrimitiveValue::*;
        match self {
            Empty => 0,
            Str(_) => 1,
            Strs(c) => c.len() as u32,
            Tags(c) => c.len() as u32,
            U8(c) => c.len() as u32,
            I16(c) => c.len() as u32,
            U16(c) => c.len() as u32,
            I32(c) => c.len() as u32,
            U32(c) => c.len() as u32,
            I64(c) => c.len() as u32,
            U64(c) => c.len() as u32,
            F32(c) => c.len() as u32,
            F64(c) => c.len() as u32,
        }
    }

    /// Determine the number of bytes the value would occupy
    /// when encoded, without the element header
    /// and without trailing padding to an even length.
    pub fn calculate_byte_len(&self) -> usize {
        use self::PrimitiveValue::*;
        match self {
            Empty => 0,
            Str(s) => s.len(),
            // multi-valued strings are separated by one backslash each
            Strs(c) => c.iter().map(String::len).sum::<usize>() + c.len().saturating_sub(1),
            Tags(c) => c.len() * 4,
            U8(c) => c.len(),
            I16(c) => c.len() * 2,
            U16(c) => c.len() * 2,
            I32(c) => c.len() * 4,
            U32(c) => c.len() * 4,
            I64(c) => c.len() * 8,
            U64(c) => c.len() * 8,
            F32(c) => c.len() * 4,
            F64(c) => c.len() * 8,
        }
    }

    /// Convert the value into a single clean string.
    ///
    /// Multiple values are joined by a backslash (`\`).
    /// Trailing space and NUL padding, which the encoding uses to keep
    /// values at an even byte length, is removed.
    pub fn to_str(&self) -> Cow<'_, str> {
        use self::PrimitiveValue::*;
        match self {
            Empty => Cow::from(""),
            Str(s) => trim_padding(s),
            Strs(c) if c.len() == 1 => trim_padding(&c[0]),
            Strs(c) => Cow::from(
                c.iter()
                    .map(|s| trim_padding(s))
                    .join("\\"),
            ),
            Tags(c) => Cow::from(c.iter().map(Tag::to_string).join("\\")),
            U8(c) => Cow::from(c.iter().map(u8::to_string).join("\\")),
            I16(c) => Cow::from(c.iter().map(i16::to_string).join("\\")),
            U16(c) => Cow::from(c.iter().map(u16::to_string).join("\\")),
            I32(c) => Cow::from(c.iter().map(i32::to_string).join("\\")),
            U32(c) => Cow::from(c.iter().map(u32::to_string).join("\\")),
            I64(c) => Cow::from(c.iter().map(i64::to_string).join("\\")),
            U64(c) => Cow::from(c.iter().map(u64::to_string).join("\\")),
            F32(c) => Cow::from(c.iter().map(f32::to_string).join("\\")),
            F64(c) => Cow::from(c.iter().map(f64::to_string).join("\\")),
        }
    }

    /// Convert the full primitive value into raw bytes.
    ///
    /// String values are provided in UTF-8;
    /// numbers are serialized in the native byte order.
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        use self::PrimitiveValue::*;
        match self {
            Empty => Cow::from(&[][..]),
            U8(c) => Cow::from(&c[..]),
            Str(s) => Cow::from(s.as_bytes()),
            Strs(c) if c.len() == 1 => Cow::from(c[0].as_bytes()),
            Strs(c) => Cow::from(c.iter().join("\\").into_bytes()),
            Tags(c) => {
                let mut buf = Vec::with_capacity(c.len() * 4);
                for tag in c {
                    buf.extend_from_slice(&tag.0.to_ne_bytes());
                    buf.extend_from_slice(&tag.1.to_ne_bytes());
                }
                Cow::from(buf)
            }
            I16(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            U16(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            I32(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            U32(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            I64(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            U64(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            F32(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
            F64(c) => Cow::from(c.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<_>>()),
        }
    }

    /// Retrieve and convert the first value into an integer.
    ///
    /// Numeric variants are cast with [`NumCast`];
    /// string variants are parsed.
    pub fn to_int<T>(&self) -> Result<T, ConvertValueError>
    where
        T: NumCast + std::str::FromStr<Err = std::num::ParseIntError>,
    {
        use self::PrimitiveValue::*;

        fn cast<T: NumCast, V: Copy + num_traits::ToPrimitive>(
            v: Option<&V>,
        ) -> Result<T, ConvertValueError> {
            v.copied().and_then(NumCast::from).ok_or(ConvertValueError {
                target: "integer",
                reason: "out of range or empty value".into(),
            })
        }

        match self {
            I16(c) => cast(c.first()),
            U16(c) => cast(c.first()),
            I32(c) => cast(c.first()),
            U32(c) => cast(c.first()),
            I64(c) => cast(c.first()),
            U64(c) => cast(c.first()),
            U8(c) => cast(c.first()),
            Str(s) => s.trim().parse().map_err(|e| ConvertValueError {
                target: "integer",
                reason: format!("{}", e),
            }),
            Strs(c) => c
                .first()
                .ok_or(ConvertValueError {
                    target: "integer",
                    reason: "empty value".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| ConvertValueError {
                    target: "integer",
                    reason: format!("{}", e),
                }),
            _ => Err(ConvertValueError {
                target: "integer",
                reason: "value form has no integer conversion".into(),
            }),
        }
    }
}

/// Remove the trailing space and NUL bytes the encoding
/// pads odd-length text values with.
fn trim_padding(s: &str) -> Cow<'_, str> {
    Cow::from(s.trim_end_matches(['\0', ' ']))
}

impl HasLength for PrimitiveValue {
    fn length(&self) -> Length {
        Length::defined(self.calculate_byte_len() as u32)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(s: &str) -> Self {
        PrimitiveValue::Strs(smallvec::smallvec![s.to_string()])
    }
}

impl From<String> for PrimitiveValue {
    fn from(s: String) -> Self {
        PrimitiveValue::Strs(smallvec::smallvec![s])
    }
}

impl From<u16> for PrimitiveValue {
    fn from(v: u16) -> Self {
        PrimitiveValue::U16(smallvec::smallvec![v])
    }
}

impl From<u32> for PrimitiveValue {
    fn from(v: u32) -> Self {
        PrimitiveValue::U32(smallvec::smallvec![v])
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(v: Vec<u8>) -> Self {
        PrimitiveValue::U8(v.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn stringify_joins_and_trims() {
        let v = PrimitiveValue::Strs(smallvec!["DERIVED".into(), "SECONDARY ".into()]);
        assert_eq!(v.to_str(), "DERIVED\\SECONDARY");

        let v = PrimitiveValue::Str("1.2.840.10008.1.2\0".into());
        assert_eq!(v.to_str(), "1.2.840.10008.1.2");

        let v = PrimitiveValue::U16(smallvec![512, 512]);
        assert_eq!(v.to_str(), "512\\512");

        assert_eq!(PrimitiveValue::Empty.to_str(), "");
    }

    #[test]
    fn byte_len_accounts_for_separators() {
        let v = PrimitiveValue::Strs(smallvec!["AB".into(), "CDE".into()]);
        assert_eq!(v.calculate_byte_len(), 6);
        let v = PrimitiveValue::U32(smallvec![1, 2, 3]);
        assert_eq!(v.calculate_byte_len(), 12);
    }

    #[test]
    fn integer_conversion() {
        let v = PrimitiveValue::U16(smallvec![256]);
        assert_eq!(v.to_int::<u32>().unwrap(), 256);
        let v = PrimitiveValue::from("42 ");
        assert_eq!(v.to_int::<i32>().unwrap(), 42);
        let v = PrimitiveValue::F32(smallvec![1.5]);
        assert!(v.to_int::<i32>().is_err());
    }
}
