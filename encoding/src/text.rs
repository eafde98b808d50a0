//! This module contains reusable components for encoding and decoding text
//! in DICOM data structures, including support for character repertoires.
//!
//! Text encoding support is limited to the repertoires the scanning
//! toolkit encounters in practice; see [`SpecificCharacterSet`] for the
//! complete enumeration.

use encoding::all::{ISO_8859_1, UTF_8};
use encoding::{DecoderTrap, EncoderTrap, Encoding};
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;

/// An error type for text encoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum EncodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    EncodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

/// An error type for text decoding issues.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DecodeTextError {
    /// A custom error message,
    /// for when the underlying error type does not encode error semantics
    /// into type variants.
    #[snafu(display("{}", message))]
    DecodeCustom {
        /// The error message in plain text.
        message: Cow<'static, str>,
        /// The generated backtrace, if available.
        backtrace: Backtrace,
    },
}

type EncodeResult<T> = Result<T, EncodeTextError>;
type DecodeResult<T> = Result<T, DecodeTextError>;

/// A holder of encoding and decoding mechanisms for text in DICOM content,
/// which according to the standard, depends on the specific character set.
pub trait TextCodec {
    /// Obtain the defined term (unique name) of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008, 0005) element to refer to this codec.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string. The resulting string
    /// _may_ contain backslash characters ('\') to delimit individual
    /// values, and should be split later on if required.
    fn decode(&self, text: &[u8]) -> DecodeResult<String>;

    /// Encode a text value into a byte vector. The input string can
    /// feature multiple text values by using the backslash character ('\')
    /// as the value delimiter.
    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>>;
}

impl<T: ?Sized> TextCodec for Box<T>
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        self.as_ref().decode(text)
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        self.as_ref().encode(text)
    }
}

impl<T: ?Sized> TextCodec for &T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        (**self).decode(text)
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        (**self).encode(text)
    }
}

/// An enum type for the currently supported character sets.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum SpecificCharacterSet {
    /// **ISO-IR 6**: the default character set.
    #[default]
    Default,
    /// **ISO-IR 100** (ISO-8859-1): the Western Europe character set.
    IsoIr100,
    /// **ISO-IR 192**: the Unicode character set based on UTF-8.
    IsoIr192,
}

impl SpecificCharacterSet {
    /// Obtain the specific character set identified by the given code
    /// string, as found in the Specific Character Set (0008,0005) element.
    pub fn from_code(code: &str) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match code.trim_end() {
            "Default" | "ISO_IR_6" | "ISO_IR 6" | "ISO 2022 IR 6" => Some(Default),
            "ISO_IR_100" | "ISO_IR 100" | "ISO 2022 IR 100" => Some(IsoIr100),
            "ISO_IR 192" => Some(IsoIr192),
            _ => None,
        }
    }

    /// Retrieve the respective text codec.
    pub fn codec(self) -> Box<dyn TextCodec> {
        match self {
            SpecificCharacterSet::Default => Box::new(DefaultCharacterSetCodec),
            SpecificCharacterSet::IsoIr100 => Box::new(IsoIr100CharacterSetCodec),
            SpecificCharacterSet::IsoIr192 => Box::new(Utf8CharacterSetCodec),
        }
    }
}

/// Data type representing the default character set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCharacterSetCodec;

impl TextCodec for DefaultCharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 6"
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        // ISO-8859-1 is a superset of the default repertoire,
        // and decoding it never fails
        ISO_8859_1
            .decode(text, DecoderTrap::Strict)
            .map_err(|message| DecodeCustomSnafu { message }.build())
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        ISO_8859_1
            .encode(text, EncoderTrap::Strict)
            .map_err(|message| EncodeCustomSnafu { message }.build())
    }
}

/// Data type representing the ISO-IR 100 (ISO-8859-1) character set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IsoIr100CharacterSetCodec;

impl TextCodec for IsoIr100CharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 100"
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        ISO_8859_1
            .decode(text, DecoderTrap::Strict)
            .map_err(|message| DecodeCustomSnafu { message }.build())
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        ISO_8859_1
            .encode(text, EncoderTrap::Strict)
            .map_err(|message| EncodeCustomSnafu { message }.build())
    }
}

/// Data type representing the ISO-IR 192 (UTF-8) character set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Utf8CharacterSetCodec;

impl TextCodec for Utf8CharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 192"
    }

    fn decode(&self, text: &[u8]) -> DecodeResult<String> {
        UTF_8
            .decode(text, DecoderTrap::Replace)
            .map_err(|message| DecodeCustomSnafu { message }.build())
    }

    fn encode(&self, text: &str) -> EncodeResult<Vec<u8>> {
        UTF_8
            .encode(text, EncoderTrap::Strict)
            .map_err(|message| EncodeCustomSnafu { message }.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codec_round_trips_ascii() {
        let codec = DefaultCharacterSetCodec;
        let decoded = codec.decode(b"Doe^John").unwrap();
        assert_eq!(decoded, "Doe^John");
        assert_eq!(codec.encode(&decoded).unwrap(), b"Doe^John");
    }

    #[test]
    fn character_set_from_code() {
        assert_eq!(
            SpecificCharacterSet::from_code("ISO_IR 100"),
            Some(SpecificCharacterSet::IsoIr100)
        );
        // trailing padding is tolerated
        assert_eq!(
            SpecificCharacterSet::from_code("ISO_IR 192 "),
            Some(SpecificCharacterSet::IsoIr192)
        );
        assert_eq!(SpecificCharacterSet::from_code("ISO_IR 999"), None);
    }
}
