//! This crate contains the DICOM encoding and decoding primitives:
//! element header decoders and encoders for the uncompressed transfer
//! syntaxes, endian-aware primitive value codecs, text repertoire
//! support, and the boundary to external pixel data codecs.

pub mod adapters;
pub mod decode;
pub mod encode;
pub mod text;
pub mod transfer_syntax;

pub use adapters::{CodecError, ImageInfo, PixelDataDecoder};
pub use decode::basic::BasicDecoder;
pub use decode::Decode;
pub use encode::{BasicEncode, Encode};
pub use text::{DefaultCharacterSetCodec, SpecificCharacterSet, TextCodec};
pub use transfer_syntax::TransferSyntax;
