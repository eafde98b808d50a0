//! Boundary to external pixel data codecs.
//!
//! When an element's value is an encapsulated (compressed) pixel stream,
//! this toolkit hands the opaque fragment byte ranges plus the declared
//! image geometry to an external decompression routine and receives raw
//! decoded samples back. The compression algorithms themselves are never
//! implemented here.

use snafu::{Backtrace, Snafu};

/// The image geometry attributes an external codec needs
/// to interpret a compressed pixel stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Number of columns (width).
    pub columns: u32,
    /// Number of rows (height).
    pub rows: u32,
    /// Number of samples (color channels) per pixel.
    pub samples_per_pixel: u16,
    /// Number of bits allocated per sample.
    pub bits_allocated: u16,
    /// Number of frames encoded in the stream.
    pub number_of_frames: u32,
}

/// An error type for failures of an external pixel data codec.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum CodecError {
    /// The codec rejected one of the fragments.
    #[snafu(display("could not decode pixel data fragment #{}: {}", index, message))]
    DecodeFragment {
        /// Index of the offending fragment.
        index: usize,
        /// Codec-specific failure description.
        message: String,
        backtrace: Backtrace,
    },

    /// The declared geometry does not match the decoded output.
    #[snafu(display(
        "decoded pixel buffer size {} does not match the declared geometry",
        actual
    ))]
    GeometryMismatch { actual: usize, backtrace: Backtrace },
}

/// Interface for an external pixel data decompression routine.
///
/// Implementations receive the ordered fragments of one encapsulated
/// pixel stream and the declared geometry, and return the raw decoded
/// sample buffer (frame-major, native endianness).
pub trait PixelDataDecoder {
    /// Decode the given fragments into a raw pixel sample buffer.
    fn decode(&self, fragments: &[Vec<u8>], info: &ImageInfo) -> Result<Vec<u8>, CodecError>;
}

/// A pixel data decoder which cannot exist.
///
/// Serves as a placeholder witness for code paths
/// where no codec is configured.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NeverPixelDecoder {}

impl PixelDataDecoder for NeverPixelDecoder {
    fn decode(&self, _fragments: &[Vec<u8>], _info: &ImageInfo) -> Result<Vec<u8>, CodecError> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A codec standing in for an external library:
    /// "decompresses" by concatenating fragments,
    /// and validates the output size against the geometry.
    #[derive(Debug, Default)]
    struct PassthroughDecoder;

    impl PixelDataDecoder for PassthroughDecoder {
        fn decode(&self, fragments: &[Vec<u8>], info: &ImageInfo) -> Result<Vec<u8>, CodecError> {
            let out: Vec<u8> = fragments.iter().flatten().copied().collect();
            let expected = info.columns as usize
                * info.rows as usize
                * info.samples_per_pixel as usize
                * (info.bits_allocated as usize / 8)
                * info.number_of_frames as usize;
            snafu::ensure!(
                out.len() == expected,
                GeometryMismatchSnafu { actual: out.len() }
            );
            Ok(out)
        }
    }

    #[test]
    fn codec_boundary_accepts_matching_geometry() {
        let info = ImageInfo {
            columns: 2,
            rows: 2,
            samples_per_pixel: 1,
            bits_allocated: 8,
            number_of_frames: 1,
        };
        let fragments = vec![vec![1u8, 2], vec![3u8, 4]];
        let out = PassthroughDecoder.decode(&fragments, &info).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn codec_boundary_rejects_mismatched_geometry() {
        let info = ImageInfo {
            columns: 4,
            rows: 4,
            samples_per_pixel: 1,
            bits_allocated: 8,
            number_of_frames: 1,
        };
        let fragments = vec![vec![0u8; 3]];
        assert!(matches!(
            PassthroughDecoder.decode(&fragments, &info),
            Err(CodecError::GeometryMismatch { .. })
        ));
    }
}
