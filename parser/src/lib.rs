//! This crate works on top of `rdcm-encoding`
//! to provide a middle-level abstraction for reading and writing
//! DICOM data sets: a stateful decoder which knows how to fetch
//! element headers and values under a negotiated transfer syntax,
//! and token-based data set readers and writers on top of it.
//!
//! Nested content is tracked with an explicit delimiter stack,
//! so adversarially deep sequence nesting cannot exhaust the call
//! stack.

pub mod dataset;
pub mod stateful;

pub use dataset::read::{DataSetReader, DataSetReaderOptions};
pub use dataset::write::DataSetWriter;
pub use dataset::DataToken;
pub use stateful::decode::StatefulDecoder;
