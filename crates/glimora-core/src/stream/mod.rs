//! Byte-stream to text-fragment decoding.

mod decoder;

pub use decoder::{decode_fragments, FragmentStream};
