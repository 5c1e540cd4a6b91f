//! # HZW-Codec: Hybrid LZW + Huffman Compression
//!
//! This crate ties the LZW and Huffman stages together and defines the
//! `HZW1` container that carries their output.
//!
//! ## Compression
//!
//! 1. LZW replaces repeated byte strings with dictionary codes
//! 2. Huffman coding entropy-codes the code stream
//! 3. The container stores the input length, LZW width, padding, canonical
//!    Huffman table and payload
//!
//! Decompression runs the same steps backwards and checks the reconstructed
//! length against the header.
//!
//! ## Example
//!
//! ```rust
//! use hzw_codec::{Container, compress, decompress, decompress_bytes};
//!
//! let input = b"TOBEORNOTTOBEORTOBEORNOT".repeat(20);
//! let (container, metrics) = compress(&input, 12).unwrap();
//! assert!(metrics.ratio > 1.0);
//!
//! assert_eq!(decompress(&container).unwrap(), input);
//!
//! let bytes = container.to_bytes();
//! assert_eq!(&bytes[..4], b"HZW1");
//! assert_eq!(decompress_bytes(&bytes).unwrap(), input);
//! ```
//!
//! ## Features
//!
//! - `parallel`: [`compress_batch`] compresses independent inputs on the
//!   rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

#[cfg(feature = "parallel")]
mod batch;
mod codec;
mod container;
mod metrics;

#[cfg(feature = "parallel")]
pub use batch::compress_batch;
pub use codec::{CodecOptions, CompressionResult, HzwCodec};
pub use container::{Container, ContainerHeader, HEADER_LEN, MAGIC};
pub use hzw_core::error::{HzwError, Result};
pub use hzw_core::traits::{CancelFlag, Cancellation, NeverCancel};
pub use metrics::{CompressionMetrics, ContentId};

/// Compress `input` with the given LZW dictionary width.
///
/// # Errors
///
/// [`HzwError::InvalidConfig`] if `max_dictionary_bits` is outside 9..=16.
pub fn compress(input: &[u8], max_dictionary_bits: u8) -> Result<(Container, CompressionMetrics)> {
    let result = HzwCodec::new(CodecOptions::new(max_dictionary_bits))?.compress(input)?;
    Ok((result.container, result.metrics))
}

/// Reconstruct the original bytes from a container.
pub fn decompress(container: &Container) -> Result<Vec<u8>> {
    HzwCodec::default().decompress(container)
}

/// Parse and decompress a serialized container.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    HzwCodec::default().decompress_bytes(data)
}

/// Compress with the default width, serialize, parse, decompress and compare.
pub fn verify_round_trip(input: &[u8]) -> Result<bool> {
    let codec = HzwCodec::default();
    let container = codec.compress(input)?.container;
    let decoded = codec.decompress_bytes(&container.to_bytes())?;
    Ok(decoded == input)
}
