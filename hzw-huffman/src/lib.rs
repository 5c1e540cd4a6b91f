//! # HZW-Huffman: Canonical Huffman Coding of 16-bit Symbols
//!
//! Second stage of the HZW pipeline. The LZW code stream is entropy coded
//! with a Huffman code built from its exact symbol frequencies.
//!
//! ## Pipeline
//!
//! 1. [`count_frequencies`] over the symbol sequence
//! 2. [`HuffmanTree::from_frequencies`] with deterministic tie-breaking
//! 3. [`HuffmanTree::code_lengths`] limited to [`MAX_CODE_LENGTH`] bits
//! 4. [`CodeTable::from_lengths`] assigns canonical codes
//! 5. Code words are packed MSB-first with [`hzw_core::BitWriter`]
//!
//! Only the code lengths travel with the data, in the [`HuffmanTable`]
//! byte layout. The decoder rebuilds the same canonical codes from them.
//!
//! ## Example
//!
//! ```rust
//! use hzw_huffman::{HuffmanTable, decode, encode};
//!
//! let symbols = [256u16, 65, 66, 256, 256, 65];
//! let stream = encode(&symbols).unwrap();
//! assert!(stream.table.codes().is_prefix_free());
//!
//! let bytes = stream.table.to_bytes();
//! let table = HuffmanTable::parse(&bytes, 4095).unwrap();
//! let decoded = decode(&table, &stream.payload, stream.pad_bits).unwrap();
//! assert_eq!(decoded, symbols);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod canonical;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod table;
pub mod tree;

pub use canonical::{Code, CodeTable, MAX_CODE_LENGTH};
pub use decoder::HuffmanDecoder;
pub use encoder::{EncodedStream, HuffmanEncoder};
pub use frequency::count_frequencies;
pub use table::HuffmanTable;
pub use tree::HuffmanTree;

use hzw_core::error::Result;

/// Encode symbols with the default code length limit.
pub fn encode(symbols: &[u16]) -> Result<EncodedStream> {
    HuffmanEncoder::new().encode(symbols)
}

/// Decode `table.code_count()` symbols from `payload`.
pub fn decode(table: &HuffmanTable, payload: &[u8], pad_bits: u8) -> Result<Vec<u16>> {
    HuffmanDecoder::new(table)?.decode(payload, pad_bits)
}
