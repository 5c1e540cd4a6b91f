//! # HZW Core
//!
//! Core components for the HZW hybrid LZW + Huffman codec.
//!
//! This crate provides the building blocks shared by every codec stage:
//!
//! - [`bitstream`]: MSB-first bit-level I/O for variable-length codes
//! - [`crc`]: CRC-64 used to derive content identifiers
//! - [`traits`]: Cooperative cancellation hooks
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! HZW is designed as a layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Front end                                           │
//! │     hzw CLI                                             │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container + orchestrator                            │
//! │     "HZW1" header, metrics, round-trip verification     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec stages                                        │
//! │     LZW dictionary coder, canonical Huffman coder       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, CRC-64, cancellation           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hzw_core::bitstream::{BitReader, BitWriter};
//! use hzw_core::crc::Crc64;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0xABC, 12);
//! let (bytes, pad_bits) = writer.finish();
//!
//! let mut reader = BitReader::with_padding(&bytes, pad_bits).unwrap();
//! assert_eq!(reader.read_bits(12).unwrap(), 0xABC);
//!
//! assert_eq!(Crc64::compute(b"123456789"), 0x995DC9BBDF1939FA);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::Crc64;
pub use error::{HzwError, Result};
pub use traits::{CANCEL_CHECK_INTERVAL, CancelFlag, CancelPoller, Cancellation, NeverCancel};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::error::{HzwError, Result};
    pub use crate::traits::{CancelFlag, Cancellation, NeverCancel};
}
