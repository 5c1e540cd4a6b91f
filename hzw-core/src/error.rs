//! Error types for HZW operations.
//!
//! Every crate in the workspace reports failures through [`HzwError`]. The
//! codec performs no I/O of its own, so all variants except [`HzwError::Io`]
//! describe invalid input data or configuration, scoped to a single call.
//! The codec is deterministic, so retrying a failed call never helps.

use std::io;
use thiserror::Error;

/// The main error type for HZW operations.
#[derive(Debug, Error)]
pub enum HzwError {
    /// An operation that needs at least one symbol was given none.
    #[error("Empty input: nothing to encode")]
    EmptyInput,

    /// The bit or byte stream ended before the requested data was read.
    #[error("Unexpected end of stream: needed {needed} bits, {available} available")]
    UnexpectedEndOfStream {
        /// Number of bits requested.
        needed: u64,
        /// Number of bits still available.
        available: u64,
    },

    /// An LZW code that is neither in the dictionary nor the KwKwK entry.
    #[error("Invalid LZW code {code} (next code is {next_code})")]
    InvalidCode {
        /// The offending code.
        code: u16,
        /// Next code the dictionary would assign.
        next_code: u32,
    },

    /// The container header or Huffman table is inconsistent.
    #[error("Corrupt header: {message}")]
    CorruptHeader {
        /// Description of the inconsistency.
        message: String,
    },

    /// Magic number or format version not recognised.
    #[error("Unsupported format: expected \"HZW1\" magic, found {found:02x?}")]
    UnsupportedFormat {
        /// Magic bytes actually found.
        found: Vec<u8>,
    },

    /// Reconstructed output length disagrees with the header.
    #[error("Size mismatch: header declares {expected} bytes, decoded {actual}")]
    SizeMismatch {
        /// Length declared by the container.
        expected: u64,
        /// Length actually reconstructed.
        actual: u64,
    },

    /// Codec configuration out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Input byte outside the configured LZW alphabet.
    #[error("Input byte {byte:#04x} outside alphabet of {alphabet_size} symbols")]
    InvalidSymbol {
        /// The offending byte.
        byte: u8,
        /// Configured alphabet size.
        alphabet_size: u16,
    },

    /// The caller's cancellation hook asked the operation to stop.
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error from a caller-supplied reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for HZW operations.
pub type Result<T> = std::result::Result<T, HzwError>;

impl HzwError {
    /// Create an unexpected end-of-stream error.
    pub fn unexpected_eos(needed: u64, available: u64) -> Self {
        Self::UnexpectedEndOfStream { needed, available }
    }

    /// Create an invalid LZW code error.
    pub fn invalid_code(code: u16, next_code: u32) -> Self {
        Self::InvalidCode { code, next_code }
    }

    /// Create a corrupt header error.
    pub fn corrupt_header(message: impl Into<String>) -> Self {
        Self::CorruptHeader {
            message: message.into(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(found: impl Into<Vec<u8>>) -> Self {
        Self::UnsupportedFormat {
            found: found.into(),
        }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: u64, actual: u64) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid symbol error.
    pub fn invalid_symbol(byte: u8, alphabet_size: u16) -> Self {
        Self::InvalidSymbol {
            byte,
            alphabet_size,
        }
    }
}
