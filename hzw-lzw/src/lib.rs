//! # HZW-LZW: Adaptive LZW Dictionary Coder
//!
//! This crate turns a byte sequence into a sequence of integer codes and back,
//! using the classic Lempel-Ziv-Welch scheme. It is the first stage of the HZW
//! pipeline; the code stream is handed to the Huffman stage as-is, so no bit
//! packing happens here.
//!
//! ## Dictionary rules
//!
//! - Codes `0..alphabet_size` are the single-byte strings (256 by default)
//! - Every emitted code except the last adds one new entry, numbered upward
//! - Once `2^max_bits` entries exist the dictionary is frozen: no new entries
//!   and no reset, the remaining input is coded against the frozen table
//! - No clear or end-of-information codes: the code count delimits the stream
//!
//! ## Example
//!
//! ```rust
//! use hzw_lzw::{LzwConfig, decode, encode};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let codes = encode(original, LzwConfig::DEFAULT).unwrap();
//! assert_eq!(codes.len(), 16);
//!
//! let decoded = decode(&codes, LzwConfig::DEFAULT).unwrap();
//! assert_eq!(decoded, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod dictionary;
mod encoder;

pub use config::{LzwConfig, MAX_CODE_BITS, MIN_CODE_BITS};
pub use decoder::LzwDecoder;
pub use dictionary::LzwDictionary;
pub use encoder::LzwEncoder;
pub use hzw_core::error::{HzwError, Result};

/// Encode bytes into LZW codes with the given configuration.
///
/// # Errors
///
/// - [`HzwError::InvalidConfig`] if `config` is out of range
/// - [`HzwError::InvalidSymbol`] if a byte is outside the configured alphabet
pub fn encode(data: &[u8], config: LzwConfig) -> Result<Vec<u16>> {
    let mut encoder = LzwEncoder::new(config)?;
    encoder.encode(data)
}

/// Decode LZW codes back into bytes with the given configuration.
///
/// # Errors
///
/// - [`HzwError::InvalidConfig`] if `config` is out of range
/// - [`HzwError::InvalidCode`] if the code stream could not have been
///   produced by an encoder with the same configuration
pub fn decode(codes: &[u16], config: LzwConfig) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(config)?;
    decoder.decode(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_default() {
        let original = b"This is a test of compression! ".repeat(10);
        let codes = encode(&original, LzwConfig::DEFAULT).unwrap();
        assert!(codes.len() < original.len());
        assert_eq!(decode(&codes, LzwConfig::DEFAULT).unwrap(), original);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            encode(b"abc", LzwConfig::new(8)),
            Err(HzwError::InvalidConfig { .. })
        ));
        assert!(matches!(
            decode(&[1, 2], LzwConfig::new(17)),
            Err(HzwError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_mismatched_width_detected() {
        // Codes produced with a 16-bit table reference entries a 9-bit
        // decoder never creates.
        let original: Vec<u8> = (0..30_000u32).map(|i| (i % 97) as u8).collect();
        let codes = encode(&original, LzwConfig::WIDE).unwrap();
        assert!(codes.iter().any(|&c| c > 511));
        assert!(matches!(
            decode(&codes, LzwConfig::new(9)),
            Err(HzwError::InvalidCode { .. })
        ));
    }
}
