//! LZW encoder (bytes to code sequence).

use crate::config::LzwConfig;
use crate::dictionary::LzwDictionary;
use hzw_core::error::{HzwError, Result};
use hzw_core::traits::{CancelPoller, Cancellation, NeverCancel};
use tracing::debug;

/// LZW encoder for compression.
#[derive(Debug)]
pub struct LzwEncoder {
    /// Dictionary for string lookup.
    dict: LzwDictionary,
}

impl LzwEncoder {
    /// Create a new LZW encoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        let dict = LzwDictionary::new(config)?;
        Ok(Self { dict })
    }

    /// Get the dictionary built by the last call to `encode`.
    pub fn dictionary(&self) -> &LzwDictionary {
        &self.dict
    }

    /// Encode data into a sequence of LZW codes.
    ///
    /// # Algorithm
    ///
    /// 1. Reset the dictionary to the single-byte entries
    /// 2. Extend the current match `w` while `w + byte` is in the dictionary
    /// 3. Otherwise emit the code for `w`, add `w + byte` (unless frozen),
    ///    and restart the match at `byte`
    /// 4. Emit the code for the final match
    ///
    /// # Returns
    ///
    /// The code sequence; empty for empty input.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u16>> {
        self.encode_with(input, &NeverCancel)
    }

    /// Encode data, polling `cancel` periodically.
    pub fn encode_with(&mut self, input: &[u8], cancel: &dyn Cancellation) -> Result<Vec<u16>> {
        self.dict.reset();

        let mut codes = Vec::with_capacity(input.len() / 2 + 1);
        let Some((&first, rest)) = input.split_first() else {
            return Ok(codes);
        };

        let alphabet_size = self.dict.config().alphabet_size;
        let max_code = self.dict.config().max_code();
        let check = |byte: u8| {
            if u16::from(byte) >= alphabet_size {
                Err(HzwError::invalid_symbol(byte, alphabet_size))
            } else {
                Ok(())
            }
        };

        check(first)?;
        let mut current = u16::from(first);
        let mut poller = CancelPoller::new(cancel);

        for &byte in rest {
            poller.tick()?;
            check(byte)?;

            match self.dict.find_child(current, byte) {
                // Scanning: the longer match is known.
                Some(code) => current = code,
                // Emit: longest match found, restart from `byte`.
                None => {
                    codes.push(current);
                    if self.dict.add(current, byte) == Some(max_code) {
                        debug!(max_code, "LZW dictionary full, freezing");
                    }
                    current = u16::from(byte);
                }
            }
        }

        codes.push(current);

        debug!(
            input_len = input.len(),
            codes = codes.len(),
            dictionary = self.dict.len(),
            "LZW encode complete"
        );

        Ok(codes)
    }

    /// Reset the encoder to initial state.
    pub fn reset(&mut self) {
        self.dict.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::LzwDecoder;

    fn roundtrip(config: LzwConfig, original: &[u8]) -> Vec<u16> {
        let mut encoder = LzwEncoder::new(config).unwrap();
        let codes = encoder.encode(original).unwrap();

        let mut decoder = LzwDecoder::new(config).unwrap();
        let decoded = decoder.decode(&codes).unwrap();
        assert_eq!(decoded, original);
        codes
    }

    #[test]
    fn test_encode_classic_example() {
        let codes = roundtrip(LzwConfig::DEFAULT, b"TOBEORNOTTOBEORTOBEORNOT");
        // 24 bytes collapse into 16 codes.
        assert_eq!(codes.len(), 16);
        assert_eq!(&codes[..9], &[84, 79, 66, 69, 79, 82, 78, 79, 84]);
    }

    #[test]
    fn test_encode_empty() {
        let mut encoder = LzwEncoder::new(LzwConfig::DEFAULT).unwrap();
        assert!(encoder.encode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_encode_single_byte() {
        let codes = roundtrip(LzwConfig::DEFAULT, b"A");
        assert_eq!(codes, vec![65]);
    }

    #[test]
    fn test_encode_repeating() {
        let original = vec![b'X'; 500];
        let codes = roundtrip(LzwConfig::DEFAULT, &original);
        // Run lengths grow by one per code: 1 + 2 + ... + 31 = 496.
        assert_eq!(codes.len(), 32);
    }

    #[test]
    fn test_encode_alternating() {
        let codes = roundtrip(LzwConfig::DEFAULT, b"ababab");
        assert_eq!(codes, vec![97, 98, 256, 256]);
    }

    #[test]
    fn test_encode_all_bytes() {
        let original: Vec<u8> = (0..=255).collect();
        let codes = roundtrip(LzwConfig::DEFAULT, &original);
        assert_eq!(codes.len(), 256);
    }

    #[test]
    fn test_symbol_outside_alphabet() {
        let mut encoder = LzwEncoder::new(LzwConfig::with_alphabet(9, 2)).unwrap();
        assert!(matches!(
            encoder.encode(&[0, 1, 2]),
            Err(HzwError::InvalidSymbol {
                byte: 2,
                alphabet_size: 2
            })
        ));
    }

    #[test]
    fn test_codes_bounded_by_width() {
        let config = LzwConfig::new(9);
        let original: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(20_000)
            .copied()
            .collect();

        let codes = roundtrip(config, &original);
        assert!(codes.iter().all(|&c| c <= config.max_code()));

        let mut encoder = LzwEncoder::new(config).unwrap();
        encoder.encode(&original).unwrap();
        assert!(encoder.dictionary().is_full());
        assert_eq!(encoder.dictionary().next_code(), 512);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let data = b"This is a test of compression! ".repeat(10);
        let mut encoder = LzwEncoder::new(LzwConfig::DEFAULT).unwrap();
        let first = encoder.encode(&data).unwrap();
        let second = encoder.encode(&data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_cancelled() {
        let mut encoder = LzwEncoder::new(LzwConfig::DEFAULT).unwrap();
        let data = vec![7u8; hzw_core::CANCEL_CHECK_INTERVAL * 2];
        let cancel = || true;
        assert!(matches!(
            encoder.encode_with(&data, &cancel),
            Err(HzwError::Cancelled)
        ));
    }
}
