//! LZW dictionary configuration.

use hzw_core::error::{HzwError, Result};

/// Smallest accepted maximum code width.
pub const MIN_CODE_BITS: u8 = 9;

/// Largest accepted maximum code width.
pub const MAX_CODE_BITS: u8 = 16;

/// LZW configuration parameters.
///
/// The encoder and decoder must agree on both fields: they decide which codes
/// are pre-seeded and when the dictionary stops growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Maximum code width in bits. The dictionary holds at most
    /// `2^max_bits` entries and is frozen once full.
    pub max_bits: u8,
    /// Number of single-byte entries seeded at reset (codes
    /// `0..alphabet_size`). Input bytes must be below this value.
    pub alphabet_size: u16,
}

impl LzwConfig {
    /// Default configuration: full byte alphabet, 12-bit codes (4096 entries).
    pub const DEFAULT: Self = Self {
        max_bits: 12,
        alphabet_size: 256,
    };

    /// Widest configuration: full byte alphabet, 16-bit codes (65536 entries).
    pub const WIDE: Self = Self {
        max_bits: MAX_CODE_BITS,
        alphabet_size: 256,
    };

    /// Create a configuration over the full byte alphabet.
    pub fn new(max_bits: u8) -> Self {
        Self {
            max_bits,
            alphabet_size: 256,
        }
    }

    /// Create a configuration with a reduced initial alphabet.
    pub fn with_alphabet(max_bits: u8, alphabet_size: u16) -> Self {
        Self {
            max_bits,
            alphabet_size,
        }
    }

    /// Check that the configuration describes a usable dictionary.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CODE_BITS..=MAX_CODE_BITS).contains(&self.max_bits) {
            return Err(HzwError::invalid_config(format!(
                "LZW max code width {} outside {}..={}",
                self.max_bits, MIN_CODE_BITS, MAX_CODE_BITS
            )));
        }
        if self.alphabet_size == 0 || self.alphabet_size > 256 {
            return Err(HzwError::invalid_config(format!(
                "LZW alphabet size {} outside 1..=256",
                self.alphabet_size
            )));
        }
        Ok(())
    }

    /// Get the first code assigned to a multi-byte entry.
    pub fn first_code(&self) -> u32 {
        u32::from(self.alphabet_size)
    }

    /// Get the largest code the dictionary may assign.
    pub fn max_code(&self) -> u16 {
        ((1u32 << self.max_bits) - 1) as u16
    }

    /// Get the maximum number of dictionary entries.
    pub fn capacity(&self) -> usize {
        1usize << self.max_bits
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
