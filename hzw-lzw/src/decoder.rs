//! LZW decoder (code sequence to bytes).
//!
//! The decoder rebuilds the encoder's dictionary one step behind it: each
//! code after the first adds `previous string + first byte of this string`.
//! The only code that may refer to an entry the decoder has not built yet is
//! `next_code` itself (the KwKwK case), whose string is necessarily the
//! previous string followed by its own first byte.

use crate::config::LzwConfig;
use crate::dictionary::LzwDictionary;
use hzw_core::error::{HzwError, Result};
use hzw_core::traits::{CancelPoller, Cancellation, NeverCancel};
use tracing::debug;

/// Upper bound on speculative output pre-allocation.
const MAX_PREALLOC: usize = 1 << 24;

/// LZW decoder for decompression.
#[derive(Debug)]
pub struct LzwDecoder {
    /// Dictionary for code lookup.
    dict: LzwDictionary,
}

impl LzwDecoder {
    /// Create a new LZW decoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        let dict = LzwDictionary::new(config)?;
        Ok(Self { dict })
    }

    /// Decode a code sequence back into bytes.
    pub fn decode(&mut self, codes: &[u16]) -> Result<Vec<u8>> {
        self.decode_with(codes, None, &NeverCancel)
    }

    /// Decode a code sequence, polling `cancel` periodically.
    ///
    /// # Parameters
    ///
    /// - `codes`: LZW code sequence
    /// - `expected_len`: if known, the exact output length; decoding stops as
    ///   soon as the output grows past it
    /// - `cancel`: cancellation hook
    ///
    /// # Errors
    ///
    /// - [`HzwError::InvalidCode`] if a code is beyond the dictionary and is
    ///   not the KwKwK entry
    /// - [`HzwError::SizeMismatch`] if the output outgrows `expected_len`
    pub fn decode_with(
        &mut self,
        codes: &[u16],
        expected_len: Option<usize>,
        cancel: &dyn Cancellation,
    ) -> Result<Vec<u8>> {
        self.dict.reset();

        let limit = expected_len.unwrap_or(usize::MAX);
        let mut output = Vec::with_capacity(expected_len.unwrap_or(codes.len()).min(MAX_PREALLOC));
        let mut prev_code: Option<u16> = None;
        let mut poller = CancelPoller::new(cancel);

        for &code in codes {
            poller.tick()?;

            let next_code = self.dict.next_code();
            let start = output.len();

            if u32::from(code) < next_code {
                // Code exists in dictionary - the common case
                self.dict.expand_into(code, &mut output)?;
                if let Some(prev) = prev_code {
                    self.dict.add_decoded(prev, output[start]);
                }
            } else if u32::from(code) == next_code && !self.dict.is_full() {
                // KwKwK: the entry under construction is prev + prev[0]
                let prev = prev_code.ok_or_else(|| HzwError::invalid_code(code, next_code))?;
                self.dict.expand_into(prev, &mut output)?;
                let first = output[start];
                output.push(first);
                self.dict.add_decoded(prev, first);
            } else {
                return Err(HzwError::invalid_code(code, next_code));
            }

            if output.len() > limit {
                return Err(HzwError::size_mismatch(limit as u64, output.len() as u64));
            }
            prev_code = Some(code);
        }

        debug!(
            codes = codes.len(),
            output_len = output.len(),
            dictionary = self.dict.len(),
            "LZW decode complete"
        );

        Ok(output)
    }

    /// Reset the decoder to initial state.
    pub fn reset(&mut self) {
        self.dict.reset();
    }
}
