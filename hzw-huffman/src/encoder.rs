//! Huffman encoder (symbols to bit-packed payload).

use crate::canonical::{CodeTable, MAX_CODE_LENGTH};
use crate::frequency::count_frequencies;
use crate::table::HuffmanTable;
use crate::tree::HuffmanTree;
use hzw_core::bitstream::BitWriter;
use hzw_core::error::{HzwError, Result};
use hzw_core::traits::{CancelPoller, Cancellation, NeverCancel};
use tracing::debug;

/// Output of [`HuffmanEncoder::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    /// Table needed to decode the payload.
    pub table: HuffmanTable,
    /// Code words packed MSB-first.
    pub payload: Vec<u8>,
    /// Zero bits padding the last payload byte (0..=7).
    pub pad_bits: u8,
}

impl EncodedStream {
    /// The stream of an empty symbol sequence.
    pub fn empty() -> Self {
        Self {
            table: HuffmanTable::empty(),
            payload: Vec::new(),
            pad_bits: 0,
        }
    }
}

/// Huffman encoder.
#[derive(Debug, Clone, Copy)]
pub struct HuffmanEncoder {
    max_length: u8,
}

impl Default for HuffmanEncoder {
    fn default() -> Self {
        Self {
            max_length: MAX_CODE_LENGTH,
        }
    }
}

impl HuffmanEncoder {
    /// Create an encoder limited to [`MAX_CODE_LENGTH`]-bit codes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with a tighter code length limit.
    pub fn with_max_length(max_length: u8) -> Result<Self> {
        if !(1..=MAX_CODE_LENGTH).contains(&max_length) {
            return Err(HzwError::invalid_config(format!(
                "Huffman code length limit {} outside 1..={}",
                max_length, MAX_CODE_LENGTH
            )));
        }
        Ok(Self { max_length })
    }

    /// Code length limit in bits.
    pub fn max_length(&self) -> u8 {
        self.max_length
    }

    /// Encode a symbol sequence.
    ///
    /// An empty sequence yields an empty table and payload.
    pub fn encode(&self, symbols: &[u16]) -> Result<EncodedStream> {
        self.encode_with(symbols, &NeverCancel)
    }

    /// Encode a symbol sequence, polling `cancel` while packing bits.
    pub fn encode_with(&self, symbols: &[u16], cancel: &dyn Cancellation) -> Result<EncodedStream> {
        if symbols.is_empty() {
            return Ok(EncodedStream::empty());
        }

        let frequencies = count_frequencies(symbols);
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let codes = CodeTable::from_lengths(&tree.code_lengths(self.max_length)?)?;

        let total_bits: u64 = frequencies
            .iter()
            .map(|(&symbol, &count)| count * codes.get(symbol).map_or(0, |c| u64::from(c.len)))
            .sum();

        let mut writer = BitWriter::with_capacity(total_bits.div_ceil(8) as usize);
        let mut poller = CancelPoller::new(cancel);

        for &symbol in symbols {
            poller.tick()?;
            let Some(code) = codes.get(symbol) else {
                return Err(HzwError::corrupt_header(format!(
                    "symbol {} missing from its own Huffman table",
                    symbol
                )));
            };
            writer.write_bits(code.bits, code.len);
        }

        debug_assert_eq!(writer.bits_written(), total_bits);
        let (payload, pad_bits) = writer.finish();

        debug!(
            symbols = symbols.len(),
            distinct = codes.len(),
            longest_code = codes.max_length(),
            payload_bytes = payload.len(),
            "Huffman encode complete"
        );

        Ok(EncodedStream {
            table: HuffmanTable::new(symbols.len() as u64, codes),
            payload,
            pad_bits,
        })
    }
}
