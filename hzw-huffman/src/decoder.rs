//! Huffman decoder (bit-packed payload to symbols).

use crate::table::HuffmanTable;
use hzw_core::bitstream::BitReader;
use hzw_core::error::{HzwError, Result};
use hzw_core::traits::{CancelPoller, Cancellation, NeverCancel};
use tracing::debug;

/// Upper bound on speculative output pre-allocation.
const MAX_PREALLOC: u64 = 1 << 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Branch(u32),
    Leaf(u16),
}

/// Huffman decoder.
///
/// The canonical table is turned back into an explicit binary tree, which
/// is then walked one bit at a time from the root.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    /// Children of each internal node, indexed by bit.
    nodes: Vec<[Slot; 2]>,
    code_count: u64,
}

impl HuffmanDecoder {
    /// Build the decoding tree for `table`.
    pub fn new(table: &HuffmanTable) -> Result<Self> {
        let mut nodes = vec![[Slot::Empty; 2]];

        for (symbol, code) in table.codes().iter() {
            let mut node = 0usize;
            for shift in (0..code.len).rev() {
                let bit = ((code.bits >> shift) & 1) as usize;
                if shift == 0 {
                    if nodes[node][bit] != Slot::Empty {
                        return Err(HzwError::corrupt_header("Huffman codes are not prefix-free"));
                    }
                    nodes[node][bit] = Slot::Leaf(symbol);
                    break;
                }

                node = match nodes[node][bit] {
                    Slot::Branch(next) => next as usize,
                    Slot::Empty => {
                        let next = nodes.len();
                        nodes.push([Slot::Empty; 2]);
                        nodes[node][bit] = Slot::Branch(next as u32);
                        next
                    }
                    Slot::Leaf(_) => {
                        return Err(HzwError::corrupt_header("Huffman codes are not prefix-free"));
                    }
                };
            }
        }

        Ok(Self {
            nodes,
            code_count: table.code_count(),
        })
    }

    /// Number of symbols this decoder will produce.
    pub fn code_count(&self) -> u64 {
        self.code_count
    }

    /// Decode the payload.
    pub fn decode(&self, payload: &[u8], pad_bits: u8) -> Result<Vec<u16>> {
        self.decode_with(payload, pad_bits, &NeverCancel)
    }

    /// Decode the payload, polling `cancel` once per symbol interval.
    ///
    /// # Errors
    ///
    /// - [`HzwError::UnexpectedEndOfStream`] if the payload is empty or ends
    ///   before `code_count` symbols are decoded
    /// - [`HzwError::CorruptHeader`] if the payload holds a bit pattern with
    ///   no code, or bits are left over after the last symbol
    pub fn decode_with(
        &self,
        payload: &[u8],
        pad_bits: u8,
        cancel: &dyn Cancellation,
    ) -> Result<Vec<u16>> {
        if payload.is_empty() && self.code_count > 0 {
            return Err(HzwError::unexpected_eos(self.code_count, 0));
        }
        let mut reader = BitReader::with_padding(payload, pad_bits)?;

        // Every code is at least one bit long.
        let capacity = self
            .code_count
            .min(reader.bits_remaining())
            .min(MAX_PREALLOC);
        let mut symbols = Vec::with_capacity(capacity as usize);
        let mut poller = CancelPoller::new(cancel);

        for _ in 0..self.code_count {
            poller.tick()?;

            let mut node = 0usize;
            let symbol = loop {
                let bit = reader.read_bit()?;
                match self.nodes[node][usize::from(bit)] {
                    Slot::Leaf(symbol) => break symbol,
                    Slot::Branch(next) => node = next as usize,
                    Slot::Empty => {
                        return Err(HzwError::corrupt_header(format!(
                            "unassigned Huffman code at payload bit {}",
                            reader.bit_position() - 1
                        )));
                    }
                }
            };
            symbols.push(symbol);
        }

        if reader.bits_remaining() > 0 {
            return Err(HzwError::corrupt_header(format!(
                "{} payload bits left after the last symbol",
                reader.bits_remaining()
            )));
        }

        debug!(
            symbols = symbols.len(),
            payload_bytes = payload.len(),
            "Huffman decode complete"
        );

        Ok(symbols)
    }
}
