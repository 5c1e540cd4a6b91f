//! Bit-level I/O for variable-length codes.
//!
//! This module provides [`BitWriter`] and [`BitReader`] for packing Huffman
//! codes into a byte buffer and reading them back.
//!
//! # Bit Ordering
//!
//! HZW packs bits MSB-first (Most Significant Bit first): the first bit
//! written lands in bit 7 of the first byte. Multi-bit values are written
//! with their most significant bit first, so a canonical Huffman code can be
//! emitted as a single `write_bits` call and decoded one bit at a time by
//! walking the tree from the root.
//!
//! # Example
//!
//! ```
//! use hzw_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b1100, 4);
//! let (bytes, pad_bits) = writer.finish();
//! assert_eq!(pad_bits, 1);
//!
//! let mut reader = BitReader::with_padding(&bytes, pad_bits).unwrap();
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! assert_eq!(reader.bits_remaining(), 0);
//! ```

use crate::error::{HzwError, Result};

/// An MSB-first bit writer backed by a growable byte buffer.
///
/// Bits accumulate in a 64-bit buffer and complete bytes are flushed to the
/// output as soon as they fill. Call [`BitWriter::finish`] to pad the final
/// partial byte and learn how many filler bits were added.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Output bytes.
    output: Vec<u8>,
    /// Pending bits, right-aligned.
    buffer: u64,
    /// Number of pending bits in `buffer` (always < 8 between calls).
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` output bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Write the `count` low-order bits of `value`, most significant first.
    ///
    /// # Arguments
    ///
    /// * `value` - The bits to write
    /// * `count` - Number of bits to write (0-32)
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        if count == 0 {
            return;
        }

        let mask = if count == 32 {
            u32::MAX
        } else {
            (1u32 << count).wrapping_sub(1)
        };

        self.buffer = (self.buffer << count) | u64::from(value & mask);
        self.bits_in_buffer += count;
        self.total_bits_written += u64::from(count);

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }
        self.buffer &= (1u64 << self.bits_in_buffer) - 1;
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u32::from(bit), 1);
    }

    /// Pad the final partial byte with zero bits and return the output.
    ///
    /// # Returns
    ///
    /// The packed bytes and the number of pad bits (0-7) appended to the
    /// last byte. A reader built with [`BitReader::with_padding`] and this
    /// count sees exactly the bits that were written.
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let mut pad_bits = 0;
        if self.bits_in_buffer > 0 {
            pad_bits = 8 - self.bits_in_buffer;
            self.output.push((self.buffer << pad_bits) as u8);
        }
        (self.output, pad_bits)
    }
}

/// An MSB-first bit reader over a byte slice.
///
/// The reader knows exactly how many bits are meaningful, so trailing pad
/// bits are never mistaken for data.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Number of readable bits.
    limit_bits: u64,
    /// Bits consumed so far.
    position: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limit_bits: data.len() as u64 * 8,
            position: 0,
        }
    }

    /// Create a reader that ignores `pad_bits` filler bits at the end.
    ///
    /// Fails with [`HzwError::CorruptHeader`] if `pad_bits` exceeds 7 or is
    /// non-zero for an empty buffer.
    pub fn with_padding(data: &'a [u8], pad_bits: u8) -> Result<Self> {
        if pad_bits > 7 {
            return Err(HzwError::corrupt_header(format!(
                "pad bit count {} exceeds 7",
                pad_bits
            )));
        }
        if data.is_empty() && pad_bits > 0 {
            return Err(HzwError::corrupt_header("pad bits declared for empty payload"));
        }

        Ok(Self {
            data,
            limit_bits: data.len() as u64 * 8 - u64::from(pad_bits),
            position: 0,
        })
    }

    /// Get the number of bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.position
    }

    /// Get the number of readable bits left.
    pub fn bits_remaining(&self) -> u64 {
        self.limit_bits - self.position
    }

    /// Check whether every readable bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.position >= self.limit_bits
    }

    /// Read up to 32 bits, most significant first.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of bits to read (0-32)
    ///
    /// # Returns
    ///
    /// The bits read, right-aligned in a u32. Fails with
    /// [`HzwError::UnexpectedEndOfStream`] without consuming anything if
    /// fewer than `count` bits remain.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        let available = self.bits_remaining();
        if u64::from(count) > available {
            return Err(HzwError::unexpected_eos(u64::from(count), available));
        }

        let mut value = 0u64;
        let mut remaining = count;
        while remaining > 0 {
            let byte = self.data[(self.position / 8) as usize];
            let bit_offset = (self.position % 8) as u8;
            let in_byte = 8 - bit_offset;
            let take = remaining.min(in_byte);

            let bits = (byte >> (in_byte - take)) & (((1u16 << take) - 1) as u8);
            value = (value << take) | u64::from(bits);

            self.position += u64::from(take);
            remaining -= take;
        }

        Ok(value as u32)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.limit_bits {
            return Err(HzwError::unexpected_eos(1, 0));
        }

        let byte = self.data[(self.position / 8) as usize];
        let bit = (byte >> (7 - (self.position % 8))) & 1;
        self.position += 1;
        Ok(bit != 0)
    }
}
