//! Serialized Huffman table.
//!
//! ```text
//! code_count: LEB128       number of coded symbols in the payload
//! run_count:  LEB128       number of symbol runs
//! runs:       run_count x { gap: LEB128, count: LEB128, length: u8 }
//! ```
//!
//! A run is `count` consecutive symbols sharing one code length. `gap` is
//! the distance from the end of the previous run (or from symbol 0 for the
//! first run) to the run's first symbol. LZW output uses long stretches of
//! consecutive codes, so a handful of runs usually describes the whole table.

use crate::canonical::CodeTable;
use hzw_core::error::{HzwError, Result};
use std::collections::BTreeMap;

/// Smallest possible serialized run (one byte per field).
const MIN_RUN_LEN: usize = 3;

/// Consecutive symbols with equal code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: u32,
    count: u32,
    len: u8,
}

/// A canonical code table plus the number of symbols coded with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTable {
    code_count: u64,
    codes: CodeTable,
}

impl HuffmanTable {
    /// Create a table describing `code_count` symbols coded with `codes`.
    pub fn new(code_count: u64, codes: CodeTable) -> Self {
        Self { code_count, codes }
    }

    /// The table of an empty stream.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of symbols in the payload.
    pub fn code_count(&self) -> u64 {
        self.code_count
    }

    /// The canonical codes.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for &(symbol, len) in self.codes.lengths() {
            let symbol = u32::from(symbol);
            match runs.last_mut() {
                Some(run) if run.len == len && run.start + run.count == symbol => run.count += 1,
                _ => runs.push(Run {
                    start: symbol,
                    count: 1,
                    len,
                }),
            }
        }
        runs
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        let runs = self.runs();
        let mut len = varint_len(self.code_count) + varint_len(runs.len() as u64);
        let mut next = 0;
        for run in &runs {
            len += varint_len(u64::from(run.start - next)) + varint_len(u64::from(run.count)) + 1;
            next = run.start + run.count;
        }
        len
    }

    /// Append the serialized table to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let runs = self.runs();
        write_varint(out, self.code_count);
        write_varint(out, runs.len() as u64);

        let mut next = 0;
        for run in &runs {
            write_varint(out, u64::from(run.start - next));
            write_varint(out, u64::from(run.count));
            out.push(run.len);
            next = run.start + run.count;
        }
    }

    /// Serialize the table.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Parse and validate a serialized table.
    ///
    /// `bytes` must hold exactly one table. Every symbol must be at most
    /// `max_symbol`.
    ///
    /// # Errors
    ///
    /// [`HzwError::CorruptHeader`] for any malformed or inconsistent table.
    pub fn parse(bytes: &[u8], max_symbol: u16) -> Result<Self> {
        let mut pos = 0;
        let code_count = read_varint(bytes, &mut pos, u64::MAX)?;
        let run_count = read_varint(bytes, &mut pos, u64::MAX)?;

        if run_count > ((bytes.len() - pos) / MIN_RUN_LEN) as u64 {
            return Err(HzwError::corrupt_header(format!(
                "Huffman table declares {} runs in {} bytes",
                run_count,
                bytes.len() - pos
            )));
        }

        let symbol_limit = u64::from(max_symbol) + 1;
        let mut lengths = BTreeMap::new();
        let mut next = 0u64;

        for _ in 0..run_count {
            let gap = read_varint(bytes, &mut pos, symbol_limit)?;
            let count = read_varint(bytes, &mut pos, symbol_limit)?;
            let len = *bytes
                .get(pos)
                .ok_or_else(|| HzwError::corrupt_header("Huffman table truncated"))?;
            pos += 1;

            if count == 0 {
                return Err(HzwError::corrupt_header("empty symbol run in Huffman table"));
            }

            let start = next + gap;
            let end = start + count;
            if end > symbol_limit {
                return Err(HzwError::corrupt_header(format!(
                    "Huffman table symbol {} exceeds maximum code {}",
                    end - 1,
                    max_symbol
                )));
            }

            for symbol in start..end {
                lengths.insert(symbol as u16, len);
            }
            next = end;
        }

        if pos != bytes.len() {
            return Err(HzwError::corrupt_header(format!(
                "{} trailing bytes after Huffman table",
                bytes.len() - pos
            )));
        }

        if (code_count == 0) != lengths.is_empty() {
            return Err(HzwError::corrupt_header(format!(
                "Huffman table has {} symbols for {} codes",
                lengths.len(),
                code_count
            )));
        }

        let codes = CodeTable::from_lengths(&lengths)?;
        Ok(Self { code_count, codes })
    }
}

fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Read a LEB128 value no greater than `max`.
fn read_varint(bytes: &[u8], pos: &mut usize, max: u64) -> Result<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = *bytes
            .get(*pos)
            .ok_or_else(|| HzwError::corrupt_header("Huffman table truncated"))?;
        *pos += 1;

        let part = u64::from(byte & 0x7F);
        if shift > 63 || (shift == 63 && part > 1) {
            return Err(HzwError::corrupt_header("overlong varint in Huffman table"));
        }
        value |= part << shift;

        if byte & 0x80 == 0 {
            if value > max {
                return Err(HzwError::corrupt_header(format!(
                    "Huffman table field {} out of range",
                    value
                )));
            }
            return Ok(value);
        }
        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(code_count: u64, lengths: &[(u16, u8)]) -> HuffmanTable {
        let lengths: BTreeMap<u16, u8> = lengths.iter().copied().collect();
        HuffmanTable::new(code_count, CodeTable::from_lengths(&lengths).unwrap())
    }

    #[test]
    fn test_layout() {
        let t = table(7, &[(65, 1), (66, 2), (300, 2)]);
        let bytes = t.to_bytes();

        let expected = vec![
            7, // code_count
            3, // run_count
            65, 1, 1, // symbol 65, length 1
            0, 1, 2, // symbol 66, length 2
            // 300 - 67 = 233 = 0b1_1101001
            0xE9, 0x01, 1, 2,
        ];

        assert_eq!(bytes, expected);
        assert_eq!(t.encoded_len(), bytes.len());
        assert_eq!(HuffmanTable::parse(&bytes, 4095).unwrap(), t);
    }

    #[test]
    fn test_runs_merge() {
        // 256..=383 all length 7: one run.
        let lengths: Vec<(u16, u8)> = (256..384).map(|s| (s, 7)).collect();
        let t = table(128, &lengths);
        let bytes = t.to_bytes();
        assert_eq!(bytes, vec![0x80, 0x01, 1, 0x80, 0x02, 0x80, 0x01, 7]);
        assert_eq!(HuffmanTable::parse(&bytes, 4095).unwrap(), t);
    }

    #[test]
    fn test_empty_table() {
        let bytes = HuffmanTable::empty().to_bytes();
        assert_eq!(bytes, vec![0, 0]);
        let parsed = HuffmanTable::parse(&bytes, 4095).unwrap();
        assert_eq!(parsed.code_count(), 0);
        assert!(parsed.codes().is_empty());
    }

    #[test]
    fn test_large_symbols() {
        let t = table(10, &[(0, 1), (65535, 1)]);
        let bytes = t.to_bytes();
        assert_eq!(t.encoded_len(), bytes.len());
        assert_eq!(HuffmanTable::parse(&bytes, u16::MAX).unwrap(), t);
        assert!(HuffmanTable::parse(&bytes, 4095).is_err());
    }

    fn assert_corrupt(bytes: &[u8]) {
        assert!(matches!(
            HuffmanTable::parse(bytes, 4095),
            Err(HzwError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_truncated() {
        let bytes = table(3, &[(1, 1), (2, 2), (3, 2)]).to_bytes();
        for cut in 0..bytes.len() {
            assert_corrupt(&bytes[..cut]);
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = table(3, &[(1, 1), (2, 1)]).to_bytes();
        bytes.push(0);
        assert_corrupt(&bytes);
    }

    #[test]
    fn test_empty_run() {
        assert_corrupt(&[3, 2, 1, 0, 1, 0, 2, 1]);
    }

    #[test]
    fn test_over_subscribed() {
        // Symbols 1..=3, all of length 1.
        assert_corrupt(&[3, 1, 1, 3, 1]);
    }

    #[test]
    fn test_incomplete() {
        // Symbols 1 and 2 with lengths 1 and 2.
        assert_corrupt(&[3, 2, 1, 1, 1, 0, 1, 2]);
    }

    #[test]
    fn test_zero_and_overlong_lengths() {
        assert_corrupt(&[3, 1, 1, 2, 0]);
        assert_corrupt(&[3, 1, 1, 2, 25]);
    }

    #[test]
    fn test_symbol_above_max() {
        let bytes = table(3, &[(1, 1), (5000, 1)]).to_bytes();
        assert_corrupt(&bytes);

        // A run that starts in range but ends past the limit.
        assert_corrupt(&[3, 1, 0x80, 0x1F, 0x81, 0x01, 8]);
    }

    #[test]
    fn test_count_mismatch() {
        let mut bytes = table(3, &[(1, 1), (2, 1)]).to_bytes();
        bytes[0] = 0;
        assert_corrupt(&bytes);

        assert_corrupt(&[9, 0]);
    }

    #[test]
    fn test_overlong_varint() {
        let mut bytes = vec![0xFF; 10];
        bytes.push(0x01);
        bytes.push(0);
        assert_corrupt(&bytes);
    }
}
