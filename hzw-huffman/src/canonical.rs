//! Canonical Huffman code assignment.
//!
//! Only code lengths are ever transmitted. Codes are rebuilt from them the
//! same way on both sides: symbols are ordered by `(length, symbol)` and
//! consecutive code values are handed out within each length (RFC 1951,
//! section 3.2.2).

use hzw_core::error::{HzwError, Result};
use std::collections::BTreeMap;

/// Longest code length the table format accepts.
pub const MAX_CODE_LENGTH: u8 = 24;

/// A single code word, stored right-aligned and written MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Code {
    /// Code bits (the low `len` bits are significant).
    pub bits: u32,
    /// Code length in bits (0 for a symbol with no code).
    pub len: u8,
}

/// Symbol to code mapping derived canonically from code lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    /// `(symbol, length)` pairs in ascending symbol order.
    lengths: Vec<(u16, u8)>,
    /// Codes indexed by symbol.
    codes: Vec<Code>,
}

impl CodeTable {
    /// Build the canonical table for the given per-symbol lengths.
    ///
    /// # Errors
    ///
    /// [`HzwError::CorruptHeader`] if a length is zero or longer than
    /// [`MAX_CODE_LENGTH`], if the lengths are over-subscribed, or if they
    /// leave part of the code space unused. A lone symbol of length 1 is the
    /// one incomplete table that is accepted.
    pub fn from_lengths(lengths: &BTreeMap<u16, u8>) -> Result<Self> {
        const MAX: usize = MAX_CODE_LENGTH as usize;

        let mut bl_count = [0u32; MAX + 1];
        for (&symbol, &len) in lengths {
            if len == 0 || len > MAX_CODE_LENGTH {
                return Err(HzwError::corrupt_header(format!(
                    "symbol {} has code length {} (allowed 1..={})",
                    symbol, len, MAX_CODE_LENGTH
                )));
            }
            bl_count[len as usize] += 1;
        }

        // Kraft sum in units of 2^-MAX.
        let used: u64 = (1..=MAX)
            .map(|len| u64::from(bl_count[len]) << (MAX - len))
            .sum();
        let capacity = 1u64 << MAX;

        if used > capacity {
            return Err(HzwError::corrupt_header("over-subscribed Huffman code lengths"));
        }
        let lone_bit = lengths.len() == 1 && bl_count[1] == 1;
        if used < capacity && !lengths.is_empty() && !lone_bit {
            return Err(HzwError::corrupt_header("incomplete Huffman code lengths"));
        }

        let mut next_code = [0u32; MAX + 1];
        let mut code = 0u32;
        for bits in 1..=MAX {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let table_len = lengths.keys().next_back().map_or(0, |&s| usize::from(s) + 1);
        let mut codes = vec![Code::default(); table_len];
        for (&symbol, &len) in lengths {
            let slot = &mut next_code[len as usize];
            codes[usize::from(symbol)] = Code { bits: *slot, len };
            *slot += 1;
        }

        Ok(Self {
            lengths: lengths.iter().map(|(&s, &l)| (s, l)).collect(),
            codes,
        })
    }

    /// Look up the code for `symbol`.
    #[inline]
    pub fn get(&self, symbol: u16) -> Option<Code> {
        self.codes
            .get(usize::from(symbol))
            .copied()
            .filter(|code| code.len > 0)
    }

    /// `(symbol, length)` pairs in ascending symbol order.
    pub fn lengths(&self) -> &[(u16, u8)] {
        &self.lengths
    }

    /// Iterate `(symbol, code)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Code)> + '_ {
        self.lengths
            .iter()
            .map(|&(symbol, _)| (symbol, self.codes[usize::from(symbol)]))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Whether the table holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Longest code length in the table (0 when empty).
    pub fn max_length(&self) -> u8 {
        self.lengths.iter().map(|&(_, len)| len).max().unwrap_or(0)
    }

    /// Check that no code word is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // Left-align every code; in lexicographic order a prefix always sits
        // directly before one of its extensions.
        let mut aligned: Vec<(u64, u8)> = self
            .iter()
            .map(|(_, code)| (u64::from(code.bits) << (32 - code.len), code.len))
            .collect();
        aligned.sort_unstable();

        aligned.windows(2).all(|pair| {
            let (a, a_len) = pair[0];
            let (b, _) = pair[1];
            let shift = 32 - a_len;
            (a >> shift) != (b >> shift)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc1951_example() {
        // Lengths (3, 3, 3, 3, 3, 2, 4, 4) for A..H.
        let lengths: BTreeMap<u16, u8> = [3, 3, 3, 3, 3, 2, 4, 4]
            .into_iter()
            .enumerate()
            .map(|(i, len)| (i as u16, len))
            .collect();
        let table = CodeTable::from_lengths(&lengths).unwrap();

        let expected = [
            (0b010, 3),
            (0b011, 3),
            (0b100, 3),
            (0b101, 3),
            (0b110, 3),
            (0b00, 2),
            (0b1110, 4),
            (0b1111, 4),
        ];
        for (symbol, (bits, len)) in expected.into_iter().enumerate() {
            assert_eq!(table.get(symbol as u16), Some(Code { bits, len }));
        }
        assert!(table.is_prefix_free());
        assert_eq!(table.max_length(), 4);
    }

    #[test]
    fn test_sparse_symbols() {
        let lengths = BTreeMap::from([(5, 1), (4000, 2), (65535, 2)]);
        let table = CodeTable::from_lengths(&lengths).unwrap();
        assert_eq!(table.get(5), Some(Code { bits: 0, len: 1 }));
        assert_eq!(table.get(4000), Some(Code { bits: 0b10, len: 2 }));
        assert_eq!(table.get(65535), Some(Code { bits: 0b11, len: 2 }));
        assert_eq!(table.get(6), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_single_symbol_length_one() {
        let table = CodeTable::from_lengths(&BTreeMap::from([(9, 1)])).unwrap();
        assert_eq!(table.get(9), Some(Code { bits: 0, len: 1 }));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_empty_table() {
        let table = CodeTable::from_lengths(&BTreeMap::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get(0), None);
    }

    #[test]
    fn test_over_subscribed() {
        let lengths = BTreeMap::from([(0, 1), (1, 1), (2, 1)]);
        assert!(matches!(
            CodeTable::from_lengths(&lengths),
            Err(HzwError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_incomplete() {
        let lengths = BTreeMap::from([(0, 1), (1, 2)]);
        assert!(matches!(
            CodeTable::from_lengths(&lengths),
            Err(HzwError::CorruptHeader { .. })
        ));
        assert!(CodeTable::from_lengths(&BTreeMap::from([(0, 2)])).is_err());
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(CodeTable::from_lengths(&BTreeMap::from([(0, 0), (1, 1)])).is_err());
        assert!(CodeTable::from_lengths(&BTreeMap::from([(0, 25), (1, 1)])).is_err());
    }

    #[test]
    fn test_prefix_violation_detected() {
        let table = CodeTable {
            lengths: vec![(0, 1), (1, 2)],
            codes: vec![Code { bits: 0, len: 1 }, Code { bits: 0b01, len: 2 }],
        };
        assert!(!table.is_prefix_free());
    }
}
