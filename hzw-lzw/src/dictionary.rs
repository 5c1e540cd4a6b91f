//! LZW dictionary (code table) management.

use crate::config::LzwConfig;
use hzw_core::error::{HzwError, Result};
use std::collections::HashMap;

/// One dictionary entry: an existing entry extended by one byte.
#[derive(Debug, Clone, Copy)]
struct Entry {
    /// Code of the entry this one extends (`None` for single-byte entries).
    prefix: Option<u16>,
    /// Trailing byte.
    suffix: u8,
    /// Leading byte of the whole string.
    first: u8,
    /// String length in bytes.
    len: u32,
}

/// LZW dictionary for encoding and decoding.
///
/// Strings are stored as `(prefix code, trailing byte)` links, so each entry
/// costs a constant amount of memory regardless of its length. For encoding
/// we also maintain a child map `(prefix, byte) -> code`.
#[derive(Debug)]
pub struct LzwDictionary {
    /// Code table: code -> entry.
    entries: Vec<Entry>,
    /// Child lookup: (prefix code, next byte) -> code (for encoding only).
    children: HashMap<(u16, u8), u16>,
    /// Configuration.
    config: LzwConfig,
}

impl LzwDictionary {
    /// Create a new LZW dictionary with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;

        let mut dict = Self {
            entries: Vec::with_capacity(config.capacity()),
            children: HashMap::new(),
            config,
        };

        dict.reset();
        Ok(dict)
    }

    /// Reset the dictionary to its initial single-byte entries.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.children.clear();

        for byte in 0..self.config.alphabet_size {
            self.entries.push(Entry {
                prefix: None,
                suffix: byte as u8,
                first: byte as u8,
                len: 1,
            });
        }
    }

    /// Add `prefix + byte` to the dictionary (for encoding).
    ///
    /// Returns the assigned code, or `None` if the dictionary is frozen.
    pub fn add(&mut self, prefix: u16, byte: u8) -> Option<u16> {
        let code = self.push_entry(prefix, byte)?;
        self.children.insert((prefix, byte), code);
        Some(code)
    }

    /// Add `prefix + byte` to the dictionary (for decoding).
    ///
    /// Same assignment rule as [`LzwDictionary::add`] but skips the child
    /// map, which the decoder never consults.
    pub fn add_decoded(&mut self, prefix: u16, byte: u8) -> Option<u16> {
        self.push_entry(prefix, byte)
    }

    fn push_entry(&mut self, prefix: u16, byte: u8) -> Option<u16> {
        if self.is_full() {
            return None;
        }

        let parent = self.entries[prefix as usize];
        let code = self.entries.len() as u16;
        self.entries.push(Entry {
            prefix: Some(prefix),
            suffix: byte,
            first: parent.first,
            len: parent.len + 1,
        });
        Some(code)
    }

    /// Find the code for `prefix + byte` (for encoding).
    #[inline]
    pub fn find_child(&self, prefix: u16, byte: u8) -> Option<u16> {
        self.children.get(&(prefix, byte)).copied()
    }

    /// Append the byte string for `code` to `out`.
    pub fn expand_into(&self, code: u16, out: &mut Vec<u8>) -> Result<()> {
        let entry = self.entry(code)?;
        let start = out.len();
        out.resize(start + entry.len as usize, 0);

        let mut cursor = Some(code);
        let mut index = out.len();
        while let Some(c) = cursor {
            let e = self.entries[c as usize];
            index -= 1;
            out[index] = e.suffix;
            cursor = e.prefix;
        }
        debug_assert_eq!(index, start);

        Ok(())
    }

    /// Get the first byte of the string for `code`.
    pub fn first_byte(&self, code: u16) -> Result<u8> {
        Ok(self.entry(code)?.first)
    }

    fn entry(&self, code: u16) -> Result<Entry> {
        self.entries
            .get(code as usize)
            .copied()
            .ok_or_else(|| HzwError::invalid_code(code, self.next_code()))
    }

    /// Check if the dictionary is frozen (no code left to assign).
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.config.capacity()
    }

    /// Get the next code that will be assigned.
    pub fn next_code(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzwConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_init() {
        let dict = LzwDictionary::new(LzwConfig::DEFAULT).unwrap();

        let mut out = Vec::new();
        for i in 0..256u16 {
            out.clear();
            dict.expand_into(i, &mut out).unwrap();
            assert_eq!(out, [i as u8]);
        }
        assert_eq!(dict.next_code(), 256);
        assert!(!dict.is_full());
    }

    #[test]
    fn test_add_and_expand() {
        let mut dict = LzwDictionary::new(LzwConfig::DEFAULT).unwrap();

        let ab = dict.add(b'A' as u16, b'B').unwrap();
        assert_eq!(ab, 256);
        let abc = dict.add(ab, b'C').unwrap();
        assert_eq!(abc, 257);

        let mut out = b"x".to_vec();
        dict.expand_into(abc, &mut out).unwrap();
        assert_eq!(out, b"xABC");
        assert_eq!(dict.first_byte(abc).unwrap(), b'A');
    }

    #[test]
    fn test_find_child() {
        let mut dict = LzwDictionary::new(LzwConfig::DEFAULT).unwrap();

        let code = dict.add(b'A' as u16, b'B').unwrap();
        assert_eq!(dict.find_child(b'A' as u16, b'B'), Some(code));
        assert_eq!(dict.find_child(b'B' as u16, b'A'), None);

        // Decoder-side additions never populate the child map.
        let decoded = dict.add_decoded(b'B' as u16, b'A').unwrap();
        assert_eq!(decoded, code + 1);
        assert_eq!(dict.find_child(b'B' as u16, b'A'), None);
    }

    #[test]
    fn test_codes_monotonic_until_frozen() {
        let config = LzwConfig::new(9);
        let mut dict = LzwDictionary::new(config).unwrap();

        let mut last = None;
        let mut prefix = 0u16;
        while let Some(code) = dict.add(prefix, (prefix % 251) as u8) {
            if let Some(previous) = last {
                assert!(code > previous);
            }
            assert!(code <= config.max_code());
            last = Some(code);
            prefix = code;
        }

        assert_eq!(last, Some(511));
        assert!(dict.is_full());
        assert_eq!(dict.next_code(), 512);
        assert_eq!(dict.add(0, 0), None);
    }

    #[test]
    fn test_reset_clears_entries() {
        let mut dict = LzwDictionary::new(LzwConfig::DEFAULT).unwrap();
        dict.add(1, 2).unwrap();
        dict.reset();
        assert_eq!(dict.len(), 256);
        assert_eq!(dict.find_child(1, 2), None);
    }

    #[test]
    fn test_unknown_code() {
        let dict = LzwDictionary::new(LzwConfig::DEFAULT).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            dict.expand_into(300, &mut out),
            Err(HzwError::InvalidCode { code: 300, .. })
        ));
    }
}
