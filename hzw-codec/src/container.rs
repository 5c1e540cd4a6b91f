//! The `HZW1` container.
//!
//! ```text
//! magic:                4 bytes "HZW1" (the trailing '1' is the version)
//! original_length:      u64 LE
//! lzw_max_bits:         u8
//! pad_bits:             u8
//! huffman_table_length: u32 LE
//! huffman_table:        huffman_table_length bytes
//! payload:              remaining bytes
//! ```

use hzw_core::error::{HzwError, Result};
use hzw_huffman::{EncodedStream, HuffmanTable};
use hzw_lzw::{LzwConfig, MAX_CODE_BITS, MIN_CODE_BITS};

/// Container magic, including the format version byte.
pub const MAGIC: [u8; 4] = *b"HZW1";

/// Size of the fixed header preceding the Huffman table.
pub const HEADER_LEN: usize = 18;

/// Fixed-size container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Length of the uncompressed input.
    pub original_length: u64,
    /// LZW maximum code width used by the encoder.
    pub lzw_max_bits: u8,
    /// Zero bits padding the last payload byte.
    pub pad_bits: u8,
    /// Size of the serialized Huffman table.
    pub huffman_table_length: u32,
}

impl ContainerHeader {
    /// Parse and validate the fixed header at the start of `data`.
    ///
    /// # Errors
    ///
    /// - [`HzwError::UnsupportedFormat`] if the magic or version is wrong
    /// - [`HzwError::UnexpectedEndOfStream`] if fewer than [`HEADER_LEN`]
    ///   bytes are available
    /// - [`HzwError::CorruptHeader`] for an out-of-range width or padding
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic_len = data.len().min(MAGIC.len());
        if data[..magic_len] != MAGIC[..magic_len] {
            return Err(HzwError::unsupported_format(&data[..magic_len]));
        }
        if data.len() < HEADER_LEN {
            return Err(HzwError::unexpected_eos(HEADER_LEN as u64, data.len() as u64));
        }

        let original_length = u64::from_le_bytes([
            data[4], data[5], data[6], data[7], data[8], data[9], data[10], data[11],
        ]);
        let lzw_max_bits = data[12];
        let pad_bits = data[13];
        let huffman_table_length = u32::from_le_bytes([data[14], data[15], data[16], data[17]]);

        if !(MIN_CODE_BITS..=MAX_CODE_BITS).contains(&lzw_max_bits) {
            return Err(HzwError::corrupt_header(format!(
                "LZW code width {} outside {}..={}",
                lzw_max_bits, MIN_CODE_BITS, MAX_CODE_BITS
            )));
        }
        if pad_bits > 7 {
            return Err(HzwError::corrupt_header(format!(
                "invalid pad bit count {}",
                pad_bits
            )));
        }

        Ok(Self {
            original_length,
            lzw_max_bits,
            pad_bits,
            huffman_table_length,
        })
    }

    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.original_length.to_le_bytes());
        out.push(self.lzw_max_bits);
        out.push(self.pad_bits);
        out.extend_from_slice(&self.huffman_table_length.to_le_bytes());
    }
}

/// A complete compressed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    original_length: u64,
    lzw_max_bits: u8,
    pad_bits: u8,
    table: HuffmanTable,
    payload: Vec<u8>,
}

impl Container {
    /// Wrap an encoded stream.
    pub fn new(original_length: u64, lzw_max_bits: u8, stream: EncodedStream) -> Self {
        Self {
            original_length,
            lzw_max_bits,
            pad_bits: stream.pad_bits,
            table: stream.table,
            payload: stream.payload,
        }
    }

    /// The container of an empty input.
    pub fn empty(lzw_max_bits: u8) -> Self {
        Self::new(0, lzw_max_bits, EncodedStream::empty())
    }

    /// The fixed header describing this container.
    pub fn header(&self) -> ContainerHeader {
        ContainerHeader {
            original_length: self.original_length,
            lzw_max_bits: self.lzw_max_bits,
            pad_bits: self.pad_bits,
            huffman_table_length: self.table.encoded_len() as u32,
        }
    }

    /// Length of the uncompressed input.
    pub fn original_length(&self) -> u64 {
        self.original_length
    }

    /// LZW maximum code width.
    pub fn lzw_max_bits(&self) -> u8 {
        self.lzw_max_bits
    }

    /// LZW configuration the payload was produced with.
    pub fn lzw_config(&self) -> LzwConfig {
        LzwConfig::new(self.lzw_max_bits)
    }

    /// Zero bits padding the last payload byte.
    pub fn pad_bits(&self) -> u8 {
        self.pad_bits
    }

    /// Huffman table for the payload.
    pub fn table(&self) -> &HuffmanTable {
        &self.table
    }

    /// Huffman-coded payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.table.encoded_len() + self.payload.len()
    }

    /// Serialize the container.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.header().write_to(&mut out);
        self.table.write_to(&mut out);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse and validate a serialized container.
    ///
    /// # Errors
    ///
    /// Everything [`ContainerHeader::parse`] reports, plus
    /// [`HzwError::UnexpectedEndOfStream`] if the table runs past the end of
    /// `data` or the payload is missing, and [`HzwError::CorruptHeader`] for
    /// an invalid table or a payload that does not fit it.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = ContainerHeader::parse(data)?;

        let table_end = HEADER_LEN as u64 + u64::from(header.huffman_table_length);
        if table_end > data.len() as u64 {
            return Err(HzwError::unexpected_eos(table_end, data.len() as u64));
        }
        let table_end = table_end as usize;

        let max_symbol = LzwConfig::new(header.lzw_max_bits).max_code();
        let table = HuffmanTable::parse(&data[HEADER_LEN..table_end], max_symbol)?;
        let payload = &data[table_end..];

        if table.code_count() == 0 && !payload.is_empty() {
            return Err(HzwError::corrupt_header(format!(
                "{} payload bytes but no codes to decode",
                payload.len()
            )));
        }
        if payload.is_empty() {
            // Every code takes at least one bit.
            if table.code_count() > 0 {
                return Err(HzwError::unexpected_eos(table.code_count(), 0));
            }
            if header.pad_bits > 0 {
                return Err(HzwError::corrupt_header("pad bits declared for empty payload"));
            }
        }

        Ok(Self {
            original_length: header.original_length,
            lzw_max_bits: header.lzw_max_bits,
            pad_bits: header.pad_bits,
            table,
            payload: payload.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hzw_huffman::HuffmanEncoder;

    fn sample() -> Container {
        let stream = HuffmanEncoder::new().encode(&[65, 66, 256, 65]).unwrap();
        Container::new(5, 12, stream)
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..4], b"HZW1");
        assert_eq!(&bytes[4..12], &5u64.to_le_bytes());
        assert_eq!(bytes[12], 12);
        assert!(bytes[13] <= 7);

        let table_len = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
        assert_eq!(table_len as usize, sample().table().encoded_len());
        assert_eq!(bytes.len(), sample().encoded_len());
    }

    #[test]
    fn test_parse_back() {
        let container = sample();
        assert_eq!(Container::from_bytes(&container.to_bytes()).unwrap(), container);
    }

    #[test]
    fn test_empty_container() {
        let container = Container::empty(12);
        let bytes = container.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN + 2);
        assert_eq!(Container::from_bytes(&bytes).unwrap(), container);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = sample().to_bytes();
        bytes[0] ^= 0xFF;
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HzwError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_unknown_version() {
        let mut bytes = sample().to_bytes();
        bytes[3] = b'2';
        match Container::from_bytes(&bytes) {
            Err(HzwError::UnsupportedFormat { found }) => assert_eq!(found, b"HZW2"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_short_header() {
        let bytes = sample().to_bytes();
        assert!(matches!(
            Container::from_bytes(&bytes[..10]),
            Err(HzwError::UnexpectedEndOfStream {
                needed: 18,
                available: 10
            })
        ));
        assert!(matches!(
            Container::from_bytes(b"HZ"),
            Err(HzwError::UnexpectedEndOfStream { .. })
        ));
    }

    #[test]
    fn test_table_overrun() {
        let mut bytes = sample().to_bytes();
        bytes[14..18].copy_from_slice(&100_000u32.to_le_bytes());
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HzwError::UnexpectedEndOfStream { .. })
        ));
    }

    #[test]
    fn test_bad_width_and_padding() {
        let mut bytes = sample().to_bytes();
        bytes[12] = 8;
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HzwError::CorruptHeader { .. })
        ));

        let mut bytes = sample().to_bytes();
        bytes[13] = 8;
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HzwError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_payload_without_codes() {
        let mut bytes = Container::empty(12).to_bytes();
        bytes.push(0xAB);
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HzwError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_missing_payload() {
        let container = sample();
        assert!(container.pad_bits() > 0);
        let bytes = container.to_bytes();
        let table_end = HEADER_LEN + container.table().encoded_len();

        assert!(matches!(
            Container::from_bytes(&bytes[..table_end]),
            Err(HzwError::UnexpectedEndOfStream {
                needed: 4,
                available: 0
            })
        ));

        let mut empty = Container::empty(12).to_bytes();
        empty[13] = 3;
        assert!(matches!(
            Container::from_bytes(&empty),
            Err(HzwError::CorruptHeader { .. })
        ));
    }

    #[test]
    fn test_symbol_beyond_width() {
        // Symbol 600 cannot come from a 9-bit LZW stage.
        let stream = HuffmanEncoder::new().encode(&[1, 600]).unwrap();
        let bytes = Container::new(3, 9, stream).to_bytes();
        assert!(matches!(
            Container::from_bytes(&bytes),
            Err(HzwError::CorruptHeader { .. })
        ));
    }
}
