//! CRC-64/XZ (ECMA-182 polynomial) for content addressing.
//!
//! The codec identifies inputs by their CRC-64 so front ends can key a
//! compression history on content instead of on a random identifier.
//!
//! - Polynomial: 0x42F0E1EBA9EA3693 (reflected: 0xC96C5795D7870F42)
//! - Initial value and final XOR: 0xFFFFFFFFFFFFFFFF
//! - Reflected input and output

/// CRC-64/XZ lookup table (reflected polynomial).
const CRC64_TABLE: [u64; 256] = {
    let poly: u64 = 0xC96C5795D7870F42;
    let mut table = [0u64; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u64;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ poly;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Incremental CRC-64/XZ calculator.
///
/// # Example
///
/// ```
/// use hzw_core::crc::Crc64;
///
/// let mut crc = Crc64::new();
/// crc.update(b"1234");
/// crc.update(b"56789");
/// assert_eq!(crc.finalize(), 0x995DC9BBDF1939FA);
/// ```
#[derive(Debug, Clone)]
pub struct Crc64 {
    crc: u64,
}

impl Crc64 {
    /// Create a new calculator.
    pub fn new() -> Self {
        Self { crc: u64::MAX }
    }

    /// Feed more data.
    pub fn update(&mut self, data: &[u8]) {
        let mut c = self.crc;
        for &byte in data {
            c = CRC64_TABLE[((c ^ u64::from(byte)) & 0xFF) as usize] ^ (c >> 8);
        }
        self.crc = c;
    }

    /// Finalize and return the CRC value.
    pub fn finalize(self) -> u64 {
        self.crc ^ u64::MAX
    }

    /// Compute the CRC-64 of a slice in one call.
    pub fn compute(data: &[u8]) -> u64 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc64 {
    fn default() -> Self {
        Self::new()
    }
}
