//! Compression metrics and content identifiers.

use hzw_core::crc::Crc64;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Size and timing figures for one compression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionMetrics {
    /// Input length in bytes.
    pub original_size: u64,
    /// Serialized container length in bytes.
    pub compressed_size: u64,
    /// `original_size / compressed_size`, or 1.0 when nothing was produced.
    pub ratio: f64,
    /// Wall-clock time of the LZW and Huffman stages.
    pub elapsed_seconds: f64,
}

impl CompressionMetrics {
    /// Compute metrics from sizes and the measured duration.
    pub fn new(original_size: u64, compressed_size: u64, elapsed: Duration) -> Self {
        let ratio = if compressed_size == 0 {
            1.0
        } else {
            original_size as f64 / compressed_size as f64
        };

        Self {
            original_size,
            compressed_size,
            ratio,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }

    /// Fraction of the input saved, negative when the container is larger.
    pub fn space_saving(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        1.0 - self.compressed_size as f64 / self.original_size as f64
    }
}

/// CRC-64/XZ of an input, used as a history or cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(u64);

impl ContentId {
    /// Hash `data`.
    pub fn from_data(data: &[u8]) -> Self {
        Self(Crc64::compute(data))
    }

    /// The raw checksum.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
