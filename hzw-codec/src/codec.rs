//! Two-stage compression pipeline.

use crate::container::Container;
use crate::metrics::{CompressionMetrics, ContentId};
use hzw_core::error::{HzwError, Result};
use hzw_core::traits::{Cancellation, NeverCancel};
use hzw_huffman::{HuffmanDecoder, HuffmanEncoder};
use hzw_lzw::{LzwConfig, LzwDecoder, LzwEncoder};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Options controlling [`HzwCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// LZW maximum code width (9..=16).
    pub max_dictionary_bits: u8,
    /// Decode every container right after producing it.
    pub verify: bool,
}

impl CodecOptions {
    /// 12-bit dictionary, no verification.
    pub const DEFAULT: Self = Self {
        max_dictionary_bits: 12,
        verify: false,
    };

    /// 12-bit dictionary with round-trip verification.
    pub const VERIFIED: Self = Self {
        max_dictionary_bits: 12,
        verify: true,
    };

    /// Options with the given dictionary width and no verification.
    pub fn new(max_dictionary_bits: u8) -> Self {
        Self {
            max_dictionary_bits,
            verify: false,
        }
    }

    /// Enable or disable round-trip verification.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// LZW configuration for these options.
    pub fn lzw_config(&self) -> LzwConfig {
        LzwConfig::new(self.max_dictionary_bits)
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        self.lzw_config().validate()
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything produced by one [`HzwCodec::compress`] call.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// The container.
    pub container: Container,
    /// Sizes, ratio and timing.
    pub metrics: CompressionMetrics,
    /// Checksum of the input.
    pub content_id: ContentId,
}

/// The HZW compressor and decompressor.
///
/// Every call builds its own dictionary, tree and buffers, so one codec can
/// be shared between threads.
#[derive(Clone)]
pub struct HzwCodec {
    options: CodecOptions,
    cancel: Arc<dyn Cancellation>,
}

impl HzwCodec {
    /// Create a codec.
    ///
    /// # Errors
    ///
    /// [`HzwError::InvalidConfig`] if the dictionary width is out of range.
    pub fn new(options: CodecOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            cancel: Arc::new(NeverCancel),
        })
    }

    /// Attach a cancellation hook polled by both stages.
    pub fn with_cancellation(mut self, cancel: impl Cancellation + 'static) -> Self {
        self.cancel = Arc::new(cancel);
        self
    }

    /// The codec options.
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Compress `input` into a container.
    ///
    /// An empty input yields a minimal container rather than an error.
    pub fn compress(&self, input: &[u8]) -> Result<CompressionResult> {
        let cancel = self.cancel.as_ref();
        let start = Instant::now();

        let container = if input.is_empty() {
            Container::empty(self.options.max_dictionary_bits)
        } else {
            let codes = LzwEncoder::new(self.options.lzw_config())?.encode_with(input, cancel)?;
            let lzw_elapsed = start.elapsed();

            let stream = HuffmanEncoder::new().encode_with(&codes, cancel)?;
            trace!(
                lzw_ms = lzw_elapsed.as_secs_f64() * 1000.0,
                huffman_ms = (start.elapsed() - lzw_elapsed).as_secs_f64() * 1000.0,
                "compression stages"
            );

            Container::new(input.len() as u64, self.options.max_dictionary_bits, stream)
        };

        let elapsed = start.elapsed();

        if self.options.verify {
            self.verify_container(input, &container)?;
        }

        let metrics =
            CompressionMetrics::new(input.len() as u64, container.encoded_len() as u64, elapsed);
        let content_id = ContentId::from_data(input);

        debug!(
            original = metrics.original_size,
            compressed = metrics.compressed_size,
            ratio = metrics.ratio,
            codes = container.table().code_count(),
            distinct = container.table().codes().len(),
            %content_id,
            "compressed"
        );

        Ok(CompressionResult {
            container,
            metrics,
            content_id,
        })
    }

    /// Reconstruct the original bytes from a container.
    ///
    /// # Errors
    ///
    /// - [`HzwError::SizeMismatch`] if the output length disagrees with the
    ///   header
    /// - any decoding error from the Huffman or LZW stage
    pub fn decompress(&self, container: &Container) -> Result<Vec<u8>> {
        let cancel = self.cancel.as_ref();
        let expected = container.original_length();
        let code_count = container.table().code_count();

        if code_count == 0 {
            if expected > 0 {
                return Err(HzwError::size_mismatch(expected, 0));
            }
            return Ok(Vec::new());
        }

        let expected_len =
            usize::try_from(expected).map_err(|_| HzwError::size_mismatch(expected, 0))?;

        let codes = HuffmanDecoder::new(container.table())?.decode_with(
            container.payload(),
            container.pad_bits(),
            cancel,
        )?;
        // The LZW stage stops as soon as it outgrows the declared length, so
        // a shrunken length field is reported with the bytes actually decoded.
        let output =
            LzwDecoder::new(container.lzw_config())?.decode_with(&codes, Some(expected_len), cancel)?;

        if output.len() != expected_len {
            return Err(HzwError::size_mismatch(expected, output.len() as u64));
        }

        debug!(
            compressed = container.encoded_len(),
            original = output.len(),
            "decompressed"
        );

        Ok(output)
    }

    /// Parse and decompress a serialized container.
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let container = Container::from_bytes(data)?;
        self.decompress(&container)
    }

    fn verify_container(&self, input: &[u8], container: &Container) -> Result<()> {
        let reparsed = Container::from_bytes(&container.to_bytes())?;
        let decoded = self.decompress(&reparsed)?;

        if decoded.len() != input.len() {
            return Err(HzwError::size_mismatch(
                input.len() as u64,
                decoded.len() as u64,
            ));
        }
        if decoded != input {
            return Err(HzwError::corrupt_header(
                "round trip produced different bytes",
            ));
        }

        trace!(bytes = input.len(), "round trip verified");
        Ok(())
    }
}

impl Default for HzwCodec {
    fn default() -> Self {
        Self {
            options: CodecOptions::DEFAULT,
            cancel: Arc::new(NeverCancel),
        }
    }
}

impl fmt::Debug for HzwCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HzwCodec")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
