//! Parallel compression of independent inputs.

use crate::codec::{CodecOptions, CompressionResult, HzwCodec};
use hzw_core::error::Result;
use rayon::prelude::*;
use tracing::debug;

impl HzwCodec {
    /// Compress every input on the rayon thread pool.
    ///
    /// Results come back in input order. The first failure is returned and
    /// no results are produced in that case.
    pub fn compress_batch(&self, inputs: &[&[u8]]) -> Result<Vec<CompressionResult>> {
        debug!(inputs = inputs.len(), threads = rayon::current_num_threads(), "batch compress");
        inputs.par_iter().map(|input| self.compress(input)).collect()
    }
}

/// Compress independent inputs in parallel with the given options.
pub fn compress_batch(inputs: &[&[u8]], options: CodecOptions) -> Result<Vec<CompressionResult>> {
    HzwCodec::new(options)?.compress_batch(inputs)
}
