//! Decompress command implementation.

use crate::utils::{decompressed_path, format_size};
use hzw_codec::HzwCodec;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

pub fn cmd_decompress(
    file: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let start = Instant::now();
    let decoded = HzwCodec::default().decompress_bytes(&data)?;
    let elapsed = start.elapsed();

    let output: PathBuf = output.map_or_else(|| decompressed_path(file), Path::to_path_buf);
    fs::write(&output, &decoded)?;

    info!(
        input = %file.display(),
        output = %output.display(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "decompressed"
    );

    println!(
        "{} -> {} ({} -> {})",
        file.display(),
        output.display(),
        format_size(data.len() as u64),
        format_size(decoded.len() as u64)
    );
    Ok(())
}
