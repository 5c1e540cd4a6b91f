//! Compress command implementation.

use crate::utils::{compressed_path, create_progress_bar, format_size, read_limited};
use hzw_codec::{CodecOptions, CompressionMetrics, CompressionResult, ContentId, HzwCodec};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for the compress command.
pub struct CompressOptions<'a> {
    pub output: Option<&'a Path>,
    pub max_dictionary_bits: u8,
    pub verify: bool,
    pub json: bool,
    pub max_size: u64,
    pub progress: bool,
    pub parallel: bool,
}

/// JSON output for one compressed file.
#[derive(Debug, Serialize)]
struct CompressJson {
    input: String,
    output: String,
    content_id: ContentId,
    #[serde(flatten)]
    metrics: CompressionMetrics,
    space_saving: f64,
}

pub fn cmd_compress(
    files: &[PathBuf],
    opts: &CompressOptions<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    if files.is_empty() {
        return Err("no input files".into());
    }
    if opts.output.is_some() && files.len() > 1 {
        return Err("--output can only be used with a single input file".into());
    }

    let codec = HzwCodec::new(
        CodecOptions::new(opts.max_dictionary_bits).with_verify(opts.verify),
    )?;

    let outputs: Vec<PathBuf> = files
        .iter()
        .map(|file| match opts.output {
            Some(path) => path.to_path_buf(),
            None => compressed_path(file),
        })
        .collect();

    let results = if opts.parallel && files.len() > 1 {
        compress_parallel(&codec, files, opts.max_size)?
    } else {
        compress_sequential(&codec, files, opts)?
    };

    let mut report = Vec::with_capacity(files.len());
    for ((input, output), result) in files.iter().zip(&outputs).zip(results) {
        fs::write(output, result.container.to_bytes())?;
        info!(
            input = %input.display(),
            output = %output.display(),
            ratio = result.metrics.ratio,
            "wrote container"
        );

        report.push(CompressJson {
            input: input.display().to_string(),
            output: output.display().to_string(),
            content_id: result.content_id,
            metrics: result.metrics,
            space_saving: result.metrics.space_saving(),
        });
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn compress_sequential(
    codec: &HzwCodec,
    files: &[PathBuf],
    opts: &CompressOptions<'_>,
) -> Result<Vec<CompressionResult>, Box<dyn std::error::Error>> {
    let pb = create_progress_bar(files.len() as u64, opts.progress && files.len() > 1);
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        pb.set_message(file.display().to_string());
        let data = read_limited(file, opts.max_size)?;
        results.push(codec.compress(&data)?);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(results)
}

fn compress_parallel(
    codec: &HzwCodec,
    files: &[PathBuf],
    max_size: u64,
) -> Result<Vec<CompressionResult>, Box<dyn std::error::Error>> {
    let owned = files
        .iter()
        .map(|file| read_limited(file, max_size))
        .collect::<Result<Vec<_>, _>>()?;
    let inputs: Vec<&[u8]> = owned.iter().map(Vec::as_slice).collect();

    Ok(codec.compress_batch(&inputs)?)
}

fn print_report(report: &[CompressJson]) {
    println!(
        "{:>10} {:>10} {:>8} {:>7} {:>9}  Name",
        "Size", "Compressed", "Ratio", "Saved", "Time"
    );
    println!("{}", "-".repeat(68));

    let mut total_size = 0u64;
    let mut total_compressed = 0u64;

    for entry in report {
        let m = &entry.metrics;
        println!(
            "{:>10} {:>10} {:>7.2}x {:>6.1}% {:>8.3}s  {} -> {}",
            format_size(m.original_size),
            format_size(m.compressed_size),
            m.ratio,
            entry.space_saving * 100.0,
            m.elapsed_seconds,
            entry.input,
            entry.output
        );
        total_size += m.original_size;
        total_compressed += m.compressed_size;
    }

    if report.len() > 1 {
        println!("{}", "-".repeat(68));
        let total_ratio = if total_compressed > 0 {
            total_size as f64 / total_compressed as f64
        } else {
            1.0
        };
        println!(
            "{:>10} {:>10} {:>7.2}x                    {} files",
            format_size(total_size),
            format_size(total_compressed),
            total_ratio,
            report.len()
        );
    }
}
