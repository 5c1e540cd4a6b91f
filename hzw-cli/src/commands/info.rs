//! Info command implementation.

use crate::utils::format_size;
use hzw_codec::{Container, HEADER_LEN, MAGIC};
use serde::Serialize;
use std::path::Path;

/// JSON output for container inspection.
#[derive(Debug, Serialize)]
struct ContainerInfoJson {
    file: String,
    format: String,
    original_length: u64,
    lzw_max_bits: u8,
    pad_bits: u8,
    huffman_table_length: u32,
    code_count: u64,
    distinct_symbols: usize,
    longest_code: u8,
    payload_bytes: usize,
    container_bytes: usize,
    ratio: f64,
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    let container = Container::from_bytes(&data)?;
    let header = container.header();
    let codes = container.table().codes();

    let ratio = if data.is_empty() {
        1.0
    } else {
        header.original_length as f64 / data.len() as f64
    };

    let info = ContainerInfoJson {
        file: file.display().to_string(),
        format: String::from_utf8_lossy(&MAGIC).into_owned(),
        original_length: header.original_length,
        lzw_max_bits: header.lzw_max_bits,
        pad_bits: header.pad_bits,
        huffman_table_length: header.huffman_table_length,
        code_count: container.table().code_count(),
        distinct_symbols: codes.len(),
        longest_code: codes.max_length(),
        payload_bytes: container.payload().len(),
        container_bytes: data.len(),
        ratio,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Container Information");
    println!("=====================");
    println!("File: {}", info.file);
    println!("Format: {}", info.format);
    println!(
        "Size: {} ({} bytes)",
        format_size(info.container_bytes as u64),
        info.container_bytes
    );
    println!();
    println!("Header:");
    println!("  Original length: {} bytes", info.original_length);
    println!(
        "  LZW code width: {} bits ({} entries)",
        info.lzw_max_bits,
        1u32 << info.lzw_max_bits
    );
    println!("  Pad bits: {}", info.pad_bits);
    println!("  Header size: {} bytes", HEADER_LEN);
    println!("  Huffman table: {} bytes", info.huffman_table_length);
    println!();
    println!("Huffman stage:");
    println!("  LZW codes: {}", info.code_count);
    println!("  Distinct symbols: {}", info.distinct_symbols);
    println!("  Longest code: {} bits", info.longest_code);
    println!("  Payload: {} bytes", info.payload_bytes);
    println!();
    println!("Compression ratio: {:.2}x", info.ratio);

    Ok(())
}
