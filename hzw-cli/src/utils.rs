//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of HZW containers.
pub const HZW_EXTENSION: &str = "hzw";

/// Default admission limit for a single input (16 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 16 * 1024 * 1024;

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Read a whole file, refusing files larger than `max_size` bytes.
pub fn read_limited(path: &Path, max_size: u64) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let size = fs::metadata(path)?.len();
    if size > max_size {
        return Err(format!(
            "{} is {} bytes, larger than the {} byte limit (see --max-size)",
            path.display(),
            size,
            max_size
        )
        .into());
    }
    Ok(fs::read(path)?)
}

/// `<input>.hzw` next to the input.
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(HZW_EXTENSION);
    PathBuf::from(name)
}

/// Strip a trailing `.hzw`, or append `.out` when there is none.
pub fn decompressed_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == HZW_EXTENSION => input.with_extension(""),
        _ => {
            let mut name = OsString::from(input.as_os_str());
            name.push(".out");
            PathBuf::from(name)
        }
    }
}

/// Format a byte count with a binary unit.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
