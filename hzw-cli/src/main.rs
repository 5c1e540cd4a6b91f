//! HZW CLI - hybrid LZW + Huffman compressor
//!
//! Compresses files into self-describing `.hzw` containers and restores them.

mod commands;
mod utils;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{CompressOptions, cmd_compress, cmd_decompress, cmd_info, cmd_test};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use utils::DEFAULT_MAX_SIZE;

#[derive(Parser)]
#[command(name = "hzw")]
#[command(
    author,
    version,
    about = "Hybrid LZW + Huffman compressor"
)]
#[command(long_about = "
HZW compresses data in two stages: an LZW dictionary coder turns bytes into
codes, then a canonical Huffman coder packs those codes into a bit stream.
The result is stored in a self-describing \"HZW1\" container.

Examples:
  hzw compress notes.txt
  hzw compress -b 16 --verify big.log
  hzw compress -j --json a.txt b.txt c.txt
  hzw decompress notes.txt.hzw
  hzw info notes.txt.hzw
  hzw test *.hzw
  hzw completions bash
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files into .hzw containers
    #[command(alias = "c")]
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum LZW code width in bits (9-16)
        #[arg(short, long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(9..=16))]
        bits: u8,

        /// Decode each container again and compare with the input
        #[arg(long)]
        verify: bool,

        /// Output as JSON (machine-readable)
        #[arg(long)]
        json: bool,

        /// Refuse inputs larger than this many bytes
        #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
        max_size: u64,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,

        /// Compress multiple files in parallel (no progress bar)
        #[arg(short = 'j', long, conflicts_with = "progress")]
        parallel: bool,
    },

    /// Restore the original data from a .hzw container
    #[command(alias = "d")]
    Decompress {
        /// Container to decompress
        file: PathBuf,

        /// Output file (defaults to the input without .hzw)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about a container
    #[command(alias = "i")]
    Info {
        /// Container to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(long)]
        json: bool,
    },

    /// Test container integrity
    #[command(alias = "t")]
    Test {
        /// Containers to test
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: failed to install log subscriber");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            bits,
            verify,
            json,
            max_size,
            progress,
            parallel,
        } => cmd_compress(
            &files,
            &CompressOptions {
                output: output.as_deref(),
                max_dictionary_bits: bits,
                verify,
                json,
                max_size,
                progress,
                parallel,
            },
        ),
        Commands::Decompress { file, output } => cmd_decompress(&file, output.as_deref()),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Test { files } => cmd_test(&files, cli.verbose > 0),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "hzw", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from(["hzw", "-vv", "compress", "-b", "16", "--verify", "a.txt"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Compress {
                files, bits, verify, ..
            } => {
                assert_eq!(files, vec![PathBuf::from("a.txt")]);
                assert_eq!(bits, 16);
                assert!(verify);
            }
            _ => panic!("expected compress"),
        }
    }

    #[test]
    fn test_progress_conflicts_with_parallel() {
        assert!(Cli::try_parse_from(["hzw", "compress", "-P", "-j", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["hzw", "compress", "-P", "a", "b"]).is_ok());
        assert!(Cli::try_parse_from(["hzw", "compress", "-j", "a", "b"]).is_ok());
    }

    #[test]
    fn test_bits_out_of_range() {
        assert!(Cli::try_parse_from(["hzw", "compress", "-b", "8", "a.txt"]).is_err());
        assert!(Cli::try_parse_from(["hzw", "compress", "-b", "17", "a.txt"]).is_err());
    }
}
