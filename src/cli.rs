//! Command line interface for divimage

use crate::error::Result;
use crate::{SplitBuilder, VERSION};
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for divimage
#[derive(Parser, Debug)]
#[command(name = "divimage")]
#[command(version = VERSION)]
#[command(about = "Divide an application image into blocks for bootloader transfer", long_about = None)]
pub struct Args {
    /// The application image file
    #[arg(long)]
    pub application: PathBuf,

    /// The application version string to be included in each block header
    #[arg(long)]
    pub version_string: String,

    /// The maximum size of a block in KB
    #[arg(long)]
    pub max_block_size: usize,

    /// The directory to store the divided image into
    #[arg(long)]
    pub out_directory: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode - only output errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Main CLI handler
pub fn run_cli(args: Args) -> Result<()> {
    let verbose = args.verbose && !args.quiet;

    if verbose {
        eprintln!("Loading application image: {}", args.application.display());
    }

    let builder = SplitBuilder::new()
        .version(&args.version_string)
        .max_block_size_kb(args.max_block_size)
        .data_from_file(&args.application)?;

    // Validate before touching the output directory
    builder.validate()?;

    if verbose {
        eprintln!(
            "Dividing {} bytes into {} blocks",
            builder.get_data().len(),
            builder.block_count()?
        );
    }

    let paths = builder.write_to_dir(&args.out_directory)?;

    if verbose {
        for path in &paths {
            eprintln!("Wrote {}", path.display());
        }
    }

    if !args.quiet {
        eprintln!(
            "Divided {} into {} blocks in {}",
            args.application.display(),
            paths.len(),
            args.out_directory.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "divimage",
            "--application",
            "app.bin",
            "--version-string",
            "1.0.0",
            "--max-block-size",
            "1",
            "--out-directory",
            "out",
        ])
        .unwrap();

        assert_eq!(args.application, PathBuf::from("app.bin"));
        assert_eq!(args.version_string, "1.0.0");
        assert_eq!(args.max_block_size, 1);
        assert_eq!(args.out_directory, PathBuf::from("out"));
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_args_all_flags_required() {
        let result = Args::try_parse_from([
            "divimage",
            "--application",
            "app.bin",
            "--version-string",
            "1.0.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_rejects_malformed_block_size() {
        let result = Args::try_parse_from([
            "divimage",
            "--application",
            "app.bin",
            "--version-string",
            "1.0.0",
            "--max-block-size",
            "one",
            "--out-directory",
            "out",
        ]);
        assert!(result.is_err());
    }
}
