//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use stagehand_core::ArchiveType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract an archive into a directory
    Extract(ExtractArgs),
    /// Build an archive from a directory tree
    Build(BuildArgs),
    /// List files under a directory, optionally filtered by extension
    ListFiles(ListFilesArgs),
    /// Show archive entries without extracting them
    Inspect(InspectArgs),
    /// Remove a directory tree
    Clean(CleanArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Archive format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Zip,
    Tar,
    #[value(name = "tar.gz", alias = "tgz")]
    TarGz,
}

impl From<FormatArg> for ArchiveType {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Zip => Self::Zip,
            FormatArg::Tar => Self::Tar,
            FormatArg::TarGz => Self::TarGz,
        }
    }
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of files to extract (default: unlimited)
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Maximum total extracted size, unlimited by default (accepts K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum single file size, unlimited by default (accepts K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Maximum number of components in an entry path (default: unlimited)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_depth: Option<u16>,

    /// Archive format (default: detect from the file extension)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Directory whose contents go into the archive
    #[arg(value_name = "SOURCE_DIR")]
    pub source: PathBuf,

    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Compression level (0 stores without compression, 9 is smallest)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Archive format (default: detect from the output extension)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Leave out files and directories whose name starts with a dot
    #[arg(long)]
    pub exclude_hidden: bool,

    /// Overwrite output file if it exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ListFilesArgs {
    /// Directory to enumerate
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Keep only files with this extension (repeatable, e.g. -e pdf -e .csv)
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Archive format (default: detect from the file extension)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Exit with an error if any entry would be rejected on extraction
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args)]
pub struct CleanArgs {
    /// Directory tree to remove
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
