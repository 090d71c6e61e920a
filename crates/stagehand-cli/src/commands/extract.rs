//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use stagehand_core::ExtractConfig;
use stagehand_core::extract_with_config;
use std::env;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let mut config = ExtractConfig::unlimited().with_format(args.format.map(Into::into));
    if let Some(max) = args.max_files {
        config = config.with_max_file_count(max);
    }
    if let Some(max) = args.max_total_size {
        config = config.with_max_total_size(max);
    }
    if let Some(max) = args.max_file_size {
        config = config.with_max_file_size(max);
    }
    if let Some(max) = args.max_depth {
        config = config.with_max_path_depth(usize::from(max));
    }

    let report = add_context(
        extract_with_config(&args.archive, &output_dir, &config),
        &args.archive,
    )?;

    formatter.format_extraction_result(&output_dir, &report)
}
