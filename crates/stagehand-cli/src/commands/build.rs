//! Build command implementation.

use crate::cli::BuildArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use stagehand_core::BuildConfig;
use stagehand_core::build_with_config;

pub fn execute(args: &BuildArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Output file already exists: {}\n\
             HINT: Use --force to overwrite.",
            args.output.display()
        );
    }

    let mut config = BuildConfig::default()
        .with_format(args.format.map(Into::into))
        .with_include_hidden(!args.exclude_hidden);
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(Some(level));
    }

    let report = add_context(
        build_with_config(&args.source, &args.output, &config),
        &args.source,
    )?;

    formatter.format_build_result(&args.output, &report)
}
