//! List-files command implementation

use crate::cli::ListFilesArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use stagehand_core::ExtensionFilter;
use stagehand_core::list_files;

pub fn execute(args: &ListFilesArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = std::path::absolute(&args.dir)
        .with_context(|| format!("invalid directory: {}", args.dir.display()))?;
    let filter: ExtensionFilter = args.extensions.iter().collect();

    let records = add_context(list_files(&root, &filter), &root)?;

    formatter.format_file_list(&root, &records, args.human_readable)
}
