//! Clean command implementation

use crate::cli::CleanArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use stagehand_core::RemoveOutcome;
use stagehand_core::remove_tree;

pub fn execute(args: &CleanArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let outcome = remove_tree(&args.path);
    if outcome == RemoveOutcome::Failed {
        bail!(
            "Failed to remove {}\n\
             HINT: Run with --verbose to see which entry could not be deleted.",
            args.path.display()
        );
    }
    formatter.format_clean_result(&args.path, outcome)
}
