//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use stagehand_core::list_entries;

pub fn execute(args: &InspectArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let entries = add_context(
        list_entries(&args.archive, args.format.map(Into::into)),
        &args.archive,
    )?;

    formatter.format_entries(&args.archive, &entries)?;

    let rejected = entries.iter().filter(|e| !e.safe).count();
    if args.strict && rejected > 0 {
        bail!(
            "Archive '{}' has {rejected} entries that would be rejected on extraction",
            args.archive.display()
        );
    }
    Ok(())
}
