//! attic-prune - run one prune pass and render the result

use crate::app::AppContext;
use crate::attic::{AtticPruner, EntryCollector};
use crate::cli::output::{self, HumanReporter, OutputMode};
use crate::error::Result;

pub fn run(ctx: &AppContext) -> Result<()> {
    let pruner = AtticPruner::new(&ctx.config);

    match ctx.output_mode {
        OutputMode::Robot => {
            let mut collector = EntryCollector::new();
            let report = pruner.prune(&mut collector)?;
            output::emit_json(&output::robot_report(&report, &collector.entries))
        }
        OutputMode::Human => {
            let mut reporter = HumanReporter::stdout(ctx.config.verbose, ctx.config.dry_run);
            let report = pruner.prune(&mut reporter)?;
            let show_summary = !ctx.quiet
                && (ctx.config.verbose || ctx.config.dry_run || report.summary.has_failures());
            reporter.finish(&report, show_summary)?;
            Ok(())
        }
    }
}
