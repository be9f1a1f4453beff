//! `gop ensure` command

use anyhow::Result;

use crate::cli::EnsureArgs;
use gop::ops::gop_ensure::{ensure, EnsureOptions};
use gop::util::GlobalContext;

pub fn execute(args: EnsureArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let opts = EnsureOptions {
        target: args.target,
        dry_run: args.dry,
        auto_fetch: args.get,
        tags: args.tags,
    };

    let result = ensure(&ctx, &opts)?;
    let report = &result.report;

    if opts.dry_run {
        eprintln!(
            "Would vendor {} of {} packages for `{}`",
            report.pending.len(),
            result.imports.len(),
            result.target
        );
    } else if report.is_noop() {
        eprintln!("    Up to date `{}` ({} packages)", result.target, result.imports.len());
    } else {
        if !report.fetched.is_empty() {
            eprintln!("     Fetched {} packages", report.fetched.len());
        }
        eprintln!(
            "    Vendored {} packages for `{}` ({} already present)",
            report.vendored.len(),
            result.target,
            report.skipped.len()
        );
    }

    Ok(())
}
