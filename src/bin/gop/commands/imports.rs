//! `gop imports` command

use anyhow::Result;

use crate::cli::ImportsArgs;
use gop::ops::gop_imports::{list_target_imports, ImportStatus, ImportsOptions};
use gop::util::GlobalContext;

pub fn execute(args: ImportsArgs, verbose: bool) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let opts = ImportsOptions {
        target: args.target,
        direct: args.direct,
        tags: args.tags,
    };

    for entry in list_target_imports(&ctx, &opts)? {
        match entry.status {
            ImportStatus::Vendored => println!("{} (vendored)", entry.import),
            status if verbose => println!("{} ({})", entry.import, status),
            _ => println!("{}", entry.import),
        }
    }

    Ok(())
}
