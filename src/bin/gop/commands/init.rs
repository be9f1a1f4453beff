//! `gop init` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::InitArgs;
use gop::ops::gop_init::{init_project, InitOptions};

pub fn execute(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));

    let opts = InitOptions { name: args.name };
    let result = init_project(&path, &opts)?;

    for entry in &result.created {
        eprintln!("     Created {}", entry);
    }
    if result.created.is_empty() {
        eprintln!("     Project in `{}` is already initialized", result.root.display());
    } else {
        eprintln!("     Initialized target `{}`", result.name);
    }

    Ok(())
}
