//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// gop - vendor the dependencies of a GOPATH-style Go project
#[derive(Parser)]
#[command(name = "gop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a gop project in a directory
    Init(InitArgs),

    /// Copy missing dependencies of a target into src/vendor
    Ensure(EnsureArgs),

    /// List the external imports of a target
    Imports(ImportsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Target name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct EnsureArgs {
    /// Target to vendor for (defaults to the target of the current directory)
    pub target: Option<String>,

    /// Show what would be vendored without copying or fetching
    #[arg(short, long)]
    pub dry: bool,

    /// Run `go get` for packages missing from GOPATH (GOPATH mode, Go 1.21 or older)
    #[arg(short, long)]
    pub get: bool,

    /// Extra build tags, separated by spaces or commas
    #[arg(long, default_value = "")]
    pub tags: String,
}

#[derive(Args)]
pub struct ImportsArgs {
    /// Target to inspect (defaults to the target of the current directory)
    pub target: Option<String>,

    /// Only list imports of the target's own packages
    #[arg(long)]
    pub direct: bool,

    /// Extra build tags, separated by spaces or commas
    #[arg(long, default_value = "")]
    pub tags: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
