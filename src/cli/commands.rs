use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arrange", about = concat!("arrange v", env!("CARGO_PKG_VERSION"), " - drag-reorder process trees"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ./arrange.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the built-in sample tree
    Sample,
    /// Render a tree file
    Show(TreeArgs),
    /// Validate a tree file (exits 1 on errors)
    Check(TreeArgs),
    /// Count processes, subprocesses and activities
    Counts(TreeArgs),
    /// Replay a drag-event script against a tree
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct TreeArgs {
    /// Tree file (.toml or .json)
    pub tree: String,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Tree file (.toml or .json)
    pub tree: String,
    /// Event script, or `-` for stdin
    pub script: String,
    /// Print the working tree after every event
    #[arg(long)]
    pub trace: bool,
}
