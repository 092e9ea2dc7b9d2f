use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "branch-titlebar")]
#[command(
    about = "Keeps the window title and recent-items list in sync with the current Git branch"
)]
pub struct CliArgs {
    /// Project file or folder to track
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Poll interval in seconds (overrides config)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Directory for the recent-entry list (overrides config)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Run a single synchronization tick and exit
    #[arg(long)]
    pub once: bool,
}
