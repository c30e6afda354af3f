use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bookwiki")]
#[command(author, version, about = "Flat-file wiki with a small book catalogue")]
pub struct Cli {
    /// Path to config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Listen on an OS-assigned loopback port and write the address to the
    /// configured port file
    #[arg(long)]
    pub addr: bool,

    /// Do not run the startup demo
    #[arg(long)]
    pub skip_demo: bool,
}
