use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "download-cleaner")]
#[command(about = "Sorts a downloads folder into year/month/extension folders", long_about = None)]
pub struct Cli {
    /// Folder to clean, overrides `watch_folder` from Config.toml and CLEANER_WATCH_FOLDER
    #[arg(long, global = true)]
    pub folder: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean the folder on a fixed interval, forever (default)
    Watch,
    /// Clean the folder once and exit
    Once,
    /// Print configuration values
    PrintConfig,
}
