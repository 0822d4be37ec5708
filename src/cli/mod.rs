//! Command-line interface wiring for docsense.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod files;
pub mod reset;
pub mod serve;
pub mod train;
pub mod upload;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Text file store with analysis endpoints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Train(args) => train::run(args, settings).await,
            Commands::Upload(args) => upload::run(args).await,
            Commands::Files => files::run(settings).await,
            Commands::Reset => reset::run(settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the JSON API.
    Serve(serve::Args),
    /// Fit the vectoriser and classifier used for named entities.
    Train(train::Args),
    /// Post a local text file to a running server.
    Upload(upload::Args),
    /// Print every stored file.
    Files,
    /// Drop and recreate the files table.
    Reset,
}
