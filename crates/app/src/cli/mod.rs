use clap::{Parser, Subcommand};

mod db;
mod deletions;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "roster-app", about = "Roster CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: logging::LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Deletions(deletions::DeletionsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        self.logging
            .init()
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Deletions(command) => deletions::run(command).await,
        }
    }
}
