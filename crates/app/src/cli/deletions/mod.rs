use clap::{Args, Subcommand};
use roster_app::{context::AppContext, domain::deletions::records::DeleteUserLogRecord};

mod list;
mod record;

#[derive(Debug, Args)]
pub(crate) struct DeletionsCommand {
    #[command(subcommand)]
    command: DeletionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum DeletionsSubcommand {
    /// Append an entry to the delete user log
    Record(record::RecordDeletionArgs),

    /// Print every entry of a tenant's delete user log
    List(list::ListDeletionsArgs),
}

pub(crate) async fn run(command: DeletionsCommand) -> Result<(), String> {
    match command.command {
        DeletionsSubcommand::Record(args) => record::run(args).await,
        DeletionsSubcommand::List(args) => list::run(args).await,
    }
}

async fn connect(database_url: &str) -> Result<AppContext, String> {
    AppContext::from_database_url(database_url)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))
}

fn print_entry(entry: &DeleteUserLogRecord) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        entry.id, entry.tenant_id, entry.user_id, entry.email, entry.deleted_at
    );
}
