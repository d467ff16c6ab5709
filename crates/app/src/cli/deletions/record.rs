use clap::Args;
use jiff::Timestamp;
use roster_app::domain::{
    deletions::{DeletionLogService, data::NewDeletion},
    tenants::records::TenantId,
    users::records::UserId,
};

#[derive(Debug, Args)]
pub(crate) struct RecordDeletionArgs {
    /// PostgreSQL connection string for the application role
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant bound to the session
    #[arg(long)]
    context_tenant_id: String,

    /// Tenant the deleted user belonged to; defaults to the session tenant
    #[arg(long)]
    tenant_id: Option<String>,

    /// Deleted user id
    #[arg(long)]
    user_id: String,

    /// Deleted user's email
    #[arg(long)]
    email: String,

    /// Deletion time (RFC 3339); defaults to now
    #[arg(long)]
    deleted_at: Option<Timestamp>,
}

pub(crate) async fn run(args: RecordDeletionArgs) -> Result<(), String> {
    let app = super::connect(&args.database_url).await?;

    let context = TenantId::new(args.context_tenant_id);
    let tenant_id = args.tenant_id.map_or_else(|| context.clone(), TenantId::new);

    let entry = app
        .deletions
        .record_deletion(
            &context,
            NewDeletion {
                tenant_id,
                user_id: UserId::new(args.user_id),
                email: args.email,
                deleted_at: args.deleted_at,
            },
        )
        .await
        .map_err(|error| format!("failed to record deletion: {error}"))?;

    super::print_entry(&entry);

    Ok(())
}
