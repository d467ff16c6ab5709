use clap::Args;
use roster_app::domain::{
    deletions::{DeletionCursor, service::DEFAULT_PAGE_SIZE},
    tenants::records::TenantId,
};

#[derive(Debug, Args)]
pub(crate) struct ListDeletionsArgs {
    /// PostgreSQL connection string for the application role
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Tenant bound to the session
    #[arg(long)]
    context_tenant_id: String,

    /// Tenant to list; defaults to the session tenant
    #[arg(long)]
    tenant_id: Option<String>,

    /// Entries fetched per round trip
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

pub(crate) async fn run(args: ListDeletionsArgs) -> Result<(), String> {
    let app = super::connect(&args.database_url).await?;

    let context = TenantId::new(args.context_tenant_id);
    let tenant = args.tenant_id.map_or_else(|| context.clone(), TenantId::new);

    let mut cursor =
        DeletionCursor::new(app.deletions.as_ref(), context, tenant).with_page_size(args.page_size);

    let mut total = 0_usize;

    while let Some(page) = cursor
        .next_page()
        .await
        .map_err(|error| format!("failed to list deletions: {error}"))?
    {
        total += page.len();
        page.iter().for_each(super::print_entry);
    }

    println!("entries: {total}");

    Ok(())
}
