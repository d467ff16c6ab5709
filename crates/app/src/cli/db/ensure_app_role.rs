use clap::Args;
use roster_app::database;
use sqlx::{query, query_scalar};

/// Group role created by the migrations; it holds every privilege the application needs.
const WRITER_ROLE: &str = "roster_writer";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Application runtime role name
    #[arg(long, default_value = "roster_app")]
    role_name: String,

    /// Application role password
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    let writer_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(WRITER_ROLE)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to check {WRITER_ROLE} existence: {error}"))?;

    if !writer_exists {
        return Err(format!("{WRITER_ROLE} does not exist; run the migrations first"));
    }

    // Role names cannot be bound as parameters, so quote them server-side.
    let role_ident: String = query_scalar("SELECT quote_ident($1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to quote role_name: {error}"))?;

    let password_lit: String = query_scalar("SELECT quote_literal($1)")
        .bind(&args.password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to quote password: {error}"))?;

    let role_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to check role existence: {error}"))?;

    let verb = if role_exists { "ALTER" } else { "CREATE" };

    query(&format!(
        "{verb} ROLE {role_ident} LOGIN PASSWORD {password_lit} \
         NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS"
    ))
    .execute(&mut *tx)
    .await
    .map_err(|error| format!("failed to create/update role: {error}"))?;

    let database_ident: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    for sql in [
        format!("GRANT CONNECT ON DATABASE {database_ident} TO {role_ident}"),
        format!("GRANT {WRITER_ROLE} TO {role_ident}"),
    ] {
        query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply grant `{sql}`: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);
    println!("granted {WRITER_ROLE} membership and CONNECT on the current database");

    Ok(())
}
