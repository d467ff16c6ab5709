//! Delete User Log Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    deletions::{
        data::NewDeletion,
        records::{DeleteUserLogRecord, EntryId},
    },
    tenants::records::TenantId,
};

const RECORD_DELETION_SQL: &str = include_str!("sql/record_deletion.sql");
const LIST_DELETIONS_SQL: &str = include_str!("sql/list_deletions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDeletionLogRepository;

impl PgDeletionLogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn record_deletion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deletion: &NewDeletion,
    ) -> Result<DeleteUserLogRecord, sqlx::Error> {
        query_as::<Postgres, DeleteUserLogRecord>(RECORD_DELETION_SQL)
            .bind(deletion.tenant_id.as_str())
            .bind(deletion.user_id.as_str())
            .bind(deletion.email.as_str())
            .bind(deletion.deleted_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch up to `limit` entries with an id greater than `after`, in ascending id order.
    pub(crate) async fn list_deletions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: &TenantId,
        after: Option<EntryId>,
        limit: u32,
    ) -> Result<Vec<DeleteUserLogRecord>, sqlx::Error> {
        query_as::<Postgres, DeleteUserLogRecord>(LIST_DELETIONS_SQL)
            .bind(tenant.as_str())
            .bind(after.map_or(0, EntryId::into_i64))
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DeleteUserLogRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: EntryId::from_i64(row.try_get("id")?),
            tenant_id: TenantId::new(row.try_get::<String, _>("tenant_id")?),
            user_id: row.try_get::<String, _>("user_id")?.into(),
            email: row.try_get("email")?,
            deleted_at: row.try_get::<SqlxTimestamp, _>("delete_at")?.to_jiff(),
        })
    }
}
