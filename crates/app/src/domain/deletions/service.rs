//! Delete user log service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        deletions::{
            data::NewDeletion,
            errors::DeletionLogError,
            records::{DeleteUserLogRecord, EntryId},
            repository::PgDeletionLogRepository,
        },
        tenants::records::TenantId,
    },
};

/// Page size used when walking the whole log.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page a single read may request.
pub const MAX_PAGE_SIZE: u32 = 1_000;

#[derive(Debug, Clone)]
pub struct PgDeletionLogService {
    db: Db,
    repository: PgDeletionLogRepository,
}

impl PgDeletionLogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDeletionLogRepository::new(),
        }
    }
}

#[async_trait]
impl DeletionLogService for PgDeletionLogService {
    #[tracing::instrument(
        name = "deletions.service.record_deletion",
        skip(self, deletion),
        fields(
            tenant_id = %context,
            user_id = %deletion.user_id,
            entry_id = tracing::field::Empty
        ),
        err
    )]
    async fn record_deletion(
        &self,
        context: &TenantId,
        deletion: NewDeletion,
    ) -> Result<DeleteUserLogRecord, DeletionLogError> {
        deletion.validate()?;

        let mut tx = self.db.begin_tenant_transaction(context).await?;

        let record = self.repository.record_deletion(&mut tx, &deletion).await?;

        tx.commit().await?;

        Span::current().record("entry_id", tracing::field::display(record.id));

        info!(entry_id = %record.id, user_id = %record.user_id, "recorded user deletion");

        Ok(record)
    }

    #[tracing::instrument(
        name = "deletions.service.list_deletions_page",
        skip(self),
        fields(tenant_id = %context),
        err
    )]
    async fn list_deletions_page(
        &self,
        context: &TenantId,
        tenant: &TenantId,
        after: Option<EntryId>,
        limit: u32,
    ) -> Result<Vec<DeleteUserLogRecord>, DeletionLogError> {
        let mut tx = self.db.begin_tenant_transaction(context).await?;

        let entries = self
            .repository
            .list_deletions(&mut tx, tenant, after, limit.clamp(1, MAX_PAGE_SIZE))
            .await?;

        tx.commit().await?;

        Ok(entries)
    }

    #[tracing::instrument(
        name = "deletions.service.list_deletions",
        skip(self),
        fields(tenant_id = %context, entry_count = tracing::field::Empty),
        err
    )]
    async fn list_deletions(
        &self,
        context: &TenantId,
        tenant: &TenantId,
    ) -> Result<Vec<DeleteUserLogRecord>, DeletionLogError> {
        let mut tx = self.db.begin_tenant_transaction(context).await?;

        let mut entries = Vec::new();
        let mut after = None;

        loop {
            let page = self
                .repository
                .list_deletions(&mut tx, tenant, after, DEFAULT_PAGE_SIZE)
                .await?;

            let exhausted = page.len() < DEFAULT_PAGE_SIZE as usize;

            after = page.last().map(|entry| entry.id).or(after);
            entries.extend(page);

            if exhausted {
                break;
            }
        }

        tx.commit().await?;

        Span::current().record("entry_count", entries.len());

        Ok(entries)
    }
}

#[automock]
#[async_trait]
/// Append-only, tenant-scoped audit log of deleted users.
///
/// `context` is the tenant bound to the session for the duration of each call. Rows of any
/// other tenant are invisible, and writes for another tenant are rejected.
pub trait DeletionLogService: Send + Sync {
    /// Append an entry and return it with its store-assigned id.
    async fn record_deletion(
        &self,
        context: &TenantId,
        deletion: NewDeletion,
    ) -> Result<DeleteUserLogRecord, DeletionLogError>;

    /// Fetch one page of entries for `tenant` with ids greater than `after`, ascending.
    async fn list_deletions_page(
        &self,
        context: &TenantId,
        tenant: &TenantId,
        after: Option<EntryId>,
        limit: u32,
    ) -> Result<Vec<DeleteUserLogRecord>, DeletionLogError>;

    /// Fetch every entry for `tenant`, ascending by id.
    async fn list_deletions(
        &self,
        context: &TenantId,
        tenant: &TenantId,
    ) -> Result<Vec<DeleteUserLogRecord>, DeletionLogError>;
}
