//! Lazy, restartable walk over a tenant's delete user log.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::domain::{
    deletions::{
        errors::DeletionLogError,
        records::{DeleteUserLogRecord, EntryId},
        service::{DEFAULT_PAGE_SIZE, DeletionLogService, MAX_PAGE_SIZE},
    },
    tenants::records::TenantId,
};

/// Keyset cursor over the entries of one tenant, ascending by id.
///
/// Pages are fetched on demand. Each page is read in its own tenant transaction, so entries
/// appended while walking show up in later pages.
pub struct DeletionCursor<'a, S: DeletionLogService + ?Sized> {
    service: &'a S,
    context: TenantId,
    tenant: TenantId,
    page_size: u32,
    after: Option<EntryId>,
    exhausted: bool,
}

impl<'a, S: DeletionLogService + ?Sized> DeletionCursor<'a, S> {
    pub fn new(service: &'a S, context: TenantId, tenant: TenantId) -> Self {
        Self {
            service,
            context,
            tenant,
            page_size: DEFAULT_PAGE_SIZE,
            after: None,
            exhausted: false,
        }
    }

    /// Page size is clamped to what a single page read will return.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Fetch the next page, or `None` once every entry has been returned.
    ///
    /// # Errors
    ///
    /// Returns an error when the page cannot be read. The cursor does not advance.
    pub async fn next_page(&mut self) -> Result<Option<Vec<DeleteUserLogRecord>>, DeletionLogError> {
        if self.exhausted {
            return Ok(None);
        }

        let page = self
            .service
            .list_deletions_page(&self.context, &self.tenant, self.after, self.page_size)
            .await?;

        if page.len() < self.page_size as usize {
            self.exhausted = true;
        }

        let Some(last) = page.last() else {
            return Ok(None);
        };

        self.after = Some(last.id);

        Ok(Some(page))
    }

    /// Rewind to the first entry.
    pub fn restart(&mut self) {
        self.after = None;
        self.exhausted = false;
    }

    /// Drain every remaining page.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while reading pages.
    pub async fn collect_all(&mut self) -> Result<Vec<DeleteUserLogRecord>, DeletionLogError> {
        let mut entries = Vec::new();

        while let Some(page) = self.next_page().await? {
            entries.extend(page);
        }

        Ok(entries)
    }
}

impl<S: DeletionLogService + ?Sized> Debug for DeletionCursor<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DeletionCursor")
            .field("context", &self.context)
            .field("tenant", &self.tenant)
            .field("page_size", &self.page_size)
            .field("after", &self.after)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}
