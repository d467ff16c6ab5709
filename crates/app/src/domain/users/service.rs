//! User deletion service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, error, info};

use crate::domain::{
    deletions::{DeletionLogService, data::NewDeletion, records::DeleteUserLogRecord},
    tenants::records::TenantId,
    users::{
        directory::{DirectoryError, UserDirectory},
        errors::UserDeletionError,
        records::{TenantUser, UserId},
    },
};

/// Lists and deletes users on the identity platform, recording each deletion in the audit log.
#[derive(Clone)]
pub struct DirectoryUserDeletionService {
    directory: Arc<dyn UserDirectory>,
    deletions: Arc<dyn DeletionLogService>,
}

impl DirectoryUserDeletionService {
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>, deletions: Arc<dyn DeletionLogService>) -> Self {
        Self {
            directory,
            deletions,
        }
    }
}

#[async_trait]
impl UserDeletionService for DirectoryUserDeletionService {
    #[tracing::instrument(
        name = "users.service.list_users",
        skip(self, context),
        fields(tenant_id = %context, user_count = tracing::field::Empty),
        err
    )]
    async fn list_users(&self, context: &TenantId) -> Result<Vec<TenantUser>, DirectoryError> {
        let users = self.directory.list_tenant_users(context).await?;

        Span::current().record("user_count", users.len());

        Ok(users)
    }

    #[tracing::instrument(
        name = "users.service.delete_user",
        skip(self, context, user),
        fields(tenant_id = %context, user_id = %user),
        err
    )]
    async fn delete_user(
        &self,
        context: &TenantId,
        user: &UserId,
    ) -> Result<DeleteUserLogRecord, UserDeletionError> {
        let tenant_user = self.directory.get_tenant_user(context, user).await?;

        self.directory.delete_tenant_user(context, user).await?;

        info!("deleted user from identity platform");

        let deletion = NewDeletion {
            tenant_id: context.clone(),
            user_id: user.clone(),
            email: tenant_user.email,
            deleted_at: None,
        };

        match self.deletions.record_deletion(context, deletion).await {
            Ok(record) => Ok(record),
            Err(source) => {
                error!("user deleted but audit entry not recorded: {source}");

                Err(UserDeletionError::AuditNotRecorded {
                    user_id: user.clone(),
                    source,
                })
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait UserDeletionService: Send + Sync {
    /// Users of the `context` tenant.
    async fn list_users(&self, context: &TenantId) -> Result<Vec<TenantUser>, DirectoryError>;

    /// Delete `user` from the `context` tenant and return the audit entry written for it.
    ///
    /// Nothing is deleted when the user cannot be looked up. The platform deletion is not
    /// undone when writing the audit entry fails.
    async fn delete_user(
        &self,
        context: &TenantId,
        user: &UserId,
    ) -> Result<DeleteUserLogRecord, UserDeletionError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mockall::predicate::{always, eq, function};
    use testresult::TestResult;

    use crate::{
        domain::{
            deletions::{DeletionLogError, MockDeletionLogService, records::EntryId},
            users::directory::MockUserDirectory,
        },
        test::TestContext,
    };

    use super::*;

    fn tenant() -> TenantId {
        TenantId::new("tenant-1")
    }

    fn user() -> UserId {
        UserId::new("u1")
    }

    fn directory_with_user() -> MockUserDirectory {
        let mut directory = MockUserDirectory::new();

        directory
            .expect_get_tenant_user()
            .with(eq(tenant()), eq(user()))
            .times(1)
            .returning(|tenant, user| {
                Ok(TenantUser {
                    id: user.clone(),
                    tenant_id: tenant.clone(),
                    email: "u1@example.com".to_string(),
                })
            });

        directory
    }

    #[tokio::test]
    async fn lists_the_context_tenants_users() -> TestResult {
        let mut directory = MockUserDirectory::new();

        directory
            .expect_list_tenant_users()
            .with(eq(tenant()))
            .times(1)
            .returning(|tenant| {
                Ok(["u1", "u2"]
                    .into_iter()
                    .map(|id| TenantUser {
                        id: UserId::new(id),
                        tenant_id: tenant.clone(),
                        email: format!("{id}@example.com"),
                    })
                    .collect())
            });

        let service = DirectoryUserDeletionService::new(
            Arc::new(directory),
            Arc::new(MockDeletionLogService::new()),
        );

        let users = service.list_users(&tenant()).await?;

        let emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();

        assert_eq!(emails, vec!["u1@example.com", "u2@example.com"]);

        Ok(())
    }

    #[tokio::test]
    async fn listing_failure_is_returned() {
        let mut directory = MockUserDirectory::new();

        directory
            .expect_list_tenant_users()
            .returning(|_| Err(DirectoryError::Unavailable("timeout".to_string())));

        let service = DirectoryUserDeletionService::new(
            Arc::new(directory),
            Arc::new(MockDeletionLogService::new()),
        );

        let result = service.list_users(&tenant()).await;

        assert!(
            matches!(result, Err(DirectoryError::Unavailable(_))),
            "expected Unavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn deletes_then_records_with_the_looked_up_email() -> TestResult {
        let mut directory = directory_with_user();

        directory
            .expect_delete_tenant_user()
            .with(eq(tenant()), eq(user()))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut deletions = MockDeletionLogService::new();

        deletions
            .expect_record_deletion()
            .with(
                eq(tenant()),
                function(|deletion: &NewDeletion| {
                    deletion.tenant_id == tenant()
                        && deletion.user_id == user()
                        && deletion.email == "u1@example.com"
                        && deletion.deleted_at.is_none()
                }),
            )
            .times(1)
            .returning(|_, deletion| {
                Ok(DeleteUserLogRecord {
                    id: EntryId::from_i64(7),
                    tenant_id: deletion.tenant_id,
                    user_id: deletion.user_id,
                    email: deletion.email,
                    deleted_at: Timestamp::UNIX_EPOCH,
                })
            });

        let service = DirectoryUserDeletionService::new(Arc::new(directory), Arc::new(deletions));

        let record = service.delete_user(&tenant(), &user()).await?;

        assert_eq!(record.id, EntryId::from_i64(7));
        assert_eq!(record.email, "u1@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_neither_deleted_nor_recorded() {
        let mut directory = MockUserDirectory::new();

        directory
            .expect_get_tenant_user()
            .returning(|_, _| Err(DirectoryError::NotFound));

        directory.expect_delete_tenant_user().never();

        let mut deletions = MockDeletionLogService::new();

        deletions.expect_record_deletion().never();

        let service = DirectoryUserDeletionService::new(Arc::new(directory), Arc::new(deletions));

        let result = service.delete_user(&tenant(), &user()).await;

        assert!(
            matches!(
                result,
                Err(UserDeletionError::Directory(DirectoryError::NotFound))
            ),
            "expected Directory(NotFound), got {result:?}"
        );
    }

    #[tokio::test]
    async fn rejected_platform_deletion_is_not_recorded() {
        let mut directory = directory_with_user();

        directory
            .expect_delete_tenant_user()
            .returning(|_, _| Err(DirectoryError::Rejected("protected user".to_string())));

        let mut deletions = MockDeletionLogService::new();

        deletions.expect_record_deletion().never();

        let service = DirectoryUserDeletionService::new(Arc::new(directory), Arc::new(deletions));

        let result = service.delete_user(&tenant(), &user()).await;

        assert!(
            matches!(
                result,
                Err(UserDeletionError::Directory(DirectoryError::Rejected(_)))
            ),
            "expected Directory(Rejected), got {result:?}"
        );
    }

    #[tokio::test]
    async fn audit_failure_after_deletion_is_reported_distinctly() {
        let mut directory = directory_with_user();

        directory
            .expect_delete_tenant_user()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut deletions = MockDeletionLogService::new();

        deletions
            .expect_record_deletion()
            .with(always(), always())
            .times(1)
            .returning(|_, _| Err(DeletionLogError::Sql(sqlx::Error::PoolTimedOut)));

        let service = DirectoryUserDeletionService::new(Arc::new(directory), Arc::new(deletions));

        let result = service.delete_user(&tenant(), &user()).await;

        assert!(
            matches!(
                result,
                Err(UserDeletionError::AuditNotRecorded {
                    ref user_id,
                    source: DeletionLogError::Sql(_),
                }) if *user_id == user()
            ),
            "expected AuditNotRecorded, got {result:?}"
        );
    }

    #[tokio::test]
    async fn deletion_is_recorded_in_the_database() -> TestResult {
        let ctx = TestContext::new().await;
        let tenant = ctx.tenant_id.clone();

        let mut directory = MockUserDirectory::new();

        directory.expect_get_tenant_user().returning(|tenant, user| {
            Ok(TenantUser {
                id: user.clone(),
                tenant_id: tenant.clone(),
                email: "u1@example.com".to_string(),
            })
        });

        directory
            .expect_delete_tenant_user()
            .times(1)
            .returning(|_, _| Ok(()));

        let service =
            DirectoryUserDeletionService::new(Arc::new(directory), Arc::new(ctx.deletions.clone()));

        let record = service.delete_user(&tenant, &user()).await?;

        let entries = ctx.deletions.list_deletions(&tenant, &tenant).await?;

        assert_eq!(entries, vec![record]);

        Ok(())
    }
}
