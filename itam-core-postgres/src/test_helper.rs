//! Transaction-scoped test isolation
//!
//! Every context runs inside one transaction that is rolled back when the
//! context is dropped or rolled back explicitly. Tests skip themselves when
//! `DATABASE_URL` is unset.

use chrono::Utc;
use itam_core_db::models::audit::AuditLogModel;
use itam_core_db::repository::AuditRepository;
use itam_core_db::{UnitOfWork, UnitOfWorkSession};
use sqlx::PgPool;
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{PostgresConfig, PostgresConfigError};
use crate::executor::Executor;
use crate::repository::accountability::AccountabilityRepositories;
use crate::repository::audit::AuditRepositoryImpl;
use crate::repository::db_init::init_database;
use crate::repository::inventory::InventoryRepositories;
use crate::repository::sequence::CodeSequenceRepositoryImpl;
use crate::unit_of_work::{PostgresSession, PostgresUnitOfWork};

/// One open session plus an audit log row that writes can point at
pub struct TestContext {
    session: PostgresSession,
    pub audit_log_id: Uuid,
}

impl TestContext {
    pub fn inventory_repos(&self) -> &InventoryRepositories {
        self.session.inventory_repos()
    }

    pub fn accountability_repos(&self) -> &AccountabilityRepositories {
        self.session.accountability_repos()
    }

    pub fn audit_repo(&self) -> &AuditRepositoryImpl {
        self.session.audit()
    }

    pub fn codes(&self) -> &CodeSequenceRepositoryImpl {
        self.session.codes()
    }

    pub fn executor(&self) -> &Executor {
        self.session.executor()
    }

    pub async fn rollback(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.session.rollback().await
    }
}

/// Connects to `DATABASE_URL` and applies the migrations; `None` when unset
pub async fn connect_test_pool() -> Result<Option<PgPool>, Box<dyn Error + Send + Sync>> {
    let mut config = match PostgresConfig::from_env() {
        Ok(config) => config,
        Err(PostgresConfigError::MissingDatabaseUrl) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    config.max_connections = 2;

    let pool = config.connect().await?;
    init_database(&pool).await?;
    Ok(Some(pool))
}

/// Opens a session and records the audit log its writes are stamped with
pub async fn setup_test_context() -> Result<Option<TestContext>, Box<dyn Error + Send + Sync>> {
    let Some(pool) = connect_test_pool().await? else {
        return Ok(None);
    };

    let unit_of_work = PostgresUnitOfWork::new(Arc::new(pool), 2000);
    let session = unit_of_work.start_session().await?;

    let audit_log = AuditLogModel {
        id: Uuid::new_v4(),
        updated_at: Utc::now(),
        updated_by_person_id: Uuid::new_v4(),
    };
    session.audit().create_log(&audit_log).await?;

    Ok(Some(TestContext {
        session,
        audit_log_id: audit_log.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::inventory::user_repository::test_utils::test_utils::create_test_user;
    use itam_core_db::repository::{CreateBatch, LoadBatch};

    #[tokio::test]
    async fn test_transaction_rollback() -> Result<(), Box<dyn Error + Send + Sync>> {
        let user_id = {
            let Some(ctx) = setup_test_context().await? else {
                return Ok(());
            };
            let user_repo = &ctx.inventory_repos().user_repository;

            let saved = user_repo
                .create_batch(vec![create_test_user("Finance")], ctx.audit_log_id)
                .await?;

            let loaded = user_repo.load_batch(&[saved[0].id]).await?;
            assert!(loaded[0].is_some());
            saved[0].id
        };

        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let loaded = ctx
            .inventory_repos()
            .user_repository
            .load_batch(&[user_id])
            .await?;
        assert!(loaded[0].is_none());
        ctx.rollback().await
    }
}
