use async_trait::async_trait;
use itam_core_db::{UnitOfWork, UnitOfWorkSession};
use sqlx::PgPool;
use std::error::Error;
use std::sync::Arc;
use tracing::debug;

use crate::config::{PostgresConfig, PostgresConfigError};
use crate::executor::Executor;
use crate::repository::accountability::{
    accountability_approval_repository::AccountabilityApprovalRepositoryImpl,
    accountability_repository::AccountabilityRepositoryImpl,
    repair_log_repository::RepairLogRepositoryImpl,
    return_approval_repository::ReturnApprovalRepositoryImpl,
    return_item_repository::ReturnItemRepositoryImpl, AccountabilityRepoFactory,
    AccountabilityRepositories,
};
use crate::repository::audit::AuditRepositoryImpl;
use crate::repository::inventory::{
    asset_repository::AssetRepositoryImpl, component_repository::ComponentRepositoryImpl,
    computer_repository::ComputerRepositoryImpl, user_repository::UserRepositoryImpl,
    InventoryRepoFactory, InventoryRepositories,
};
use crate::repository::sequence::CodeSequenceRepositoryImpl;
use crate::utils::db_error;

/// Postgres-backed source of sessions
///
/// Every session is one database transaction with `lock_timeout` set, so a row
/// held by another operation surfaces as a retryable conflict instead of a hang.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: Arc<PgPool>,
    lock_timeout_ms: u64,
    inventory_factory: Arc<InventoryRepoFactory>,
    accountability_factory: Arc<AccountabilityRepoFactory>,
}

impl PostgresUnitOfWork {
    pub fn new(pool: Arc<PgPool>, lock_timeout_ms: u64) -> Self {
        Self {
            pool,
            lock_timeout_ms,
            inventory_factory: InventoryRepoFactory::new(),
            accountability_factory: AccountabilityRepoFactory::new(),
        }
    }

    pub async fn from_config(config: &PostgresConfig) -> Result<Self, PostgresConfigError> {
        let pool = config.connect().await?;
        Ok(Self::new(Arc::new(pool), config.lock_timeout_ms))
    }

    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    type Session = PostgresSession;

    async fn start_session(&self) -> Result<PostgresSession, Box<dyn Error + Send + Sync>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        // SET does not take bind parameters
        sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let executor = Executor::new(tx);
        Ok(PostgresSession {
            inventory: self.inventory_factory.build_all_repos(&executor),
            accountability: self.accountability_factory.build_all_repos(&executor),
            audit: AuditRepositoryImpl::new(executor.clone()),
            codes: CodeSequenceRepositoryImpl::new(executor.clone()),
            executor,
        })
    }
}

/// One transaction and every repository bound to it
pub struct PostgresSession {
    executor: Executor,
    inventory: InventoryRepositories,
    accountability: AccountabilityRepositories,
    audit: AuditRepositoryImpl,
    codes: CodeSequenceRepositoryImpl,
}

impl PostgresSession {
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn inventory_repos(&self) -> &InventoryRepositories {
        &self.inventory
    }

    pub fn accountability_repos(&self) -> &AccountabilityRepositories {
        &self.accountability
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
    type Users = UserRepositoryImpl;
    type Assets = AssetRepositoryImpl;
    type Computers = ComputerRepositoryImpl;
    type Components = ComponentRepositoryImpl;
    type Accountabilities = AccountabilityRepositoryImpl;
    type ReturnItems = ReturnItemRepositoryImpl;
    type AccountabilityApprovals = AccountabilityApprovalRepositoryImpl;
    type ReturnApprovals = ReturnApprovalRepositoryImpl;
    type RepairLogs = RepairLogRepositoryImpl;
    type Codes = CodeSequenceRepositoryImpl;
    type Audit = AuditRepositoryImpl;

    fn users(&self) -> &UserRepositoryImpl {
        &self.inventory.user_repository
    }

    fn assets(&self) -> &AssetRepositoryImpl {
        &self.inventory.asset_repository
    }

    fn computers(&self) -> &ComputerRepositoryImpl {
        &self.inventory.computer_repository
    }

    fn components(&self) -> &ComponentRepositoryImpl {
        &self.inventory.component_repository
    }

    fn accountabilities(&self) -> &AccountabilityRepositoryImpl {
        &self.accountability.accountability_repository
    }

    fn return_items(&self) -> &ReturnItemRepositoryImpl {
        &self.accountability.return_item_repository
    }

    fn accountability_approvals(&self) -> &AccountabilityApprovalRepositoryImpl {
        &self.accountability.accountability_approval_repository
    }

    fn return_approvals(&self) -> &ReturnApprovalRepositoryImpl {
        &self.accountability.return_approval_repository
    }

    fn repair_logs(&self) -> &RepairLogRepositoryImpl {
        &self.accountability.repair_log_repository
    }

    fn codes(&self) -> &CodeSequenceRepositoryImpl {
        &self.codes
    }

    fn audit(&self) -> &AuditRepositoryImpl {
        &self.audit
    }

    async fn commit(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.executor.commit().await.map_err(db_error)?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.executor.rollback().await.map_err(db_error)?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
