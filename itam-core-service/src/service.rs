use itam_core_api::{
    ApiError, ApiResult, AdvanceApprovalRequest, AssignOwnerRequest,
    CreateOrMergeAccountabilityRequest, DeleteItemRequest, PullInRequest, PullOutRequest,
    RegisterComponentRequest, RegisterItemRequest, RegisterUserRequest, ReleaseComputerRequest,
    SoftDeleteAccountabilityRequest, SubmitReturnRequest,
};
use itam_core_db::models::audit::AuditEvent;
use itam_core_db::models::{
    AccountabilityModel, ApprovalRecord, AssetModel, ComponentModel, ComputerModel,
    ReturnItemModel, UserModel,
};
use itam_core_db::repository::{AuditEventSink, AuditRepository, Page, PageRequest};
use itam_core_db::{UnitOfWork, UnitOfWorkSession};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::Item;
use crate::error::storage_error;
use crate::operation::{Operation, OperationContext};
use crate::operations::accountability::{CreateOrMergeAccountability, SoftDeleteAccountability};
use crate::operations::attach::{PullIn, PullOut};
use crate::operations::queries::{
    AccountabilityForOwner, ApprovalSummary, ApprovalsForAccountability, Lookup,
    ReturnItemsForAccountability, VacantAssets, VacantComputers,
};
use crate::operations::registry::{
    DeleteItem, RegisterAsset, RegisterComponent, RegisterComputer, RegisterUser,
    ReleaseComputer,
};
use crate::operations::transfer::AssignOwner;
use crate::operations::workflow::{AdvanceApproval, SubmitReturn};

/// Entry point of the ownership engine
///
/// Every call validates its request, then runs as one transaction: an audit log is
/// written first, the operation's writes follow, then the audit links, then the
/// commit. Concurrency conflicts are retried up to `max_retries` times with a fresh
/// transaction. Audit events are published only after a successful commit and a
/// failing sink never fails the call.
pub struct OwnershipService<U: UnitOfWork> {
    unit_of_work: U,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AuditEventSink>,
    config: EngineConfig,
}

impl<U: UnitOfWork> OwnershipService<U> {
    pub fn new(
        unit_of_work: U,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AuditEventSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            unit_of_work,
            clock,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn unit_of_work(&self) -> &U {
        &self.unit_of_work
    }

    /// Runs an operation with bounded retry of concurrency conflicts
    pub async fn run<O>(&self, operation: &O) -> ApiResult<O::Output>
    where
        O: Operation<U::Session>,
    {
        let mut attempt: usize = 0;
        loop {
            attempt += 1;
            match self.attempt(operation).await {
                Ok((output, events)) => {
                    debug!(operation = O::NAME, attempt, "Operation completed");
                    self.publish(events).await;
                    return Ok(output);
                }
                Err(err) if err.is_retryable() && attempt <= self.config.max_retries => {
                    warn!(operation = O::NAME, attempt, error = %err, "Concurrency conflict, retrying");
                    tokio::time::sleep(self.config.retry_backoff() * attempt as u32).await;
                }
                Err(err) => {
                    info!(operation = O::NAME, attempt, error = %err, "Operation failed");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt<O>(&self, operation: &O) -> ApiResult<(O::Output, Vec<AuditEvent>)>
    where
        O: Operation<U::Session>,
    {
        let session = tokio::time::timeout(
            self.config.lock_timeout(),
            self.unit_of_work.start_session(),
        )
        .await
        .map_err(|_| {
            ApiError::Concurrency(format!("{} timed out waiting for a transaction", O::NAME))
        })?
        .map_err(storage_error)?;

        let mut ctx = OperationContext::new(operation.acting_user_id(), self.clock.now());
        let result = self.execute(&session, operation, &mut ctx).await;
        match result {
            Ok(output) if operation.read_only() => {
                if let Err(err) = session.rollback().await {
                    warn!(operation = O::NAME, error = %err, "Rollback of read-only transaction failed");
                }
                Ok((output, Vec::new()))
            }
            Ok(output) => {
                session.commit().await.map_err(storage_error)?;
                Ok((output, ctx.into_events()))
            }
            Err(err) => {
                if let Err(rollback_err) = session.rollback().await {
                    warn!(operation = O::NAME, error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn execute<O>(
        &self,
        session: &U::Session,
        operation: &O,
        ctx: &mut OperationContext,
    ) -> ApiResult<O::Output>
    where
        O: Operation<U::Session>,
    {
        if !operation.read_only() {
            session
                .audit()
                .create_log(ctx.audit_log())
                .await
                .map_err(storage_error)?;
        }
        let output = operation.execute(session, ctx).await?;
        let links = ctx.take_links();
        if !links.is_empty() {
            session
                .audit()
                .create_links(links)
                .await
                .map_err(storage_error)?;
        }
        Ok(output)
    }

    async fn publish(&self, events: Vec<AuditEvent>) {
        for event in events {
            if let Err(err) = self.sink.publish(&event).await {
                warn!(
                    entity_type = %event.entity_type,
                    entity_id = %event.entity_id,
                    action = ?event.action,
                    error = %err,
                    "Audit event was not delivered"
                );
            }
        }
    }

    /// Gives an asset or computer to an owner, reassigning it if already owned
    pub async fn assign_owner(&self, request: AssignOwnerRequest) -> ApiResult<Item> {
        request.validate()?;
        self.run(&AssignOwner::new(request)).await
    }

    /// Like `assign_owner`, but an item owned by someone else is a conflict
    pub async fn assign_vacant_owner(&self, request: AssignOwnerRequest) -> ApiResult<Item> {
        request.validate()?;
        self.run(&AssignOwner::vacant_only(request)).await
    }

    pub async fn pull_in(&self, request: PullInRequest) -> ApiResult<Item> {
        request.validate()?;
        self.run(&PullIn { request }).await
    }

    pub async fn pull_out(&self, request: PullOutRequest) -> ApiResult<Item> {
        request.validate()?;
        self.run(&PullOut { request }).await
    }

    pub async fn create_or_merge_accountability(
        &self,
        request: CreateOrMergeAccountabilityRequest,
    ) -> ApiResult<AccountabilityModel> {
        request.validate()?;
        self.run(&CreateOrMergeAccountability { request }).await
    }

    pub async fn soft_delete_accountability(
        &self,
        request: SoftDeleteAccountabilityRequest,
    ) -> ApiResult<()> {
        request.validate()?;
        self.run(&SoftDeleteAccountability { request }).await
    }

    pub async fn submit_return(
        &self,
        request: SubmitReturnRequest,
    ) -> ApiResult<Vec<ReturnItemModel>> {
        request.validate()?;
        self.run(&SubmitReturn { request }).await
    }

    pub async fn advance_approval(
        &self,
        request: AdvanceApprovalRequest,
    ) -> ApiResult<ApprovalRecord> {
        request.validate()?;
        self.run(&AdvanceApproval { request }).await
    }

    pub async fn register_user(&self, request: RegisterUserRequest) -> ApiResult<UserModel> {
        request.validate()?;
        self.run(&RegisterUser { request }).await
    }

    pub async fn register_asset(&self, request: RegisterItemRequest) -> ApiResult<AssetModel> {
        request.validate()?;
        self.run(&RegisterAsset { request }).await
    }

    pub async fn register_computer(
        &self,
        request: RegisterItemRequest,
    ) -> ApiResult<ComputerModel> {
        request.validate()?;
        self.run(&RegisterComputer { request }).await
    }

    pub async fn register_component(
        &self,
        request: RegisterComponentRequest,
    ) -> ApiResult<ComponentModel> {
        request.validate()?;
        self.run(&RegisterComponent { request }).await
    }

    pub async fn delete_item(&self, request: DeleteItemRequest) -> ApiResult<Item> {
        request.validate()?;
        self.run(&DeleteItem { request }).await
    }

    pub async fn release_computer(
        &self,
        request: ReleaseComputerRequest,
    ) -> ApiResult<ComputerModel> {
        request.validate()?;
        self.run(&ReleaseComputer { request }).await
    }

    pub async fn get_user(&self, id: Uuid) -> ApiResult<UserModel> {
        self.run(&Lookup::<UserModel>::new(id)).await
    }

    pub async fn get_asset(&self, id: Uuid) -> ApiResult<AssetModel> {
        self.run(&Lookup::<AssetModel>::new(id)).await
    }

    pub async fn get_computer(&self, id: Uuid) -> ApiResult<ComputerModel> {
        self.run(&Lookup::<ComputerModel>::new(id)).await
    }

    pub async fn get_component(&self, id: Uuid) -> ApiResult<ComponentModel> {
        self.run(&Lookup::<ComponentModel>::new(id)).await
    }

    pub async fn get_accountability(&self, id: Uuid) -> ApiResult<AccountabilityModel> {
        self.run(&Lookup::<AccountabilityModel>::new(id)).await
    }

    pub async fn accountability_for_owner(
        &self,
        owner_id: Uuid,
    ) -> ApiResult<Option<AccountabilityModel>> {
        self.run(&AccountabilityForOwner { owner_id }).await
    }

    pub async fn vacant_assets(&self, page: PageRequest) -> ApiResult<Page<AssetModel>> {
        self.run(&VacantAssets { page }).await
    }

    pub async fn vacant_computers(&self, page: PageRequest) -> ApiResult<Page<ComputerModel>> {
        self.run(&VacantComputers { page }).await
    }

    pub async fn return_items_for_accountability(
        &self,
        accountability_id: Uuid,
    ) -> ApiResult<Vec<ReturnItemModel>> {
        self.run(&ReturnItemsForAccountability { accountability_id })
            .await
    }

    pub async fn approvals_for_accountability(
        &self,
        accountability_id: Uuid,
    ) -> ApiResult<ApprovalSummary> {
        self.run(&ApprovalsForAccountability { accountability_id })
            .await
    }
}
