use async_trait::async_trait;
use itam_core_api::{ApiError, ApiResult};
use itam_core_db::models::{
    AccountabilityApprovalModel, AccountabilityModel, AssetModel, ComputerModel,
    ReturnApprovalModel, ReturnItemModel,
};
use itam_core_db::repository::{
    FindByAccountabilityId, FindLiveByOwnerId, FindVacant, LoadBatch, Page, PageRequest,
};
use itam_core_db::UnitOfWorkSession;
use serde::Serialize;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::engine::SessionTable;
use crate::error::storage_error;
use crate::operation::{Operation, OperationContext};

/// Reads one row of any graph table without locking it
pub struct Lookup<T> {
    pub id: Uuid,
    _table: PhantomData<fn() -> T>,
}

impl<T> Lookup<T> {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            _table: PhantomData,
        }
    }
}

#[async_trait]
impl<S, T> Operation<S> for Lookup<T>
where
    S: UnitOfWorkSession,
    T: SessionTable<S> + Clone + Send,
{
    type Output = T;

    const NAME: &'static str = "lookup";

    fn acting_user_id(&self) -> Uuid {
        Uuid::nil()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, session: &S, _ctx: &mut OperationContext) -> ApiResult<T> {
        let mut found = T::repo(session)
            .load_batch(&[self.id])
            .await
            .map_err(storage_error)?;
        found
            .pop()
            .flatten()
            .ok_or_else(|| ApiError::not_found(&T::ENTITY_TYPE.to_string(), self.id))
    }
}

pub struct AccountabilityForOwner {
    pub owner_id: Uuid,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for AccountabilityForOwner {
    type Output = Option<AccountabilityModel>;

    const NAME: &'static str = "accountability_for_owner";

    fn acting_user_id(&self) -> Uuid {
        Uuid::nil()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        session: &S,
        _ctx: &mut OperationContext,
    ) -> ApiResult<Option<AccountabilityModel>> {
        session
            .accountabilities()
            .find_live_by_owner_id(self.owner_id)
            .await
            .map_err(storage_error)
    }
}

/// Live assets with no owner, for the assignment pickers
pub struct VacantAssets {
    pub page: PageRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for VacantAssets {
    type Output = Page<AssetModel>;

    const NAME: &'static str = "vacant_assets";

    fn acting_user_id(&self) -> Uuid {
        Uuid::nil()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, session: &S, _ctx: &mut OperationContext) -> ApiResult<Page<AssetModel>> {
        session
            .assets()
            .find_vacant(self.page)
            .await
            .map_err(storage_error)
    }
}

pub struct VacantComputers {
    pub page: PageRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for VacantComputers {
    type Output = Page<ComputerModel>;

    const NAME: &'static str = "vacant_computers";

    fn acting_user_id(&self) -> Uuid {
        Uuid::nil()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        session: &S,
        _ctx: &mut OperationContext,
    ) -> ApiResult<Page<ComputerModel>> {
        session
            .computers()
            .find_vacant(self.page)
            .await
            .map_err(storage_error)
    }
}

async fn ensure_record_exists<S: UnitOfWorkSession>(session: &S, id: Uuid) -> ApiResult<()> {
    let found = session
        .accountabilities()
        .load_batch(&[id])
        .await
        .map_err(storage_error)?;
    match found.into_iter().next().flatten() {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Accountability", id)),
    }
}

pub struct ReturnItemsForAccountability {
    pub accountability_id: Uuid,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for ReturnItemsForAccountability {
    type Output = Vec<ReturnItemModel>;

    const NAME: &'static str = "return_items_for_accountability";

    fn acting_user_id(&self) -> Uuid {
        Uuid::nil()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(
        &self,
        session: &S,
        _ctx: &mut OperationContext,
    ) -> ApiResult<Vec<ReturnItemModel>> {
        ensure_record_exists(session, self.accountability_id).await?;
        session
            .return_items()
            .find_by_accountability_id(self.accountability_id)
            .await
            .map_err(storage_error)
    }
}

/// Both sign-off sequences of one accountability record; a sequence not yet
/// started is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalSummary {
    pub accountability: Option<AccountabilityApprovalModel>,
    pub returns: Option<ReturnApprovalModel>,
}

pub struct ApprovalsForAccountability {
    pub accountability_id: Uuid,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for ApprovalsForAccountability {
    type Output = ApprovalSummary;

    const NAME: &'static str = "approvals_for_accountability";

    fn acting_user_id(&self) -> Uuid {
        Uuid::nil()
    }

    fn read_only(&self) -> bool {
        true
    }

    async fn execute(&self, session: &S, _ctx: &mut OperationContext) -> ApiResult<ApprovalSummary> {
        ensure_record_exists(session, self.accountability_id).await?;
        let accountability = session
            .accountability_approvals()
            .find_by_accountability_id(self.accountability_id)
            .await
            .map_err(storage_error)?;
        let returns = session
            .return_approvals()
            .find_by_accountability_id(self.accountability_id)
            .await
            .map_err(storage_error)?;
        Ok(ApprovalSummary {
            accountability: accountability.into_iter().next(),
            returns: returns.into_iter().next(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_engine, ACTING_USER};
    use itam_core_api::{
        AccountabilityStage, AdvanceApprovalRequest, ApprovalStage, ComponentType, ItemRef,
    };
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_lookup_reads_committed_rows() {
        let engine = setup_test_engine();
        let ram = engine.create_test_component(ComponentType::Ram).await;

        let found = assert_ok!(engine.service.get_component(ram.id).await);
        assert_eq!(found, ram);

        let err = assert_err!(engine.service.get_asset(Uuid::new_v4()).await);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_queries_write_no_audit_log() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let logs_before = engine.state().await.audit_logs.len();

        assert_ok!(engine.service.get_user(user.id).await);
        assert_eq!(assert_ok!(engine.service.accountability_for_owner(user.id).await), None);
        assert_eq!(engine.state().await.audit_logs.len(), logs_before);
    }

    #[tokio::test]
    async fn test_vacant_lists_skip_owned_items() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let owned = engine.create_test_asset("BC-1").await;
        engine.create_test_asset("BC-2").await;
        engine.create_test_asset("BC-3").await;
        engine.create_test_computer("PC-1").await;
        engine.assign(ItemRef::Asset(owned.id), user.id).await;

        let page = assert_ok!(engine.service.vacant_assets(PageRequest::new(10, 0)).await);
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|asset| asset.owner_id.is_none()));

        let page = assert_ok!(engine.service.vacant_assets(PageRequest::new(1, 1)).await);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_more());

        let page = assert_ok!(engine.service.vacant_computers(PageRequest::default()).await);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_approval_summary_reports_started_sequences() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let asset = engine.create_test_asset("BC-1").await;
        engine.assign(ItemRef::Asset(asset.id), user.id).await;
        let record = engine.live_record_of(user.id).await.unwrap();

        let summary = assert_ok!(engine.service.approvals_for_accountability(record.id).await);
        assert_eq!(summary.accountability, None);
        assert_eq!(summary.returns, None);

        assert_ok!(
            engine
                .service
                .advance_approval(AdvanceApprovalRequest {
                    accountability_id: record.id,
                    stage: ApprovalStage::Accountability(AccountabilityStage::Prepared),
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        let summary = assert_ok!(engine.service.approvals_for_accountability(record.id).await);
        let approval = summary.accountability.unwrap();
        assert_eq!(approval.prepared.unwrap().user_id, ACTING_USER);
        assert_eq!(approval.approved, None);
        assert_eq!(summary.returns, None);

        let items = assert_ok!(engine.service.return_items_for_accountability(record.id).await);
        assert!(items.is_empty());

        let err = assert_err!(engine.service.approvals_for_accountability(Uuid::new_v4()).await);
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
