use async_trait::async_trait;

use crate::models::{
    AccountabilityApprovalModel, AccountabilityModel, AssetModel, ComponentModel, ComputerModel,
    RepairLogModel, ReturnApprovalModel, ReturnItemModel, UserModel,
};
use crate::repository::{
    AuditRepository, CodeSequence, CreateBatch, FindByAccountabilityId, FindByAssignedAsset,
    FindByEmployeeId, FindByHostComputerIds, FindLiveByMemberIds, FindLiveByOwnerId, FindVacant,
    LoadBatch, LockBatch, UpdateBatch,
};

/// Source of transactional sessions
///
/// # Example
/// ```ignore
/// let session = unit_of_work.start_session().await?;
/// let assets = session.assets().lock_batch(&[asset_id]).await?;
/// // ... mutate and update_batch ...
/// session.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Session: UnitOfWorkSession;

    /// Begin a transaction; every repository of the returned session shares it
    async fn start_session(
        &self,
    ) -> Result<Self::Session, Box<dyn std::error::Error + Send + Sync>>;
}

/// One transaction and the repositories bound to it
///
/// Nothing written through the repositories is visible to other sessions until
/// `commit` succeeds. Dropping a session without committing rolls it back.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync + Sized {
    type Users: LoadBatch<UserModel>
        + LockBatch<UserModel>
        + CreateBatch<UserModel>
        + UpdateBatch<UserModel>
        + FindByEmployeeId;
    type Assets: LoadBatch<AssetModel>
        + LockBatch<AssetModel>
        + CreateBatch<AssetModel>
        + UpdateBatch<AssetModel>
        + FindByHostComputerIds<AssetModel>
        + FindVacant<AssetModel>;
    type Computers: LoadBatch<ComputerModel>
        + LockBatch<ComputerModel>
        + CreateBatch<ComputerModel>
        + UpdateBatch<ComputerModel>
        + FindByAssignedAsset
        + FindVacant<ComputerModel>;
    type Components: LoadBatch<ComponentModel>
        + LockBatch<ComponentModel>
        + CreateBatch<ComponentModel>
        + UpdateBatch<ComponentModel>
        + FindByHostComputerIds<ComponentModel>;
    type Accountabilities: LoadBatch<AccountabilityModel>
        + LockBatch<AccountabilityModel>
        + CreateBatch<AccountabilityModel>
        + UpdateBatch<AccountabilityModel>
        + FindLiveByOwnerId
        + FindLiveByMemberIds;
    type ReturnItems: CreateBatch<ReturnItemModel> + FindByAccountabilityId<ReturnItemModel>;
    type AccountabilityApprovals: LockBatch<AccountabilityApprovalModel>
        + CreateBatch<AccountabilityApprovalModel>
        + UpdateBatch<AccountabilityApprovalModel>
        + FindByAccountabilityId<AccountabilityApprovalModel>;
    type ReturnApprovals: LockBatch<ReturnApprovalModel>
        + CreateBatch<ReturnApprovalModel>
        + UpdateBatch<ReturnApprovalModel>
        + FindByAccountabilityId<ReturnApprovalModel>;
    type RepairLogs: CreateBatch<RepairLogModel>;
    type Codes: CodeSequence;
    type Audit: AuditRepository;

    fn users(&self) -> &Self::Users;
    fn assets(&self) -> &Self::Assets;
    fn computers(&self) -> &Self::Computers;
    fn components(&self) -> &Self::Components;
    fn accountabilities(&self) -> &Self::Accountabilities;
    fn return_items(&self) -> &Self::ReturnItems;
    fn accountability_approvals(&self) -> &Self::AccountabilityApprovals;
    fn return_approvals(&self) -> &Self::ReturnApprovals;
    fn repair_logs(&self) -> &Self::RepairLogs;
    fn codes(&self) -> &Self::Codes;
    fn audit(&self) -> &Self::Audit;

    async fn commit(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn rollback(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
