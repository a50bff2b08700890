use async_trait::async_trait;
use itam_core_api::{
    AccountabilityStage, AdvanceApprovalRequest, ApiError, ApiResult, ApprovalStage, ItemRef,
    ReturnStage, SubmitReturnRequest,
};
use itam_core_db::models::audit::{AuditAction, EntityType};
use itam_core_db::models::{
    AccountabilityApprovalModel, AccountabilityModel, ApprovalRecord, ApprovalStamp, AssetModel,
    ComponentModel, ComputerModel, Identifiable, ItemStatus, ReturnApprovalModel,
    ReturnItemModel, Versioned,
};
use itam_core_db::repository::{
    CreateBatch, FindByAccountabilityId, FindByAssignedAsset, LockBatch, UpdateBatch,
};
use itam_core_db::UnitOfWorkSession;
use serde_json::json;
use std::fmt::Debug;
use tracing::{debug, info};
use uuid::Uuid;

use super::distinct;
use crate::engine::graph::{
    detach_asset, hosted_assets, hosted_components, remove_from_live_records, EmptiedRecord,
};
use crate::engine::text::bounded_opt;
use crate::engine::{clear_owner, ChangeSet};
use crate::error::storage_error;
use crate::operation::{Operation, OperationContext};

/// Hands items of a record back to inventory
///
/// The record is switched inactive but stays live. Returned computers, and any
/// computer listing one of them as an attached asset, are vacated together with
/// their peripherals; their components drop the owner without a history entry.
/// Only the returned computers themselves go back to AVAILABLE.
/// Returned assets are detached and vacated. A returned component is only logged.
pub struct SubmitReturn {
    pub request: SubmitReturnRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for SubmitReturn {
    type Output = Vec<ReturnItemModel>;

    const NAME: &'static str = "submit_return";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(
        &self,
        session: &S,
        ctx: &mut OperationContext,
    ) -> ApiResult<Vec<ReturnItemModel>> {
        let request = &self.request;
        let accountability_id = request.accountability_id;
        let mut changes = ChangeSet::new();
        let mut record: AccountabilityModel = changes.get(session, accountability_id).await?;
        if record.is_deleted {
            return Err(ApiError::Conflict(format!(
                "Accountability {accountability_id} is deleted"
            )));
        }

        let items = distinct(&request.items);
        for item in &items {
            ensure_covered(&mut changes, session, &record, *item).await?;
        }
        record.is_active = false;
        changes.put(record);

        let returned_computers: Vec<Uuid> = items
            .iter()
            .filter_map(|item| match item {
                ItemRef::Computer(id) => Some(*id),
                _ => None,
            })
            .collect();
        let mut cleared_computers = returned_computers.clone();
        for computer_id in &returned_computers {
            let listing = session
                .computers()
                .find_by_assigned_asset(*computer_id)
                .await
                .map_err(storage_error)?;
            cleared_computers.extend(listing.iter().map(|computer| computer.id));
            changes.adopt(listing);
        }
        let cleared_computers = distinct(&cleared_computers);
        let returned_assets: Vec<Uuid> = items
            .iter()
            .filter_map(|item| match item {
                ItemRef::Asset(id) => Some(*id),
                _ => None,
            })
            .collect();

        for computer_id in &cleared_computers {
            let mut computer: ComputerModel = changes.get(session, *computer_id).await?;
            clear_owner(&mut computer);
            // listing computers only lose their owner
            if returned_computers.contains(computer_id) {
                computer.status = ItemStatus::Available;
            }
            changes.put(computer);
        }
        for mut peripheral in hosted_assets(&mut changes, session, &cleared_computers).await? {
            if clear_owner(&mut peripheral).is_some() {
                changes.put(peripheral);
            }
        }
        for mut component in hosted_components(&mut changes, session, &cleared_computers).await?
        {
            if component.owner_id.take().is_some() {
                changes.put(component);
            }
        }
        for asset_id in &returned_assets {
            let mut asset: AssetModel = changes.get(session, *asset_id).await?;
            detach_asset(&mut changes, session, &mut asset).await?;
            clear_owner(&mut asset);
            asset.status = ItemStatus::Available;
            changes.put(asset);
        }

        let released: Vec<Uuid> = cleared_computers
            .iter()
            .chain(returned_assets.iter())
            .copied()
            .collect();
        remove_from_live_records(
            &mut changes,
            session,
            ctx,
            &released,
            EmptiedRecord::Keep,
            None,
        )
        .await?;
        changes.flush(session, ctx).await?;

        let remarks = bounded_opt::<500>(request.remarks.as_deref(), "remarks")?;
        let rows: Vec<ReturnItemModel> = items
            .iter()
            .map(|item| ReturnItemModel {
                id: Uuid::new_v4(),
                accountability_id,
                item_kind: item.kind(),
                item_id: item.id(),
                remarks: remarks.clone(),
                returned_by: ctx.acting_user_id(),
                return_date: ctx.today(),
                hash: 0,
                audit_log_id: None,
            })
            .collect();
        let saved = session
            .return_items()
            .create_batch(rows, ctx.audit_log_id())
            .await
            .map_err(storage_error)?;
        for row in &saved {
            ctx.touch(EntityType::ReturnItem, row.id);
        }

        info!(
            accountability_id = %accountability_id,
            items = saved.len(),
            computers_cleared = cleared_computers.len(),
            "Return submitted"
        );
        ctx.emit(
            EntityType::Accountability,
            accountability_id,
            AuditAction::ReturnSubmitted,
            json!({
                "items": items,
                "cleared_computer_ids": cleared_computers,
                "remarks": request.remarks,
            }),
        );
        Ok(saved)
    }
}

/// Fails unless the record covers the item, directly or through a member computer
async fn ensure_covered<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    record: &AccountabilityModel,
    item: ItemRef,
) -> ApiResult<()> {
    let hosted_by_member =
        |host: Option<Uuid>| host.is_some_and(|host| record.computer_ids.contains(&host));
    let covered = match item {
        ItemRef::Asset(id) => {
            let asset: AssetModel = changes.get(session, id).await?;
            record.asset_ids.contains(&id) || hosted_by_member(asset.host_computer_id)
        }
        ItemRef::Computer(id) => {
            changes.get::<S, ComputerModel>(session, id).await?;
            record.computer_ids.contains(&id)
        }
        ItemRef::Component(id) => {
            let component: ComponentModel = changes.get(session, id).await?;
            hosted_by_member(component.host_computer_id)
        }
    };
    if !covered {
        return Err(ApiError::Conflict(format!(
            "{} {} is not held under accountability {}",
            item.kind(),
            item.id(),
            record.id
        )));
    }
    Ok(())
}

/// Advances one of the two sign-off sequences of a record by one stage
pub struct AdvanceApproval {
    pub request: AdvanceApprovalRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for AdvanceApproval {
    type Output = ApprovalRecord;

    const NAME: &'static str = "advance_approval";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<ApprovalRecord> {
        let request = &self.request;
        let accountability_id = request.accountability_id;
        let mut changes = ChangeSet::new();
        let record: AccountabilityModel = changes.get(session, accountability_id).await?;
        if record.is_deleted {
            return Err(ApiError::Conflict(format!(
                "Accountability {accountability_id} is deleted"
            )));
        }

        let approval = match request.stage {
            ApprovalStage::Accountability(stage) => ApprovalRecord::Accountability(
                advance(session.accountability_approvals(), ctx, accountability_id, stage).await?,
            ),
            ApprovalStage::Return(stage) => {
                let returns = session
                    .return_items()
                    .find_by_accountability_id(accountability_id)
                    .await
                    .map_err(storage_error)?;
                if returns.is_empty() {
                    return Err(ApiError::Conflict(format!(
                        "Accountability {accountability_id} has no returned items to sign off"
                    )));
                }
                ApprovalRecord::Return(
                    advance(session.return_approvals(), ctx, accountability_id, stage).await?,
                )
            }
        };

        info!(
            accountability_id = %accountability_id,
            stage = %request.stage,
            "Approval advanced"
        );
        ctx.emit(
            EntityType::Accountability,
            accountability_id,
            AuditAction::ApprovalAdvanced,
            json!({ "stage": request.stage }),
        );
        Ok(approval)
    }
}

/// A linear sign-off sequence stored as one row per record
trait ApprovalSequence: Versioned + Identifiable + Clone + 'static {
    type Stage: Copy + Debug + Send + Sync;

    /// A sequence whose first stage is stamped
    fn open(accountability_id: Uuid, stage: Self::Stage, stamp: ApprovalStamp) -> Self;

    fn previous(stage: Self::Stage) -> Option<Self::Stage>;

    fn stamp(&self, stage: Self::Stage) -> Option<&ApprovalStamp>;

    fn set_stamp(&mut self, stage: Self::Stage, stamp: ApprovalStamp);
}

impl ApprovalSequence for AccountabilityApprovalModel {
    type Stage = AccountabilityStage;

    fn open(accountability_id: Uuid, stage: AccountabilityStage, stamp: ApprovalStamp) -> Self {
        let mut approval = AccountabilityApprovalModel {
            id: Uuid::new_v4(),
            accountability_id,
            prepared: None,
            approved: None,
            confirmed: None,
            hash: 0,
            audit_log_id: None,
        };
        approval.set_stamp(stage, stamp);
        approval
    }

    fn previous(stage: AccountabilityStage) -> Option<AccountabilityStage> {
        stage.previous()
    }

    fn stamp(&self, stage: AccountabilityStage) -> Option<&ApprovalStamp> {
        AccountabilityApprovalModel::stamp(self, stage)
    }

    fn set_stamp(&mut self, stage: AccountabilityStage, stamp: ApprovalStamp) {
        AccountabilityApprovalModel::set_stamp(self, stage, stamp)
    }
}

impl ApprovalSequence for ReturnApprovalModel {
    type Stage = ReturnStage;

    fn open(accountability_id: Uuid, stage: ReturnStage, stamp: ApprovalStamp) -> Self {
        let mut approval = ReturnApprovalModel {
            id: Uuid::new_v4(),
            accountability_id,
            checked: None,
            received: None,
            confirmed: None,
            hash: 0,
            audit_log_id: None,
        };
        approval.set_stamp(stage, stamp);
        approval
    }

    fn previous(stage: ReturnStage) -> Option<ReturnStage> {
        stage.previous()
    }

    fn stamp(&self, stage: ReturnStage) -> Option<&ApprovalStamp> {
        ReturnApprovalModel::stamp(self, stage)
    }

    fn set_stamp(&mut self, stage: ReturnStage, stamp: ApprovalStamp) {
        ReturnApprovalModel::set_stamp(self, stage, stamp)
    }
}

async fn advance<R, T>(
    repo: &R,
    ctx: &mut OperationContext,
    accountability_id: Uuid,
    stage: T::Stage,
) -> ApiResult<T>
where
    R: FindByAccountabilityId<T> + LockBatch<T> + CreateBatch<T> + UpdateBatch<T> + ?Sized,
    T: ApprovalSequence,
{
    let stamp = ApprovalStamp {
        user_id: ctx.acting_user_id(),
        date: ctx.today(),
    };
    let existing = repo
        .find_by_accountability_id(accountability_id)
        .await
        .map_err(storage_error)?
        .into_iter()
        .next();

    let Some(existing) = existing else {
        if let Some(previous) = T::previous(stage) {
            return Err(out_of_order(stage, previous));
        }
        debug!(accountability_id = %accountability_id, stage = ?stage, "Opening approval sequence");
        let mut saved = repo
            .create_batch(vec![T::open(accountability_id, stage, stamp)], ctx.audit_log_id())
            .await
            .map_err(storage_error)?;
        let approval = saved
            .pop()
            .ok_or_else(|| ApiError::Storage("Approval was not saved".to_string()))?;
        ctx.touch(T::ENTITY_TYPE, approval.get_id());
        return Ok(approval);
    };

    let mut approval = repo
        .lock_batch(&[existing.get_id()])
        .await
        .map_err(storage_error)?
        .pop()
        .flatten()
        .ok_or_else(|| ApiError::not_found(&T::ENTITY_TYPE.to_string(), existing.get_id()))?;
    if approval.stamp(stage).is_some() {
        return Err(ApiError::Conflict(format!(
            "Stage {stage:?} of accountability {accountability_id} is already signed"
        )));
    }
    if let Some(previous) = T::previous(stage) {
        if approval.stamp(previous).is_none() {
            return Err(out_of_order(stage, previous));
        }
    }

    approval.set_stamp(stage, stamp);
    let mut saved = repo
        .update_batch(vec![approval], ctx.audit_log_id())
        .await
        .map_err(storage_error)?;
    let approval = saved
        .pop()
        .ok_or_else(|| ApiError::Storage("Approval was not saved".to_string()))?;
    ctx.touch(T::ENTITY_TYPE, approval.get_id());
    Ok(approval)
}

fn out_of_order<Stage: Debug>(stage: Stage, previous: Stage) -> ApiError {
    ApiError::Conflict(format!("Stage {stage:?} requires {previous:?} first"))
}
