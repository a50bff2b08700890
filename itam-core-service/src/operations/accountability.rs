use async_trait::async_trait;
use itam_core_api::{
    ApiError, ApiResult, CreateOrMergeAccountabilityRequest, ItemKind,
    SoftDeleteAccountabilityRequest,
};
use itam_core_db::models::audit::{AuditAction, EntityType};
use itam_core_db::models::{
    AccountabilityModel, AssetModel, ComponentModel, ComputerModel, ItemStatus,
};
use itam_core_db::UnitOfWorkSession;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::distinct;
use crate::engine::graph::{
    detach_asset, ensure_live, hosted_assets, hosted_components, remove_from_live_records,
    resolve_owner, upsert_record, EmptiedRecord,
};
use crate::engine::{clear_owner, record_history, ChangeSet};
use crate::operation::{Operation, OperationContext};

/// Bulk onboarding: puts assets and computers under one owner's live record
///
/// Computers bring their peripherals and components along. An asset of the batch
/// attached to a computer of the batch stays a peripheral; any other batch asset
/// becomes a direct member and is detached from its host.
pub struct CreateOrMergeAccountability {
    pub request: CreateOrMergeAccountabilityRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for CreateOrMergeAccountability {
    type Output = AccountabilityModel;

    const NAME: &'static str = "create_or_merge_accountability";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(
        &self,
        session: &S,
        ctx: &mut OperationContext,
    ) -> ApiResult<AccountabilityModel> {
        let request = &self.request;
        let mut changes = ChangeSet::new();
        let owner = resolve_owner(&mut changes, session, ctx, &request.owner).await?;
        let owner_id = owner.id;

        let computer_ids = distinct(&request.computer_ids);
        let asset_ids = distinct(&request.asset_ids);
        for computer in changes
            .get_many::<S, ComputerModel>(session, &computer_ids)
            .await?
        {
            ensure_live(ItemKind::Computer, computer.id, computer.is_deleted)?;
        }
        for asset in changes.get_many::<S, AssetModel>(session, &asset_ids).await? {
            ensure_live(ItemKind::Asset, asset.id, asset.is_deleted)?;
        }

        let peripheral_ids: Vec<Uuid> = hosted_assets(&mut changes, session, &computer_ids)
            .await?
            .iter()
            .filter(|asset| !asset.is_deleted)
            .map(|asset| asset.id)
            .collect();
        let standalone_ids: Vec<Uuid> = asset_ids
            .iter()
            .copied()
            .filter(|id| !peripheral_ids.contains(id))
            .collect();
        let member_ids: Vec<Uuid> = computer_ids
            .iter()
            .chain(standalone_ids.iter())
            .copied()
            .collect();

        // other owners lose the batch; the owner's own record is edited below
        remove_from_live_records(
            &mut changes,
            session,
            ctx,
            &peripheral_ids,
            EmptiedRecord::SoftDelete,
            Some(owner_id),
        )
        .await?;
        remove_from_live_records(
            &mut changes,
            session,
            ctx,
            &member_ids,
            EmptiedRecord::SoftDelete,
            Some(owner_id),
        )
        .await?;

        let mut record = upsert_record(&mut changes, session, ctx, owner_id).await?;
        for id in &peripheral_ids {
            record.remove_member(*id);
        }
        for id in &computer_ids {
            record.add_computer(*id);
        }
        for id in &standalone_ids {
            record.add_asset(*id);
        }
        changes.put(record.clone());

        for id in &computer_ids {
            let mut computer: ComputerModel = changes.get(session, *id).await?;
            take_ownership(&mut computer.owner_id, &mut computer.history, owner_id);
            computer.status = ItemStatus::Active;
            changes.put(computer);
        }
        for mut component in hosted_components(&mut changes, session, &computer_ids).await? {
            let barcode = component
                .host_computer_id
                .and_then(|host| changes.current::<ComputerModel>(host))
                .map(|host| host.asset_barcode.clone());
            component.owner_id = Some(owner_id);
            component.asset_barcode = barcode;
            component.status = ItemStatus::Active;
            changes.put(component);
        }
        for id in &peripheral_ids {
            let mut asset: AssetModel = changes.get(session, *id).await?;
            take_ownership(&mut asset.owner_id, &mut asset.history, owner_id);
            asset.status = ItemStatus::Active;
            changes.put(asset);
        }
        for id in &standalone_ids {
            let mut asset: AssetModel = changes.get(session, *id).await?;
            detach_asset(&mut changes, session, &mut asset).await?;
            take_ownership(&mut asset.owner_id, &mut asset.history, owner_id);
            asset.status = ItemStatus::Active;
            changes.put(asset);
        }

        changes.flush(session, ctx).await?;
        let record = changes.saved::<AccountabilityModel>(record.id)?;
        info!(
            accountability_id = %record.id,
            accountability_code = %record.accountability_code,
            owner_id = %owner_id,
            computers = computer_ids.len(),
            peripherals = peripheral_ids.len(),
            assets = standalone_ids.len(),
            "Accountability merged"
        );
        ctx.emit(
            EntityType::Accountability,
            record.id,
            AuditAction::AccountabilityMerged,
            json!({
                "owner_id": owner_id,
                "computer_ids": computer_ids,
                "asset_ids": standalone_ids,
                "peripheral_ids": peripheral_ids,
            }),
        );
        Ok(record)
    }
}

/// Bulk assignment appends the incoming owner on every merge, repeats included
fn take_ownership(owner: &mut Option<Uuid>, history: &mut Vec<Uuid>, owner_id: Uuid) {
    history.push(owner_id);
    *owner = Some(owner_id);
}

/// Retires a record and vacates everything it covers
///
/// Members and the peripherals of member computers keep a history entry for the
/// owner they lose. Installed components only drop their owner and barcode.
pub struct SoftDeleteAccountability {
    pub request: SoftDeleteAccountabilityRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for SoftDeleteAccountability {
    type Output = ();

    const NAME: &'static str = "soft_delete_accountability";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<()> {
        let id = self.request.accountability_id;
        let mut changes = ChangeSet::new();
        let mut record: AccountabilityModel = changes.get(session, id).await?;
        if record.is_deleted {
            return Err(ApiError::Conflict(format!(
                "Accountability {id} is already deleted"
            )));
        }
        let owner_id = record.owner_id;
        let computer_ids = record.computer_ids.clone();
        let asset_ids = record.asset_ids.clone();
        record.soft_delete();
        changes.put(record);

        for computer_id in &computer_ids {
            let mut computer: ComputerModel = changes.get(session, *computer_id).await?;
            clear_owner(&mut computer);
            computer.status = ItemStatus::Inactive;
            changes.put(computer);
        }
        for asset_id in &asset_ids {
            let mut asset: AssetModel = changes.get(session, *asset_id).await?;
            clear_owner(&mut asset);
            asset.status = ItemStatus::Inactive;
            changes.put(asset);
        }
        for mut peripheral in hosted_assets(&mut changes, session, &computer_ids).await? {
            if let Some(previous) = peripheral.owner_id.take() {
                record_history(&mut peripheral, previous);
                changes.put(peripheral);
            }
        }
        for mut component in hosted_components(&mut changes, session, &computer_ids).await? {
            clear_mirror(&mut component);
            changes.put(component);
        }

        changes.flush(session, ctx).await?;
        info!(
            accountability_id = %id,
            owner_id = %owner_id,
            computers = computer_ids.len(),
            assets = asset_ids.len(),
            "Accountability soft-deleted"
        );
        ctx.emit(
            EntityType::Accountability,
            id,
            AuditAction::AccountabilityDeleted,
            json!({
                "owner_id": owner_id,
                "computer_ids": computer_ids,
                "asset_ids": asset_ids,
            }),
        );
        Ok(())
    }
}

/// Drops the owner and barcode a component mirrors from its host, without history
pub(crate) fn clear_mirror(component: &mut ComponentModel) {
    component.owner_id = None;
    component.asset_barcode = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        assert_invariants, create_test_profile, setup_test_engine, TestEngine, ACTING_USER,
    };
    use itam_core_api::{ComponentType, ItemRef, OwnerRef};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn merge_request(
        owner: OwnerRef,
        asset_ids: Vec<Uuid>,
        computer_ids: Vec<Uuid>,
    ) -> CreateOrMergeAccountabilityRequest {
        CreateOrMergeAccountabilityRequest {
            owner,
            asset_ids,
            computer_ids,
            acting_user_id: ACTING_USER,
        }
    }

    async fn soft_delete(engine: &TestEngine, accountability_id: Uuid) -> ApiResult<()> {
        engine
            .service
            .soft_delete_accountability(SoftDeleteAccountabilityRequest {
                accountability_id,
                acting_user_id: ACTING_USER,
            })
            .await
    }

    #[tokio::test]
    async fn test_merge_cascades_to_peripherals_and_components() {
        let engine = setup_test_engine();
        let computer = engine.create_test_computer("PC-C1").await;
        let monitor = engine.create_test_asset("BC-MON").await;
        let ram = engine.create_test_component(ComponentType::Ram).await;
        let phone = engine.create_test_asset("BC-PHONE").await;
        engine.pull_in(ItemRef::Asset(monitor.id), computer.id).await;
        engine.pull_in(ItemRef::Component(ram.id), computer.id).await;

        let record = assert_ok!(
            engine
                .service
                .create_or_merge_accountability(merge_request(
                    OwnerRef::Employee(create_test_profile("EMP-100")),
                    vec![phone.id, monitor.id],
                    vec![computer.id],
                ))
                .await
        );
        let owner_id = record.owner_id;
        assert_eq!(record.computer_ids, vec![computer.id]);
        assert_eq!(record.asset_ids, vec![phone.id]);
        assert_eq!(record.accountability_code.as_str(), "ACID-0001");

        let computer = engine.computer(computer.id).await;
        assert_eq!(computer.owner_id, Some(owner_id));
        assert_eq!(computer.history, vec![owner_id]);
        assert_eq!(computer.assigned_assets, vec![monitor.id]);

        let monitor = engine.asset(monitor.id).await;
        assert_eq!(monitor.owner_id, Some(owner_id));
        assert_eq!(monitor.host_computer_id, Some(computer.id));
        assert_eq!(monitor.history, vec![computer.id, owner_id]);

        let ram = engine.component(ram.id).await;
        assert_eq!(ram.owner_id, Some(owner_id));
        assert_eq!(ram.asset_barcode.as_deref(), Some("PC-C1"));
        assert_eq!(ram.history, vec![computer.id]);

        let phone = engine.asset(phone.id).await;
        assert_eq!(phone.owner_id, Some(owner_id));
        assert_eq!(phone.status, ItemStatus::Active);
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_merge_into_existing_record_keeps_codes_and_appends_history() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let first = engine.create_test_asset("BC-1").await;
        let second = engine.create_test_asset("BC-2").await;
        engine.assign(ItemRef::Asset(first.id), user.id).await;
        let existing = engine.live_record_of(user.id).await.unwrap();

        let record = engine
            .service
            .create_or_merge_accountability(merge_request(
                OwnerRef::Id(user.id),
                vec![first.id, second.id, second.id],
                vec![],
            ))
            .await
            .unwrap();
        assert_eq!(record.id, existing.id);
        assert_eq!(record.accountability_code, existing.accountability_code);
        assert_eq!(record.asset_ids, vec![first.id, second.id]);
        // a merge records the owner again even for items it already held
        assert_eq!(engine.asset(first.id).await.history, vec![user.id]);
        assert_eq!(engine.asset(second.id).await.history, vec![user.id]);
        assert_eq!(engine.state().await.accountabilities.len(), 1);
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_merge_takes_items_from_previous_owner() {
        let engine = setup_test_engine();
        let previous = engine.create_test_user("EMP-001").await;
        let asset = engine.create_test_asset("BC-1").await;
        engine.assign(ItemRef::Asset(asset.id), previous.id).await;
        let previous_record = engine.live_record_of(previous.id).await.unwrap();

        let record = engine
            .service
            .create_or_merge_accountability(merge_request(
                OwnerRef::Employee(create_test_profile("EMP-002")),
                vec![asset.id],
                vec![],
            ))
            .await
            .unwrap();

        assert!(engine.record(previous_record.id).await.is_deleted);
        assert_eq!(record.asset_ids, vec![asset.id]);
        assert_eq!(engine.asset(asset.id).await.history, vec![record.owner_id]);
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_merge_detaches_asset_of_foreign_host() {
        let engine = setup_test_engine();
        let computer = engine.create_test_computer("PC-C1").await;
        let monitor = engine.create_test_asset("BC-MON").await;
        engine.pull_in(ItemRef::Asset(monitor.id), computer.id).await;

        let record = engine
            .service
            .create_or_merge_accountability(merge_request(
                OwnerRef::Employee(create_test_profile("EMP-001")),
                vec![monitor.id],
                vec![],
            ))
            .await
            .unwrap();

        assert_eq!(record.asset_ids, vec![monitor.id]);
        assert_eq!(engine.asset(monitor.id).await.host_computer_id, None);
        assert!(engine.computer(computer.id).await.assigned_assets.is_empty());
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_merge_with_unknown_or_deleted_id_changes_nothing() {
        let engine = setup_test_engine();
        let asset = engine.create_test_asset("BC-1").await;

        let err = assert_err!(
            engine
                .service
                .create_or_merge_accountability(merge_request(
                    OwnerRef::Employee(create_test_profile("EMP-001")),
                    vec![asset.id, Uuid::new_v4()],
                    vec![],
                ))
                .await
        );
        assert!(matches!(err, ApiError::NotFound(_)));

        let state = engine.state().await;
        assert!(state.accountabilities.is_empty());
        assert!(state.users.is_empty());
        assert!(state.counters.is_empty());
        assert_eq!(state.assets[&asset.id].owner_id, None);
    }

    #[tokio::test]
    async fn test_concurrent_merges_get_distinct_codes() {
        let engine = Arc::new(setup_test_engine());
        let mut asset_ids = Vec::new();
        for i in 0..8 {
            asset_ids.push(engine.create_test_asset(&format!("BC-{i}")).await.id);
        }

        let mut handles = Vec::new();
        for (i, asset_id) in asset_ids.into_iter().enumerate() {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .service
                    .create_or_merge_accountability(merge_request(
                        OwnerRef::Employee(create_test_profile(&format!("EMP-{i}"))),
                        vec![asset_id],
                        vec![],
                    ))
                    .await
            }));
        }

        let mut codes = BTreeSet::new();
        let mut tracking = BTreeSet::new();
        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            codes.insert(record.accountability_code.to_string());
            tracking.insert(record.tracking_code.to_string());
        }
        assert_eq!(codes.len(), 8);
        assert_eq!(tracking.len(), 8);
        assert!(codes.contains("ACID-0001") && codes.contains("ACID-0008"));
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_component_history() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let computer = engine.create_test_computer("PC-C1").await;
        let ram = engine.create_test_component(ComponentType::Ram).await;
        let monitor = engine.create_test_asset("BC-MON").await;
        let phone = engine.create_test_asset("BC-PHONE").await;
        engine.assign(ItemRef::Computer(computer.id), user.id).await;
        engine.pull_in(ItemRef::Component(ram.id), computer.id).await;
        engine.pull_in(ItemRef::Asset(monitor.id), computer.id).await;
        engine.assign(ItemRef::Asset(phone.id), user.id).await;
        let record = engine.live_record_of(user.id).await.unwrap();
        let ram_history = engine.component(ram.id).await.history;

        assert_ok!(soft_delete(&engine, record.id).await);

        let record = engine.record(record.id).await;
        assert!(record.is_deleted);
        assert!(!record.is_active);
        assert!(record.is_empty());

        let computer = engine.computer(computer.id).await;
        assert_eq!(computer.owner_id, None);
        assert_eq!(computer.status, ItemStatus::Inactive);
        assert_eq!(computer.history, vec![user.id]);

        let ram = engine.component(ram.id).await;
        assert_eq!(ram.owner_id, None);
        assert_eq!(ram.asset_barcode, None);
        assert_eq!(ram.history, ram_history);
        assert_eq!(ram.host_computer_id, Some(computer.id));

        let monitor = engine.asset(monitor.id).await;
        assert_eq!(monitor.owner_id, None);
        assert_eq!(monitor.host_computer_id, Some(computer.id));
        assert_eq!(monitor.history.last(), Some(&user.id));

        let phone = engine.asset(phone.id).await;
        assert_eq!(phone.owner_id, None);
        assert_eq!(phone.status, ItemStatus::Inactive);
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_soft_delete_twice_is_a_conflict() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let asset = engine.create_test_asset("BC-1").await;
        engine.assign(ItemRef::Asset(asset.id), user.id).await;
        let record = engine.live_record_of(user.id).await.unwrap();

        assert_ok!(soft_delete(&engine, record.id).await);
        let err = assert_err!(soft_delete(&engine, record.id).await);
        assert!(matches!(err, ApiError::Conflict(_)));

        let err = assert_err!(soft_delete(&engine, Uuid::new_v4()).await);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reassignment_after_soft_delete_opens_new_record() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let asset = engine.create_test_asset("BC-1").await;
        engine.assign(ItemRef::Asset(asset.id), user.id).await;
        let first = engine.live_record_of(user.id).await.unwrap();
        soft_delete(&engine, first.id).await.unwrap();

        engine.assign(ItemRef::Asset(asset.id), user.id).await;
        let second = engine.live_record_of(user.id).await.unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.accountability_code.as_str(), "ACID-0002");
        assert_eq!(engine.asset(asset.id).await.history, vec![user.id]);
        assert_invariants(&engine.state().await);
    }
}
