use async_trait::async_trait;
use itam_core_api::{ApiError, ApiResult, ItemKind, ItemRef, PullInRequest, PullOutRequest};
use itam_core_db::models::audit::AuditAction;
use itam_core_db::models::{AssetModel, ComponentModel, ComputerModel, ItemStatus, RepairAction};
use itam_core_db::UnitOfWorkSession;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::engine::graph::{
    detach_asset, ensure_live, remove_from_live_records, unslot_component, write_repair_log,
    EmptiedRecord, RepairEntry,
};
use crate::engine::{
    clear_owner, entity_type_of, record_history, record_root_history, ChangeSet, Item,
};
use crate::operation::{Operation, OperationContext};

/// Attaches an asset or component to a host computer
///
/// The item takes the host's owner and leaves any live record listing it directly,
/// since the host's record now covers it.
pub struct PullIn {
    pub request: PullInRequest,
}

/// Detaches an asset or component from its host and returns it to inventory
pub struct PullOut {
    pub request: PullOutRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for PullIn {
    type Output = Item;

    const NAME: &'static str = "pull_in";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<Item> {
        let request = &self.request;
        let mut changes = ChangeSet::new();
        let host: ComputerModel = changes.get(session, request.host_computer_id).await?;
        ensure_live(ItemKind::Computer, host.id, host.is_deleted)?;

        let inventory_code = match request.item {
            ItemRef::Asset(id) => pull_in_asset(&mut changes, session, ctx, id, &host).await?,
            ItemRef::Component(id) => pull_in_component(&mut changes, session, id, host.id).await?,
            ItemRef::Computer(id) => {
                return Err(ApiError::Validation(format!(
                    "Computer {id} cannot be pulled into another computer"
                )))
            }
        };

        write_repair_log(
            session,
            ctx,
            RepairEntry {
                item_kind: request.item.kind(),
                item_id: request.item.id(),
                inventory_code: &inventory_code,
                computer_id: host.id,
                action: RepairAction::PullIn,
                remarks: request.remarks.as_deref(),
            },
        )
        .await?;
        changes.flush(session, ctx).await?;

        let item = Item::saved(&changes, request.item)?;
        info!(
            item_kind = %item.kind(),
            item_id = %item.id(),
            host_computer_id = %host.id,
            owner_id = ?item.owner_id(),
            "Item pulled in"
        );
        ctx.emit(
            entity_type_of(item.kind()),
            item.id(),
            AuditAction::PulledIn,
            json!({
                "host_computer_id": host.id,
                "owner_id": item.owner_id(),
                "remarks": request.remarks,
            }),
        );
        Ok(item)
    }
}

/// Returns the asset barcode for the repair log
async fn pull_in_asset<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    id: Uuid,
    host: &ComputerModel,
) -> ApiResult<String> {
    let mut asset: AssetModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Asset, id, asset.is_deleted)?;
    if asset.host_computer_id != Some(host.id) {
        detach_asset(changes, session, &mut asset).await?;
    }

    asset.host_computer_id = Some(host.id);
    asset.owner_id = host.owner_id;
    asset.status = ItemStatus::Active;
    record_history(&mut asset, host.id);
    record_root_history(&mut asset, host.id);
    let barcode = asset.asset_barcode.to_string();
    changes.put(asset);

    let mut host: ComputerModel = changes.get(session, host.id).await?;
    if host.attach_asset(id) {
        changes.put(host);
    }

    remove_from_live_records(changes, session, ctx, &[id], EmptiedRecord::SoftDelete, None).await?;
    Ok(barcode)
}

/// Returns the component uid for the repair log
async fn pull_in_component<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    id: Uuid,
    host_id: Uuid,
) -> ApiResult<String> {
    let mut component: ComponentModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Component, id, component.is_deleted)?;

    let host: ComputerModel = changes.get(session, host_id).await?;
    if let Some(occupant) = host.slot(component.component_type) {
        if occupant != id {
            return Err(ApiError::Conflict(format!(
                "Computer {host_id} already holds {} component {occupant}",
                component.component_type
            )));
        }
    }
    if component.host_computer_id != Some(host_id) {
        unslot_component(changes, session, &mut component).await?;
    }

    let mut host: ComputerModel = changes.get(session, host_id).await?;
    host.set_slot(component.component_type, id);
    component.host_computer_id = Some(host_id);
    component.owner_id = host.owner_id;
    component.asset_barcode = Some(host.asset_barcode.clone());
    component.status = ItemStatus::Active;
    record_history(&mut component, host_id);
    let uid = component.uid.to_string();
    changes.put(host);
    changes.put(component);
    Ok(uid)
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for PullOut {
    type Output = Item;

    const NAME: &'static str = "pull_out";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<Item> {
        let request = &self.request;
        let mut changes = ChangeSet::new();

        let (host_id, previous_owner_id, inventory_code) = match request.item {
            ItemRef::Asset(id) => {
                let mut asset: AssetModel = changes.get(session, id).await?;
                ensure_live(ItemKind::Asset, id, asset.is_deleted)?;
                let host_id = detach_asset(&mut changes, session, &mut asset)
                    .await?
                    .ok_or_else(|| not_attached(ItemKind::Asset, id))?;
                let previous = clear_owner(&mut asset);
                asset.status = ItemStatus::Available;
                let barcode = asset.asset_barcode.to_string();
                changes.put(asset);
                (host_id, previous, barcode)
            }
            ItemRef::Component(id) => {
                let mut component: ComponentModel = changes.get(session, id).await?;
                ensure_live(ItemKind::Component, id, component.is_deleted)?;
                let host_id = unslot_component(&mut changes, session, &mut component)
                    .await?
                    .ok_or_else(|| not_attached(ItemKind::Component, id))?;
                let previous = clear_owner(&mut component);
                component.asset_barcode = None;
                component.status = ItemStatus::Available;
                let uid = component.uid.to_string();
                changes.put(component);
                (host_id, previous, uid)
            }
            ItemRef::Computer(id) => {
                return Err(ApiError::Validation(format!(
                    "Computer {id} is not attached to a host"
                )))
            }
        };

        remove_from_live_records(
            &mut changes,
            session,
            ctx,
            &[request.item.id()],
            EmptiedRecord::SoftDelete,
            None,
        )
        .await?;
        write_repair_log(
            session,
            ctx,
            RepairEntry {
                item_kind: request.item.kind(),
                item_id: request.item.id(),
                inventory_code: &inventory_code,
                computer_id: host_id,
                action: RepairAction::PullOut,
                remarks: request.remarks.as_deref(),
            },
        )
        .await?;
        changes.flush(session, ctx).await?;

        info!(
            item_kind = %request.item.kind(),
            item_id = %request.item.id(),
            host_computer_id = %host_id,
            "Item pulled out"
        );
        ctx.emit(
            entity_type_of(request.item.kind()),
            request.item.id(),
            AuditAction::PulledOut,
            json!({
                "host_computer_id": host_id,
                "previous_owner_id": previous_owner_id,
                "remarks": request.remarks,
            }),
        );
        Item::saved(&changes, request.item)
    }
}

fn not_attached(kind: ItemKind, id: Uuid) -> ApiError {
    ApiError::Conflict(format!("{kind} {id} is not attached to a computer"))
}
