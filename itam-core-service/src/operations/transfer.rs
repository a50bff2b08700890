use async_trait::async_trait;
use itam_core_api::{ApiError, ApiResult, AssignOwnerRequest, ItemKind, ItemRef};
use itam_core_db::models::audit::AuditAction;
use itam_core_db::models::{AssetModel, ComputerModel, ItemStatus};
use itam_core_db::UnitOfWorkSession;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::engine::graph::{
    add_to_owner_record, detach_asset, ensure_live, hosted_components,
    remove_from_live_records, resolve_owner, EmptiedRecord,
};
use crate::engine::{entity_type_of, record_history, ChangeSet, Item};
use crate::operation::{Operation, OperationContext};

/// Assigns an asset or computer to an owner
pub struct AssignOwner {
    pub request: AssignOwnerRequest,
    /// Refuse items that already belong to someone else
    pub vacant_only: bool,
}

impl AssignOwner {
    pub fn new(request: AssignOwnerRequest) -> Self {
        Self {
            request,
            vacant_only: false,
        }
    }

    pub fn vacant_only(request: AssignOwnerRequest) -> Self {
        Self {
            request,
            vacant_only: true,
        }
    }
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for AssignOwner {
    type Output = Item;

    const NAME: &'static str = "assign_owner";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<Item> {
        let mut changes = ChangeSet::new();
        let owner = resolve_owner(&mut changes, session, ctx, &self.request.owner).await?;
        assign_item(
            &mut changes,
            session,
            ctx,
            self.request.item,
            owner.id,
            self.vacant_only,
        )
        .await?;
        changes.flush(session, ctx).await?;
        Item::saved(&changes, self.request.item)
    }
}

/// Moves an asset or computer to `owner_id` and lists it in the owner's live record
///
/// The previous owner goes to the item's history and loses the item from its record,
/// which is soft-deleted if that leaves it empty. Assigning to the current owner
/// changes nothing.
pub async fn assign_item<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    item: ItemRef,
    owner_id: Uuid,
    vacant_only: bool,
) -> ApiResult<()> {
    let previous_owner_id = match item {
        ItemRef::Asset(id) => assign_asset(changes, session, id, owner_id, vacant_only).await?,
        ItemRef::Computer(id) => {
            assign_computer(changes, session, id, owner_id, vacant_only).await?
        }
        ItemRef::Component(id) => {
            return Err(ApiError::Validation(format!(
                "Component {id} follows its host computer and cannot be assigned directly"
            )))
        }
    };
    let Some(previous_owner_id) = previous_owner_id else {
        return Ok(());
    };

    remove_from_live_records(
        changes,
        session,
        ctx,
        &[item.id()],
        EmptiedRecord::SoftDelete,
        Some(owner_id),
    )
    .await?;
    let record = add_to_owner_record(changes, session, ctx, owner_id, item).await?;

    info!(
        item_kind = %item.kind(),
        item_id = %item.id(),
        owner_id = %owner_id,
        previous_owner_id = ?previous_owner_id,
        accountability_id = %record.id,
        "Owner assigned"
    );
    ctx.emit(
        entity_type_of(item.kind()),
        item.id(),
        AuditAction::OwnerAssigned,
        json!({
            "owner_id": owner_id,
            "previous_owner_id": previous_owner_id,
            "accountability_id": record.id,
        }),
    );
    Ok(())
}

fn ensure_assignable(
    kind: ItemKind,
    id: Uuid,
    current_owner: Option<Uuid>,
    vacant_only: bool,
) -> ApiResult<()> {
    match current_owner {
        Some(current) if vacant_only => Err(ApiError::Conflict(format!(
            "{kind} {id} is already owned by {current}"
        ))),
        _ => Ok(()),
    }
}

/// Returns `None` when the asset already belongs to the owner, otherwise
/// `Some(previous_owner)`
async fn assign_asset<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    id: Uuid,
    owner_id: Uuid,
    vacant_only: bool,
) -> ApiResult<Option<Option<Uuid>>> {
    let mut asset: AssetModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Asset, id, asset.is_deleted)?;
    if asset.owner_id == Some(owner_id) {
        return Ok(None);
    }
    ensure_assignable(ItemKind::Asset, id, asset.owner_id, vacant_only)?;

    let previous = asset.owner_id;
    if let Some(previous) = previous {
        record_history(&mut asset, previous);
    }
    // record members are never peripherals
    detach_asset(changes, session, &mut asset).await?;
    asset.owner_id = Some(owner_id);
    asset.status = ItemStatus::Active;
    changes.put(asset);
    Ok(Some(previous))
}

/// Components mirror the new owner and barcode; peripherals keep whatever owner they have.
async fn assign_computer<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    id: Uuid,
    owner_id: Uuid,
    vacant_only: bool,
) -> ApiResult<Option<Option<Uuid>>> {
    let mut computer: ComputerModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Computer, id, computer.is_deleted)?;
    if computer.owner_id == Some(owner_id) {
        return Ok(None);
    }
    ensure_assignable(ItemKind::Computer, id, computer.owner_id, vacant_only)?;

    let previous = computer.owner_id;
    if let Some(previous) = previous {
        record_history(&mut computer, previous);
    }
    computer.owner_id = Some(owner_id);
    computer.status = ItemStatus::Active;
    let barcode = computer.asset_barcode.clone();
    changes.put(computer);

    for mut component in hosted_components(changes, session, &[id]).await? {
        component.owner_id = Some(owner_id);
        component.asset_barcode = Some(barcode.clone());
        component.status = ItemStatus::Active;
        changes.put(component);
    }
    Ok(Some(previous))
}
