use itam_core_api::{ApiError, ApiResult, ItemKind, ItemRef, OwnerProfile, OwnerRef};
use itam_core_db::models::audit::{AuditAction, EntityType};
use itam_core_db::models::{
    AccountabilityModel, AssetModel, CodeFamily, ComponentModel, ComputerModel, RepairAction,
    RepairLogModel, UserModel,
};
use itam_core_db::repository::{
    CreateBatch, FindByEmployeeId, FindByHostComputerIds, FindLiveByMemberIds, FindLiveByOwnerId,
};
use itam_core_db::UnitOfWorkSession;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::changeset::ChangeSet;
use super::codes::next_code;
use super::text::{bounded, bounded_opt};
use crate::error::storage_error;
use crate::operation::OperationContext;

/// What happens to a live record whose last member is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptiedRecord {
    SoftDelete,
    /// The record stays live with no members; used by returns
    Keep,
}

pub fn ensure_live(kind: ItemKind, id: Uuid, is_deleted: bool) -> ApiResult<()> {
    if is_deleted {
        return Err(ApiError::Conflict(format!("{kind} {id} is deleted")));
    }
    Ok(())
}

pub fn new_user(profile: &OwnerProfile) -> ApiResult<UserModel> {
    Ok(UserModel {
        id: Uuid::new_v4(),
        employee_id: bounded(&profile.employee_id, "employee_id")?,
        name: bounded(&profile.name, "name")?,
        company: bounded(&profile.company, "company")?,
        department: bounded(&profile.department, "department")?,
        designation: bounded_opt(profile.designation.as_deref(), "designation")?,
        hash: 0,
        audit_log_id: None,
    })
}

/// Loads the referenced owner, creating an employee on first sight
pub async fn resolve_owner<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    owner: &OwnerRef,
) -> ApiResult<UserModel> {
    let profile = match owner {
        OwnerRef::Id(id) => return changes.get::<S, UserModel>(session, *id).await,
        OwnerRef::Employee(profile) => profile,
    };

    if let Some(user) = changes
        .tracked_items::<UserModel>()
        .find(|user| user.employee_id.as_str() == profile.employee_id)
    {
        return Ok(user.clone());
    }

    let found = session
        .users()
        .find_by_employee_id(&profile.employee_id)
        .await
        .map_err(storage_error)?;
    if let Some(user) = found {
        let user_id = user.id;
        changes.adopt(vec![user]);
        return changes.saved::<UserModel>(user_id);
    }

    let user = new_user(profile)?;
    debug!(employee_id = %profile.employee_id, user_id = %user.id, "Registering owner on first assignment");
    ctx.emit(
        EntityType::User,
        user.id,
        AuditAction::Registered,
        json!({ "employee_id": profile.employee_id }),
    );
    changes.insert_new(user.clone());
    Ok(user)
}

/// The owner's record with `is_deleted == false`, if any
pub async fn live_record_for_owner<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    owner_id: Uuid,
) -> ApiResult<Option<AccountabilityModel>> {
    let found = session
        .accountabilities()
        .find_live_by_owner_id(owner_id)
        .await
        .map_err(storage_error)?;
    changes.adopt(found.into_iter().collect());
    Ok(changes
        .tracked_items::<AccountabilityModel>()
        .find(|record| record.owner_id == owner_id && record.is_live())
        .cloned())
}

/// The owner's live record, reactivated if a return switched it off, or a new
/// record under fresh accountability and tracking codes
pub async fn upsert_record<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    owner_id: Uuid,
) -> ApiResult<AccountabilityModel> {
    if let Some(mut record) = live_record_for_owner(changes, session, owner_id).await? {
        if !record.is_active {
            record.is_active = true;
            changes.put(record.clone());
        }
        return Ok(record);
    }

    let accountability_code = next_code(session.codes(), CodeFamily::Accountability).await?;
    let tracking_code = next_code(session.codes(), CodeFamily::Tracking).await?;
    let record = AccountabilityModel {
        id: Uuid::new_v4(),
        accountability_code,
        tracking_code,
        owner_id,
        asset_ids: Vec::new(),
        computer_ids: Vec::new(),
        is_active: true,
        is_deleted: false,
        date_created: ctx.now(),
        hash: 0,
        audit_log_id: None,
    };
    debug!(
        owner_id = %owner_id,
        accountability_code = %record.accountability_code,
        tracking_code = %record.tracking_code,
        "Opening accountability record"
    );
    changes.insert_new(record.clone());
    Ok(record)
}

/// Lists an asset or computer in its owner's live record
pub async fn add_to_owner_record<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    owner_id: Uuid,
    member: ItemRef,
) -> ApiResult<AccountabilityModel> {
    let mut record = upsert_record(changes, session, ctx, owner_id).await?;
    match member {
        ItemRef::Asset(id) => record.add_asset(id),
        ItemRef::Computer(id) => record.add_computer(id),
        ItemRef::Component(id) => {
            return Err(ApiError::Validation(format!(
                "Component {id} cannot be listed in an accountability record"
            )))
        }
    }
    changes.put(record.clone());
    Ok(record)
}

/// Drops the items from every live record listing them
///
/// Records owned by `except_owner` are left alone.
pub async fn remove_from_live_records<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    item_ids: &[Uuid],
    emptied: EmptiedRecord,
    except_owner: Option<Uuid>,
) -> ApiResult<()> {
    if item_ids.is_empty() {
        return Ok(());
    }
    let found = session
        .accountabilities()
        .find_live_by_member_ids(item_ids)
        .await
        .map_err(storage_error)?;
    changes.adopt(found);

    let affected: Vec<AccountabilityModel> = changes
        .tracked_items::<AccountabilityModel>()
        .filter(|record| {
            record.is_live()
                && Some(record.owner_id) != except_owner
                && item_ids.iter().any(|id| record.contains(*id))
        })
        .cloned()
        .collect();

    for mut record in affected {
        for item_id in item_ids {
            record.remove_member(*item_id);
        }
        if record.is_empty() && emptied == EmptiedRecord::SoftDelete {
            debug!(accountability_id = %record.id, "Soft-deleting emptied accountability record");
            record.soft_delete();
            ctx.emit(
                EntityType::Accountability,
                record.id,
                AuditAction::AccountabilityDeleted,
                json!({ "reason": "emptied" }),
            );
        }
        changes.put(record);
    }
    Ok(())
}

/// Peripherals attached to any of the computers
pub async fn hosted_assets<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    computer_ids: &[Uuid],
) -> ApiResult<Vec<AssetModel>> {
    if computer_ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = session
        .assets()
        .find_by_host_computer_ids(computer_ids)
        .await
        .map_err(storage_error)?;
    changes.adopt(found);
    Ok(changes
        .tracked_items::<AssetModel>()
        .filter(|asset| {
            asset
                .host_computer_id
                .is_some_and(|host| computer_ids.contains(&host))
        })
        .cloned()
        .collect())
}

/// Components installed in any of the computers
pub async fn hosted_components<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    computer_ids: &[Uuid],
) -> ApiResult<Vec<ComponentModel>> {
    if computer_ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = session
        .components()
        .find_by_host_computer_ids(computer_ids)
        .await
        .map_err(storage_error)?;
    changes.adopt(found);
    Ok(changes
        .tracked_items::<ComponentModel>()
        .filter(|component| {
            component
                .host_computer_id
                .is_some_and(|host| computer_ids.contains(&host))
        })
        .cloned()
        .collect())
}

/// Unplugs the asset from its host, leaving the host's ownership untouched
///
/// Returns the former host.
pub async fn detach_asset<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    asset: &mut AssetModel,
) -> ApiResult<Option<Uuid>> {
    let Some(host_id) = asset.host_computer_id else {
        return Ok(None);
    };
    let mut host: ComputerModel = changes.get(session, host_id).await?;
    if host.detach_asset(asset.id) {
        changes.put(host);
    }
    asset.host_computer_id = None;
    Ok(Some(host_id))
}

/// Takes the component out of its host's slot, leaving the host's ownership untouched
///
/// Returns the former host.
pub async fn unslot_component<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    component: &mut ComponentModel,
) -> ApiResult<Option<Uuid>> {
    let Some(host_id) = component.host_computer_id else {
        return Ok(None);
    };
    let mut host: ComputerModel = changes.get(session, host_id).await?;
    if host.clear_slot_of(component.id) {
        changes.put(host);
    }
    component.host_computer_id = None;
    Ok(Some(host_id))
}

pub struct RepairEntry<'a> {
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    /// Barcode of an asset or uid of a component
    pub inventory_code: &'a str,
    pub computer_id: Uuid,
    pub action: RepairAction,
    pub remarks: Option<&'a str>,
}

/// Appends a maintenance trail entry inside the operation's transaction
pub async fn write_repair_log<S: UnitOfWorkSession>(
    session: &S,
    ctx: &mut OperationContext,
    entry: RepairEntry<'_>,
) -> ApiResult<RepairLogModel> {
    let log = RepairLogModel {
        id: Uuid::new_v4(),
        item_kind: entry.item_kind,
        inventory_code: bounded(entry.inventory_code, "inventory_code")?,
        item_id: entry.item_id,
        computer_id: entry.computer_id,
        action: entry.action,
        remarks: bounded_opt(entry.remarks, "remarks")?,
        performed_by: ctx.acting_user_id(),
        performed_at: ctx.now(),
        hash: 0,
        audit_log_id: None,
    };
    let mut saved = session
        .repair_logs()
        .create_batch(vec![log], ctx.audit_log_id())
        .await
        .map_err(storage_error)?;
    let log = saved
        .pop()
        .ok_or_else(|| ApiError::Storage("Repair log was not saved".to_string()))?;
    ctx.touch(EntityType::RepairLog, log.id);
    Ok(log)
}
