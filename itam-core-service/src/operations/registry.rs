use async_trait::async_trait;
use chrono::NaiveDate;
use heapless::String as HeaplessString;
use itam_core_api::{
    ApiError, ApiResult, AssetDetails, DeleteItemRequest, ItemKind, ItemRef,
    RegisterComponentRequest, RegisterItemRequest, RegisterUserRequest, ReleaseComputerRequest,
};
use itam_core_db::models::audit::{AuditAction, EntityType};
use itam_core_db::models::{
    AssetModel, CodeFamily, ComponentModel, ComputerModel, ItemStatus, UserModel,
};
use itam_core_db::repository::FindByEmployeeId;
use itam_core_db::UnitOfWorkSession;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::accountability::clear_mirror;
use super::transfer::assign_item;
use crate::engine::graph::{
    detach_asset, ensure_live, hosted_assets, hosted_components, new_user,
    remove_from_live_records, resolve_owner, unslot_component, EmptiedRecord,
};
use crate::engine::text::{bounded, bounded_opt, money};
use crate::engine::{clear_owner, entity_type_of, next_code, ChangeSet, Item};
use crate::error::storage_error;
use crate::operation::{Operation, OperationContext};

pub struct RegisterUser {
    pub request: RegisterUserRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for RegisterUser {
    type Output = UserModel;

    const NAME: &'static str = "register_user";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<UserModel> {
        let profile = &self.request.profile;
        let existing = session
            .users()
            .find_by_employee_id(&profile.employee_id)
            .await
            .map_err(storage_error)?;
        if let Some(existing) = existing {
            return Err(ApiError::Conflict(format!(
                "Employee {} is already registered as user {}",
                profile.employee_id, existing.id
            )));
        }

        let user = new_user(profile)?;
        let user_id = user.id;
        let mut changes = ChangeSet::new();
        changes.insert_new(user);
        changes.flush(session, ctx).await?;

        info!(user_id = %user_id, employee_id = %profile.employee_id, "User registered");
        ctx.emit(
            EntityType::User,
            user_id,
            AuditAction::Registered,
            json!({ "employee_id": profile.employee_id }),
        );
        changes.saved(user_id)
    }
}

/// Descriptive columns shared by assets and computers
struct Descriptive {
    asset_type: HeaplessString<50>,
    asset_barcode: HeaplessString<50>,
    brand: Option<HeaplessString<50>>,
    model: Option<HeaplessString<100>>,
    serial_no: Option<HeaplessString<100>>,
    cost: Option<Decimal>,
    date_acquired: Option<NaiveDate>,
    remarks: Option<HeaplessString<500>>,
}

impl Descriptive {
    fn from_details(details: &AssetDetails) -> ApiResult<Self> {
        Ok(Self {
            asset_type: bounded(&details.asset_type, "asset_type")?,
            asset_barcode: bounded(&details.asset_barcode, "asset_barcode")?,
            brand: bounded_opt(details.brand.as_deref(), "brand")?,
            model: bounded_opt(details.model.as_deref(), "model")?,
            serial_no: bounded_opt(details.serial_no.as_deref(), "serial_no")?,
            cost: money(details.cost, "cost")?,
            date_acquired: details.date_acquired,
            remarks: bounded_opt(details.remarks.as_deref(), "remarks")?,
        })
    }
}

/// Creates the item vacant, then hands it to the requested owner if there is one
async fn register_item<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    request: &RegisterItemRequest,
    item: ItemRef,
) -> ApiResult<()> {
    if let Some(owner) = &request.owner {
        let owner = resolve_owner(changes, session, ctx, owner).await?;
        assign_item(changes, session, ctx, item, owner.id, true).await?;
    }
    changes.flush(session, ctx).await?;

    info!(
        item_kind = %item.kind(),
        item_id = %item.id(),
        barcode = %request.details.asset_barcode,
        "Item registered"
    );
    ctx.emit(
        entity_type_of(item.kind()),
        item.id(),
        AuditAction::Registered,
        json!({ "asset_barcode": request.details.asset_barcode }),
    );
    Ok(())
}

pub struct RegisterAsset {
    pub request: RegisterItemRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for RegisterAsset {
    type Output = AssetModel;

    const NAME: &'static str = "register_asset";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<AssetModel> {
        let details = Descriptive::from_details(&self.request.details)?;
        let asset = AssetModel {
            id: Uuid::new_v4(),
            asset_type: details.asset_type,
            asset_barcode: details.asset_barcode,
            brand: details.brand,
            model: details.model,
            serial_no: details.serial_no,
            cost: details.cost,
            date_acquired: details.date_acquired,
            remarks: details.remarks,
            status: ItemStatus::Available,
            owner_id: None,
            host_computer_id: None,
            history: Vec::new(),
            root_history: Vec::new(),
            is_deleted: false,
            hash: 0,
            audit_log_id: None,
        };
        let id = asset.id;
        let mut changes = ChangeSet::new();
        changes.insert_new(asset);
        register_item(&mut changes, session, ctx, &self.request, ItemRef::Asset(id)).await?;
        changes.saved(id)
    }
}

pub struct RegisterComputer {
    pub request: RegisterItemRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for RegisterComputer {
    type Output = ComputerModel;

    const NAME: &'static str = "register_computer";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<ComputerModel> {
        let details = Descriptive::from_details(&self.request.details)?;
        let computer = ComputerModel {
            id: Uuid::new_v4(),
            asset_type: details.asset_type,
            asset_barcode: details.asset_barcode,
            brand: details.brand,
            model: details.model,
            serial_no: details.serial_no,
            cost: details.cost,
            date_acquired: details.date_acquired,
            remarks: details.remarks,
            status: ItemStatus::Available,
            owner_id: None,
            assigned_assets: Vec::new(),
            components: Vec::new(),
            history: Vec::new(),
            is_deleted: false,
            hash: 0,
            audit_log_id: None,
        };
        let id = computer.id;
        let mut changes = ChangeSet::new();
        changes.insert_new(computer);
        register_item(&mut changes, session, ctx, &self.request, ItemRef::Computer(id)).await?;
        changes.saved(id)
    }
}

/// Creates a vacant component under the next `UID` code
pub struct RegisterComponent {
    pub request: RegisterComponentRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for RegisterComponent {
    type Output = ComponentModel;

    const NAME: &'static str = "register_component";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<ComponentModel> {
        let details = &self.request.details;
        let description = bounded(&details.description, "description")?;
        let cost = money(details.cost, "cost")?;
        let uid = next_code(session.codes(), CodeFamily::ComponentUid).await?;
        let component = ComponentModel {
            id: Uuid::new_v4(),
            uid,
            component_type: details.component_type,
            description,
            cost,
            status: ItemStatus::Available,
            owner_id: None,
            host_computer_id: None,
            asset_barcode: None,
            history: Vec::new(),
            is_deleted: false,
            hash: 0,
            audit_log_id: None,
        };
        let id = component.id;
        let mut changes = ChangeSet::new();
        changes.insert_new(component);
        changes.flush(session, ctx).await?;

        let component: ComponentModel = changes.saved(id)?;
        info!(
            component_id = %id,
            uid = %component.uid,
            component_type = %component.component_type,
            "Component registered"
        );
        ctx.emit(
            EntityType::Component,
            id,
            AuditAction::Registered,
            json!({ "uid": component.uid.as_str(), "component_type": component.component_type }),
        );
        Ok(component)
    }
}

/// Soft-deletes an item and unhooks it from owners, hosts and records
pub struct DeleteItem {
    pub request: DeleteItemRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for DeleteItem {
    type Output = Item;

    const NAME: &'static str = "delete_item";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<Item> {
        let item = self.request.item;
        let mut changes = ChangeSet::new();
        let previous_owner_id = match item {
            ItemRef::Asset(id) => delete_asset(&mut changes, session, ctx, id).await?,
            ItemRef::Computer(id) => delete_computer(&mut changes, session, ctx, id).await?,
            ItemRef::Component(id) => delete_component(&mut changes, session, id).await?,
        };
        changes.flush(session, ctx).await?;

        info!(item_kind = %item.kind(), item_id = %item.id(), "Item deleted");
        ctx.emit(
            entity_type_of(item.kind()),
            item.id(),
            AuditAction::Deleted,
            json!({ "previous_owner_id": previous_owner_id }),
        );
        Item::saved(&changes, item)
    }
}

async fn delete_asset<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    id: Uuid,
) -> ApiResult<Option<Uuid>> {
    let mut asset: AssetModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Asset, id, asset.is_deleted)?;
    detach_asset(changes, session, &mut asset).await?;
    let previous = clear_owner(&mut asset);
    asset.status = ItemStatus::Inactive;
    asset.is_deleted = true;
    changes.put(asset);
    remove_from_live_records(changes, session, ctx, &[id], EmptiedRecord::SoftDelete, None).await?;
    Ok(previous)
}

/// Components are pulled out and deactivated, peripherals go back to inventory
async fn delete_computer<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    ctx: &mut OperationContext,
    id: Uuid,
) -> ApiResult<Option<Uuid>> {
    let computer: ComputerModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Computer, id, computer.is_deleted)?;
    remove_from_live_records(changes, session, ctx, &[id], EmptiedRecord::SoftDelete, None).await?;

    for mut component in hosted_components(changes, session, &[id]).await? {
        clear_mirror(&mut component);
        component.host_computer_id = None;
        component.status = ItemStatus::Inactive;
        changes.put(component);
    }
    for mut peripheral in hosted_assets(changes, session, &[id]).await? {
        peripheral.host_computer_id = None;
        clear_owner(&mut peripheral);
        peripheral.status = ItemStatus::Available;
        changes.put(peripheral);
    }

    let mut computer: ComputerModel = changes.get(session, id).await?;
    computer.components.clear();
    computer.assigned_assets.clear();
    let previous = clear_owner(&mut computer);
    computer.status = ItemStatus::Inactive;
    computer.is_deleted = true;
    changes.put(computer);
    Ok(previous)
}

async fn delete_component<S: UnitOfWorkSession>(
    changes: &mut ChangeSet,
    session: &S,
    id: Uuid,
) -> ApiResult<Option<Uuid>> {
    let mut component: ComponentModel = changes.get(session, id).await?;
    ensure_live(ItemKind::Component, id, component.is_deleted)?;
    unslot_component(changes, session, &mut component).await?;
    let previous = clear_owner(&mut component);
    component.asset_barcode = None;
    component.status = ItemStatus::Deleted;
    component.is_deleted = true;
    changes.put(component);
    Ok(previous)
}

/// Takes a computer and everything on it away from its owner
///
/// Peripherals and components stay attached but lose the owner; the computer
/// leaves its record.
pub struct ReleaseComputer {
    pub request: ReleaseComputerRequest,
}

#[async_trait]
impl<S: UnitOfWorkSession> Operation<S> for ReleaseComputer {
    type Output = ComputerModel;

    const NAME: &'static str = "release_computer";

    fn acting_user_id(&self) -> Uuid {
        self.request.acting_user_id
    }

    async fn execute(&self, session: &S, ctx: &mut OperationContext) -> ApiResult<ComputerModel> {
        let id = self.request.computer_id;
        let mut changes = ChangeSet::new();
        let mut computer: ComputerModel = changes.get(session, id).await?;
        ensure_live(ItemKind::Computer, id, computer.is_deleted)?;
        let Some(previous_owner_id) = clear_owner(&mut computer) else {
            return Err(ApiError::Conflict(format!("Computer {id} has no owner")));
        };
        computer.status = ItemStatus::Inactive;
        changes.put(computer);

        for mut peripheral in hosted_assets(&mut changes, session, &[id]).await? {
            clear_owner(&mut peripheral);
            peripheral.status = ItemStatus::Inactive;
            changes.put(peripheral);
        }
        for mut component in hosted_components(&mut changes, session, &[id]).await? {
            clear_mirror(&mut component);
            component.status = ItemStatus::Inactive;
            changes.put(component);
        }
        remove_from_live_records(
            &mut changes,
            session,
            ctx,
            &[id],
            EmptiedRecord::SoftDelete,
            None,
        )
        .await?;
        changes.flush(session, ctx).await?;

        info!(computer_id = %id, previous_owner_id = %previous_owner_id, "Computer released");
        ctx.emit(
            EntityType::Computer,
            id,
            AuditAction::Released,
            json!({ "previous_owner_id": previous_owner_id }),
        );
        changes.saved(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        assert_invariants, create_test_details, create_test_profile, setup_test_engine,
        TestEngine, ACTING_USER,
    };
    use itam_core_api::{ComponentType, OwnerRef};
    use tokio_test::{assert_err, assert_ok};

    async fn delete(engine: &TestEngine, item: ItemRef) -> ApiResult<Item> {
        engine
            .service
            .delete_item(DeleteItemRequest {
                item,
                acting_user_id: ACTING_USER,
            })
            .await
    }

    #[tokio::test]
    async fn test_register_user_rejects_duplicate_employee() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        assert_eq!(user.employee_id.as_str(), "EMP-001");
        assert_ne!(user.hash, 0);

        let err = assert_err!(
            engine
                .service
                .register_user(RegisterUserRequest {
                    profile: create_test_profile("EMP-001"),
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(engine.state().await.users.len(), 1);
    }

    #[tokio::test]
    async fn test_register_pre_owned_computer() {
        let engine = setup_test_engine();
        let computer = assert_ok!(
            engine
                .service
                .register_computer(RegisterItemRequest {
                    details: create_test_details("PC-NEW"),
                    owner: Some(OwnerRef::Employee(create_test_profile("EMP-001"))),
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        let owner_id = computer.owner_id.unwrap();
        assert_eq!(computer.status, ItemStatus::Active);
        assert!(computer.history.is_empty());

        let record = engine.live_record_of(owner_id).await.unwrap();
        assert_eq!(record.computer_ids, vec![computer.id]);

        let state = engine.state().await;
        assert_eq!(state.computers[&computer.id].audit_log_id, computer.audit_log_id);
        assert_invariants(&state);
    }

    #[tokio::test]
    async fn test_register_rejects_oversized_field() {
        let engine = setup_test_engine();
        let mut details = create_test_details("PC-BIG");
        details.brand = Some("x".repeat(60));

        let err = assert_err!(
            engine
                .service
                .register_asset(RegisterItemRequest {
                    details,
                    owner: None,
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(engine.state().await.assets.is_empty());
    }

    #[tokio::test]
    async fn test_component_uids_are_sequential() {
        let engine = setup_test_engine();
        let first = engine.create_test_component(ComponentType::Ram).await;
        let second = engine.create_test_component(ComponentType::Gpu).await;
        assert_eq!(first.uid.as_str(), "UID-001");
        assert_eq!(second.uid.as_str(), "UID-002");
        assert_eq!(second.status, ItemStatus::Available);
        assert_eq!(second.owner_id, None);
    }

    #[tokio::test]
    async fn test_delete_computer_releases_its_parts() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let computer = engine.create_test_computer("PC-C1").await;
        let ram = engine.create_test_component(ComponentType::Ram).await;
        let monitor = engine.create_test_asset("BC-MON").await;
        engine.assign(ItemRef::Computer(computer.id), user.id).await;
        engine.pull_in(ItemRef::Component(ram.id), computer.id).await;
        engine.pull_in(ItemRef::Asset(monitor.id), computer.id).await;
        let record = engine.live_record_of(user.id).await.unwrap();

        let item = assert_ok!(delete(&engine, ItemRef::Computer(computer.id)).await);
        let deleted = item.as_computer().unwrap();
        assert!(deleted.is_deleted);
        assert_eq!(deleted.status, ItemStatus::Inactive);
        assert_eq!(deleted.owner_id, None);
        assert!(deleted.components.is_empty());
        assert!(deleted.assigned_assets.is_empty());
        assert_eq!(deleted.history, vec![user.id]);

        let ram = engine.component(ram.id).await;
        assert_eq!(ram.host_computer_id, None);
        assert_eq!(ram.owner_id, None);
        assert_eq!(ram.status, ItemStatus::Inactive);

        let monitor = engine.asset(monitor.id).await;
        assert_eq!(monitor.host_computer_id, None);
        assert_eq!(monitor.owner_id, None);
        assert_eq!(monitor.status, ItemStatus::Available);

        assert!(engine.record(record.id).await.is_deleted);
        assert_invariants(&engine.state().await);

        let err = assert_err!(delete(&engine, ItemRef::Computer(computer.id)).await);
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_component_frees_slot() {
        let engine = setup_test_engine();
        let computer = engine.create_test_computer("PC-C1").await;
        let gpu = engine.create_test_component(ComponentType::Gpu).await;
        engine.pull_in(ItemRef::Component(gpu.id), computer.id).await;

        let item = assert_ok!(delete(&engine, ItemRef::Component(gpu.id)).await);
        let gpu = item.as_component().unwrap();
        assert!(gpu.is_deleted);
        assert_eq!(gpu.status, ItemStatus::Deleted);
        assert_eq!(gpu.asset_barcode, None);
        assert_eq!(engine.computer(computer.id).await.slot(ComponentType::Gpu), None);
        assert_invariants(&engine.state().await);
    }

    #[tokio::test]
    async fn test_delete_owned_asset_leaves_record() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let asset = engine.create_test_asset("BC-1").await;
        engine.assign(ItemRef::Asset(asset.id), user.id).await;

        let item = assert_ok!(delete(&engine, ItemRef::Asset(asset.id)).await);
        let asset = item.as_asset().unwrap();
        assert_eq!(asset.history, vec![user.id]);
        assert_eq!(asset.status, ItemStatus::Inactive);
        assert!(engine.live_record_of(user.id).await.is_none());
        assert_invariants(&engine.state().await);

        let err = assert_err!(
            engine
                .service
                .assign_owner(itam_core_api::AssignOwnerRequest {
                    item: ItemRef::Asset(asset.id),
                    owner: OwnerRef::Id(user.id),
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_release_computer_vacates_everything_on_it() {
        let engine = setup_test_engine();
        let user = engine.create_test_user("EMP-001").await;
        let computer = engine.create_test_computer("PC-C1").await;
        let ssd = engine.create_test_component(ComponentType::Ssd).await;
        let keyboard = engine.create_test_asset("BC-KB").await;
        engine.assign(ItemRef::Computer(computer.id), user.id).await;
        engine.pull_in(ItemRef::Component(ssd.id), computer.id).await;
        engine.pull_in(ItemRef::Asset(keyboard.id), computer.id).await;

        let released = assert_ok!(
            engine
                .service
                .release_computer(ReleaseComputerRequest {
                    computer_id: computer.id,
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        assert_eq!(released.owner_id, None);
        assert_eq!(released.status, ItemStatus::Inactive);
        assert_eq!(released.history, vec![user.id]);
        assert_eq!(released.assigned_assets, vec![keyboard.id]);

        let keyboard = engine.asset(keyboard.id).await;
        assert_eq!(keyboard.owner_id, None);
        assert_eq!(keyboard.status, ItemStatus::Inactive);
        assert_eq!(keyboard.history.last(), Some(&user.id));

        let ssd = engine.component(ssd.id).await;
        assert_eq!(ssd.owner_id, None);
        assert_eq!(ssd.asset_barcode, None);
        assert_eq!(ssd.status, ItemStatus::Inactive);
        assert!(engine.live_record_of(user.id).await.is_none());
        assert_invariants(&engine.state().await);

        let err = assert_err!(
            engine
                .service
                .release_computer(ReleaseComputerRequest {
                    computer_id: computer.id,
                    acting_user_id: ACTING_USER,
                })
                .await
        );
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
