use chrono::{DateTime, TimeZone, Utc};
use heapless::String as HeaplessString;
use itam_core_api::{
    AssetDetails, AssignOwnerRequest, ComponentDetails, ComponentType, ItemRef, OwnerProfile,
    OwnerRef, PullInRequest, RegisterComponentRequest, RegisterItemRequest, RegisterUserRequest,
};
use itam_core_db::memory::{MemoryAuditEventSink, MemoryState, MemoryUnitOfWork};
use itam_core_db::models::{
    AccountabilityModel, AssetModel, ComponentModel, ComputerModel, ItemStatus, UserModel,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::FixedClock;
use crate::config::EngineConfig;
use crate::engine::Item;
use crate::service::OwnershipService;

pub const ACTING_USER: Uuid = Uuid::from_u128(0x5eed_0000_0000_0000_0000_0000_0000_0001);

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestEngine {
    pub service: OwnershipService<MemoryUnitOfWork>,
    pub store: MemoryUnitOfWork,
    pub sink: MemoryAuditEventSink,
}

pub fn setup_test_engine() -> TestEngine {
    setup_test_engine_with_state(MemoryState::default())
}

/// Engine over a store seeded with `state`, for shapes the operations never produce
pub fn setup_test_engine_with_state(state: MemoryState) -> TestEngine {
    init_tracing();
    let store = MemoryUnitOfWork::with_state(state);
    let sink = MemoryAuditEventSink::new();
    let config = EngineConfig {
        retry_backoff_ms: 0,
        ..EngineConfig::default()
    };
    let service = OwnershipService::new(
        store.clone(),
        Arc::new(FixedClock(test_now())),
        Arc::new(sink.clone()),
        config,
    );
    TestEngine {
        service,
        store,
        sink,
    }
}

pub fn create_test_profile(employee_id: &str) -> OwnerProfile {
    OwnerProfile {
        employee_id: employee_id.to_string(),
        name: format!("Employee {employee_id}"),
        company: "Acme".to_string(),
        department: "Engineering".to_string(),
        designation: Some("Analyst".to_string()),
    }
}

pub fn create_test_details(barcode: &str) -> AssetDetails {
    AssetDetails {
        asset_type: "LAPTOP".to_string(),
        asset_barcode: barcode.to_string(),
        brand: Some("Lenovo".to_string()),
        model: Some("T14".to_string()),
        serial_no: None,
        cost: None,
        date_acquired: None,
        remarks: None,
    }
}

/// Plain vacant asset model, not stored anywhere
pub fn new_asset(barcode: &str) -> AssetModel {
    AssetModel {
        id: Uuid::new_v4(),
        asset_type: HeaplessString::try_from("MONITOR").unwrap(),
        asset_barcode: HeaplessString::try_from(barcode).unwrap(),
        brand: None,
        model: None,
        serial_no: None,
        cost: None,
        date_acquired: None,
        remarks: None,
        status: ItemStatus::Available,
        owner_id: None,
        host_computer_id: None,
        history: Vec::new(),
        root_history: Vec::new(),
        is_deleted: false,
        hash: 0,
        audit_log_id: None,
    }
}

/// Plain vacant component model, not stored anywhere
pub fn new_component(uid: &str, component_type: ComponentType) -> ComponentModel {
    ComponentModel {
        id: Uuid::new_v4(),
        uid: HeaplessString::try_from(uid).unwrap(),
        component_type,
        description: HeaplessString::try_from("16GB DDR4").unwrap(),
        cost: None,
        status: ItemStatus::Available,
        owner_id: None,
        host_computer_id: None,
        asset_barcode: None,
        history: Vec::new(),
        is_deleted: false,
        hash: 0,
        audit_log_id: None,
    }
}

impl TestEngine {
    pub async fn create_test_user(&self, employee_id: &str) -> UserModel {
        self.service
            .register_user(RegisterUserRequest {
                profile: create_test_profile(employee_id),
                acting_user_id: ACTING_USER,
            })
            .await
            .unwrap()
    }

    pub async fn create_test_asset(&self, barcode: &str) -> AssetModel {
        self.service
            .register_asset(RegisterItemRequest {
                details: create_test_details(barcode),
                owner: None,
                acting_user_id: ACTING_USER,
            })
            .await
            .unwrap()
    }

    pub async fn create_test_computer(&self, barcode: &str) -> ComputerModel {
        self.service
            .register_computer(RegisterItemRequest {
                details: create_test_details(barcode),
                owner: None,
                acting_user_id: ACTING_USER,
            })
            .await
            .unwrap()
    }

    pub async fn create_test_component(&self, component_type: ComponentType) -> ComponentModel {
        self.service
            .register_component(RegisterComponentRequest {
                details: ComponentDetails {
                    component_type,
                    description: format!("{component_type} module"),
                    cost: None,
                },
                acting_user_id: ACTING_USER,
            })
            .await
            .unwrap()
    }

    pub async fn assign(&self, item: ItemRef, owner_id: Uuid) -> Item {
        self.service
            .assign_owner(AssignOwnerRequest {
                item,
                owner: OwnerRef::Id(owner_id),
                acting_user_id: ACTING_USER,
            })
            .await
            .unwrap()
    }

    pub async fn pull_in(&self, item: ItemRef, host_computer_id: Uuid) -> Item {
        self.service
            .pull_in(PullInRequest {
                item,
                host_computer_id,
                remarks: None,
                acting_user_id: ACTING_USER,
            })
            .await
            .unwrap()
    }

    pub async fn state(&self) -> MemoryState {
        self.store.snapshot().await
    }

    pub async fn asset(&self, id: Uuid) -> AssetModel {
        self.state().await.assets[&id].clone()
    }

    pub async fn computer(&self, id: Uuid) -> ComputerModel {
        self.state().await.computers[&id].clone()
    }

    pub async fn component(&self, id: Uuid) -> ComponentModel {
        self.state().await.components[&id].clone()
    }

    pub async fn record(&self, id: Uuid) -> AccountabilityModel {
        self.state().await.accountabilities[&id].clone()
    }

    /// The live record of an owner, read straight from the store
    pub async fn live_record_of(&self, owner_id: Uuid) -> Option<AccountabilityModel> {
        self.state()
            .await
            .accountabilities
            .values()
            .find(|record| record.owner_id == owner_id && record.is_live())
            .cloned()
    }
}

/// Checks the consistency rules of the ownership graph over a committed state
pub fn assert_invariants(state: &MemoryState) {
    let live: Vec<&AccountabilityModel> = state
        .accountabilities
        .values()
        .filter(|record| record.is_live())
        .collect();

    // one live record per owner, and codes are never shared
    let mut owners = BTreeSet::new();
    let mut codes = BTreeSet::new();
    for record in state.accountabilities.values() {
        assert!(
            codes.insert(record.accountability_code.clone()),
            "duplicate accountability code {}",
            record.accountability_code
        );
        assert!(
            codes.insert(record.tracking_code.clone()),
            "duplicate tracking code {}",
            record.tracking_code
        );
    }
    for record in &live {
        assert!(owners.insert(record.owner_id), "owner {} has two live records", record.owner_id);
    }

    // every item is listed at most once, by its owner
    let mut membership: BTreeMap<Uuid, Uuid> = BTreeMap::new();
    for record in &live {
        for id in record.asset_ids.iter().chain(record.computer_ids.iter()) {
            assert!(
                membership.insert(*id, record.owner_id).is_none(),
                "item {id} is listed in two live records"
            );
        }
        for id in &record.asset_ids {
            let asset = &state.assets[id];
            assert_eq!(asset.owner_id, Some(record.owner_id), "asset {id} owner differs from its record");
            assert_eq!(asset.host_computer_id, None, "listed asset {id} is attached");
        }
        for id in &record.computer_ids {
            assert_eq!(
                state.computers[id].owner_id,
                Some(record.owner_id),
                "computer {id} owner differs from its record"
            );
        }
    }
    let listed_computer = |id: &Uuid| {
        live.iter()
            .any(|record| record.computer_ids.contains(id))
    };

    for computer in state.computers.values().filter(|c| !c.is_deleted) {
        assert_eq!(
            computer.owner_id.is_some(),
            membership.contains_key(&computer.id),
            "computer {} owner does not match its listing",
            computer.id
        );
        for asset_id in &computer.assigned_assets {
            assert_eq!(state.assets[asset_id].host_computer_id, Some(computer.id));
        }
        for slot in &computer.components {
            let component = &state.components[&slot.component_id];
            assert_eq!(component.host_computer_id, Some(computer.id));
            assert_eq!(component.component_type, slot.component_type);
        }
    }

    // peripherals of a listed computer may stay vacant after a single-item assignment
    for asset in state.assets.values().filter(|a| !a.is_deleted) {
        let covered = membership.contains_key(&asset.id)
            || asset.host_computer_id.as_ref().is_some_and(listed_computer);
        if asset.owner_id.is_some() {
            assert!(covered, "owned asset {} is not covered by a live record", asset.id);
        } else {
            assert!(
                !membership.contains_key(&asset.id),
                "vacant asset {} is listed in a record",
                asset.id
            );
        }
        if let Some(host) = asset.host_computer_id {
            assert!(state.computers[&host].assigned_assets.contains(&asset.id));
        }
    }

    for component in state.components.values().filter(|c| !c.is_deleted) {
        match component.host_computer_id {
            Some(host) => {
                let host = &state.computers[&host];
                assert_eq!(
                    component.owner_id, host.owner_id,
                    "component {} does not mirror its host's owner",
                    component.id
                );
                assert_eq!(host.slot(component.component_type), Some(component.id));
            }
            None => assert_eq!(component.owner_id, None),
        }
    }
}
