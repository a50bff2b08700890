use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{
    AccountabilityApprovalModel, AccountabilityModel, AssetModel, AuditLinkModel, AuditLogModel,
    CodeFamily, ComponentModel, ComputerModel, RepairLogModel, ReturnApprovalModel,
    ReturnItemModel, UserModel, Versioned,
};

/// Every table of the store, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: BTreeMap<Uuid, UserModel>,
    pub assets: BTreeMap<Uuid, AssetModel>,
    pub computers: BTreeMap<Uuid, ComputerModel>,
    pub components: BTreeMap<Uuid, ComponentModel>,
    pub accountabilities: BTreeMap<Uuid, AccountabilityModel>,
    pub return_items: BTreeMap<Uuid, ReturnItemModel>,
    pub accountability_approvals: BTreeMap<Uuid, AccountabilityApprovalModel>,
    pub return_approvals: BTreeMap<Uuid, ReturnApprovalModel>,
    pub repair_logs: BTreeMap<Uuid, RepairLogModel>,
    pub audit_logs: BTreeMap<Uuid, AuditLogModel>,
    pub audit_links: Vec<AuditLinkModel>,
    pub counters: BTreeMap<CodeFamily, i64>,
}

/// Maps a model type to its table in [`MemoryState`]
pub trait MemoryTable: Versioned + 'static {
    fn table(state: &MemoryState) -> &BTreeMap<Uuid, Self>;

    fn table_mut(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self>;
}

macro_rules! memory_table {
    ($model:ty, $field:ident) => {
        impl MemoryTable for $model {
            fn table(state: &MemoryState) -> &BTreeMap<Uuid, Self> {
                &state.$field
            }

            fn table_mut(state: &mut MemoryState) -> &mut BTreeMap<Uuid, Self> {
                &mut state.$field
            }
        }
    };
}

memory_table!(UserModel, users);
memory_table!(AssetModel, assets);
memory_table!(ComputerModel, computers);
memory_table!(ComponentModel, components);
memory_table!(AccountabilityModel, accountabilities);
memory_table!(ReturnItemModel, return_items);
memory_table!(AccountabilityApprovalModel, accountability_approvals);
memory_table!(ReturnApprovalModel, return_approvals);
memory_table!(RepairLogModel, repair_logs);
