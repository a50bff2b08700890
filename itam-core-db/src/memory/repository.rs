use async_trait::async_trait;
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use super::state::{MemoryState, MemoryTable};
use crate::error::ConcurrentUpdateError;
use crate::models::{
    AccountabilityApprovalModel, AccountabilityModel, AssetModel, AuditLinkModel, AuditLogModel,
    CodeFamily, ComponentModel, ComputerModel, ReturnApprovalModel, ReturnItemModel, UserModel,
};
use crate::repository::{
    AuditRepository, CodeSequence, CreateBatch, FindByAccountabilityId, FindByAssignedAsset,
    FindByEmployeeId, FindByHostComputerIds, FindLiveByMemberIds, FindLiveByOwnerId, FindVacant,
    LoadBatch, LockBatch, Page, PageRequest, UpdateBatch,
};
use crate::utils::{stamp_created, stamp_updated};

/// Every repository trait over one session's working copy
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    pub(crate) state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub fn new(state: MemoryState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }
}

fn paginate<T: Clone>(items: Vec<&T>, page: PageRequest) -> Page<T> {
    let total = items.len();
    let selected = items
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect();
    Page::new(selected, total, page.limit, page.offset)
}

#[async_trait]
impl<T: MemoryTable> LoadBatch<T> for MemoryRepository {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<T>>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        let table = T::table(&state);
        Ok(ids.iter().map(|id| table.get(id).cloned()).collect())
    }
}

// The session already holds the store exclusively, so locking is loading.
#[async_trait]
impl<T: MemoryTable> LockBatch<T> for MemoryRepository {
    async fn lock_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<T>>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        let table = T::table(&state);
        Ok(ids.iter().map(|id| table.get(id).cloned()).collect())
    }
}

#[async_trait]
impl<T: MemoryTable> CreateBatch<T> for MemoryRepository {
    async fn create_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        let mut state = self.state.lock();
        let table = T::table_mut(&mut state);
        if let Some(duplicate) = items.iter().find(|item| table.contains_key(&item.get_id())) {
            return Err(format!("Duplicate {} id {}", T::ENTITY_TYPE, duplicate.get_id()).into());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        for mut item in items {
            stamp_created(&mut item, audit_log_id)?;
            table.insert(item.get_id(), item.clone());
            saved_items.push(item);
        }
        Ok(saved_items)
    }
}

#[async_trait]
impl<T: MemoryTable> UpdateBatch<T> for MemoryRepository {
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, Box<dyn Error + Send + Sync>> {
        let mut state = self.state.lock();
        let table = T::table_mut(&mut state);
        for item in &items {
            match table.get(&item.get_id()) {
                None => {
                    return Err(format!("{} {} does not exist", T::ENTITY_TYPE, item.get_id()).into())
                }
                Some(stored) if stored.get_hash() != item.get_hash() => {
                    return Err(Box::new(ConcurrentUpdateError::StaleVersion {
                        entity: T::ENTITY_TYPE.to_string(),
                        id: item.get_id(),
                    }))
                }
                Some(_) => {}
            }
        }

        let mut updated_items = Vec::with_capacity(items.len());
        for mut item in items {
            if stamp_updated(&mut item, audit_log_id)? {
                table.insert(item.get_id(), item.clone());
            }
            updated_items.push(item);
        }
        Ok(updated_items)
    }
}

#[async_trait]
impl FindByEmployeeId for MemoryRepository {
    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<UserModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .users
            .values()
            .find(|user| user.employee_id.as_str() == employee_id)
            .cloned())
    }
}

#[async_trait]
impl FindLiveByOwnerId for MemoryRepository {
    async fn find_live_by_owner_id(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .accountabilities
            .values()
            .find(|record| record.owner_id == owner_id && record.is_live())
            .cloned())
    }
}

#[async_trait]
impl FindLiveByMemberIds for MemoryRepository {
    async fn find_live_by_member_ids(
        &self,
        item_ids: &[Uuid],
    ) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .accountabilities
            .values()
            .filter(|record| record.is_live() && item_ids.iter().any(|id| record.contains(*id)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FindByHostComputerIds<AssetModel> for MemoryRepository {
    async fn find_by_host_computer_ids(
        &self,
        computer_ids: &[Uuid],
    ) -> Result<Vec<AssetModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .assets
            .values()
            .filter(|asset| {
                asset
                    .host_computer_id
                    .is_some_and(|host| computer_ids.contains(&host))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FindByHostComputerIds<ComponentModel> for MemoryRepository {
    async fn find_by_host_computer_ids(
        &self,
        computer_ids: &[Uuid],
    ) -> Result<Vec<ComponentModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .components
            .values()
            .filter(|component| {
                component
                    .host_computer_id
                    .is_some_and(|host| computer_ids.contains(&host))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FindByAssignedAsset for MemoryRepository {
    async fn find_by_assigned_asset(
        &self,
        asset_id: Uuid,
    ) -> Result<Vec<ComputerModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .computers
            .values()
            .filter(|computer| computer.assigned_assets.contains(&asset_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FindVacant<AssetModel> for MemoryRepository {
    async fn find_vacant(
        &self,
        page: PageRequest,
    ) -> Result<Page<AssetModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        let vacant = state
            .assets
            .values()
            .filter(|asset| asset.owner_id.is_none() && !asset.is_deleted)
            .collect();
        Ok(paginate(vacant, page))
    }
}

#[async_trait]
impl FindVacant<ComputerModel> for MemoryRepository {
    async fn find_vacant(
        &self,
        page: PageRequest,
    ) -> Result<Page<ComputerModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        let vacant = state
            .computers
            .values()
            .filter(|computer| computer.owner_id.is_none() && !computer.is_deleted)
            .collect();
        Ok(paginate(vacant, page))
    }
}

#[async_trait]
impl FindByAccountabilityId<ReturnItemModel> for MemoryRepository {
    async fn find_by_accountability_id(
        &self,
        accountability_id: Uuid,
    ) -> Result<Vec<ReturnItemModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        let mut items: Vec<ReturnItemModel> = state
            .return_items
            .values()
            .filter(|item| item.accountability_id == accountability_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.return_date);
        Ok(items)
    }
}

#[async_trait]
impl FindByAccountabilityId<AccountabilityApprovalModel> for MemoryRepository {
    async fn find_by_accountability_id(
        &self,
        accountability_id: Uuid,
    ) -> Result<Vec<AccountabilityApprovalModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .accountability_approvals
            .values()
            .filter(|approval| approval.accountability_id == accountability_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FindByAccountabilityId<ReturnApprovalModel> for MemoryRepository {
    async fn find_by_accountability_id(
        &self,
        accountability_id: Uuid,
    ) -> Result<Vec<ReturnApprovalModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .return_approvals
            .values()
            .filter(|approval| approval.accountability_id == accountability_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CodeSequence for MemoryRepository {
    async fn next_value(&self, family: CodeFamily) -> Result<i64, Box<dyn Error + Send + Sync>> {
        let mut state = self.state.lock();
        let counter = state.counters.entry(family).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[async_trait]
impl AuditRepository for MemoryRepository {
    async fn create_log(
        &self,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, Box<dyn Error + Send + Sync>> {
        let mut state = self.state.lock();
        if state.audit_logs.contains_key(&audit_log.id) {
            return Err(format!("Duplicate audit log id {}", audit_log.id).into());
        }
        state.audit_logs.insert(audit_log.id, audit_log.clone());
        Ok(audit_log.clone())
    }

    async fn create_links(
        &self,
        links: Vec<AuditLinkModel>,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn Error + Send + Sync>> {
        let mut state = self.state.lock();
        for link in &links {
            if !state.audit_logs.contains_key(&link.audit_log_id) {
                return Err(format!("Audit log {} does not exist", link.audit_log_id).into());
            }
        }
        state.audit_links.extend(links.iter().cloned());
        Ok(links)
    }

    async fn find_links_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn Error + Send + Sync>> {
        let state = self.state.lock();
        Ok(state
            .audit_links
            .iter()
            .filter(|link| link.audit_log_id == audit_log_id)
            .cloned()
            .collect())
    }
}
