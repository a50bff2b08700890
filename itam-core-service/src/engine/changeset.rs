use itam_core_api::{ApiError, ApiResult};
use itam_core_db::models::{
    AccountabilityModel, AssetModel, ComponentModel, ComputerModel, Identifiable, UserModel,
    Versioned,
};
use itam_core_db::repository::{CreateBatch, LoadBatch, LockBatch, UpdateBatch};
use itam_core_db::UnitOfWorkSession;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::error::storage_error;
use crate::operation::OperationContext;

/// Binds a model to the repository that stores it in a session
pub trait SessionTable<S: UnitOfWorkSession>: Versioned + Identifiable + 'static {
    type Repo: LoadBatch<Self> + LockBatch<Self> + CreateBatch<Self> + UpdateBatch<Self>;

    fn repo(session: &S) -> &Self::Repo;
}

impl<S: UnitOfWorkSession> SessionTable<S> for UserModel {
    type Repo = S::Users;

    fn repo(session: &S) -> &S::Users {
        session.users()
    }
}

impl<S: UnitOfWorkSession> SessionTable<S> for AssetModel {
    type Repo = S::Assets;

    fn repo(session: &S) -> &S::Assets {
        session.assets()
    }
}

impl<S: UnitOfWorkSession> SessionTable<S> for ComputerModel {
    type Repo = S::Computers;

    fn repo(session: &S) -> &S::Computers {
        session.computers()
    }
}

impl<S: UnitOfWorkSession> SessionTable<S> for ComponentModel {
    type Repo = S::Components;

    fn repo(session: &S) -> &S::Components {
        session.components()
    }
}

impl<S: UnitOfWorkSession> SessionTable<S> for AccountabilityModel {
    type Repo = S::Accountabilities;

    fn repo(session: &S) -> &S::Accountabilities {
        session.accountabilities()
    }
}

/// Rows of one table loaded (and locked) by the running operation
#[derive(Debug)]
pub struct Tracked<T> {
    items: BTreeMap<Uuid, T>,
    dirty: BTreeSet<Uuid>,
    created: BTreeSet<Uuid>,
}

impl<T> Default for Tracked<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            dirty: BTreeSet::new(),
            created: BTreeSet::new(),
        }
    }
}

pub trait Tracks<T> {
    fn tracked(&mut self) -> &mut Tracked<T>;

    fn tracked_ref(&self) -> &Tracked<T>;
}

/// Working copy of every graph row an operation reads or writes
///
/// Each row is locked once, on first access, and every later access sees the
/// working copy, so cascades that reach the same row through different paths
/// never overwrite each other. `flush` writes the changed rows in one batch per
/// table.
#[derive(Debug, Default)]
pub struct ChangeSet {
    users: Tracked<UserModel>,
    assets: Tracked<AssetModel>,
    computers: Tracked<ComputerModel>,
    components: Tracked<ComponentModel>,
    accountabilities: Tracked<AccountabilityModel>,
}

macro_rules! tracks {
    ($model:ty, $field:ident) => {
        impl Tracks<$model> for ChangeSet {
            fn tracked(&mut self) -> &mut Tracked<$model> {
                &mut self.$field
            }

            fn tracked_ref(&self) -> &Tracked<$model> {
                &self.$field
            }
        }
    };
}

tracks!(UserModel, users);
tracks!(AssetModel, assets);
tracks!(ComputerModel, computers);
tracks!(ComponentModel, components);
tracks!(AccountabilityModel, accountabilities);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn table<T>(&self) -> &Tracked<T>
    where
        Self: Tracks<T>,
    {
        <Self as Tracks<T>>::tracked_ref(self)
    }

    fn table_mut<T>(&mut self) -> &mut Tracked<T>
    where
        Self: Tracks<T>,
    {
        <Self as Tracks<T>>::tracked(self)
    }

    /// Working copy of one row, locking it on first access
    pub async fn get<S, T>(&mut self, session: &S, id: Uuid) -> ApiResult<T>
    where
        S: UnitOfWorkSession,
        T: SessionTable<S> + Clone,
        Self: Tracks<T>,
    {
        let mut found = self.get_many::<S, T>(session, &[id]).await?;
        found
            .pop()
            .ok_or_else(|| ApiError::not_found(&T::ENTITY_TYPE.to_string(), id))
    }

    /// Working copies in the order of `ids`; any unknown id fails the whole call
    ///
    /// Missing rows are locked in one batch, in id order.
    pub async fn get_many<S, T>(&mut self, session: &S, ids: &[Uuid]) -> ApiResult<Vec<T>>
    where
        S: UnitOfWorkSession,
        T: SessionTable<S> + Clone,
        Self: Tracks<T>,
    {
        let mut missing: Vec<Uuid> = ids
            .iter()
            .copied()
            .filter(|id| !self.table::<T>().items.contains_key(id))
            .collect();
        missing.sort();
        missing.dedup();

        if !missing.is_empty() {
            let loaded = T::repo(session)
                .lock_batch(&missing)
                .await
                .map_err(storage_error)?;
            for (id, item) in missing.iter().zip(loaded) {
                match item {
                    Some(item) => {
                        self.table_mut::<T>().items.insert(*id, item);
                    }
                    None => return Err(ApiError::not_found(&T::ENTITY_TYPE.to_string(), id)),
                }
            }
        }

        ids.iter()
            .map(|id| {
                self.table::<T>()
                    .items
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ApiError::not_found(&T::ENTITY_TYPE.to_string(), id))
            })
            .collect()
    }

    /// Registers rows returned by a finder; rows already tracked keep their working copy
    pub fn adopt<T>(&mut self, found: Vec<T>)
    where
        T: Identifiable,
        Self: Tracks<T>,
    {
        let table = self.table_mut::<T>();
        for item in found {
            table.items.entry(item.get_id()).or_insert(item);
        }
    }

    /// Every tracked working copy of a table, in id order
    pub fn tracked_items<T>(&self) -> impl Iterator<Item = &T>
    where
        T: 'static,
        Self: Tracks<T>,
    {
        self.table::<T>().items.values()
    }

    pub fn current<T>(&self, id: Uuid) -> Option<&T>
    where
        Self: Tracks<T>,
    {
        self.table::<T>().items.get(&id)
    }

    /// Replaces the working copy and schedules it for update
    pub fn put<T>(&mut self, item: T)
    where
        T: Identifiable,
        Self: Tracks<T>,
    {
        let id = item.get_id();
        let table = self.table_mut::<T>();
        table.items.insert(id, item);
        table.dirty.insert(id);
    }

    /// Tracks a row that does not exist in the store yet
    pub fn insert_new<T>(&mut self, item: T)
    where
        T: Identifiable,
        Self: Tracks<T>,
    {
        let id = item.get_id();
        let table = self.table_mut::<T>();
        table.items.insert(id, item);
        table.created.insert(id);
    }

    /// Working copy of a row that must already be tracked, typically after `flush`
    pub fn saved<T>(&self, id: Uuid) -> ApiResult<T>
    where
        T: Versioned,
        Self: Tracks<T>,
    {
        self.current::<T>(id)
            .cloned()
            .ok_or_else(|| ApiError::Storage(format!("{} {id} is not tracked", T::ENTITY_TYPE)))
    }

    /// Writes every changed row and links the written rows to the audit log
    pub async fn flush<S: UnitOfWorkSession>(
        &mut self,
        session: &S,
        ctx: &mut OperationContext,
    ) -> ApiResult<()> {
        self.flush_table::<S, UserModel>(session, ctx).await?;
        self.flush_table::<S, ComputerModel>(session, ctx).await?;
        self.flush_table::<S, AssetModel>(session, ctx).await?;
        self.flush_table::<S, ComponentModel>(session, ctx).await?;
        self.flush_table::<S, AccountabilityModel>(session, ctx).await?;
        Ok(())
    }

    async fn flush_table<S, T>(&mut self, session: &S, ctx: &mut OperationContext) -> ApiResult<()>
    where
        S: UnitOfWorkSession,
        T: SessionTable<S> + Clone,
        Self: Tracks<T>,
    {
        let audit_log_id = ctx.audit_log_id();
        let table = self.table_mut::<T>();
        let updates: Vec<T> = table
            .dirty
            .iter()
            .filter(|id| !table.created.contains(*id))
            .filter_map(|id| table.items.get(id).cloned())
            .collect();
        let creates: Vec<T> = table
            .created
            .iter()
            .filter_map(|id| table.items.get(id).cloned())
            .collect();
        table.dirty.clear();
        table.created.clear();

        let mut saved = Vec::with_capacity(updates.len() + creates.len());
        if !updates.is_empty() {
            saved.extend(
                T::repo(session)
                    .update_batch(updates, audit_log_id)
                    .await
                    .map_err(storage_error)?,
            );
        }
        if !creates.is_empty() {
            saved.extend(
                T::repo(session)
                    .create_batch(creates, audit_log_id)
                    .await
                    .map_err(storage_error)?,
            );
        }

        for item in saved {
            // unchanged rows come back with their previous audit log
            if item.get_audit_log_id() == Some(audit_log_id) {
                ctx.touch(T::ENTITY_TYPE, item.get_id());
            }
            self.table_mut::<T>().items.insert(item.get_id(), item);
        }
        Ok(())
    }
}
