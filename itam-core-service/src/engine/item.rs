use itam_core_api::{ApiResult, ItemKind, ItemRef};
use itam_core_db::models::audit::EntityType;
use itam_core_db::models::{AssetModel, ComponentModel, ComputerModel, ItemStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::changeset::ChangeSet;

pub fn entity_type_of(kind: ItemKind) -> EntityType {
    match kind {
        ItemKind::Asset => EntityType::Asset,
        ItemKind::Computer => EntityType::Computer,
        ItemKind::Component => EntityType::Component,
    }
}

/// An asset, computer or component as returned by item operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item")]
pub enum Item {
    Asset(AssetModel),
    Computer(ComputerModel),
    Component(ComponentModel),
}

impl Item {
    /// The tracked working copy of the referenced item
    pub fn saved(changes: &ChangeSet, item: ItemRef) -> ApiResult<Item> {
        Ok(match item {
            ItemRef::Asset(id) => Item::Asset(changes.saved(id)?),
            ItemRef::Computer(id) => Item::Computer(changes.saved(id)?),
            ItemRef::Component(id) => Item::Component(changes.saved(id)?),
        })
    }

    pub fn id(&self) -> Uuid {
        match self {
            Item::Asset(asset) => asset.id,
            Item::Computer(computer) => computer.id,
            Item::Component(component) => component.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Asset(_) => ItemKind::Asset,
            Item::Computer(_) => ItemKind::Computer,
            Item::Component(_) => ItemKind::Component,
        }
    }

    pub fn item_ref(&self) -> ItemRef {
        match self {
            Item::Asset(asset) => ItemRef::Asset(asset.id),
            Item::Computer(computer) => ItemRef::Computer(computer.id),
            Item::Component(component) => ItemRef::Component(component.id),
        }
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        match self {
            Item::Asset(asset) => asset.owner_id,
            Item::Computer(computer) => computer.owner_id,
            Item::Component(component) => component.owner_id,
        }
    }

    pub fn status(&self) -> ItemStatus {
        match self {
            Item::Asset(asset) => asset.status,
            Item::Computer(computer) => computer.status,
            Item::Component(component) => component.status,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetModel> {
        match self {
            Item::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn as_computer(&self) -> Option<&ComputerModel> {
        match self {
            Item::Computer(computer) => Some(computer),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentModel> {
        match self {
            Item::Component(component) => Some(component),
            _ => None,
        }
    }
}
