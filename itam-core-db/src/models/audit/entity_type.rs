use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "entity_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    User,
    Asset,
    Computer,
    Component,
    Accountability,
    ReturnItem,
    AccountabilityApproval,
    ReturnApproval,
    RepairLog,
}

impl From<EntityType> for &str {
    fn from(val: EntityType) -> Self {
        match val {
            EntityType::User => "USER",
            EntityType::Asset => "ASSET",
            EntityType::Computer => "COMPUTER",
            EntityType::Component => "COMPONENT",
            EntityType::Accountability => "ACCOUNTABILITY",
            EntityType::ReturnItem => "RETURN_ITEM",
            EntityType::AccountabilityApproval => "ACCOUNTABILITY_APPROVAL",
            EntityType::ReturnApproval => "RETURN_APPROVAL",
            EntityType::RepairLog => "REPAIR_LOG",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = (*self).into();
        f.write_str(name)
    }
}
