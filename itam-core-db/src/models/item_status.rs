use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status shared by assets, computers and components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Available,
    Active,
    Inactive,
    Deleted,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Available => write!(f, "AVAILABLE"),
            ItemStatus::Active => write!(f, "ACTIVE"),
            ItemStatus::Inactive => write!(f, "INACTIVE"),
            ItemStatus::Deleted => write!(f, "DELETED"),
        }
    }
}

impl FromStr for ItemStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(ItemStatus::Available),
            "ACTIVE" => Ok(ItemStatus::Active),
            "INACTIVE" => Ok(ItemStatus::Inactive),
            "DELETED" => Ok(ItemStatus::Deleted),
            _ => Err(()),
        }
    }
}
