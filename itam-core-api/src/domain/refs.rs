use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of tracked equipment an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "item_kind", rename_all = "PascalCase"))]
pub enum ItemKind {
    Asset,
    Computer,
    Component,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Asset => write!(f, "Asset"),
            ItemKind::Computer => write!(f, "Computer"),
            ItemKind::Component => write!(f, "Component"),
        }
    }
}

/// Typed reference to an asset, computer or component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum ItemRef {
    Asset(Uuid),
    Computer(Uuid),
    Component(Uuid),
}

impl ItemRef {
    pub fn id(&self) -> Uuid {
        match self {
            ItemRef::Asset(id) | ItemRef::Computer(id) | ItemRef::Component(id) => *id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Asset(_) => ItemKind::Asset,
            ItemRef::Computer(_) => ItemKind::Computer,
            ItemRef::Component(_) => ItemKind::Component,
        }
    }
}

/// Profile used to find or create an owner by employee id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OwnerProfile {
    #[validate(length(min = 1, max = 50))]
    pub employee_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub company: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    #[validate(length(max = 100))]
    pub designation: Option<String>,
}

/// Reference to an owner: an existing user, or an employee to find-or-create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerRef {
    Id(Uuid),
    Employee(OwnerProfile),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ref_serializes_with_kind_tag() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ItemRef::Computer(id)).unwrap();
        assert_eq!(json["kind"], "Computer");
        assert_eq!(json["id"], id.to_string());

        let back: ItemRef = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), ItemKind::Computer);
        assert_eq!(back.id(), id);
    }
}
