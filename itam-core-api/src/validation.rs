use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::refs::{ItemRef, OwnerProfile, OwnerRef};

/// Rejects the nil UUID, which collaborators send for "unset" references.
pub fn validate_id(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::new("nil_id"));
    }
    Ok(())
}

pub fn validate_ids(ids: &[Uuid]) -> Result<(), ValidationError> {
    if ids.iter().any(Uuid::is_nil) {
        return Err(ValidationError::new("nil_id"));
    }
    Ok(())
}

pub fn validate_item_ref(item: &ItemRef) -> Result<(), ValidationError> {
    validate_id(&item.id())
}

pub fn validate_item_refs(items: &[ItemRef]) -> Result<(), ValidationError> {
    items.iter().try_for_each(validate_item_ref)
}

/// Only assets and components can be pulled into a computer.
pub fn validate_attachable(item: &ItemRef) -> Result<(), ValidationError> {
    if let ItemRef::Computer(_) = item {
        return Err(ValidationError::new("computer_not_attachable"));
    }
    validate_item_ref(item)
}

pub fn validate_profile(profile: &OwnerProfile) -> Result<(), ValidationError> {
    profile
        .validate()
        .map_err(|_| ValidationError::new("invalid_owner_profile"))
}

pub fn validate_owner_ref(owner: &OwnerRef) -> Result<(), ValidationError> {
    match owner {
        OwnerRef::Id(id) => validate_id(id),
        OwnerRef::Employee(profile) => validate_profile(profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ids_rejects_nil() {
        assert!(validate_ids(&[Uuid::new_v4(), Uuid::new_v4()]).is_ok());
        assert!(validate_ids(&[Uuid::new_v4(), Uuid::nil()]).is_err());
    }

    #[test]
    fn test_validate_owner_ref_checks_profile() {
        let valid = OwnerRef::Employee(OwnerProfile {
            employee_id: "EMP-0042".to_string(),
            name: "Dana Cruz".to_string(),
            company: "Acme".to_string(),
            department: "Finance".to_string(),
            designation: None,
        });
        assert!(validate_owner_ref(&valid).is_ok());

        let invalid = OwnerRef::Employee(OwnerProfile {
            employee_id: String::new(),
            name: "Dana Cruz".to_string(),
            company: "Acme".to_string(),
            department: "Finance".to_string(),
            designation: None,
        });
        assert!(validate_owner_ref(&invalid).is_err());
        assert!(validate_owner_ref(&OwnerRef::Id(Uuid::nil())).is_err());
    }
}
