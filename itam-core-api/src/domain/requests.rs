use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::approval::ApprovalStage;
use super::component_type::ComponentType;
use super::refs::{ItemRef, OwnerProfile, OwnerRef};
use crate::validation::{
    validate_attachable, validate_id, validate_ids, validate_item_ref, validate_item_refs,
    validate_owner_ref, validate_profile,
};

/// Give an asset or computer to an owner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignOwnerRequest {
    #[validate(custom(function = "validate_item_ref"))]
    pub item: ItemRef,
    #[validate(custom(function = "validate_owner_ref"))]
    pub owner: OwnerRef,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

/// Attach an asset or component to a host computer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PullInRequest {
    #[validate(custom(function = "validate_attachable"))]
    pub item: ItemRef,
    #[validate(custom(function = "validate_id"))]
    pub host_computer_id: Uuid,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

/// Detach an asset or component from its host computer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PullOutRequest {
    #[validate(custom(function = "validate_attachable"))]
    pub item: ItemRef,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

/// Bulk onboarding of assets and computers under one owner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_has_members"))]
pub struct CreateOrMergeAccountabilityRequest {
    #[validate(custom(function = "validate_owner_ref"))]
    pub owner: OwnerRef,
    #[validate(custom(function = "validate_ids"))]
    pub asset_ids: Vec<Uuid>,
    #[validate(custom(function = "validate_ids"))]
    pub computer_ids: Vec<Uuid>,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

fn validate_has_members(
    request: &CreateOrMergeAccountabilityRequest,
) -> Result<(), ValidationError> {
    if request.asset_ids.is_empty() && request.computer_ids.is_empty() {
        return Err(ValidationError::new("empty_accountability"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SoftDeleteAccountabilityRequest {
    #[validate(custom(function = "validate_id"))]
    pub accountability_id: Uuid,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

/// Hand items of an accountability record back to inventory
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitReturnRequest {
    #[validate(custom(function = "validate_id"))]
    pub accountability_id: Uuid,
    #[validate(length(min = 1), custom(function = "validate_item_refs"))]
    pub items: Vec<ItemRef>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdvanceApprovalRequest {
    #[validate(custom(function = "validate_id"))]
    pub accountability_id: Uuid,
    pub stage: ApprovalStage,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(custom(function = "validate_profile"))]
    pub profile: OwnerProfile,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

/// Descriptive fields shared by assets and computers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssetDetails {
    #[validate(length(min = 1, max = 50))]
    pub asset_type: String,
    #[validate(length(min = 1, max = 50))]
    pub asset_barcode: String,
    #[validate(length(max = 50))]
    pub brand: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[validate(length(max = 100))]
    pub serial_no: Option<String>,
    pub cost: Option<Decimal>,
    pub date_acquired: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Register an asset or a computer, optionally pre-owned
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_register_item"))]
pub struct RegisterItemRequest {
    pub details: AssetDetails,
    pub owner: Option<OwnerRef>,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

fn validate_register_item(request: &RegisterItemRequest) -> Result<(), ValidationError> {
    request
        .details
        .validate()
        .map_err(|_| ValidationError::new("invalid_asset_details"))?;
    match &request.owner {
        Some(owner) => validate_owner_ref(owner),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ComponentDetails {
    pub component_type: ComponentType,
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_register_component"))]
pub struct RegisterComponentRequest {
    pub details: ComponentDetails,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

fn validate_register_component(
    request: &RegisterComponentRequest,
) -> Result<(), ValidationError> {
    request
        .details
        .validate()
        .map_err(|_| ValidationError::new("invalid_component_details"))
}

/// Soft-delete an asset, computer or component
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteItemRequest {
    #[validate(custom(function = "validate_item_ref"))]
    pub item: ItemRef,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

/// Take a computer and everything on it away from its owner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReleaseComputerRequest {
    #[validate(custom(function = "validate_id"))]
    pub computer_id: Uuid,
    #[validate(custom(function = "validate_id"))]
    pub acting_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_request_requires_members() {
        let request = CreateOrMergeAccountabilityRequest {
            owner: OwnerRef::Id(Uuid::new_v4()),
            asset_ids: vec![],
            computer_ids: vec![],
            acting_user_id: Uuid::new_v4(),
        };
        assert!(request.validate().is_err());

        let request = CreateOrMergeAccountabilityRequest {
            asset_ids: vec![Uuid::new_v4()],
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_pull_in_rejects_computer_item() {
        let request = PullInRequest {
            item: ItemRef::Computer(Uuid::new_v4()),
            host_computer_id: Uuid::new_v4(),
            remarks: None,
            acting_user_id: Uuid::new_v4(),
        };
        assert!(request.validate().is_err());

        let request = PullInRequest {
            item: ItemRef::Asset(Uuid::new_v4()),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_return_requires_items() {
        let request = SubmitReturnRequest {
            accountability_id: Uuid::new_v4(),
            items: vec![],
            remarks: Some("end of contract".to_string()),
            acting_user_id: Uuid::new_v4(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_item_checks_details() {
        let request = RegisterItemRequest {
            details: AssetDetails {
                asset_type: String::new(),
                asset_barcode: "BC-0001".to_string(),
                brand: None,
                model: None,
                serial_no: None,
                cost: None,
                date_acquired: None,
                remarks: None,
            },
            owner: None,
            acting_user_id: Uuid::new_v4(),
        };
        assert!(request.validate().is_err());
    }
}
