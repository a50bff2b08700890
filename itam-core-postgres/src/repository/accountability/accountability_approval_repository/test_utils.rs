#[cfg(test)]
pub mod test_utils {
    use itam_core_db::models::AccountabilityApprovalModel;
    use uuid::Uuid;

    pub fn create_test_accountability_approval(accountability_id: Uuid) -> AccountabilityApprovalModel {
        AccountabilityApprovalModel {
            id: Uuid::new_v4(),
            accountability_id,
            prepared: None,
            approved: None,
            confirmed: None,
            hash: 0,
            audit_log_id: None,
        }
    }
}
