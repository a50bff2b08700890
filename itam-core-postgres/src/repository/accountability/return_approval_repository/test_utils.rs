#[cfg(test)]
pub mod test_utils {
    use itam_core_db::models::ReturnApprovalModel;
    use uuid::Uuid;

    pub fn create_test_return_approval(accountability_id: Uuid) -> ReturnApprovalModel {
        ReturnApprovalModel {
            id: Uuid::new_v4(),
            accountability_id,
            checked: None,
            received: None,
            confirmed: None,
            hash: 0,
            audit_log_id: None,
        }
    }
}
