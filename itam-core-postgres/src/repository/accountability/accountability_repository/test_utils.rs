#[cfg(test)]
pub mod test_utils {
    use chrono::Utc;
    use heapless::String as HeaplessString;
    use itam_core_db::models::AccountabilityModel;
    use uuid::Uuid;

    /// Codes are unique columns, so each call derives them from the row id
    pub fn create_test_accountability(owner_id: Uuid) -> AccountabilityModel {
        let id = Uuid::new_v4();
        let suffix = &id.simple().to_string()[..12];
        AccountabilityModel {
            id,
            accountability_code: HeaplessString::try_from(format!("A-{suffix}").as_str()).unwrap(),
            tracking_code: HeaplessString::try_from(format!("T-{suffix}").as_str()).unwrap(),
            owner_id,
            asset_ids: Vec::new(),
            computer_ids: Vec::new(),
            is_active: true,
            is_deleted: false,
            date_created: Utc::now(),
            hash: 0,
            audit_log_id: None,
        }
    }
}
