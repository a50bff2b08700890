#[cfg(test)]
pub mod test_utils {
    use heapless::String as HeaplessString;
    use itam_core_db::models::UserModel;
    use uuid::Uuid;

    /// Employee ids are unique per call; concurrent test transactions would
    /// otherwise wait on each other's uncommitted inserts
    pub fn create_test_user(department: &str) -> UserModel {
        let id = Uuid::new_v4();
        let employee_id = format!("EMP-{}", &id.simple().to_string()[..12]);
        UserModel {
            id,
            employee_id: HeaplessString::try_from(employee_id.as_str()).unwrap(),
            name: HeaplessString::try_from("Dana Cruz").unwrap(),
            company: HeaplessString::try_from("Acme").unwrap(),
            department: HeaplessString::try_from(department).unwrap(),
            designation: None,
            hash: 0,
            audit_log_id: None,
        }
    }
}
