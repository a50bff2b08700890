#[cfg(test)]
pub mod test_utils {
    use heapless::String as HeaplessString;
    use itam_core_api::ComponentType;
    use itam_core_db::models::{ComponentModel, ItemStatus};
    use uuid::Uuid;

    /// The uid column is unique, so each call derives one from the row id
    pub fn create_test_component(component_type: ComponentType) -> ComponentModel {
        let id = Uuid::new_v4();
        let uid = format!("T-{}", &id.simple().to_string()[..12]);
        ComponentModel {
            id,
            uid: HeaplessString::try_from(uid.as_str()).unwrap(),
            component_type,
            description: HeaplessString::try_from("8GB DDR4").unwrap(),
            cost: None,
            status: ItemStatus::Available,
            owner_id: None,
            host_computer_id: None,
            asset_barcode: None,
            history: Vec::new(),
            is_deleted: false,
            hash: 0,
            audit_log_id: None,
        }
    }
}
