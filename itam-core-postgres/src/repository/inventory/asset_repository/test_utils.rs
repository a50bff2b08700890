#[cfg(test)]
pub mod test_utils {
    use heapless::String as HeaplessString;
    use itam_core_db::models::{AssetModel, ItemStatus};
    use uuid::Uuid;

    pub fn create_test_asset(barcode: &str) -> AssetModel {
        AssetModel {
            id: Uuid::new_v4(),
            asset_type: HeaplessString::try_from("MONITOR").unwrap(),
            asset_barcode: HeaplessString::try_from(barcode).unwrap(),
            brand: Some(HeaplessString::try_from("Dell").unwrap()),
            model: None,
            serial_no: None,
            cost: None,
            date_acquired: None,
            remarks: None,
            status: ItemStatus::Available,
            owner_id: None,
            host_computer_id: None,
            history: Vec::new(),
            root_history: Vec::new(),
            is_deleted: false,
            hash: 0,
            audit_log_id: None,
        }
    }
}
