#[cfg(test)]
pub mod test_utils {
    use heapless::String as HeaplessString;
    use itam_core_db::models::{ComputerModel, ItemStatus};
    use uuid::Uuid;

    pub fn create_test_computer(barcode: &str) -> ComputerModel {
        ComputerModel {
            id: Uuid::new_v4(),
            asset_type: HeaplessString::try_from("LAPTOP").unwrap(),
            asset_barcode: HeaplessString::try_from(barcode).unwrap(),
            brand: Some(HeaplessString::try_from("Lenovo").unwrap()),
            model: Some(HeaplessString::try_from("T14").unwrap()),
            serial_no: None,
            cost: None,
            date_acquired: None,
            remarks: None,
            status: ItemStatus::Available,
            owner_id: None,
            assigned_assets: Vec::new(),
            components: Vec::new(),
            history: Vec::new(),
            is_deleted: false,
            hash: 0,
            audit_log_id: None,
        }
    }
}
