#[cfg(test)]
pub mod test_utils {
    use chrono::NaiveDate;
    use heapless::String as HeaplessString;
    use itam_core_api::ItemKind;
    use itam_core_db::models::ReturnItemModel;
    use uuid::Uuid;

    pub fn create_test_return_item(accountability_id: Uuid, return_date: NaiveDate) -> ReturnItemModel {
        ReturnItemModel {
            id: Uuid::new_v4(),
            accountability_id,
            item_kind: ItemKind::Asset,
            item_id: Uuid::new_v4(),
            remarks: Some(HeaplessString::try_from("Screen cracked").unwrap()),
            returned_by: Uuid::new_v4(),
            return_date,
            hash: 0,
            audit_log_id: None,
        }
    }
}
