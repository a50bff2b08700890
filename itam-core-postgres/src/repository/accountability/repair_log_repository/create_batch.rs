use async_trait::async_trait;
use chrono::SubsecRound;
use itam_core_db::models::RepairLogModel;
use itam_core_db::repository::CreateBatch;
use itam_core_db::utils::stamp_created;
use std::error::Error;
use uuid::Uuid;

use crate::utils::db_error;

use super::repo_impl::RepairLogRepositoryImpl;

impl RepairLogRepositoryImpl {
    pub(super) async fn create_batch_impl(
        &self,
        items: Vec<RepairLogModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<RepairLogModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            item.performed_at = item.performed_at.trunc_subsecs(6);
            stamp_created(&mut item, audit_log_id)?;
            sqlx::query(
                r#"
                INSERT INTO repair_log
                (id, item_kind, inventory_code, item_id, computer_id, action, remarks,
                 performed_by, performed_at, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(item.id)
            .bind(item.item_kind)
            .bind(item.inventory_code.as_str())
            .bind(item.item_id)
            .bind(item.computer_id)
            .bind(item.action)
            .bind(item.remarks.as_ref().map(|s| s.as_str()))
            .bind(item.performed_by)
            .bind(item.performed_at)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await
            .map_err(db_error)?;

            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<RepairLogModel> for RepairLogRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<RepairLogModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<RepairLogModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::inventory::computer_repository::test_utils::test_utils::create_test_computer;
    use crate::test_helper::setup_test_context;
    use chrono::Utc;
    use heapless::String as HeaplessString;
    use itam_core_api::ItemKind;
    use itam_core_db::models::{RepairAction, RepairLogModel};
    use itam_core_db::repository::CreateBatch;
    use sqlx::Row;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_batch_writes_entries() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let computer = ctx
            .inventory_repos()
            .computer_repository
            .create_batch(vec![create_test_computer("PC-0200")], ctx.audit_log_id)
            .await?;
        let computer_id = computer[0].id;

        let entry = RepairLogModel {
            id: Uuid::new_v4(),
            item_kind: ItemKind::Component,
            inventory_code: HeaplessString::try_from("UID-001").unwrap(),
            item_id: Uuid::new_v4(),
            computer_id,
            action: RepairAction::PullIn,
            remarks: None,
            performed_by: Uuid::new_v4(),
            performed_at: Utc::now(),
            hash: 0,
            audit_log_id: None,
        };
        let saved = ctx
            .accountability_repos()
            .repair_log_repository
            .create_batch(vec![entry], ctx.audit_log_id)
            .await?;
        assert_ne!(saved[0].hash, 0);

        let mut tx = ctx.executor().tx.lock().await;
        let transaction = tx.as_mut().unwrap();
        let row = sqlx::query("SELECT action, inventory_code FROM repair_log WHERE computer_id = $1")
            .bind(computer_id)
            .fetch_one(&mut **transaction)
            .await?;
        let action: RepairAction = row.try_get("action")?;
        let inventory_code: String = row.try_get("inventory_code")?;
        assert_eq!(action, RepairAction::PullIn);
        assert_eq!(inventory_code, "UID-001");
        Ok(())
    }
}
