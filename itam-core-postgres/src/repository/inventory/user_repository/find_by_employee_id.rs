use async_trait::async_trait;
use itam_core_db::models::UserModel;
use itam_core_db::repository::FindByEmployeeId;
use std::error::Error;

use crate::utils::{db_error, TryFromRow};

use super::repo_impl::UserRepositoryImpl;

#[async_trait]
impl FindByEmployeeId for UserRepositoryImpl {
    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<UserModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM app_user WHERE employee_id = $1"#)
                .bind(employee_id)
                .fetch_optional(&mut **transaction)
                .await
                .map_err(db_error)?
        };

        row.map(|row| UserModel::try_from_row(&row)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use itam_core_db::repository::{CreateBatch, FindByEmployeeId};
    use super::super::test_utils::test_utils::create_test_user;

    #[tokio::test]
    async fn test_find_by_employee_id() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ctx) = setup_test_context().await? else {
            return Ok(());
        };
        let user_repo = &ctx.inventory_repos().user_repository;

        let saved = user_repo
            .create_batch(vec![create_test_user("Finance")], ctx.audit_log_id)
            .await?;

        let found = user_repo
            .find_by_employee_id(saved[0].employee_id.as_str())
            .await?;
        assert_eq!(found.as_ref(), Some(&saved[0]));

        let missing = user_repo.find_by_employee_id("NOBODY-000").await?;
        assert!(missing.is_none());
        Ok(())
    }
}
