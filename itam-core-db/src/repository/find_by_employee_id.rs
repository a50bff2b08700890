use async_trait::async_trait;

use crate::models::UserModel;

/// Looks up a user by the employee id collaborators know them by
#[async_trait]
pub trait FindByEmployeeId: Send + Sync {
    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<UserModel>, Box<dyn std::error::Error + Send + Sync>>;
}
