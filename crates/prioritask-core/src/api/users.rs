use crate::client::ApiClient;
use crate::error::Result;
use crate::types::User;

impl ApiClient {
    /// Every registered user. Used to pick assignees and filter history.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/users").await
    }
}
