//! Tags and tag-to-task assignment.

use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{MessageResponse, Tag, TagAssignRequest, TagName};
use crate::validation;

impl ApiClient {
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.get("/tags").await
    }

    /// Create a tag. The name is trimmed first.
    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        let nombre = validation::tag_name(name)?;
        self.post("/tags", &TagName { nombre }).await
    }

    pub async fn rename_tag(&self, tag_id: Uuid, name: &str) -> Result<Tag> {
        let nombre = validation::tag_name(name)?;
        self.patch(&format!("/tags/{}", tag_id), &TagName { nombre })
            .await
    }

    pub async fn delete_tag(&self, tag_id: Uuid) -> Result<()> {
        self.delete(&format!("/tags/{}", tag_id)).await
    }

    /// Replace the tags on a task.
    pub async fn assign_tags(&self, task_id: Uuid, tag_ids: &[Uuid]) -> Result<MessageResponse> {
        self.post(
            &format!("/tags/tasks/{}/tags", task_id),
            &TagAssignRequest { tag_ids },
        )
        .await
    }
}
