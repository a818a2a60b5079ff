//! AI suggestions: prioritization, grouping and title rewriting.
//!
//! These endpoints only suggest. Nothing changes on the backend until a
//! rewrite is applied with [`ApiClient::apply_rewrite`].

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{GroupedTasks, PrioritizedTask, RewrittenTask, Task, TaskSelection, TaskUpdate};

impl ApiClient {
    pub async fn prioritize_tasks(&self, selection: &TaskSelection) -> Result<Vec<PrioritizedTask>> {
        self.post("/tasks/ai/prioritize", selection).await
    }

    pub async fn group_tasks(&self, selection: &TaskSelection) -> Result<GroupedTasks> {
        self.post("/tasks/ai/group", selection).await
    }

    pub async fn rewrite_titles(&self, selection: &TaskSelection) -> Result<Vec<RewrittenTask>> {
        self.post("/tasks/ai/rewrite", selection).await
    }

    /// Replace a task's title with the suggested one.
    pub async fn apply_rewrite(&self, suggestion: &RewrittenTask) -> Result<Task> {
        let task = self
            .patch_task(suggestion.id, &TaskUpdate::title(suggestion.reformulada.as_str()))
            .await?;
        info!(task_id = %suggestion.id, "Applied rewritten title");
        Ok(task)
    }
}
