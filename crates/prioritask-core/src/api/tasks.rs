//! Task CRUD and per-task history.

use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{NewTask, StatusUpdate, Task, TaskHistoryRecord, TaskStatus, TaskUpdate};
use crate::validation;

impl ApiClient {
    /// The current user's tasks (deleted tasks excluded by the backend).
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get("/tasks").await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        validation::new_task(task)?;
        self.post("/tasks", task).await
    }

    /// Update a task with `PUT`.
    pub async fn update_task(&self, task_id: Uuid, update: &TaskUpdate) -> Result<Task> {
        validation::task_update(update)?;
        self.put(&format!("/tasks/{}", task_id), update).await
    }

    /// Update a task with `PATCH`.
    pub async fn patch_task(&self, task_id: Uuid, update: &TaskUpdate) -> Result<Task> {
        validation::task_update(update)?;
        self.patch(&format!("/tasks/{}", task_id), update).await
    }

    pub async fn set_task_status(&self, task_id: Uuid, estado: TaskStatus) -> Result<Task> {
        self.patch(&format!("/tasks/{}/status", task_id), &StatusUpdate { estado })
            .await
    }

    /// Soft-delete a task.
    pub async fn delete_task(&self, task_id: Uuid) -> Result<()> {
        self.delete(&format!("/tasks/{}", task_id)).await
    }

    pub async fn task_history(&self, task_id: Uuid) -> Result<Vec<TaskHistoryRecord>> {
        self.get(&format!("/tasks/{}/history", task_id)).await
    }
}
