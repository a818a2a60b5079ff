//! Assigning tasks to household members.
//!
//! The backend rejects self-assignment; no local check is made.

use uuid::Uuid;

use crate::api::segment;
use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{Assignment, AssignRequest, Task};

impl ApiClient {
    pub async fn assign_task(&self, task_id: Uuid, user_id: &str) -> Result<Assignment> {
        self.post("/tasks/assign", &AssignRequest { task_id, user_id })
            .await
    }

    /// Tasks currently assigned to `user_id`.
    pub async fn assigned_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.get(&format!("/tasks/assigned/{}", segment(user_id)))
            .await
    }

    pub async fn unassign_task(&self, task_id: Uuid, user_id: &str) -> Result<()> {
        self.delete(&format!("/tasks/{}/assignees/{}", task_id, segment(user_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::test_support::MockBackend;

    const TASK_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    async fn backend() -> MockBackend {
        let backend = MockBackend::start().await;
        backend.accept_token("tok");
        backend
    }

    #[tokio::test]
    async fn test_assign_task() {
        let backend = backend().await;
        backend.on(
            Method::POST,
            "/tasks/assign",
            200,
            json!({
                "id": 7,
                "task_id": TASK_ID,
                "user_id": "u-2",
                "asignado_por": "u-1",
                "fecha": "2025-05-30T10:00:00"
            }),
        );
        let (client, _) = backend.client(Some("tok"));

        let assignment = client
            .assign_task(Uuid::parse_str(TASK_ID).unwrap(), "u-2")
            .await
            .unwrap();

        assert_eq!(assignment.id, 7);
        assert_eq!(assignment.asignado_por, "u-1");
        assert_eq!(
            backend.requests_to("/tasks/assign")[0].body,
            Some(json!({ "task_id": TASK_ID, "user_id": "u-2" }))
        );
    }

    #[tokio::test]
    async fn test_self_assignment_error_comes_from_backend() {
        let backend = backend().await;
        backend.on(
            Method::POST,
            "/tasks/assign",
            400,
            json!({ "detail": "No puedes asignarte una tarea a ti mismo" }),
        );
        let (client, _) = backend.client(Some("tok"));

        let err = client
            .assign_task(Uuid::parse_str(TASK_ID).unwrap(), "u-1")
            .await
            .unwrap_err();

        assert_eq!(err.detail(), Some("No puedes asignarte una tarea a ti mismo"));
        assert_eq!(backend.requests_to("/tasks/assign").len(), 1);
    }

    #[tokio::test]
    async fn test_assigned_and_unassign() {
        let backend = backend().await;
        let unassign = format!("/tasks/{}/assignees/u-2", TASK_ID);
        backend.on(Method::GET, "/tasks/assigned/u-2", 200, json!([]));
        backend.on(Method::DELETE, &unassign, 204, Value::Null);
        let (client, _) = backend.client(Some("tok"));

        assert!(client.assigned_tasks("u-2").await.unwrap().is_empty());
        client
            .unassign_task(Uuid::parse_str(TASK_ID).unwrap(), "u-2")
            .await
            .unwrap();

        assert_eq!(backend.requests_to(&unassign)[0].method, Method::DELETE);
    }
}
