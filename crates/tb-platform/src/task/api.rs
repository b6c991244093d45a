//! Tasks API Endpoints
//!
//! - GET /tasks - List all tasks
//! - POST /tasks - Create a task (always starts Open)
//! - PUT /tasks - Update a task; closing stamps the close date
//!
//! The whole surface sits behind the access filter: requests without a
//! valid bearer token are rejected before these handlers run.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::shared::api_common::GenericResponse;
use crate::shared::error::{PlatformError, Result};
use crate::task::entity::{Task, TaskStatus};
use crate::task::repository::TaskRepository;

/// Create task request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title
    pub task_name: String,

    /// Username the task belongs to
    pub user_id: String,

    /// Free-form comments
    #[serde(default)]
    pub comments: Option<String>,
}

/// Update task request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// Target task ID
    pub id: String,

    /// New title
    pub task_name: String,

    /// New lifecycle state
    pub task_status: TaskStatus,

    /// New comments
    #[serde(default)]
    pub comments: Option<String>,
}

/// Tasks API state
#[derive(Clone)]
pub struct TasksState {
    pub task_repo: Arc<TaskRepository>,
}

/// List all tasks
#[utoipa::path(
    get,
    path = "/",
    tag = "tasks",
    operation_id = "getTasks",
    responses(
        (status = 200, description = "Envelope with every task"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_tasks(
    State(state): State<TasksState>,
) -> Result<Json<GenericResponse<Vec<Task>>>> {
    let tasks = state.task_repo.find_all().await?;
    Ok(Json(GenericResponse::ok("success", tasks)))
}

/// Create a task
///
/// The task starts `Open` with a server-stamped start date.
#[utoipa::path(
    post,
    path = "/",
    tag = "tasks",
    operation_id = "postTasks",
    request_body = NewTask,
    responses(
        (status = 200, description = "Envelope with the created task"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_task(
    State(state): State<TasksState>,
    Json(req): Json<NewTask>,
) -> Result<Json<GenericResponse<Task>>> {
    let task = Task::new(req.task_name, req.user_id, req.comments);
    state.task_repo.insert(&task).await?;
    Ok(Json(GenericResponse::ok("success", task)))
}

/// Update a task
///
/// Closing a task stamps its close date; reopening clears it.
#[utoipa::path(
    put,
    path = "/",
    tag = "tasks",
    operation_id = "putTasks",
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Envelope with the updated task"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Unknown task ID")
    )
)]
pub async fn update_task(
    State(state): State<TasksState>,
    Json(req): Json<UpdateTask>,
) -> Result<Json<GenericResponse<Task>>> {
    let mut task = state
        .task_repo
        .find_by_id(&req.id)
        .await?
        .ok_or_else(|| PlatformError::not_found("task", req.id.as_str()))?;

    task.apply_update(req.task_name, req.task_status, req.comments);
    state.task_repo.update(&task).await?;

    Ok(Json(GenericResponse::ok("success", task)))
}

/// Create the tasks router
pub fn tasks_router(state: TasksState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_tasks, create_task, update_task))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_request_deserialization() {
        let json = r#"{"taskName":"Report Generation","userId":"ramesh"}"#;
        let req: NewTask = serde_json::from_str(json).unwrap();
        assert_eq!(req.task_name, "Report Generation");
        assert_eq!(req.user_id, "ramesh");
        assert!(req.comments.is_none());
    }

    #[test]
    fn test_update_task_request_rejects_unknown_status() {
        let json = r#"{"id":"0ABC","taskName":"x","taskStatus":"Paused"}"#;
        let result: std::result::Result<UpdateTask, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_caller_cannot_pre_close_a_task() {
        // Status is not part of the create request; a task built from it is
        // always Open.
        let json = r#"{"taskName":"x","userId":"u","taskStatus":"Closed"}"#;
        let req: NewTask = serde_json::from_str(json).unwrap();
        let task = Task::new(req.task_name, req.user_id, req.comments);
        assert_eq!(task.task_status, TaskStatus::Open);
    }
}
