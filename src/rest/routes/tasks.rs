// rest/routes/tasks.rs — Task board REST routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::storage::{Category, StorageError, TaskPatch, TaskRow};
use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

/// Map a storage outcome to a boundary status. Database details are logged,
/// never sent to the client.
fn storage_error(op: &str, e: StorageError) -> ApiError {
    match e {
        StorageError::NoFields => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No fields to update" })),
        ),
        StorageError::TaskNotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Task not found" })),
        ),
        StorageError::Db(e) => {
            error!("{op} failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            )
        }
    }
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<TaskRow>>, ApiError> {
    let tasks = ctx
        .storage
        .list_tasks()
        .await
        .map_err(|e| storage_error("list tasks", e))?;
    Ok(Json(tasks))
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub content: String,
    pub category: Category,
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskRow>), ApiError> {
    if body.content.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "content must not be empty" })),
        ));
    }

    let task = ctx
        .storage
        .create_task(&body.content, body.category)
        .await
        .map_err(|e| storage_error("create task", e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub content: Option<String>,
    pub category: Option<Category>,
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskRow>, ApiError> {
    let patch = TaskPatch {
        content: body.content,
        category: body.category,
    };
    let task = ctx
        .storage
        .update_task(id, patch)
        .await
        .map_err(|e| storage_error("update task", e))?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ctx.storage
        .delete_task(id)
        .await
        .map_err(|e| storage_error("delete task", e))?;
    Ok(StatusCode::NO_CONTENT)
}
