use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::task::{CreateTask, Task, UpdateTask};
use services::services::task_move::{MoveTaskRequest, TaskMoveService};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn create_task(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = Task::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Option<Task>>>, ApiError> {
    let task = Task::update(&state.db().pool, task_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        task,
        "Successfully updated task",
    )))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Task::delete(&state.db().pool, task_id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "Successfully deleted task",
    )))
}

pub async fn get_board_tasks(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_by_board_id(&state.db().pool, board_id).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

/// Drag-and-drop relocation: one atomic operation covering the task's
/// `listId` and both ordered sequences.
pub async fn move_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<MoveTaskRequest>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = TaskMoveService::move_task(&state.db().pool, task_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/{task_id}", put(update_task).delete(delete_task))
        .route("/tasks/{task_id}/move", post(move_task))
        .route("/boards/{board_id}/tasks", get(get_board_tasks))
}
