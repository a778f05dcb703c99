use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::comment::{Comment, CreateComment, UpdateComment};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn create_comment(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateComment>,
) -> Result<ResponseJson<ApiResponse<Comment>>, ApiError> {
    let comment = Comment::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateComment>,
) -> Result<ResponseJson<ApiResponse<Option<Comment>>>, ApiError> {
    let comment = Comment::update(&state.db().pool, comment_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        comment,
        "Successfully updated comment",
    )))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Comment::delete(&state.db().pool, comment_id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "Successfully deleted comment",
    )))
}

pub async fn get_task_comments(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Comment>>>, ApiError> {
    let comments = Comment::find_by_task_id(&state.db().pool, task_id).await?;
    Ok(ResponseJson(ApiResponse::success(comments)))
}

pub async fn get_board_comments(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Comment>>>, ApiError> {
    let comments = Comment::find_by_board_id(&state.db().pool, board_id).await?;
    Ok(ResponseJson(ApiResponse::success(comments)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", post(create_comment))
        .route(
            "/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route("/tasks/{task_id}/comments", get(get_task_comments))
        .route("/boards/{board_id}/comments", get(get_board_comments))
}
