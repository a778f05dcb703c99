use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::board::{Board, CreateBoard, UpdateBoard};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::SessionUser};

pub async fn create_board(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateBoard>,
) -> Result<ResponseJson<ApiResponse<Board>>, ApiError> {
    let board = Board::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(board)))
}

pub async fn update_board(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateBoard>,
) -> Result<ResponseJson<ApiResponse<Option<Board>>>, ApiError> {
    let board = Board::update(&state.db().pool, board_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        board,
        "Successfully updated board",
    )))
}

/// Only the owning session may delete a board; anything else (including a
/// board that does not exist) is a 401 with the board left untouched.
pub async fn delete_board(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(board_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let removed = Board::delete_owned_by(&state.db().pool, board_id, user_id).await?;
    if removed == 0 {
        return Err(ApiError::Unauthorized("Not authorized to remove board"));
    }
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "Successfully deleted board",
    )))
}

pub async fn get_user_boards(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Board>>>, ApiError> {
    let boards = Board::find_by_user_id(&state.db().pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(boards)))
}

pub async fn get_shared_boards(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Board>>>, ApiError> {
    let boards = Board::find_shared_with_user(&state.db().pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(boards)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/boards", post(create_board))
        .route("/boards/{board_id}", put(update_board).delete(delete_board))
        .route("/users/{user_id}/boards", get(get_user_boards))
        .route("/users/{user_id}/shared", get(get_shared_boards))
}
