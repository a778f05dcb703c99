use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::list::{CreateList, List, UpdateList};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn create_list(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateList>,
) -> Result<ResponseJson<ApiResponse<List>>, ApiError> {
    let list = List::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(list)))
}

/// Accepts partial updates, including a full replacement `taskIds`
/// sequence; no permutation validation happens here (the callers that
/// reorder go through the move endpoint instead).
pub async fn update_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateList>,
) -> Result<ResponseJson<ApiResponse<Option<List>>>, ApiError> {
    let list = List::update(&state.db().pool, list_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        list,
        "Successfully updated list",
    )))
}

/// Deleting a list does not cascade to its tasks.
pub async fn delete_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    List::delete(&state.db().pool, list_id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "Successfully deleted list",
    )))
}

pub async fn get_board_lists(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<List>>>, ApiError> {
    let lists = List::find_by_board_id(&state.db().pool, board_id).await?;
    Ok(ResponseJson(ApiResponse::success(lists)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lists", post(create_list))
        .route("/lists/{list_id}", put(update_list).delete(delete_list))
        .route("/boards/{board_id}/lists", get(get_board_lists))
}
