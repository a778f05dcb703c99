use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user::User;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_user_info(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Option<User>>>, ApiError> {
    let user = User::find_by_id(&state.db().pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// Collaborator lookup for board sharing.
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<ResponseJson<ApiResponse<Option<User>>>, ApiError> {
    let user = User::find_by_email(&state.db().pool, &email).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/info", get(get_user_info))
        .route("/users/email/{email}", get(get_user_by_email))
}
