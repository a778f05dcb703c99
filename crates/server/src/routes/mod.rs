pub mod boards;
pub mod comments;
pub mod health;
pub mod lists;
pub mod tasks;
pub mod users;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(boards::router())
                .merge(lists::router())
                .merge(tasks::router())
                .merge(comments::router())
                .merge(users::router()),
        )
        .route("/health", get(health::health))
}
