//! HTTP client for the board-planner API.

use std::time::Duration;

use db::models::{
    board::{Board, CreateBoard, UpdateBoard},
    comment::{Comment, CreateComment, UpdateComment},
    list::{CreateList, List, UpdateList},
    task::{CreateTask, Task, UpdateTask},
    user::User,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use services::services::task_move::MoveTaskRequest;
use thiserror::Error;
use utils::response::ApiResponse;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("api error: {0}")]
    Api(String),
}

/// Fixed per-request timeout; failures are surfaced to the caller without
/// any retry.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session_user: Option<Uuid>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_user: None,
        })
    }

    /// Attaches the session identity forwarded as `x-user-id` on every
    /// request.
    pub fn with_session_user(mut self, user_id: Uuid) -> Self {
        self.session_user = Some(user_id);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let builder = match self.session_user {
            Some(user_id) => builder.header("x-user-id", user_id.to_string()),
            None => builder,
        };
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Transport(err.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiResponse<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.send(builder).await?;
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|err| ClientError::Serde(err.to_string()))?;
        if !envelope.success {
            return Err(ClientError::Api(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        Ok(envelope)
    }

    /// For endpoints whose `data` is always present on success.
    async fn request<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        self.envelope(builder)
            .await?
            .data
            .ok_or_else(|| ClientError::Api("missing response data".to_string()))
    }

    /// For endpoints that legitimately return `data: null` (update of a
    /// missing document, user lookups).
    async fn request_opt<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, ClientError> {
        Ok(self.envelope(builder).await?.data)
    }

    /// For delete-style endpoints; the envelope's `data` is discarded.
    async fn request_unit(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        self.envelope::<serde_json::Value>(builder).await?;
        Ok(())
    }

    // Boards

    pub async fn create_board(&self, data: &CreateBoard) -> Result<Board, ClientError> {
        self.request(self.http.post(self.url("boards")).json(data)).await
    }

    pub async fn update_board(
        &self,
        board_id: Uuid,
        data: &UpdateBoard,
    ) -> Result<Option<Board>, ClientError> {
        self.request_opt(self.http.put(self.url(&format!("boards/{board_id}"))).json(data))
            .await
    }

    pub async fn delete_board(&self, board_id: Uuid) -> Result<(), ClientError> {
        self.request_unit(self.http.delete(self.url(&format!("boards/{board_id}"))))
            .await
    }

    pub async fn user_boards(&self, user_id: Uuid) -> Result<Vec<Board>, ClientError> {
        self.request(self.http.get(self.url(&format!("users/{user_id}/boards"))))
            .await
    }

    pub async fn shared_boards(&self, user_id: Uuid) -> Result<Vec<Board>, ClientError> {
        self.request(self.http.get(self.url(&format!("users/{user_id}/shared"))))
            .await
    }

    // Lists

    pub async fn create_list(&self, data: &CreateList) -> Result<List, ClientError> {
        self.request(self.http.post(self.url("lists")).json(data)).await
    }

    pub async fn update_list(
        &self,
        list_id: Uuid,
        data: &UpdateList,
    ) -> Result<Option<List>, ClientError> {
        self.request_opt(self.http.put(self.url(&format!("lists/{list_id}"))).json(data))
            .await
    }

    pub async fn delete_list(&self, list_id: Uuid) -> Result<(), ClientError> {
        self.request_unit(self.http.delete(self.url(&format!("lists/{list_id}"))))
            .await
    }

    pub async fn board_lists(&self, board_id: Uuid) -> Result<Vec<List>, ClientError> {
        self.request(self.http.get(self.url(&format!("boards/{board_id}/lists"))))
            .await
    }

    // Tasks

    pub async fn create_task(&self, data: &CreateTask) -> Result<Task, ClientError> {
        self.request(self.http.post(self.url("tasks")).json(data)).await
    }

    pub async fn update_task(
        &self,
        task_id: Uuid,
        data: &UpdateTask,
    ) -> Result<Option<Task>, ClientError> {
        self.request_opt(self.http.put(self.url(&format!("tasks/{task_id}"))).json(data))
            .await
    }

    pub async fn delete_task(&self, task_id: Uuid) -> Result<(), ClientError> {
        self.request_unit(self.http.delete(self.url(&format!("tasks/{task_id}"))))
            .await
    }

    pub async fn board_tasks(&self, board_id: Uuid) -> Result<Vec<Task>, ClientError> {
        self.request(self.http.get(self.url(&format!("boards/{board_id}/tasks"))))
            .await
    }

    /// The atomic drag-drop move.
    pub async fn move_task(
        &self,
        task_id: Uuid,
        data: &MoveTaskRequest,
    ) -> Result<Task, ClientError> {
        self.request(
            self.http
                .post(self.url(&format!("tasks/{task_id}/move")))
                .json(data),
        )
        .await
    }

    // Comments

    pub async fn create_comment(&self, data: &CreateComment) -> Result<Comment, ClientError> {
        self.request(self.http.post(self.url("comments")).json(data)).await
    }

    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        data: &UpdateComment,
    ) -> Result<Option<Comment>, ClientError> {
        self.request_opt(
            self.http
                .put(self.url(&format!("comments/{comment_id}")))
                .json(data),
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<(), ClientError> {
        self.request_unit(self.http.delete(self.url(&format!("comments/{comment_id}"))))
            .await
    }

    pub async fn task_comments(&self, task_id: Uuid) -> Result<Vec<Comment>, ClientError> {
        self.request(self.http.get(self.url(&format!("tasks/{task_id}/comments"))))
            .await
    }

    pub async fn board_comments(&self, board_id: Uuid) -> Result<Vec<Comment>, ClientError> {
        self.request(self.http.get(self.url(&format!("boards/{board_id}/comments"))))
            .await
    }

    // Users

    pub async fn user_info(&self, user_id: Uuid) -> Result<Option<User>, ClientError> {
        self.request_opt(self.http.get(self.url(&format!("users/{user_id}/info"))))
            .await
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, ClientError> {
        self.request_opt(self.http.get(self.url(&format!("users/email/{email}"))))
            .await
    }
}
