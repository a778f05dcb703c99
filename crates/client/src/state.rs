//! Explicit client-side cache of the active board.
//!
//! The cache is a plain struct passed by reference to whatever renders it;
//! there is no global singleton. Every mutation goes to the API first and
//! then re-fetches the affected collections, so the cache never invents
//! state the server has not confirmed. On failure the error is logged and
//! returned, and the cache keeps its previous contents.

use db::models::{
    board::{Board, CreateBoard, UpdateBoard},
    comment::{Comment, CreateComment, UpdateComment},
    list::{CreateList, List, UpdateList},
    task::{CreateTask, Task, UpdateTask},
    user::User,
};
use services::services::task_move::MoveTaskRequest;
use tracing::warn;
use uuid::Uuid;

use crate::api::{ApiClient, ClientError};

/// Remembered at drag start; consumed by [`BoardState::handle_task_drop`].
#[derive(Debug, Clone)]
pub struct DraggedTaskInfo {
    pub task: Task,
    pub origin_list_id: Uuid,
}

/// One drop event as reported by the UI layer.
#[derive(Debug, Clone)]
pub struct TaskDrop {
    pub dragged_task: Task,
    pub origin_list_id: Uuid,
    pub drop_list_id: Uuid,
    /// Task currently occupying the drop position; `None` lands the task at
    /// the end of the drop list.
    pub drop_task_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct BoardState {
    pub user: Option<User>,
    pub user_boards: Vec<Board>,
    pub shared_boards: Vec<Board>,
    pub active_board: Option<Board>,
    pub board_owner: Option<User>,
    pub board_lists: Vec<List>,
    pub board_tasks: Vec<Task>,
    pub board_comments: Vec<Comment>,
    pub dragged_task: Option<DraggedTaskInfo>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logout reset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn set_dragged_task(&mut self, info: DraggedTaskInfo) {
        self.dragged_task = Some(info);
    }

    fn user_id(&self) -> Result<Uuid, ClientError> {
        self.user
            .as_ref()
            .map(|user| user.id)
            .ok_or_else(|| ClientError::Api("no logged-in user".to_string()))
    }

    // Boards

    pub async fn refresh_user_boards(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let user_id = self.user_id()?;
        self.user_boards = api
            .user_boards(user_id)
            .await
            .inspect_err(|err| warn!("fetching user boards failed: {err}"))?;
        Ok(())
    }

    pub async fn refresh_shared_boards(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let user_id = self.user_id()?;
        self.shared_boards = api
            .shared_boards(user_id)
            .await
            .inspect_err(|err| warn!("fetching shared boards failed: {err}"))?;
        Ok(())
    }

    pub async fn create_board(
        &mut self,
        api: &ApiClient,
        data: CreateBoard,
    ) -> Result<(), ClientError> {
        api.create_board(&data)
            .await
            .inspect_err(|err| warn!("creating board failed: {err}"))?;
        self.refresh_user_boards(api).await
    }

    pub async fn update_board(
        &mut self,
        api: &ApiClient,
        board_id: Uuid,
        data: UpdateBoard,
    ) -> Result<(), ClientError> {
        let updated = api
            .update_board(board_id, &data)
            .await
            .inspect_err(|err| warn!("updating board failed: {err}"))?;
        if let Some(board) = updated {
            self.open_board(api, board).await?;
        }
        Ok(())
    }

    pub async fn delete_board(
        &mut self,
        api: &ApiClient,
        board_id: Uuid,
    ) -> Result<(), ClientError> {
        api.delete_board(board_id)
            .await
            .inspect_err(|err| warn!("deleting board failed: {err}"))?;
        self.refresh_user_boards(api).await
    }

    /// Makes the board active and re-fetches every dependent collection.
    pub async fn open_board(&mut self, api: &ApiClient, board: Board) -> Result<(), ClientError> {
        let board_id = board.id;
        self.active_board = Some(board);
        self.refresh_board_lists(api, board_id).await?;
        self.refresh_board_tasks(api, board_id).await?;
        self.refresh_board_comments(api, board_id).await?;
        Ok(())
    }

    pub async fn refresh_board_owner(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        let Some(board) = &self.active_board else {
            return Ok(());
        };
        self.board_owner = api
            .user_info(board.user_id)
            .await
            .inspect_err(|err| warn!("fetching board owner failed: {err}"))?;
        Ok(())
    }

    /// Looks the collaborator up by email, adds them to the active board's
    /// collaborator set, and persists the board.
    pub async fn add_collaborator(
        &mut self,
        api: &ApiClient,
        email: &str,
    ) -> Result<(), ClientError> {
        let Some(board) = self.active_board.clone() else {
            return Err(ClientError::Api("no active board".to_string()));
        };
        let collaborator = api
            .user_by_email(email)
            .await
            .inspect_err(|err| warn!("collaborator lookup failed: {err}"))?
            .ok_or_else(|| ClientError::Api(format!("no user with email {email}")))?;

        let mut collaborators = board.collaborators.0.clone();
        if !collaborators.contains(&collaborator.id) {
            collaborators.push(collaborator.id);
        }
        let updated = api
            .update_board(
                board.id,
                &UpdateBoard {
                    collaborators: Some(collaborators),
                    ..Default::default()
                },
            )
            .await
            .inspect_err(|err| warn!("persisting collaborators failed: {err}"))?;
        if let Some(board) = updated {
            self.active_board = Some(board);
        }
        Ok(())
    }

    // Lists

    pub async fn refresh_board_lists(
        &mut self,
        api: &ApiClient,
        board_id: Uuid,
    ) -> Result<(), ClientError> {
        self.board_lists = api
            .board_lists(board_id)
            .await
            .inspect_err(|err| warn!("fetching board lists failed: {err}"))?;
        Ok(())
    }

    pub async fn create_list(
        &mut self,
        api: &ApiClient,
        data: CreateList,
    ) -> Result<(), ClientError> {
        let list = api
            .create_list(&data)
            .await
            .inspect_err(|err| warn!("creating list failed: {err}"))?;
        self.refresh_board_lists(api, list.board_id).await
    }

    pub async fn update_list(
        &mut self,
        api: &ApiClient,
        list_id: Uuid,
        data: UpdateList,
    ) -> Result<(), ClientError> {
        let updated = api
            .update_list(list_id, &data)
            .await
            .inspect_err(|err| warn!("updating list failed: {err}"))?;
        if let Some(list) = updated {
            self.refresh_board_lists(api, list.board_id).await?;
        }
        Ok(())
    }

    pub async fn delete_list(&mut self, api: &ApiClient, list: &List) -> Result<(), ClientError> {
        api.delete_list(list.id)
            .await
            .inspect_err(|err| warn!("deleting list failed: {err}"))?;
        self.refresh_board_lists(api, list.board_id).await
    }

    // Tasks

    pub async fn refresh_board_tasks(
        &mut self,
        api: &ApiClient,
        board_id: Uuid,
    ) -> Result<(), ClientError> {
        self.board_tasks = api
            .board_tasks(board_id)
            .await
            .inspect_err(|err| warn!("fetching board tasks failed: {err}"))?;
        Ok(())
    }

    pub async fn create_task(
        &mut self,
        api: &ApiClient,
        data: CreateTask,
    ) -> Result<(), ClientError> {
        let task = api
            .create_task(&data)
            .await
            .inspect_err(|err| warn!("creating task failed: {err}"))?;
        self.refresh_board_tasks(api, task.board_id).await?;
        self.refresh_board_lists(api, task.board_id).await
    }

    pub async fn edit_task(
        &mut self,
        api: &ApiClient,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<(), ClientError> {
        let updated = api
            .update_task(task_id, &data)
            .await
            .inspect_err(|err| warn!("updating task failed: {err}"))?;
        if let Some(task) = updated {
            self.refresh_board_tasks(api, task.board_id).await?;
            self.refresh_board_lists(api, task.board_id).await?;
        }
        Ok(())
    }

    pub async fn delete_task(&mut self, api: &ApiClient, task: &Task) -> Result<(), ClientError> {
        api.delete_task(task.id)
            .await
            .inspect_err(|err| warn!("deleting task failed: {err}"))?;
        self.refresh_board_tasks(api, task.board_id).await?;
        self.refresh_board_lists(api, task.board_id).await
    }

    /// Completes a drag-drop: one move call, then re-fetch of the list and
    /// task collections so the cache reflects the new ordering.
    pub async fn handle_task_drop(
        &mut self,
        api: &ApiClient,
        drop: TaskDrop,
    ) -> Result<(), ClientError> {
        let board_id = drop.dragged_task.board_id;
        api.move_task(
            drop.dragged_task.id,
            &MoveTaskRequest {
                origin_list_id: drop.origin_list_id,
                drop_list_id: drop.drop_list_id,
                drop_task_id: drop.drop_task_id,
            },
        )
        .await
        .inspect_err(|err| warn!("task move failed: {err}"))?;

        self.dragged_task = None;
        self.refresh_board_lists(api, board_id).await?;
        self.refresh_board_tasks(api, board_id).await
    }

    // Comments

    pub async fn refresh_board_comments(
        &mut self,
        api: &ApiClient,
        board_id: Uuid,
    ) -> Result<(), ClientError> {
        self.board_comments = api
            .board_comments(board_id)
            .await
            .inspect_err(|err| warn!("fetching board comments failed: {err}"))?;
        Ok(())
    }

    pub async fn create_comment(
        &mut self,
        api: &ApiClient,
        data: CreateComment,
    ) -> Result<(), ClientError> {
        let comment = api
            .create_comment(&data)
            .await
            .inspect_err(|err| warn!("creating comment failed: {err}"))?;
        self.refresh_board_comments(api, comment.board_id).await
    }

    pub async fn update_comment(
        &mut self,
        api: &ApiClient,
        comment_id: Uuid,
        data: UpdateComment,
    ) -> Result<(), ClientError> {
        let updated = api
            .update_comment(comment_id, &data)
            .await
            .inspect_err(|err| warn!("updating comment failed: {err}"))?;
        if let Some(comment) = updated {
            self.refresh_board_comments(api, comment.board_id).await?;
        }
        Ok(())
    }

    pub async fn delete_comment(
        &mut self,
        api: &ApiClient,
        comment: &Comment,
    ) -> Result<(), ClientError> {
        api.delete_comment(comment.id)
            .await
            .inspect_err(|err| warn!("deleting comment failed: {err}"))?;
        self.refresh_board_comments(api, comment.board_id).await
    }
}
