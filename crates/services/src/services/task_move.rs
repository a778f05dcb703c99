//! Coordinator for drag-and-drop task moves.
//!
//! A move relocates one task between two ordered task-id sequences (or
//! within one). The whole operation runs inside a single transaction:
//! retargeting the task's `list_id` and rewriting both sequences either all
//! land or none do, so a crash or a concurrent move can never leave a task
//! whose `list_id` points at a list that does not carry it. Re-applying the
//! same move yields the same final state.

use db::models::{list::List, task::Task};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaskMoveError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("task {0} not found")]
    TaskNotFound(Uuid),
    #[error("list {0} not found")]
    ListNotFound(Uuid),
    #[error("drop target task {0} is not in the drop list")]
    InvalidDropTarget(Uuid),
}

/// One drag-drop event. `drop_task_id` is the task currently occupying the
/// drop position; absent means the task lands at the end of the drop list.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskRequest {
    pub origin_list_id: Uuid,
    pub drop_list_id: Uuid,
    pub drop_task_id: Option<Uuid>,
}

pub struct TaskMoveService;

impl TaskMoveService {
    /// Moves `task_id` from the origin list to the drop list, inserting it
    /// immediately before `drop_task_id` (or appending when absent).
    /// Returns the task with its updated `list_id`.
    pub async fn move_task(
        pool: &SqlitePool,
        task_id: Uuid,
        request: &MoveTaskRequest,
    ) -> Result<Task, TaskMoveError> {
        let task = Task::find_by_id(pool, task_id)
            .await?
            .ok_or(TaskMoveError::TaskNotFound(task_id))?;

        // Dropping a task onto itself changes nothing.
        if request.drop_task_id == Some(task_id) {
            return Ok(task);
        }

        debug!(
            %task_id,
            origin = %request.origin_list_id,
            drop = %request.drop_list_id,
            drop_task = ?request.drop_task_id,
            "moving task"
        );

        let mut tx = pool.begin().await?;

        let mut origin_ids = List::task_ids(&mut *tx, request.origin_list_id)
            .await?
            .ok_or(TaskMoveError::ListNotFound(request.origin_list_id))?;
        origin_ids.retain(|id| *id != task_id);

        if request.origin_list_id == request.drop_list_id {
            Self::insert_at_drop_position(&mut origin_ids, task_id, request.drop_task_id)?;
            Task::set_list_id(&mut *tx, task_id, request.drop_list_id).await?;
            List::set_task_ids(&mut *tx, request.drop_list_id, &origin_ids).await?;
        } else {
            let mut drop_ids = List::task_ids(&mut *tx, request.drop_list_id)
                .await?
                .ok_or(TaskMoveError::ListNotFound(request.drop_list_id))?;
            // Removing any stale occurrence first keeps the sequence free of
            // duplicates and makes the move idempotent.
            drop_ids.retain(|id| *id != task_id);
            Self::insert_at_drop_position(&mut drop_ids, task_id, request.drop_task_id)?;

            Task::set_list_id(&mut *tx, task_id, request.drop_list_id).await?;
            List::set_task_ids(&mut *tx, request.origin_list_id, &origin_ids).await?;
            List::set_task_ids(&mut *tx, request.drop_list_id, &drop_ids).await?;
        }

        tx.commit().await?;

        Task::find_by_id(pool, task_id)
            .await?
            .ok_or(TaskMoveError::TaskNotFound(task_id))
    }

    /// Inserts before the element `drop_task_id` occupies, never swapping;
    /// with no drop target the task goes to the end of the sequence.
    fn insert_at_drop_position(
        sequence: &mut Vec<Uuid>,
        task_id: Uuid,
        drop_task_id: Option<Uuid>,
    ) -> Result<(), TaskMoveError> {
        match drop_task_id {
            Some(target) => {
                let index = sequence
                    .iter()
                    .position(|id| *id == target)
                    .ok_or(TaskMoveError::InvalidDropTarget(target))?;
                sequence.insert(index, task_id);
            }
            None => sequence.push(task_id),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::DBService;
    use db::models::board::{Board, CreateBoard};
    use db::models::list::CreateList;
    use db::models::task::CreateTask;
    use db::models::user::{CreateUser, User};

    struct Fixture {
        db: DBService,
        board: Board,
    }

    impl Fixture {
        async fn new() -> Self {
            let db = DBService::new_in_memory().await.unwrap();
            let user = User::create(
                &db.pool,
                &CreateUser {
                    username: "owner".to_string(),
                    email: "owner@example.com".to_string(),
                },
            )
            .await
            .unwrap();
            let board = Board::create(
                &db.pool,
                &CreateBoard {
                    user_id: user.id,
                    title: "Board".to_string(),
                    description: "".to_string(),
                },
            )
            .await
            .unwrap();
            Self { db, board }
        }

        async fn list(&self, title: &str) -> List {
            List::create(
                &self.db.pool,
                &CreateList {
                    board_id: self.board.id,
                    user_id: self.board.user_id,
                    title: title.to_string(),
                    description: "".to_string(),
                },
            )
            .await
            .unwrap()
        }

        async fn task(&self, list: &List, title: &str) -> Task {
            Task::create(
                &self.db.pool,
                &CreateTask {
                    list_id: list.id,
                    board_id: self.board.id,
                    user_id: self.board.user_id,
                    title: title.to_string(),
                    description: "".to_string(),
                },
            )
            .await
            .unwrap()
        }

        async fn sequence(&self, list: &List) -> Vec<Uuid> {
            List::task_ids(&self.db.pool, list.id).await.unwrap().unwrap()
        }
    }

    #[tokio::test]
    async fn cross_list_move_onto_occupied_slot() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let b = fx.list("B").await;
        let t1 = fx.task(&a, "t1").await;
        let t2 = fx.task(&a, "t2").await;
        let t3 = fx.task(&a, "t3").await;
        let t4 = fx.task(&b, "t4").await;
        let t5 = fx.task(&b, "t5").await;

        let moved = TaskMoveService::move_task(
            &fx.db.pool,
            t2.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: b.id,
                drop_task_id: Some(t5.id),
            },
        )
        .await
        .unwrap();

        assert_eq!(moved.list_id, b.id);
        assert_eq!(fx.sequence(&a).await, vec![t1.id, t3.id]);
        assert_eq!(fx.sequence(&b).await, vec![t4.id, t2.id, t5.id]);
    }

    #[tokio::test]
    async fn move_into_empty_list() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let b = fx.list("B").await;
        let t1 = fx.task(&a, "t1").await;
        let t2 = fx.task(&a, "t2").await;

        TaskMoveService::move_task(
            &fx.db.pool,
            t1.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: b.id,
                drop_task_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(fx.sequence(&a).await, vec![t2.id]);
        assert_eq!(fx.sequence(&b).await, vec![t1.id]);
    }

    #[tokio::test]
    async fn drop_without_target_appends_to_non_empty_list() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let b = fx.list("B").await;
        let t1 = fx.task(&a, "t1").await;
        let t4 = fx.task(&b, "t4").await;

        TaskMoveService::move_task(
            &fx.db.pool,
            t1.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: b.id,
                drop_task_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(fx.sequence(&b).await, vec![t4.id, t1.id]);
    }

    #[tokio::test]
    async fn same_list_reorder_keeps_length_and_membership() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let t1 = fx.task(&a, "t1").await;
        let t2 = fx.task(&a, "t2").await;
        let t3 = fx.task(&a, "t3").await;

        TaskMoveService::move_task(
            &fx.db.pool,
            t3.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: a.id,
                drop_task_id: Some(t1.id),
            },
        )
        .await
        .unwrap();

        let seq = fx.sequence(&a).await;
        assert_eq!(seq, vec![t3.id, t1.id, t2.id]);
        assert_eq!(seq.len(), 3);
    }

    #[tokio::test]
    async fn move_preserves_combined_multiset_and_uniqueness() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let b = fx.list("B").await;
        let mut all = Vec::new();
        for title in ["t1", "t2", "t3"] {
            all.push(fx.task(&a, title).await.id);
        }
        for title in ["t4", "t5"] {
            all.push(fx.task(&b, title).await.id);
        }

        // Bounce t1 around a few times, ending back in A.
        for (origin, drop, target) in [
            (a.id, b.id, Some(all[3])),
            (b.id, b.id, None),
            (b.id, a.id, Some(all[1])),
        ] {
            TaskMoveService::move_task(
                &fx.db.pool,
                all[0],
                &MoveTaskRequest {
                    origin_list_id: origin,
                    drop_list_id: drop,
                    drop_task_id: target,
                },
            )
            .await
            .unwrap();
        }

        let mut combined = fx.sequence(&a).await;
        combined.extend(fx.sequence(&b).await);
        let mut sorted = combined.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), combined.len(), "no duplicates across lists");
        let mut expected = all.clone();
        expected.sort();
        assert_eq!(sorted, expected, "combined multiset preserved");
    }

    #[tokio::test]
    async fn repeated_move_is_idempotent() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let b = fx.list("B").await;
        let t1 = fx.task(&a, "t1").await;
        let t4 = fx.task(&b, "t4").await;
        let t5 = fx.task(&b, "t5").await;

        let request = MoveTaskRequest {
            origin_list_id: a.id,
            drop_list_id: b.id,
            drop_task_id: Some(t5.id),
        };
        TaskMoveService::move_task(&fx.db.pool, t1.id, &request).await.unwrap();
        TaskMoveService::move_task(&fx.db.pool, t1.id, &request).await.unwrap();

        assert!(fx.sequence(&a).await.is_empty());
        assert_eq!(fx.sequence(&b).await, vec![t4.id, t1.id, t5.id]);
    }

    #[tokio::test]
    async fn drop_onto_itself_is_a_no_op() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let t1 = fx.task(&a, "t1").await;
        let t2 = fx.task(&a, "t2").await;

        let moved = TaskMoveService::move_task(
            &fx.db.pool,
            t1.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: a.id,
                drop_task_id: Some(t1.id),
            },
        )
        .await
        .unwrap();

        assert_eq!(moved.list_id, a.id);
        assert_eq!(fx.sequence(&a).await, vec![t1.id, t2.id]);
    }

    #[tokio::test]
    async fn invalid_drop_target_rolls_back() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let b = fx.list("B").await;
        let t1 = fx.task(&a, "t1").await;
        let t4 = fx.task(&b, "t4").await;

        let err = TaskMoveService::move_task(
            &fx.db.pool,
            t1.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: b.id,
                drop_task_id: Some(Uuid::new_v4()),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TaskMoveError::InvalidDropTarget(_)));
        // Nothing moved: both sequences and the task's list are untouched.
        assert_eq!(fx.sequence(&a).await, vec![t1.id]);
        assert_eq!(fx.sequence(&b).await, vec![t4.id]);
        let task = Task::find_by_id(&fx.db.pool, t1.id).await.unwrap().unwrap();
        assert_eq!(task.list_id, a.id);
    }

    #[tokio::test]
    async fn missing_task_and_list_are_reported() {
        let fx = Fixture::new().await;
        let a = fx.list("A").await;
        let t1 = fx.task(&a, "t1").await;

        let err = TaskMoveService::move_task(
            &fx.db.pool,
            Uuid::new_v4(),
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: a.id,
                drop_task_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TaskMoveError::TaskNotFound(_)));

        let err = TaskMoveService::move_task(
            &fx.db.pool,
            t1.id,
            &MoveTaskRequest {
                origin_list_id: a.id,
                drop_list_id: Uuid::new_v4(),
                drop_task_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TaskMoveError::ListNotFound(_)));
    }
}
