use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::list::List;

/// A unit of work belonging to exactly one list (`list_id`); the same id
/// must appear exactly once in that list's `task_ids` sequence. Create,
/// update and delete maintain the pairing inside a single transaction.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub list_id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub list_id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub list_id: Option<Uuid>,
}

impl Task {
    /// Inserts the task and appends its id to the owning list's ordered
    /// sequence, atomically. Fails with `RowNotFound` when the list is gone.
    pub async fn create(pool: &SqlitePool, data: &CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id = Uuid::new_v4();
        let task = sqlx::query_as::<_, Task>(
            r#"INSERT INTO tasks (id, list_id, board_id, user_id, title, description)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.list_id)
        .bind(data.board_id)
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.description)
        .fetch_one(&mut *tx)
        .await?;

        let mut task_ids = List::task_ids(&mut *tx, data.list_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        if !task_ids.contains(&task.id) {
            task_ids.push(task.id);
            List::set_task_ids(&mut *tx, data.list_id, &task_ids).await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_board_id(pool: &SqlitePool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE board_id = $1 ORDER BY created_at ASC",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Partial update. A supplied `list_id` relocates the task: it leaves
    /// the old list's sequence and lands at the end of the new one, all in
    /// the same transaction. Positioned drops go through the move
    /// coordinator instead. Fails with `RowNotFound` when the target list
    /// is gone.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(task) = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(list_id) = data.list_id {
            if list_id != task.list_id {
                let mut target_ids = List::task_ids(&mut *tx, list_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                if let Some(mut origin_ids) = List::task_ids(&mut *tx, task.list_id).await? {
                    origin_ids.retain(|task_id| *task_id != id);
                    List::set_task_ids(&mut *tx, task.list_id, &origin_ids).await?;
                }
                if !target_ids.contains(&id) {
                    target_ids.push(id);
                    List::set_task_ids(&mut *tx, list_id, &target_ids).await?;
                }
            }
        }

        let updated = sqlx::query_as::<_, Task>(
            r#"UPDATE tasks SET
                   title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   list_id = COALESCE($4, list_id),
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.list_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Retargets `list_id` only; the sequence updates travel in the same
    /// transaction via [`List::set_task_ids`].
    pub async fn set_list_id<'e, E>(executor: E, id: Uuid, list_id: Uuid) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE tasks SET list_id = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(id)
            .bind(list_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Removes the task and drops its id from the owning list's sequence,
    /// atomically. A task whose list was already deleted still goes away.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(task) = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(0);
        };

        let rows = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if let Some(mut task_ids) = List::task_ids(&mut *tx, task.list_id).await? {
            task_ids.retain(|task_id| *task_id != id);
            List::set_task_ids(&mut *tx, task.list_id, &task_ids).await?;
        }

        tx.commit().await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;
    use crate::models::board::{Board, CreateBoard};
    use crate::models::list::CreateList;
    use crate::models::user::{CreateUser, User};

    async fn seed(pool: &SqlitePool) -> (Board, List) {
        let user = User::create(
            pool,
            &CreateUser {
                username: "owner".to_string(),
                email: "owner@example.com".to_string(),
            },
        )
        .await
        .unwrap();
        let board = Board::create(
            pool,
            &CreateBoard {
                user_id: user.id,
                title: "Board".to_string(),
                description: "".to_string(),
            },
        )
        .await
        .unwrap();
        let list = List::create(
            pool,
            &CreateList {
                board_id: board.id,
                user_id: user.id,
                title: "Todo".to_string(),
                description: "".to_string(),
            },
        )
        .await
        .unwrap();
        (board, list)
    }

    fn create_payload(board: &Board, list: &List, title: &str) -> CreateTask {
        CreateTask {
            list_id: list.id,
            board_id: board.id,
            user_id: board.user_id,
            title: title.to_string(),
            description: "".to_string(),
        }
    }

    #[tokio::test]
    async fn create_appends_to_list_sequence() {
        let db = DBService::new_in_memory().await.unwrap();
        let (board, list) = seed(&db.pool).await;

        let first = Task::create(&db.pool, &create_payload(&board, &list, "one")).await.unwrap();
        let second = Task::create(&db.pool, &create_payload(&board, &list, "two")).await.unwrap();

        let ids = List::task_ids(&db.pool, list.id).await.unwrap().unwrap();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn create_in_missing_list_fails() {
        let db = DBService::new_in_memory().await.unwrap();
        let (board, mut list) = seed(&db.pool).await;
        list.id = Uuid::new_v4();

        let err = Task::create(&db.pool, &create_payload(&board, &list, "orphan")).await;
        assert!(matches!(err, Err(sqlx::Error::RowNotFound)));
        assert!(Task::find_by_board_id(&db.pool, board.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_list_id_relocates_between_sequences() {
        let db = DBService::new_in_memory().await.unwrap();
        let (board, list_a) = seed(&db.pool).await;
        let list_b = List::create(
            &db.pool,
            &CreateList {
                board_id: board.id,
                user_id: board.user_id,
                title: "Doing".to_string(),
                description: "".to_string(),
            },
        )
        .await
        .unwrap();

        let task = Task::create(&db.pool, &create_payload(&board, &list_a, "moves")).await.unwrap();
        let stays = Task::create(&db.pool, &create_payload(&board, &list_a, "stays")).await.unwrap();

        let updated = Task::update(
            &db.pool,
            task.id,
            &UpdateTask {
                list_id: Some(list_b.id),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.list_id, list_b.id);
        assert_eq!(updated.title, "moves");
        let seq_a = List::task_ids(&db.pool, list_a.id).await.unwrap().unwrap();
        let seq_b = List::task_ids(&db.pool, list_b.id).await.unwrap().unwrap();
        assert_eq!(seq_a, vec![stays.id]);
        assert_eq!(seq_b, vec![task.id]);
    }

    #[tokio::test]
    async fn update_into_missing_list_fails_and_rolls_back() {
        let db = DBService::new_in_memory().await.unwrap();
        let (board, list) = seed(&db.pool).await;
        let task = Task::create(&db.pool, &create_payload(&board, &list, "stuck")).await.unwrap();

        let err = Task::update(
            &db.pool,
            task.id,
            &UpdateTask {
                list_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(err, Err(sqlx::Error::RowNotFound)));

        let kept = Task::find_by_id(&db.pool, task.id).await.unwrap().unwrap();
        assert_eq!(kept.list_id, list.id);
        let seq = List::task_ids(&db.pool, list.id).await.unwrap().unwrap();
        assert_eq!(seq, vec![task.id]);
    }

    #[tokio::test]
    async fn delete_removes_from_sequence() {
        let db = DBService::new_in_memory().await.unwrap();
        let (board, list) = seed(&db.pool).await;
        let task = Task::create(&db.pool, &create_payload(&board, &list, "gone")).await.unwrap();
        let kept = Task::create(&db.pool, &create_payload(&board, &list, "kept")).await.unwrap();

        assert_eq!(Task::delete(&db.pool, task.id).await.unwrap(), 1);
        let ids = List::task_ids(&db.pool, list.id).await.unwrap().unwrap();
        assert_eq!(ids, vec![kept.id]);

        // Second delete is a no-op.
        assert_eq!(Task::delete(&db.pool, task.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_survives_missing_list() {
        let db = DBService::new_in_memory().await.unwrap();
        let (board, list) = seed(&db.pool).await;
        let task = Task::create(&db.pool, &create_payload(&board, &list, "stray")).await.unwrap();

        List::delete(&db.pool, list.id).await.unwrap();
        assert_eq!(Task::delete(&db.pool, task.id).await.unwrap(), 1);
    }
}
