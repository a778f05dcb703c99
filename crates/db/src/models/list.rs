use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// An ordered column of tasks within a board. `task_ids` is the only
/// ordering signal for task display; each task id appears at most once.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[ts(type = "Array<string>")]
    pub task_ids: Json<Vec<Uuid>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateList {
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateList {
    pub title: Option<String>,
    pub description: Option<String>,
    pub task_ids: Option<Vec<Uuid>>,
}

impl List {
    pub async fn create(pool: &SqlitePool, data: &CreateList) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, List>(
            r#"INSERT INTO lists (id, board_id, user_id, title, description, task_ids)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.board_id)
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(Json(Vec::<Uuid>::new()))
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>("SELECT * FROM lists WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_board_id(pool: &SqlitePool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>(
            "SELECT * FROM lists WHERE board_id = $1 ORDER BY created_at ASC",
        )
        .bind(board_id)
        .fetch_all(pool)
        .await
    }

    /// Partial update; absent fields keep their current value. Returns
    /// `None` when the list does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateList,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, List>(
            r#"UPDATE lists SET
                   title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   task_ids = COALESCE($4, task_ids),
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.task_ids.clone().map(Json))
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Current ordered task-id sequence, or `None` when the list is gone.
    pub async fn task_ids<'e, E>(executor: E, id: Uuid) -> Result<Option<Vec<Uuid>>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<Json<Vec<Uuid>>> =
            sqlx::query_scalar("SELECT task_ids FROM lists WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|ids| ids.0))
    }

    /// Overwrites the ordered task-id sequence as given. No validation that
    /// the sequence is a permutation of valid task ids happens here; the
    /// caller owns that invariant. Executor-generic so the move coordinator
    /// can run both sequence writes inside one transaction.
    pub async fn set_task_ids<'e, E>(
        executor: E,
        id: Uuid,
        task_ids: &[Uuid],
    ) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE lists SET task_ids = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(id)
            .bind(Json(task_ids.to_vec()))
            .execute(executor)
            .await?;
        Ok(())
    }
}
