use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// Top-level collaborative workspace container. Owns lists by reference
/// (`lists.board_id`); collaborators are an embedded set of user ids.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    /// Owner. Only this user may delete the board.
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[ts(type = "Array<string>")]
    pub collaborators: Json<Vec<Uuid>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoard {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub collaborators: Option<Vec<Uuid>>,
}

impl Board {
    pub async fn create(pool: &SqlitePool, data: &CreateBoard) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Board>(
            r#"INSERT INTO boards (id, user_id, title, description, collaborators)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(Json(Vec::<Uuid>::new()))
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>("SELECT * FROM boards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Boards owned by the user.
    pub async fn find_by_user_id(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            "SELECT * FROM boards WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Boards where the user appears in the collaborators set.
    pub async fn find_shared_with_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"SELECT * FROM boards
               WHERE EXISTS (
                   SELECT 1 FROM json_each(boards.collaborators)
                   WHERE json_each.value = $1
               )
               ORDER BY created_at ASC"#,
        )
        .bind(user_id.to_string())
        .fetch_all(pool)
        .await
    }

    /// Partial update; absent fields keep their current value. Returns
    /// `None` when the board does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"UPDATE boards SET
                   title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   collaborators = COALESCE($4, collaborators),
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.collaborators.clone().map(Json))
        .fetch_optional(pool)
        .await
    }

    /// Deletes only when `user_id` matches the owner. Returns the number of
    /// rows removed; zero means "missing or not yours", which the API
    /// surfaces as 401.
    pub async fn delete_owned_by(
        pool: &SqlitePool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
