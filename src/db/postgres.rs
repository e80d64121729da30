use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    FromRow, PgPool, Row,
};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{AuthToken, Task, TaskChanges, User};

const USER_COLUMNS: &str = "id, email, password_hash, tokens, created_at";
const TASK_COLUMNS: &str = "id, text, completed, completed_at, owner_id, created_at";

/// PostgreSQL-backed store. Each user's tokens live in a JSONB array on its row.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(tokens) = row.try_get::<Json<Vec<AuthToken>>, _>("tokens")?;
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            tokens,
            created_at: row.try_get("created_at")?,
        })
    }
}

fn map_insert_error(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, tokens, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.tokens))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_token(&self, id: Uuid, token: &str) -> StoreResult<Option<User>> {
        // jsonb containment: some element of `tokens` has both this access and this token.
        let needle = Json([AuthToken::auth(token)]);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND tokens @> $2",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(needle)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn push_token(&self, user_id: Uuid, token: &AuthToken) -> StoreResult<()> {
        sqlx::query("UPDATE users SET tokens = tokens || $2 WHERE id = $1")
            .bind(user_id)
            .bind(Json([token]))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn pull_token(&self, user_id: Uuid, token: &str) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users SET tokens = COALESCE(
                 (SELECT jsonb_agg(t) FROM jsonb_array_elements(tokens) AS t
                  WHERE t->>'token' <> $2),
                 '[]'::jsonb)
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO tasks (id, text, completed, completed_at, owner_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(task.id)
        .bind(&task.text)
        .bind(task.completed)
        .bind(task.completed_at)
        .bind(task.owner_id)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_tasks(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &TaskChanges,
    ) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET text = COALESCE($3, text), completed = $4, completed_at = $5
             WHERE id = $1 AND owner_id = $2
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(changes.text.as_deref())
        .bind(changes.completed)
        .bind(changes.completed_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn remove_task(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = $1 AND owner_id = $2 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }
}
