//! Persistence for the two collections the service owns: users and tasks.
//!
//! Handlers only see the [`Store`] trait. Every task query takes the owner's
//! id, so a task is never read, changed or removed on behalf of anyone else.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{AuthToken, Task, TaskChanges, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Finds user `id` only if its token list still holds `token` under the auth scope.
    async fn find_user_by_token(&self, id: Uuid, token: &str) -> StoreResult<Option<User>>;

    async fn push_token(&self, user_id: Uuid, token: &AuthToken) -> StoreResult<()>;

    /// Removes every entry whose token string equals `token`; other tokens are kept.
    async fn pull_token(&self, user_id: Uuid, token: &str) -> StoreResult<()>;

    async fn insert_task(&self, task: &Task) -> StoreResult<()>;

    /// All tasks owned by `owner_id`, oldest first.
    async fn find_tasks(&self, owner_id: Uuid) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Task>>;

    /// Applies `changes` and returns the updated task, or `None` if no owned task matched.
    async fn update_task(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &TaskChanges,
    ) -> StoreResult<Option<Task>>;

    /// Deletes and returns the task, or `None` if no owned task matched.
    async fn remove_task(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Task>>;
}

/// Wraps a store as the `web::Data<dyn Store>` handlers and middleware extract.
pub fn shared<S: Store + 'static>(store: S) -> web::Data<dyn Store> {
    web::Data::from(Arc::new(store) as Arc<dyn Store>)
}
