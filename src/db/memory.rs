use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{AuthToken, Task, TaskChanges, User};

/// In-process store. Collections keep insertion order, which is also list order.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_token(&self, id: Uuid, token: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.id == id && u.holds_token(token))
            .cloned())
    }

    async fn push_token(&self, user_id: Uuid, token: &AuthToken) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.tokens.push(token.clone());
        }
        Ok(())
    }

    async fn pull_token(&self, user_id: Uuid, token: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.tokens.retain(|t| t.token != token);
        }
        Ok(())
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        self.tasks.write().await.push(task.clone());
        Ok(())
    }

    async fn find_tasks(&self, owner_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .cloned())
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &TaskChanges,
    ) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .map(|task| {
                task.apply(changes);
                task.clone()
            }))
    }

    async fn remove_task(&self, id: Uuid, owner_id: Uuid) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let position = tasks
            .iter()
            .position(|t| t.id == id && t.owner_id == owner_id);
        Ok(position.map(|index| tasks.remove(index)))
    }
}
