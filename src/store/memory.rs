use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::AppError;
use crate::models::{Identity, Task};

use super::{CredentialStore, IdentityChanges, TaskChanges, TaskStore};

fn lock_poisoned() -> AppError {
    AppError::Internal("store lock poisoned".into())
}

/// In-memory credential store. Enforces username uniqueness on insert,
/// matching the unique constraint of the Postgres schema.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, Identity>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        let users = self.users.read().map_err(|_| lock_poisoned())?;
        Ok(users.get(username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Identity, AppError> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        if users.contains_key(username) {
            return Err(AppError::Conflict("username already in use".into()));
        }
        let identity = Identity {
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: Utc::now(),
        };
        users.insert(username.to_owned(), identity.clone());
        Ok(identity)
    }

    async fn update(
        &self,
        identity: &Identity,
        changes: IdentityChanges,
    ) -> Result<Identity, AppError> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        let stored = users
            .get_mut(&identity.username)
            .ok_or_else(|| AppError::NotFound("Record not found".into()))?;
        if let Some(password_hash) = changes.password_hash {
            stored.password_hash = password_hash;
        }
        Ok(stored.clone())
    }

    async fn delete(&self, identity: &Identity) -> Result<bool, AppError> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        Ok(users.remove(&identity.username).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Identity>, AppError> {
        let users = self.users.read().map_err(|_| lock_poisoned())?;
        Ok(users.values().cloned().collect())
    }
}

/// In-memory task store, keyed by (owner, title).
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<(String, String), Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, user: &str) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().map_err(|_| lock_poisoned())?;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| task.user == user)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(owned)
    }

    async fn get(&self, user: &str, title: &str) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().map_err(|_| lock_poisoned())?;
        Ok(tasks.get(&(user.to_owned(), title.to_owned())).cloned())
    }

    async fn create(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().map_err(|_| lock_poisoned())?;
        let key = (task.user.clone(), task.title.clone());
        if tasks.contains_key(&key) {
            return Err(AppError::Conflict(
                "Task with the same title already exists".into(),
            ));
        }
        tasks.insert(key, task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task, changes: TaskChanges) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().map_err(|_| lock_poisoned())?;
        let stored = tasks
            .get_mut(&(task.user.clone(), task.title.clone()))
            .ok_or_else(|| AppError::NotFound("Record not found".into()))?;
        if let Some(description) = changes.description {
            stored.description = Some(description);
        }
        if let Some(is_completed) = changes.is_completed {
            stored.is_completed = is_completed;
        }
        if let Some(completed_on) = changes.completed_on {
            stored.completed_on = Some(completed_on);
        }
        Ok(stored.clone())
    }

    async fn delete(&self, task: &Task) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().map_err(|_| lock_poisoned())?;
        Ok(tasks
            .remove(&(task.user.clone(), task.title.clone()))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskInput;

    #[actix_rt::test]
    async fn test_credential_store_uniqueness() {
        let store = MemoryCredentialStore::new();

        store.create("a@b.com", "hash-one").await.unwrap();
        let err = store.create("a@b.com", "hash-two").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let identity = store.get_by_username("a@b.com").await.unwrap().unwrap();
        assert_eq!(identity.password_hash, "hash-one");
    }

    #[actix_rt::test]
    async fn test_credential_store_update_and_delete() {
        let store = MemoryCredentialStore::new();
        let identity = store.create("a@b.com", "hash-one").await.unwrap();

        let updated = store
            .update(
                &identity,
                IdentityChanges {
                    password_hash: Some("hash-two".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.password_hash, "hash-two");

        assert!(store.delete(&identity).await.unwrap());
        assert!(!store.delete(&identity).await.unwrap());
        assert!(store.get_by_username("a@b.com").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_task_store_is_scoped_by_owner() {
        let store = MemoryTaskStore::new();
        let input = TaskInput {
            title: "write report".to_string(),
            description: None,
        };
        store.create(Task::new(input, "a@b.com")).await.unwrap();

        assert_eq!(store.list("a@b.com").await.unwrap().len(), 1);
        assert!(store.list("c@d.com").await.unwrap().is_empty());
        assert!(store
            .get("c@d.com", "write report")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_task_store_duplicate_title_conflicts() {
        let store = MemoryTaskStore::new();
        let task = Task::new(
            TaskInput {
                title: "write report".to_string(),
                description: None,
            },
            "a@b.com",
        );

        store.create(task.clone()).await.unwrap();
        let err = store.create(task).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
