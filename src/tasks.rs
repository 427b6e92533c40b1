//!
//! # Task service
//!
//! Ownership-scoped CRUD over task records. Every operation takes the
//! owner's username, which the routes obtain from the resolved identity;
//! a task is never visible outside its owner.

use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Task, TaskInput};
use crate::store::{TaskChanges, TaskStore};

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Retrieves all tasks owned by the user; an empty list is reported as
    /// not found.
    pub async fn list_tasks(&self, user: &str) -> Result<Vec<Task>, AppError> {
        let tasks = self.store.list(user).await?;
        if tasks.is_empty() {
            debug!("User {} has no tasks to retrieve", user);
            return Err(AppError::NotFound("No tasks found".into()));
        }
        info!("get all tasks was performed by user: {}", user);
        Ok(tasks)
    }

    /// Creates a task for the user. Titles are stored lowercased and must
    /// be unique per user.
    pub async fn create_task(&self, user: &str, input: TaskInput) -> Result<Task, AppError> {
        let title = input.title.to_lowercase();
        if self.store.get(user, &title).await?.is_some() {
            debug!("User {} attempted to add an existing task", user);
            return Err(AppError::Conflict(
                "Task with the same title already exists".into(),
            ));
        }

        let task = self.store.create(Task::new(input, user)).await?;
        info!("User {} successfully created task {}", user, task.title);
        Ok(task)
    }

    pub async fn get_task(&self, user: &str, title: &str) -> Result<Task, AppError> {
        match self.store.get(user, title).await? {
            Some(task) => {
                info!("User {} successfully retrieved task {}", user, title);
                Ok(task)
            }
            None => {
                debug!("User {} failed to retrieve task {}", user, title);
                Err(AppError::NotFound("Task does not exist".into()))
            }
        }
    }

    /// Marks a task as complete, stamping `completed_on`. Completing an
    /// already-completed task is rejected.
    pub async fn complete_task(&self, user: &str, title: &str) -> Result<Task, AppError> {
        let task = self.get_task(user, title).await?;
        if task.is_completed {
            return Err(AppError::Validation("Task is already completed.".into()));
        }

        let completed = self
            .store
            .update(
                &task,
                TaskChanges {
                    description: None,
                    is_completed: Some(true),
                    completed_on: Some(Utc::now()),
                },
            )
            .await?;
        info!("User {} successfully completed task {}", user, title);
        Ok(completed)
    }

    pub async fn delete_task(&self, user: &str, title: &str) -> Result<Task, AppError> {
        let task = self.get_task(user, title).await?;
        self.store.delete(&task).await?;
        info!("User {} successfully deleted task {}", user, title);
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTaskStore;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryTaskStore::new()))
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("some details".to_string()),
        }
    }

    #[actix_rt::test]
    async fn test_create_and_list_tasks() {
        let service = service();

        let err = service.list_tasks("a@b.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let task = service
            .create_task("a@b.com", input("Write Report"))
            .await
            .unwrap();
        assert_eq!(task.title, "write report");

        let tasks = service.list_tasks("a@b.com").await.unwrap();
        assert_eq!(tasks.len(), 1);

        // Another user sees nothing.
        let err = service.list_tasks("c@d.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn test_duplicate_title_conflicts() {
        let service = service();
        service
            .create_task("a@b.com", input("write report"))
            .await
            .unwrap();

        // Case-insensitive duplicate: titles are lowercased on create.
        let err = service
            .create_task("a@b.com", input("Write REPORT"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn test_complete_task_once() {
        let service = service();
        service
            .create_task("a@b.com", input("write report"))
            .await
            .unwrap();

        let task = service.complete_task("a@b.com", "write report").await.unwrap();
        assert!(task.is_completed);
        assert!(task.completed_on.is_some());

        let err = service
            .complete_task("a@b.com", "write report")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_rt::test]
    async fn test_delete_task() {
        let service = service();
        service
            .create_task("a@b.com", input("write report"))
            .await
            .unwrap();

        service.delete_task("a@b.com", "write report").await.unwrap();

        let err = service.get_task("a@b.com", "write report").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .delete_task("a@b.com", "write report")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
