use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{Identity, Task};

use super::{CredentialStore, IdentityChanges, TaskChanges, TaskStore};

/// Postgres-backed credential store.
///
/// The `users` table carries a unique constraint on `username`
/// (see `migrations/schema.sql`), which closes the check-then-insert race
/// between two concurrent registrations of the same username.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Identity, AppError> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("username already in use".into())
            }
            _ => AppError::from(e),
        })
    }

    async fn update(
        &self,
        identity: &Identity,
        changes: IdentityChanges,
    ) -> Result<Identity, AppError> {
        let identity = sqlx::query_as::<_, Identity>(
            "UPDATE users SET password_hash = COALESCE($2, password_hash) \
             WHERE username = $1 \
             RETURNING username, password_hash, created_at",
        )
        .bind(&identity.username)
        .bind(changes.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(identity)
    }

    async fn delete(&self, identity: &Identity) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(&identity.username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Identity>, AppError> {
        let identities = sqlx::query_as::<_, Identity>(
            "SELECT username, password_hash, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(identities)
    }
}

/// Postgres-backed task store. Tasks are keyed by (owner, title); the
/// composite primary key enforces per-user title uniqueness.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "title, description, is_completed, user_name, created, completed_on";

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(&self, user: &str) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_name = $1 ORDER BY created DESC",
            TASK_COLUMNS
        ))
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn get(&self, user: &str, title: &str) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_name = $1 AND title = $2",
            TASK_COLUMNS
        ))
        .bind(user)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, task: Task) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, is_completed, user_name, created, completed_on) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_completed)
        .bind(&task.user)
        .bind(task.created)
        .bind(task.completed_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Task with the same title already exists".into())
            }
            _ => AppError::from(e),
        })
    }

    async fn update(&self, task: &Task, changes: TaskChanges) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
                 description = COALESCE($3, description), \
                 is_completed = COALESCE($4, is_completed), \
                 completed_on = COALESCE($5, completed_on) \
             WHERE user_name = $1 AND title = $2 \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.user)
        .bind(&task.title)
        .bind(changes.description)
        .bind(changes.is_completed)
        .bind(changes.completed_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, task: &Task) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_name = $1 AND title = $2")
            .bind(&task.user)
            .bind(&task.title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
