//!
//! # Persistence abstractions
//!
//! The services talk to storage through the `CredentialStore` and
//! `TaskStore` traits so a database-backed or in-memory implementation can
//! be injected at construction. `postgres.rs` is the production
//! implementation; `memory.rs` backs the test suite and needs no running
//! database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Identity, Task};

pub use memory::{MemoryCredentialStore, MemoryTaskStore};
pub use postgres::{PgCredentialStore, PgTaskStore};

/// Field changes applied to an existing identity.
#[derive(Debug, Default, Clone)]
pub struct IdentityChanges {
    pub password_hash: Option<String>,
}

/// Field changes applied to an existing task.
#[derive(Debug, Default, Clone)]
pub struct TaskChanges {
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub completed_on: Option<DateTime<Utc>>,
}

/// Persistence operations for identity records.
///
/// Each operation is a direct, single-record CRUD primitive; no service
/// workflow needs more than one read followed by one write, so no
/// transactions are required. Implementations must enforce username
/// uniqueness themselves (the service-level existence check alone is not
/// atomic) and report a duplicate as `AppError::Conflict`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_by_username(&self, username: &str) -> Result<Option<Identity>, AppError>;
    async fn create(&self, username: &str, password_hash: &str) -> Result<Identity, AppError>;
    async fn update(
        &self,
        identity: &Identity,
        changes: IdentityChanges,
    ) -> Result<Identity, AppError>;
    async fn delete(&self, identity: &Identity) -> Result<bool, AppError>;
    async fn list_all(&self) -> Result<Vec<Identity>, AppError>;
}

/// Persistence operations for task records, always scoped to an owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self, user: &str) -> Result<Vec<Task>, AppError>;
    async fn get(&self, user: &str, title: &str) -> Result<Option<Task>, AppError>;
    async fn create(&self, task: Task) -> Result<Task, AppError>;
    async fn update(&self, task: &Task, changes: TaskChanges) -> Result<Task, AppError>;
    async fn delete(&self, task: &Task) -> Result<bool, AppError>;
}
