//! crates/collab_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Project, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Record Store Port
//=========================================================================================

/// Durable storage for the three collections the platform keeps: users,
/// projects, and auth sessions. The backing store is free to keep each
/// collection as a single document; callers must get a whole-collection
/// snapshot back and treat an absent collection as empty.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // --- Users ---
    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    /// Appends a new user record. The password hash is stored alongside the
    /// profile but never surfaces through `User`.
    async fn create_user(&self, user: &User, hashed_password: &str) -> PortResult<()>;

    /// Replaces the profile fields of an existing user, preserving the
    /// stored credentials.
    async fn update_user(&self, user: &User) -> PortResult<()>;

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Projects ---
    async fn list_projects(&self) -> PortResult<Vec<Project>>;

    async fn get_project(&self, project_id: Uuid) -> PortResult<Project>;

    /// Inserts or replaces a project record (whole-record write; tasks and
    /// membership travel with the project).
    async fn upsert_project(&self, project: &Project) -> PortResult<()>;

    async fn delete_project(&self, project_id: Uuid) -> PortResult<()>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
