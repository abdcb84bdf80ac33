//! crates/collab_core/src/domain.rs
//!
//! Defines the pure, core data structures for the platform.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Errors produced by the core operations themselves (as opposed to the
/// storage port). All of them are synchronous fail states the caller maps
/// to user-visible messaging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("User is already a member of this project")]
    AlreadyMember,
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

// Represents a registered student - used throughout the app.
// The password hash is deliberately NOT part of this struct; it only
// exists in the stored record and in `UserCredentials`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub college: String,
    /// Exact-match skill tags. Order is irrelevant for matching but is
    /// preserved as entered so profile edits round-trip unchanged.
    pub skills: Vec<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// A single unit of work on a project's board. Tasks never exist outside
/// their parent project.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_to: Uuid,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
}

/// A student project looking for team members.
///
/// `progress` and `open_slots` are intentionally absent as fields: both are
/// derived on every read so they can never drift from the task sequence or
/// the member list.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub status: ProjectStatus,
    /// The capacity requested at creation time. Immutable bookkeeping input;
    /// remaining open slots are always computed from the member list.
    pub target_team_size: u32,
    pub deadline: NaiveDate,
    pub created_by: Uuid,
    /// Invariant: contains the creator, never contains duplicates.
    pub members: Vec<Uuid>,
    /// Insertion-ordered; board columns preserve this order.
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project with the creator seeded as the sole member.
    pub fn new(
        title: &str,
        description: &str,
        required_skills: Vec<String>,
        deadline: NaiveDate,
        target_team_size: u32,
        created_by: Uuid,
    ) -> DomainResult<Self> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("Project title is required".into()));
        }
        if description.trim().is_empty() {
            return Err(DomainError::Validation(
                "Project description is required".into(),
            ));
        }
        if required_skills.is_empty() {
            return Err(DomainError::Validation(
                "At least one required skill must be selected".into(),
            ));
        }
        if target_team_size == 0 {
            return Err(DomainError::Validation(
                "Team size must be at least 1".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            required_skills,
            status: ProjectStatus::Active,
            target_team_size,
            deadline,
            created_by,
            members: vec![created_by],
            tasks: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}
