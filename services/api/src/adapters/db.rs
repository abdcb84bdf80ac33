//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `RecordStore` port from the `core` crate. Each collection (`users`,
//! `projects`) is kept as one JSONB document in the `collections` table and is
//! read and written whole; auth sessions get their own table so lookups by
//! cookie stay cheap.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use collab_core::domain::{
    Project, ProjectStatus, Task, TaskPriority, TaskStatus, User, UserCredentials,
};
use collab_core::ports::{PortError, PortResult, RecordStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const USERS: &str = "users";
const PROJECTS: &str = "projects";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `RecordStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Reads a whole collection; an absent collection reads as empty.
    async fn read_collection<T: DeserializeOwned>(&self, name: &str) -> PortResult<Vec<T>> {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT records FROM collections WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match value {
            Some(records) => serde_json::from_value(records)
                .map_err(|e| PortError::Unexpected(format!("corrupt '{}' collection: {}", name, e))),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces a whole collection in a single upsert.
    async fn write_collection<T: Serialize>(&self, name: &str, records: &[T]) -> PortResult<()> {
        let value = serde_json::to_value(records)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        sqlx::query(
            "INSERT INTO collections (name, records) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET records = EXCLUDED.records",
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Stored Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    college: String,
    skills: Vec<String>,
    bio: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn from_domain(user: &User, hashed_password: &str) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            college: user.college.clone(),
            skills: user.skills.clone(),
            bio: user.bio.clone(),
            hashed_password: hashed_password.to_string(),
            created_at: user.created_at,
        }
    }

    fn to_domain(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            college: self.college.clone(),
            skills: self.skills.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TaskRecord {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    assigned_to: Uuid,
    priority: String,
    created_at: DateTime<Utc>,
}

impl TaskRecord {
    fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task_status_str(task.status).to_string(),
            assigned_to: task.assigned_to,
            priority: priority_str(task.priority).to_string(),
            created_at: task.created_at,
        }
    }

    fn to_domain(&self) -> PortResult<Task> {
        Ok(Task {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: parse_task_status(&self.status)?,
            assigned_to: self.assigned_to,
            priority: parse_priority(&self.priority)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct ProjectRecord {
    id: Uuid,
    title: String,
    description: String,
    required_skills: Vec<String>,
    status: String,
    target_team_size: u32,
    deadline: NaiveDate,
    created_by: Uuid,
    members: Vec<Uuid>,
    tasks: Vec<TaskRecord>,
    created_at: DateTime<Utc>,
}

impl ProjectRecord {
    fn from_domain(project: &Project) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            description: project.description.clone(),
            required_skills: project.required_skills.clone(),
            status: match project.status {
                ProjectStatus::Active => "active".to_string(),
                ProjectStatus::Completed => "completed".to_string(),
            },
            target_team_size: project.target_team_size,
            deadline: project.deadline,
            created_by: project.created_by,
            members: project.members.clone(),
            tasks: project.tasks.iter().map(TaskRecord::from_domain).collect(),
            created_at: project.created_at,
        }
    }

    fn to_domain(&self) -> PortResult<Project> {
        let status = match self.status.as_str() {
            "active" => ProjectStatus::Active,
            "completed" => ProjectStatus::Completed,
            other => {
                return Err(PortError::Unexpected(format!(
                    "unknown project status '{}'",
                    other
                )))
            }
        };

        Ok(Project {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            required_skills: self.required_skills.clone(),
            status,
            target_team_size: self.target_team_size,
            deadline: self.deadline,
            created_by: self.created_by,
            members: self.members.clone(),
            tasks: self
                .tasks
                .iter()
                .map(TaskRecord::to_domain)
                .collect::<PortResult<Vec<Task>>>()?,
            created_at: self.created_at,
        })
    }
}

fn task_status_str(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "todo",
        TaskStatus::InProgress => "in-progress",
        TaskStatus::Done => "done",
    }
}

fn parse_task_status(s: &str) -> PortResult<TaskStatus> {
    match s {
        "todo" => Ok(TaskStatus::Todo),
        "in-progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err(PortError::Unexpected(format!(
            "unknown task status '{}'",
            other
        ))),
    }
}

fn priority_str(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Medium => "medium",
        TaskPriority::High => "high",
    }
}

fn parse_priority(s: &str) -> PortResult<TaskPriority> {
    match s {
        "low" => Ok(TaskPriority::Low),
        "medium" => Ok(TaskPriority::Medium),
        "high" => Ok(TaskPriority::High),
        other => Err(PortError::Unexpected(format!(
            "unknown task priority '{}'",
            other
        ))),
    }
}

//=========================================================================================
// `RecordStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordStore for DbAdapter {
    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records: Vec<UserRecord> = self.read_collection(USERS).await?;
        Ok(records.iter().map(UserRecord::to_domain).collect())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let records: Vec<UserRecord> = self.read_collection(USERS).await?;
        records
            .iter()
            .find(|r| r.id == user_id)
            .map(UserRecord::to_domain)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn create_user(&self, user: &User, hashed_password: &str) -> PortResult<()> {
        let mut records: Vec<UserRecord> = self.read_collection(USERS).await?;
        records.push(UserRecord::from_domain(user, hashed_password));
        self.write_collection(USERS, &records).await
    }

    async fn update_user(&self, user: &User) -> PortResult<()> {
        let mut records: Vec<UserRecord> = self.read_collection(USERS).await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == user.id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user.id)))?;

        // Profile fields only; email and credentials stay as stored.
        record.name = user.name.clone();
        record.college = user.college.clone();
        record.skills = user.skills.clone();
        record.bio = user.bio.clone();

        self.write_collection(USERS, &records).await
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let records: Vec<UserRecord> = self.read_collection(USERS).await?;
        records
            .iter()
            .find(|r| r.email == email)
            .map(|r| UserCredentials {
                user_id: r.id,
                email: r.email.clone(),
                hashed_password: r.hashed_password.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("No user with email {}", email)))
    }

    async fn list_projects(&self) -> PortResult<Vec<Project>> {
        let records: Vec<ProjectRecord> = self.read_collection(PROJECTS).await?;
        records.iter().map(ProjectRecord::to_domain).collect()
    }

    async fn get_project(&self, project_id: Uuid) -> PortResult<Project> {
        let records: Vec<ProjectRecord> = self.read_collection(PROJECTS).await?;
        records
            .iter()
            .find(|r| r.id == project_id)
            .map(ProjectRecord::to_domain)
            .transpose()?
            .ok_or_else(|| PortError::NotFound(format!("Project {} not found", project_id)))
    }

    async fn upsert_project(&self, project: &Project) -> PortResult<()> {
        let mut records: Vec<ProjectRecord> = self.read_collection(PROJECTS).await?;
        let record = ProjectRecord::from_domain(project);
        match records.iter_mut().find(|r| r.id == project.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.write_collection(PROJECTS, &records).await
    }

    async fn delete_project(&self, project_id: Uuid) -> PortResult<()> {
        let mut records: Vec<ProjectRecord> = self.read_collection(PROJECTS).await?;
        let before = records.len();
        records.retain(|r| r.id != project_id);
        if records.len() == before {
            return Err(PortError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }
        self.write_collection(PROJECTS, &records).await
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
