//! services/api/src/web/testing.rs
//!
//! Shared fixtures for handler tests: an in-memory `RecordStore` with the
//! same whole-collection semantics as the database adapter, plus seed
//! helpers for users and projects.

use chrono::{DateTime, NaiveDate, Utc};
use collab_core::domain::{Project, User, UserCredentials};
use collab_core::ports::{PortError, PortResult, RecordStore};
use std::sync::{Arc, Mutex as StdMutex};
use tracing::Level;
use uuid::Uuid;

use crate::config::Config;
use crate::web::state::{AppState, ProjectLocks};

/// An in-memory `RecordStore` backed by plain vectors.
#[derive(Default)]
pub(crate) struct MemStore {
    users: StdMutex<Vec<(User, String)>>,
    projects: StdMutex<Vec<Project>>,
}

#[async_trait::async_trait]
impl RecordStore for MemStore {
    async fn list_users(&self) -> PortResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .collect())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        self.list_users()
            .await?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn create_user(&self, user: &User, hashed_password: &str) -> PortResult<()> {
        self.users
            .lock()
            .unwrap()
            .push((user.clone(), hashed_password.to_string()));
        Ok(())
    }

    async fn update_user(&self, user: &User) -> PortResult<()> {
        let mut users = self.users.lock().unwrap();
        let entry = users
            .iter_mut()
            .find(|(u, _)| u.id == user.id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user.id)))?;
        entry.0 = user.clone();
        Ok(())
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                user_id: u.id,
                email: u.email.clone(),
                hashed_password: hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("No user with email {}", email)))
    }

    async fn list_projects(&self) -> PortResult<Vec<Project>> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn get_project(&self, project_id: Uuid) -> PortResult<Project> {
        self.list_projects()
            .await?
            .into_iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| PortError::NotFound(format!("Project {} not found", project_id)))
    }

    async fn upsert_project(&self, project: &Project) -> PortResult<()> {
        let mut projects = self.projects.lock().unwrap();
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => projects.push(project.clone()),
        }
        Ok(())
    }

    async fn delete_project(&self, project_id: Uuid) -> PortResult<()> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id != project_id);
        if projects.len() == before {
            return Err(PortError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        _session_id: &str,
        _user_id: Uuid,
        _expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        Ok(())
    }

    async fn validate_auth_session(&self, _session_id: &str) -> PortResult<Uuid> {
        Err(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, _session_id: &str) -> PortResult<()> {
        Ok(())
    }
}

pub(crate) fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        store: Arc::new(MemStore::default()),
        config: Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            database_url: String::new(),
            log_level: Level::INFO,
            cors_origin: "http://localhost:3000".to_string(),
            session_ttl_days: 30,
        }),
        project_locks: ProjectLocks::new(),
    })
}

pub(crate) async fn seed_user(state: &AppState, name: &str) -> Uuid {
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.edu", name),
        college: "Test College".to_string(),
        skills: vec!["Rust".to_string()],
        bio: String::new(),
        created_at: Utc::now(),
    };
    state.store.create_user(&user, "hash").await.unwrap();
    user.id
}

pub(crate) async fn seed_project(state: &AppState, creator: Uuid) -> Uuid {
    let project = Project::new(
        "Capstone",
        "A capstone project",
        vec!["Rust".to_string()],
        NaiveDate::from_ymd_opt(2027, 5, 1).unwrap(),
        3,
        creator,
    )
    .unwrap();
    state.store.upsert_project(&project).await.unwrap();
    project.id
}
