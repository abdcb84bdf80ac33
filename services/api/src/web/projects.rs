//! services/api/src/web/projects.rs
//!
//! Project CRUD, team membership, and the task board endpoints. Every
//! handler that mutates a project runs its load-mutate-store cycle inside
//! that project's exclusive writer lock (see `ProjectLocks`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, NaiveDate, Utc};
use collab_core::board::{self, BoardColumns};
use collab_core::domain::{DomainError, Project, ProjectStatus, Task, TaskStatus};
use collab_core::membership;
use collab_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub deadline: NaiveDate,
    pub team_size: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub deadline: NaiveDate,
    /// "active" or "completed".
    pub status: String,
}

#[derive(Deserialize, IntoParams)]
pub struct ListProjectsQuery {
    /// Optional status filter: "active" or "completed". Absent means all.
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MoveTaskRequest {
    /// Target board column: "todo", "in-progress", or "done".
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub assigned_to: Uuid,
    pub priority: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct TeamMemberResponse {
    pub id: Uuid,
    pub name: String,
}

/// A project as rendered everywhere in the API. Progress and open slots are
/// computed from the record on the way out, never read from storage.
#[derive(Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub status: String,
    pub progress: u8,
    pub target_team_size: u32,
    pub open_slots: u32,
    pub deadline: NaiveDate,
    pub created_by: Uuid,
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub team: Vec<TeamMemberResponse>,
    pub tasks: Vec<TaskResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct BoardResponse {
    pub todo: Vec<TaskResponse>,
    pub in_progress: Vec<TaskResponse>,
    pub done: Vec<TaskResponse>,
}

impl TaskResponse {
    fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: match task.status {
                TaskStatus::Todo => "todo".to_string(),
                TaskStatus::InProgress => "in-progress".to_string(),
                TaskStatus::Done => "done".to_string(),
            },
            assigned_to: task.assigned_to,
            priority: format!("{:?}", task.priority).to_lowercase(),
            created_at: task.created_at,
        }
    }
}

impl ProjectResponse {
    pub(crate) fn from_domain(project: &Project) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            description: project.description.clone(),
            required_skills: project.required_skills.clone(),
            status: match project.status {
                ProjectStatus::Active => "active".to_string(),
                ProjectStatus::Completed => "completed".to_string(),
            },
            progress: board::progress(project),
            target_team_size: project.target_team_size,
            open_slots: membership::open_slots(project),
            deadline: project.deadline,
            created_by: project.created_by,
            members: project.members.clone(),
            created_at: project.created_at,
        }
    }
}

impl BoardResponse {
    fn from_columns(columns: &BoardColumns) -> Self {
        Self {
            todo: columns.todo.iter().map(TaskResponse::from_domain).collect(),
            in_progress: columns
                .in_progress
                .iter()
                .map(TaskResponse::from_domain)
                .collect(),
            done: columns.done.iter().map(TaskResponse::from_domain).collect(),
        }
    }
}

//=========================================================================================
// Error Mapping Helpers
//=========================================================================================

fn map_port_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(msg) => {
            error!("Record store failure: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error".to_string(),
            )
        }
    }
}

fn map_domain_error(e: DomainError) -> (StatusCode, String) {
    let message = e.to_string();
    match e {
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, message),
        DomainError::NotFound(_) => (StatusCode::NOT_FOUND, message),
        DomainError::AlreadyMember | DomainError::Conflict(_) => (StatusCode::CONFLICT, message),
    }
}

fn parse_task_status(s: &str) -> Result<TaskStatus, (StatusCode, String)> {
    match s {
        "todo" => Ok(TaskStatus::Todo),
        "in-progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err((
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a task status", other),
        )),
    }
}

/// Task operations are open to every member of the project, nobody else.
fn require_member(project: &Project, user_id: Uuid) -> Result<(), (StatusCode, String)> {
    if project.is_member(user_id) {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "Only project members can do this".to_string(),
        ))
    }
}

/// Edits and deletion are reserved for the project's creator.
fn require_creator(project: &Project, user_id: Uuid) -> Result<(), (StatusCode, String)> {
    if project.created_by == user_id {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "Only the project creator can do this".to_string(),
        ))
    }
}

/// Builds the detail payload, resolving member ids to display names.
/// Members whose user record has gone missing are skipped rather than
/// failing the whole page.
async fn detail_response(
    state: &AppState,
    project: &Project,
) -> Result<ProjectDetailResponse, (StatusCode, String)> {
    let users = state.store.list_users().await.map_err(map_port_error)?;
    let team = project
        .members
        .iter()
        .filter_map(|member_id| {
            users
                .iter()
                .find(|u| u.id == *member_id)
                .map(|u| TeamMemberResponse {
                    id: u.id,
                    name: u.name.clone(),
                })
        })
        .collect();

    Ok(ProjectDetailResponse {
        project: ProjectResponse::from_domain(project),
        team,
        tasks: project.tasks.iter().map(TaskResponse::from_domain).collect(),
    })
}

//=========================================================================================
// Project Handlers
//=========================================================================================

/// POST /projects - Create a new project
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let project = Project::new(
        &req.title,
        &req.description,
        req.required_skills,
        req.deadline,
        req.team_size,
        user_id,
    )
    .map_err(map_domain_error)?;

    state
        .store
        .upsert_project(&project)
        .await
        .map_err(map_port_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_domain(&project)),
    ))
}

/// GET /projects - The current user's own projects, optionally filtered by status
#[utoipa::path(
    get,
    path = "/projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "Projects created by the current user", body = [ProjectResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let status_filter = match query.status.as_deref() {
        None | Some("all") => None,
        Some("active") => Some(ProjectStatus::Active),
        Some("completed") => Some(ProjectStatus::Completed),
        Some(other) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("'{}' is not a project status", other),
            ))
        }
    };

    let projects = state.store.list_projects().await.map_err(map_port_error)?;
    let mine: Vec<ProjectResponse> = projects
        .iter()
        .filter(|p| p.created_by == user_id)
        .filter(|p| status_filter.map_or(true, |s| p.status == s))
        .map(ProjectResponse::from_domain)
        .collect();

    Ok(Json(mine))
}

/// GET /projects/{id} - Project detail with team and tasks
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetailResponse),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project_handler(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;
    Ok(Json(detail_response(&state, &project).await?))
}

/// PUT /projects/{id} - Edit a project (creator only)
#[utoipa::path(
    put,
    path = "/projects/{id}",
    request_body = UpdateProjectRequest,
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Title and description are required".to_string(),
        ));
    }
    if req.required_skills.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "At least one required skill must be selected".to_string(),
        ));
    }
    let status = match req.status.as_str() {
        "active" => ProjectStatus::Active,
        "completed" => ProjectStatus::Completed,
        other => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("'{}' is not a project status", other),
            ))
        }
    };

    let lock = state.project_locks.lock_for(project_id);
    let _guard = lock.lock().await;

    let mut project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;
    require_creator(&project, user_id)?;

    project.title = req.title.trim().to_string();
    project.description = req.description.trim().to_string();
    project.required_skills = req.required_skills;
    project.deadline = req.deadline;
    project.status = status;

    state
        .store
        .upsert_project(&project)
        .await
        .map_err(map_port_error)?;

    Ok(Json(ProjectResponse::from_domain(&project)))
}

/// DELETE /projects/{id} - Delete a project (creator only)
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let lock = state.project_locks.lock_for(project_id);
    {
        let _guard = lock.lock().await;

        let project = state
            .store
            .get_project(project_id)
            .await
            .map_err(map_port_error)?;
        require_creator(&project, user_id)?;

        state
            .store
            .delete_project(project_id)
            .await
            .map_err(map_port_error)?;

        // Dropping the map entry while the guard is still held means no
        // writer can pick up a fresh lock while another holds the stale one.
        // Either way the project row is already gone, so late writers only
        // ever see NotFound.
        state.project_locks.forget(project_id);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /projects/{id}/join - Join a project's team
#[utoipa::path(
    post,
    path = "/projects/{id}/join",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Joined the project", body = ProjectResponse),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Already a member")
    )
)]
pub async fn join_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let lock = state.project_locks.lock_for(project_id);
    let _guard = lock.lock().await;

    let mut project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;

    membership::join(&mut project, user_id).map_err(map_domain_error)?;

    state
        .store
        .upsert_project(&project)
        .await
        .map_err(map_port_error)?;

    Ok(Json(ProjectResponse::from_domain(&project)))
}

//=========================================================================================
// Task Board Handlers
//=========================================================================================

/// GET /projects/{id}/board - Tasks grouped into the three board columns
#[utoipa::path(
    get,
    path = "/projects/{id}/board",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Board columns", body = BoardResponse),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_board_handler(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;

    Ok(Json(BoardResponse::from_columns(&board::columns(&project))))
}

/// POST /projects/{id}/tasks - Create a task (members only)
#[utoipa::path(
    post,
    path = "/projects/{id}/tasks",
    request_body = CreateTaskRequest,
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let lock = state.project_locks.lock_for(project_id);
    let _guard = lock.lock().await;

    let mut project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;
    require_member(&project, user_id)?;

    let task = board::add_task(&mut project, &req.title, &req.description, user_id)
        .map_err(map_domain_error)?;
    let response = TaskResponse::from_domain(&task);

    state
        .store
        .upsert_project(&project)
        .await
        .map_err(map_port_error)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /projects/{id}/tasks/{task_id} - Move a task to another column
///
/// Any column is reachable from any other; moving an unknown task id is a
/// no-op that still returns the current project state.
#[utoipa::path(
    put,
    path = "/projects/{id}/tasks/{task_id}",
    request_body = MoveTaskRequest,
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("task_id" = Uuid, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Board after the move", body = ProjectDetailResponse),
        (status = 400, description = "Unknown target status"),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn move_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let target = parse_task_status(&req.status)?;

    let lock = state.project_locks.lock_for(project_id);
    let _guard = lock.lock().await;

    let mut project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;
    require_member(&project, user_id)?;

    board::move_task(&mut project, task_id, target);

    state
        .store
        .upsert_project(&project)
        .await
        .map_err(map_port_error)?;

    Ok(Json(detail_response(&state, &project).await?))
}

/// DELETE /projects/{id}/tasks/{task_id} - Delete a task
///
/// Deleting an id that is already gone is a success, not an error.
#[utoipa::path(
    delete,
    path = "/projects/{id}/tasks/{task_id}",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("task_id" = Uuid, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Board after the delete", body = ProjectDetailResponse),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let lock = state.project_locks.lock_for(project_id);
    let _guard = lock.lock().await;

    let mut project = state
        .store
        .get_project(project_id)
        .await
        .map_err(map_port_error)?;
    require_member(&project, user_id)?;

    board::delete_task(&mut project, task_id);

    state
        .store
        .upsert_project(&project)
        .await
        .map_err(map_port_error)?;

    Ok(Json(detail_response(&state, &project).await?))
}
