//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the dashboard
//! summary endpoint.

use axum::{extract::State, http::StatusCode, response::Json, Extension};
use collab_core::domain::ProjectStatus;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::state::AppState;
use crate::web::{auth, discover, profile, projects};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        profile::get_profile_handler,
        profile::update_profile_handler,
        projects::create_project_handler,
        projects::list_projects_handler,
        projects::get_project_handler,
        projects::update_project_handler,
        projects::delete_project_handler,
        projects::join_project_handler,
        projects::get_board_handler,
        projects::add_task_handler,
        projects::move_task_handler,
        projects::delete_task_handler,
        discover::discover_collaborators_handler,
        discover::discover_projects_handler,
        dashboard_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::CurrentUserResponse,
            profile::ProfileResponse,
            profile::UpdateProfileRequest,
            projects::CreateProjectRequest,
            projects::UpdateProjectRequest,
            projects::CreateTaskRequest,
            projects::MoveTaskRequest,
            projects::TaskResponse,
            projects::TeamMemberResponse,
            projects::ProjectResponse,
            projects::ProjectDetailResponse,
            projects::BoardResponse,
            discover::CollaboratorMatchResponse,
            discover::ProjectMatchResponse,
            DashboardResponse,
        )
    ),
    tags(
        (name = "Collaborate API", description = "Skill matching, team membership, and task boards for student projects.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Dashboard
//=========================================================================================

/// Headline numbers for the dashboard page, computed over every project the
/// current user belongs to.
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub active_projects: usize,
    pub completed_projects: usize,
    /// Total teammates across the user's projects, the user included once
    /// per project.
    pub team_members: usize,
}

/// GET /dashboard - Project counts for the current user
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let projects = state.store.list_projects().await.map_err(|e| {
        error!("Failed to load projects: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load dashboard".to_string(),
        )
    })?;

    let mine: Vec<_> = projects.iter().filter(|p| p.is_member(user_id)).collect();

    Ok(Json(DashboardResponse {
        active_projects: mine
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count(),
        completed_projects: mine
            .iter()
            .filter(|p| p.status == ProjectStatus::Completed)
            .count(),
        team_members: mine.iter().map(|p| p.members.len()).sum(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testing::{seed_project, seed_user, test_state};

    #[tokio::test]
    async fn dashboard_counts_follow_membership() {
        let state = test_state();
        let member = seed_user(&state, "member").await;
        let outsider = seed_user(&state, "outsider").await;

        // One active project the user created.
        seed_project(&state, member).await;

        // One completed project the user joined alongside its creator.
        let joined_id = seed_project(&state, outsider).await;
        let mut joined = state.store.get_project(joined_id).await.unwrap();
        joined.members.push(member);
        joined.status = ProjectStatus::Completed;
        state.store.upsert_project(&joined).await.unwrap();

        // A project the user has nothing to do with.
        seed_project(&state, outsider).await;

        let Json(summary) = dashboard_handler(State(state.clone()), Extension(member))
            .await
            .expect("dashboard loads");

        assert_eq!(summary.active_projects, 1);
        assert_eq!(summary.completed_projects, 1);
        // Sole member of the active project plus two in the joined one.
        assert_eq!(summary.team_members, 3);
    }
}
