//! services/api/src/web/discover.rs
//!
//! The discovery endpoints: ranked collaborator and project recommendations
//! for the current user. Thin read-only wrappers over the match engine;
//! results are recomputed on every request from a fresh roster snapshot.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use collab_core::matching;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::projects::ProjectResponse;
use crate::web::state::AppState;

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct CollaboratorMatchResponse {
    pub user_id: Uuid,
    pub name: String,
    pub college: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub match_percentage: u8,
}

#[derive(Serialize, ToSchema)]
pub struct ProjectMatchResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub match_percentage: u8,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /discover/collaborators - The ten best skill matches among other users
#[utoipa::path(
    get,
    path = "/discover/collaborators",
    responses(
        (status = 200, description = "Ranked collaborator matches", body = [CollaboratorMatchResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn discover_collaborators_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let users = state.store.list_users().await.map_err(|e| {
        error!("Failed to load users: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to compute matches".to_string(),
        )
    })?;

    let reference = users.iter().find(|u| u.id == user_id).ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "Current user profile missing".to_string(),
    ))?;

    let matches: Vec<CollaboratorMatchResponse> = matching::match_collaborators(reference, &users)
        .into_iter()
        .map(|m| CollaboratorMatchResponse {
            user_id: m.user.id,
            name: m.user.name,
            college: m.user.college,
            bio: m.user.bio,
            skills: m.user.skills,
            matching_skills: m.matching_skills,
            match_percentage: m.match_percentage,
        })
        .collect();

    Ok(Json(matches))
}

/// GET /discover/projects - Joinable projects ranked by required-skill coverage
#[utoipa::path(
    get,
    path = "/discover/projects",
    responses(
        (status = 200, description = "Ranked project matches", body = [ProjectMatchResponse]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn discover_projects_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let reference = state.store.get_user(user_id).await.map_err(|e| {
        error!("Failed to load current user: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to compute matches".to_string(),
        )
    })?;

    let projects = state.store.list_projects().await.map_err(|e| {
        error!("Failed to load projects: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to compute matches".to_string(),
        )
    })?;

    let matches: Vec<ProjectMatchResponse> = matching::match_projects(&reference, &projects)
        .into_iter()
        .map(|m| ProjectMatchResponse {
            project: ProjectResponse::from_domain(&m.project),
            match_percentage: m.match_percentage,
        })
        .collect();

    Ok(Json(matches))
}
