//! services/api/src/web/profile.rs
//!
//! Endpoints for viewing and editing the current user's profile. The skill
//! list maintained here is the input to every match computation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use collab_core::domain::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub college: String,
    pub skills: Vec<String>,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub college: String,
    pub skills: Vec<String>,
    pub bio: String,
}

/// Skill tags form a set: trims each tag, drops empties, and removes
/// duplicates while keeping first-seen order. Stored skill lists must never
/// contain duplicates or the match percentages lose their [0,100] bound.
fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim().to_string();
        if !skill.is_empty() && !normalized.contains(&skill) {
            normalized.push(skill);
        }
    }
    normalized
}

impl ProfileResponse {
    fn from_domain(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            college: user.college,
            skills: user.skills,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /profile - The current user's full profile
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The current user's profile", body = ProfileResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state.store.get_user(user_id).await.map_err(|e| {
        error!("Failed to load profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load profile".to_string(),
        )
    })?;

    Ok(Json(ProfileResponse::from_domain(user)))
}

/// PUT /profile - Update the current user's profile
///
/// Email is fixed at signup and not editable here; only name, college,
/// skills, and bio are replaced.
#[utoipa::path(
    put,
    path = "/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Name is required".to_string()));
    }

    let mut user = state.store.get_user(user_id).await.map_err(|e| {
        error!("Failed to load profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load profile".to_string(),
        )
    })?;

    user.name = req.name.trim().to_string();
    user.college = req.college.trim().to_string();
    user.skills = normalize_skills(req.skills);
    user.bio = req.bio.trim().to_string();

    state.store.update_user(&user).await.map_err(|e| {
        error!("Failed to update profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update profile".to_string(),
        )
    })?;

    Ok(Json(ProfileResponse::from_domain(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testing::{seed_user, test_state};

    #[test]
    fn skill_tags_are_deduplicated_in_order() {
        let skills = vec![
            "Rust".to_string(),
            "  Rust ".to_string(),
            "Go".to_string(),
            "".to_string(),
            "Rust".to_string(),
        ];
        assert_eq!(
            normalize_skills(skills),
            vec!["Rust".to_string(), "Go".to_string()]
        );
    }

    #[tokio::test]
    async fn profile_updates_never_store_duplicate_skills() {
        let state = test_state();
        let user_id = seed_user(&state, "dup").await;

        update_profile_handler(
            State(state.clone()),
            Extension(user_id),
            Json(UpdateProfileRequest {
                name: "Dup".to_string(),
                college: "Test College".to_string(),
                skills: vec![
                    "Rust".to_string(),
                    "Rust".to_string(),
                    "Rust".to_string(),
                    "Go".to_string(),
                ],
                bio: String::new(),
            }),
        )
        .await
        .expect("profile update succeeds");

        let user = state.store.get_user(user_id).await.unwrap();
        assert_eq!(user.skills, vec!["Rust".to_string(), "Go".to_string()]);
    }
}
