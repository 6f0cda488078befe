use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::PublicUser,
        services::{hash_password, is_valid_email, AdminUser},
    },
    error::ApiError,
    mailer::credentials_email,
    state::AppState,
    users::{
        dto::{CreateUserRequest, CreatedUserResponse},
        repo,
        repo_types::Role,
    },
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", post(create_user).get(list_users))
        .route("/admin/users/:id", delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<Json<CreatedUserResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.role == Role::Admin {
        return Err(ApiError::Validation("Role must be HR or Employee".into()));
    }

    if repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already exists".into()));
    }

    let password = generate_password();
    let hash = hash_password(&password)?;

    let user = repo::create(
        &state.db,
        payload.name.trim(),
        &payload.email,
        payload.role,
        &payload.project,
        &payload.workplace,
        &payload.designation,
        &hash,
    )
    .await?;

    let (subject, body) = credentials_email(
        &user.name,
        &user.role.to_string(),
        &user.email,
        &password,
    );
    let credentials_emailed = match state.mailer.send(&user.email, &subject, &body).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "credential email failed");
            false
        }
    };

    info!(user_id = %user.id, by = %admin_id, role = %user.role, "user created");
    Ok(Json(CreatedUserResponse {
        user: PublicUser::from(&user),
        credentials_emailed,
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = repo::list(&state.db).await?;
    Ok(Json(users.iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("user"));
    }
    info!(user_id = %id, by = %admin_id, "user deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_long_and_distinct() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn create_user_request_accepts_missing_profile_fields() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"name":"Sarah","email":"sarah@corp.test","role":"employee"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Employee);
        assert!(req.project.is_empty());
    }
}
