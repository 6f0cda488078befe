use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, RefreshRequest},
        services::{hash_password, is_valid_email, verify_password, AuthUser, JwtKeys},
    },
    error::ApiError,
    state::AppState,
    users::repo,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/change-password", post(change_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    let user = match repo::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized("User not found".into()))?;

    // Issue new pair; role comes from the current record, not the old token.
    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.old_password.is_empty()
        || payload.new_password.is_empty()
        || payload.confirm_new_password.is_empty()
    {
        return Err(ApiError::Validation(
            "All password fields are required".into(),
        ));
    }
    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation("New password too short".into()));
    }
    if payload.new_password != payload.confirm_new_password {
        return Err(ApiError::Validation(
            "New password and confirm password do not match".into(),
        ));
    }

    let user = repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if !verify_password(&payload.old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "change-password wrong current password");
        return Err(ApiError::Validation("Current password is incorrect".into()));
    }

    let hash = hash_password(&payload.new_password)?;
    repo::update_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(PublicUser::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::Role;
    use uuid::Uuid;

    #[test]
    fn public_user_serialization_hides_nothing_public() {
        let response = PublicUser {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            role: Role::Employee,
            first_login: true,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"role\":\"employee\""));
        assert!(json.contains("first_login"));
    }
}
