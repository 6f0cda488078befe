use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::{AuthUser, HrUser},
    error::ApiError,
    jobs::{dto::AddJobRequest, repo, repo_types::Job},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/jobs", get(list_jobs))
}

pub fn hr_routes() -> Router<AppState> {
    Router::new()
        .route("/hr/jobs", post(add_job))
        .route("/hr/jobs/:id", delete(delete_job))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = repo::list(&state.db).await?;
    Ok(Json(jobs))
}

#[instrument(skip(state, payload))]
pub async fn add_job(
    State(state): State<AppState>,
    HrUser(hr_id): HrUser,
    Json(payload): Json<AddJobRequest>,
) -> Result<Json<Job>, ApiError> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Title and Description are required".into(),
        ));
    }
    if payload.referral_bonus.is_sign_negative() {
        return Err(ApiError::Validation(
            "Referral bonus cannot be negative".into(),
        ));
    }

    let job = repo::create(
        &state.db,
        payload.title.trim(),
        payload.description.trim(),
        payload.referral_bonus,
        hr_id,
    )
    .await?;

    info!(job_id = %job.id, by = %hr_id, "job created");
    Ok(Json(job))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    HrUser(hr_id): HrUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("job"));
    }
    info!(job_id = %id, by = %hr_id, "job deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn add_job_request_defaults_bonus_to_zero() {
        let req: AddJobRequest =
            serde_json::from_str(r#"{"title":"Backend Engineer","description":"Rust"}"#).unwrap();
        assert_eq!(req.referral_bonus, Decimal::ZERO);
    }

    #[test]
    fn add_job_request_parses_decimal_bonus() {
        let req: AddJobRequest = serde_json::from_str(
            r#"{"title":"SRE","description":"On-call","referral_bonus":"1500.50"}"#,
        )
        .unwrap();
        assert_eq!(req.referral_bonus, Decimal::new(150050, 2));
    }
}
