use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::services::{EmployeeUser, HrUser, Principal},
    error::ApiError,
    referrals::{
        dto::{StatusUpdateResponse, SubmitReferralRequest, UpdateReferralStatusRequest},
        repo,
        repo_types::{Referral, ReferralWithEmployee, ReferralWithJob},
        services::{self, NewReferral, ResumeUpload},
    },
    state::AppState,
    users::repo_types::Role,
};

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/referrals", post(submit_referral).get(list_my_referrals))
        .route("/referrals/multipart", post(submit_referral_multipart))
        .route("/referrals/:id", delete(delete_referral))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB resumes
}

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/referrals/:id/resume", get(download_resume))
}

pub fn hr_routes() -> Router<AppState> {
    Router::new()
        .route("/hr/referrals", get(list_all_referrals))
        .route("/hr/referrals/status", post(update_status))
}

#[instrument(skip(state, payload))]
pub async fn submit_referral(
    State(state): State<AppState>,
    EmployeeUser(employee_id): EmployeeUser,
    Json(payload): Json<SubmitReferralRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Referral>), ApiError> {
    let resume = match (payload.resume_pdf_base64, payload.resume_filename) {
        (Some(b64), filename) => {
            let bytes = BASE64
                .decode(b64.as_bytes())
                .map_err(|_| ApiError::Validation("Invalid base64 resume".into()))?;
            Some(ResumeUpload {
                filename: filename.unwrap_or_else(|| "resume.pdf".into()),
                bytes,
            })
        }
        (None, _) => None,
    };

    let referral = services::submit_referral(
        &state,
        employee_id,
        NewReferral {
            candidate_name: payload.candidate_name,
            candidate_email: payload.candidate_email,
            current_company: payload.current_company,
            job_id: payload.job_id,
            resume,
        },
    )
    .await?;

    Ok(created_response(referral))
}

/// Multipart variant: candidate fields plus a `resume` file field.
#[instrument(skip(state, mp))]
pub async fn submit_referral_multipart(
    State(state): State<AppState>,
    EmployeeUser(employee_id): EmployeeUser,
    mut mp: Multipart,
) -> Result<(StatusCode, HeaderMap, Json<Referral>), ApiError> {
    let mut candidate_name = String::new();
    let mut candidate_email = String::new();
    let mut current_company: Option<String> = None;
    let mut job_id: Option<Uuid> = None;
    let mut resume: Option<ResumeUpload> = None;

    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("candidate_name") => candidate_name = field.text().await.map_err(bad_field)?,
            Some("candidate_email") => candidate_email = field.text().await.map_err(bad_field)?,
            Some("current_company") => {
                current_company = Some(field.text().await.map_err(bad_field)?)
            }
            Some("job_id") => {
                let raw = field.text().await.map_err(bad_field)?;
                job_id = Some(
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| ApiError::Validation("Invalid job id".into()))?,
                );
            }
            Some("resume") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "resume.pdf".into());
                let data = field.bytes().await.map_err(bad_field)?;
                resume = Some(ResumeUpload {
                    filename,
                    bytes: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    let job_id = job_id.ok_or(ApiError::Validation("Job id is required".into()))?;

    let referral = services::submit_referral(
        &state,
        employee_id,
        NewReferral {
            candidate_name,
            candidate_email,
            current_company,
            job_id,
            resume,
        },
    )
    .await?;

    Ok(created_response(referral))
}

#[instrument(skip(state))]
pub async fn list_my_referrals(
    State(state): State<AppState>,
    EmployeeUser(employee_id): EmployeeUser,
) -> Result<Json<Vec<ReferralWithJob>>, ApiError> {
    let rows = repo::list_for_employee(&state.db, employee_id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn delete_referral(
    State(state): State<AppState>,
    EmployeeUser(employee_id): EmployeeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    services::delete_referral(&state, employee_id, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[instrument(skip(state))]
pub async fn download_resume(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let row = repo::resume(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("referral"))?;

    if principal.role != Role::Hr && principal.id != row.employee_id {
        return Err(ApiError::Forbidden("Not your referral".into()));
    }

    let blob = row.resume_blob.ok_or(ApiError::NotFound("resume"))?;
    let filename = row.resume_filename.unwrap_or_else(|| "resume.pdf".into());

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, blob).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ReferralFilter {
    pub employee_name: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_all_referrals(
    State(state): State<AppState>,
    HrUser(_hr_id): HrUser,
    Query(filter): Query<ReferralFilter>,
) -> Result<Json<Vec<ReferralWithEmployee>>, ApiError> {
    let rows = repo::list_all(&state.db, filter.employee_name.as_deref()).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    HrUser(_hr_id): HrUser,
    Json(payload): Json<UpdateReferralStatusRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let response = services::update_status(
        &state,
        payload.referral_id,
        payload.new_status,
        payload.interview_at,
    )
    .await?;
    Ok(Json(response))
}

fn created_response(referral: Referral) -> (StatusCode, HeaderMap, Json<Referral>) {
    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/referrals/{}", referral.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    (StatusCode::CREATED, headers, Json(referral))
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("Malformed multipart field: {e}"))
}
