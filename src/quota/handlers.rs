use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::services::HrUser,
    error::ApiError,
    quota::{
        dto::SetReferralLimitRequest,
        repo,
        repo_types::{ReferralLimit, SetLimitOutcome},
    },
    state::AppState,
    users,
    users::repo_types::Role,
};

pub fn hr_routes() -> Router<AppState> {
    Router::new().route("/hr/referral-limits", get(list_limits).put(set_limit))
}

#[instrument(skip(state))]
pub async fn list_limits(
    State(state): State<AppState>,
    HrUser(_hr_id): HrUser,
) -> Result<Json<Vec<ReferralLimit>>, ApiError> {
    let limits = repo::list(&state.db).await?;
    Ok(Json(limits))
}

#[instrument(skip(state, payload))]
pub async fn set_limit(
    State(state): State<AppState>,
    HrUser(hr_id): HrUser,
    Json(payload): Json<SetReferralLimitRequest>,
) -> Result<Json<ReferralLimit>, ApiError> {
    if payload.limit_count < 0 {
        return Err(ApiError::Validation(
            "Limit count cannot be negative".into(),
        ));
    }

    let target = users::repo::find_by_id(&state.db, payload.employee_id)
        .await?
        .ok_or(ApiError::NotFound("employee"))?;
    if target.role != Role::Employee {
        return Err(ApiError::Validation(
            "Referral limits apply to employees only".into(),
        ));
    }

    match repo::set_limit(&state.db, payload.employee_id, payload.limit_count).await? {
        SetLimitOutcome::Updated(limit) => {
            info!(
                employee_id = %limit.employee_id,
                limit_count = limit.limit_count,
                by = %hr_id,
                "referral limit set"
            );
            Ok(Json(limit))
        }
        SetLimitOutcome::BelowUsage { used } => {
            warn!(
                employee_id = %payload.employee_id,
                used_count = used,
                requested = payload.limit_count,
                "limit reduction below usage refused"
            );
            Err(ApiError::LimitBelowUsage(used))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn set_limit_request_parses() {
        let id = Uuid::new_v4();
        let req: SetReferralLimitRequest =
            serde_json::from_str(&format!(r#"{{"employee_id":"{id}","limit_count":3}}"#)).unwrap();
        assert_eq!(req.employee_id, id);
        assert_eq!(req.limit_count, 3);
    }

    #[test]
    fn limit_row_serializes_counts() {
        let row = ReferralLimit {
            employee_id: Uuid::new_v4(),
            limit_count: 5,
            used_count: 2,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"limit_count\":5"));
        assert!(json.contains("\"used_count\":2"));
    }
}
