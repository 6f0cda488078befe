use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::services::{AuthUser, HrUser},
    earnings::{
        repo,
        repo_types::{Earning, EarningWithReferral},
    },
    error::ApiError,
    state::AppState,
};

pub fn employee_routes() -> Router<AppState> {
    Router::new().route("/earnings", get(my_earnings))
}

pub fn hr_routes() -> Router<AppState> {
    Router::new().route("/hr/earnings", get(all_earnings))
}

#[instrument(skip(state))]
pub async fn my_earnings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<EarningWithReferral>>, ApiError> {
    let earnings = repo::list_for_employee(&state.db, user_id).await?;
    Ok(Json(earnings))
}

#[instrument(skip(state))]
pub async fn all_earnings(
    State(state): State<AppState>,
    HrUser(_hr_id): HrUser,
) -> Result<Json<Vec<Earning>>, ApiError> {
    let earnings = repo::list_all(&state.db).await?;
    Ok(Json(earnings))
}
