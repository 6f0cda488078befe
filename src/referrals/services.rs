use anyhow::Context;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::services::is_valid_email,
    earnings,
    error::ApiError,
    jobs,
    mailer::confirmation_email,
    quota,
    quota::repo_types::ReserveOutcome,
    referrals::{
        dto::StatusUpdateResponse,
        lifecycle::{self, Status},
        repo,
        repo_types::Referral,
    },
    state::AppState,
};

pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct NewReferral {
    pub candidate_name: String,
    pub candidate_email: String,
    pub current_company: Option<String>,
    pub job_id: Uuid,
    pub resume: Option<ResumeUpload>,
}

/// Submit a referral for the authenticated employee. The quota
/// reservation and the insert commit together or not at all.
pub async fn submit_referral(
    state: &AppState,
    employee_id: Uuid,
    new: NewReferral,
) -> Result<Referral, ApiError> {
    let candidate_name = new.candidate_name.trim().to_string();
    let candidate_email = new.candidate_email.trim().to_lowercase();

    if candidate_name.is_empty() {
        return Err(ApiError::Validation("Candidate name is required".into()));
    }
    if !is_valid_email(&candidate_email) {
        return Err(ApiError::Validation("Invalid candidate email".into()));
    }
    if let Some(resume) = &new.resume {
        if resume.bytes.is_empty() {
            return Err(ApiError::Validation("Resume file is empty".into()));
        }
    }

    jobs::repo::find_by_id(&state.db, new.job_id)
        .await?
        .ok_or(ApiError::NotFound("job"))?;

    let mut tx = state.db.begin().await.context("begin tx")?;

    let outcome = quota::repo::reserve_slot(
        &mut tx,
        employee_id,
        state.config.default_referral_limit,
    )
    .await?;
    let (limit, used) = match outcome {
        ReserveOutcome::Allowed { limit, used } => (limit, used),
        ReserveOutcome::Denied { limit } => {
            warn!(%employee_id, limit, "referral limit reached");
            return Err(ApiError::LimitReached(limit));
        }
    };

    let referral = repo::insert(
        &mut tx,
        employee_id,
        new.job_id,
        &candidate_name,
        &candidate_email,
        new.current_company.as_deref(),
        new.resume.as_ref().map(|r| r.filename.as_str()),
        new.resume.as_ref().map(|r| r.bytes.as_slice()),
    )
    .await?;

    tx.commit().await.context("commit tx")?;

    info!(
        referral_id = %referral.id,
        %employee_id,
        job_id = %new.job_id,
        used,
        limit,
        "referral submitted"
    );
    Ok(referral)
}

/// Progress a referral through the pipeline. Locking the row, validating
/// the transition, persisting it and recording the earning are one
/// transaction; the candidate email goes out after commit and never rolls
/// a confirmation back.
pub async fn update_status(
    state: &AppState,
    referral_id: Uuid,
    requested: Status,
    interview_at: Option<time::OffsetDateTime>,
) -> Result<StatusUpdateResponse, ApiError> {
    let mut tx = state.db.begin().await.context("begin tx")?;

    let referral = repo::find_for_update(&mut tx, referral_id)
        .await?
        .ok_or(ApiError::NotFound("referral"))?;

    let transition = lifecycle::plan(referral.status, requested, interview_at)?;

    repo::apply_transition(&mut tx, referral_id, transition.next, transition.interview_at).await?;

    if transition.confirms {
        let amount = earnings::repo::bonus_amount(referral_id, referral.referral_bonus);
        let inserted = earnings::repo::record_confirmation(
            &mut tx,
            referral_id,
            referral.employee_id,
            amount,
        )
        .await?;
        if !inserted {
            warn!(%referral_id, "earning already recorded, skipping");
        }
    }

    tx.commit().await.context("commit tx")?;

    info!(
        %referral_id,
        from = %referral.status,
        to = %transition.next,
        "referral status updated"
    );

    let candidate_notified = if transition.confirms {
        let (subject, body) = confirmation_email(&referral.candidate_name);
        match state
            .mailer
            .send(&referral.candidate_email, &subject, &body)
            .await
        {
            Ok(()) => Some(true),
            Err(e) => {
                error!(error = %e, %referral_id, "confirmation email failed");
                Some(false)
            }
        }
    } else {
        None
    };

    Ok(StatusUpdateResponse {
        id: referral_id,
        status: transition.next,
        candidate_notified,
    })
}

/// Withdraw an owned referral, giving the quota slot back in the same
/// transaction. Confirmed referrals have a payout behind them and stay.
pub async fn delete_referral(
    state: &AppState,
    employee_id: Uuid,
    referral_id: Uuid,
) -> Result<(), ApiError> {
    let mut tx = state.db.begin().await.context("begin tx")?;

    let status = repo::find_owned_for_update(&mut tx, referral_id, employee_id)
        .await?
        .ok_or(ApiError::NotFound("referral"))?;

    if status == Status::Confirmed {
        return Err(ApiError::Conflict(
            "Cannot withdraw a confirmed referral".into(),
        ));
    }

    repo::delete(&mut tx, referral_id).await?;
    quota::repo::release_slot(&mut tx, employee_id).await?;

    tx.commit().await.context("commit tx")?;

    info!(%referral_id, %employee_id, "referral withdrawn");
    Ok(())
}
