use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::referrals::lifecycle::{InterviewUpdate, Status};
use crate::referrals::repo_types::{
    Referral, ReferralForUpdate, ReferralWithEmployee, ReferralWithJob, ResumeRow,
};

/// Insert a pending referral within the submission transaction.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    job_id: Uuid,
    candidate_name: &str,
    candidate_email: &str,
    current_company: Option<&str>,
    resume_filename: Option<&str>,
    resume_blob: Option<&[u8]>,
) -> anyhow::Result<Referral> {
    let referral = sqlx::query_as::<_, Referral>(
        r#"
        INSERT INTO referrals
            (candidate_name, candidate_email, current_company,
             resume_filename, resume_blob, job_id, employee_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, candidate_name, candidate_email, current_company,
                  resume_filename, job_id, employee_id, status,
                  interview_at, submitted_at
        "#,
    )
    .bind(candidate_name)
    .bind(candidate_email)
    .bind(current_company)
    .bind(resume_filename)
    .bind(resume_blob)
    .bind(job_id)
    .bind(employee_id)
    .fetch_one(&mut **tx)
    .await
    .context("insert referral")?;
    Ok(referral)
}

/// Lock a referral row (and read its job bonus) for a status update.
pub async fn find_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> anyhow::Result<Option<ReferralForUpdate>> {
    let row = sqlx::query_as::<_, ReferralForUpdate>(
        r#"
        SELECT r.id, r.candidate_name, r.candidate_email, r.employee_id,
               r.status, j.referral_bonus
        FROM referrals r
        JOIN jobs j ON j.id = r.job_id
        WHERE r.id = $1
        FOR UPDATE OF r
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .context("lock referral")?;
    Ok(row)
}

/// Persist a planned transition.
pub async fn apply_transition(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    next: Status,
    interview_at: InterviewUpdate,
) -> anyhow::Result<()> {
    match interview_at {
        InterviewUpdate::Keep => {
            sqlx::query("UPDATE referrals SET status = $2 WHERE id = $1")
                .bind(id)
                .bind(next)
                .execute(&mut **tx)
                .await
                .context("update referral status")?;
        }
        InterviewUpdate::Set(at) => {
            sqlx::query("UPDATE referrals SET status = $2, interview_at = $3 WHERE id = $1")
                .bind(id)
                .bind(next)
                .bind(at)
                .execute(&mut **tx)
                .await
                .context("update referral status")?;
        }
    }
    Ok(())
}

/// Lock an owned referral for withdrawal; None when absent or owned by
/// someone else (the two are indistinguishable to the caller).
pub async fn find_owned_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    employee_id: Uuid,
) -> anyhow::Result<Option<Status>> {
    let row: Option<(Status,)> = sqlx::query_as(
        r#"
        SELECT status FROM referrals
        WHERE id = $1 AND employee_id = $2
        FOR UPDATE
        "#,
    )
    .bind(id)
    .bind(employee_id)
    .fetch_optional(&mut **tx)
    .await
    .context("lock owned referral")?;
    Ok(row.map(|(status,)| status))
}

pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM referrals WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await
        .context("delete referral")?;
    Ok(())
}

/// One employee's referrals joined with the job, newest first.
pub async fn list_for_employee(
    db: &PgPool,
    employee_id: Uuid,
) -> anyhow::Result<Vec<ReferralWithJob>> {
    let rows = sqlx::query_as::<_, ReferralWithJob>(
        r#"
        SELECT r.id, r.candidate_name, r.candidate_email, r.current_company,
               r.resume_filename, r.job_id, r.status, r.interview_at,
               r.submitted_at, j.title AS job_title, j.referral_bonus
        FROM referrals r
        JOIN jobs j ON j.id = r.job_id
        WHERE r.employee_id = $1
        ORDER BY r.submitted_at DESC
        "#,
    )
    .bind(employee_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Every referral joined with job and employee, optionally filtered by
/// employee name, newest first.
pub async fn list_all(
    db: &PgPool,
    employee_name: Option<&str>,
) -> anyhow::Result<Vec<ReferralWithEmployee>> {
    let rows = sqlx::query_as::<_, ReferralWithEmployee>(
        r#"
        SELECT r.id, r.candidate_name, r.candidate_email, r.current_company,
               r.resume_filename, r.job_id, r.employee_id, r.status,
               r.interview_at, r.submitted_at, j.title AS job_title,
               u.name AS employee_name, u.email AS employee_email
        FROM referrals r
        JOIN jobs j ON j.id = r.job_id
        JOIN users u ON u.id = r.employee_id
        WHERE $1::text IS NULL OR u.name ILIKE '%' || $1 || '%'
        ORDER BY r.submitted_at DESC
        "#,
    )
    .bind(employee_name)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Resume payload for download.
pub async fn resume(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ResumeRow>> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT employee_id, resume_filename, resume_blob
        FROM referrals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
