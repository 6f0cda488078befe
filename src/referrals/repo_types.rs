use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::referrals::lifecycle::Status;

/// Referral record without the resume blob; the blob is only ever fetched
/// for download.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Referral {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub current_company: Option<String>,
    pub resume_filename: Option<String>,
    pub job_id: Uuid,
    pub employee_id: Uuid,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339::option")]
    pub interview_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Referral locked for a status update, carrying the job bonus so the
/// earning amount comes from the same snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct ReferralForUpdate {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub employee_id: Uuid,
    pub status: Status,
    pub referral_bonus: Decimal,
}

/// Employee-facing listing row, joined with the job.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReferralWithJob {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub current_company: Option<String>,
    pub resume_filename: Option<String>,
    pub job_id: Uuid,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339::option")]
    pub interview_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub job_title: String,
    pub referral_bonus: Decimal,
}

/// HR-facing listing row, joined with job and referring employee.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReferralWithEmployee {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub current_company: Option<String>,
    pub resume_filename: Option<String>,
    pub job_id: Uuid,
    pub employee_id: Uuid,
    pub status: Status,
    #[serde(with = "time::serde::rfc3339::option")]
    pub interview_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub job_title: String,
    pub employee_name: String,
    pub employee_email: String,
}

/// Resume payload for download, with the owner for the access check.
#[derive(Debug, FromRow)]
pub struct ResumeRow {
    pub employee_id: Uuid,
    pub resume_filename: Option<String>,
    pub resume_blob: Option<Vec<u8>>,
}
