use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::referrals::lifecycle::Status;

/// Immutable payout record, one per confirmed referral.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Earning {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub employee_id: Uuid,
    pub amount: Decimal,
    pub date: OffsetDateTime,
}

/// Earning joined with its referral for the employee dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EarningWithReferral {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub employee_id: Uuid,
    pub amount: Decimal,
    pub date: OffsetDateTime,
    pub candidate_name: String,
    pub status: Status,
}
