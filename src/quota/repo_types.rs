use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-employee referral ceiling and live counter.
/// Invariant: 0 <= used_count <= limit_count after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferralLimit {
    pub employee_id: Uuid,
    pub limit_count: i32,
    pub used_count: i32,
}

/// Result of trying to take a referral slot.
#[derive(Debug, PartialEq, Eq)]
pub enum ReserveOutcome {
    Allowed { limit: i32, used: i32 },
    Denied { limit: i32 },
}

/// Result of an HR limit upsert.
#[derive(Debug)]
pub enum SetLimitOutcome {
    Updated(ReferralLimit),
    BelowUsage { used: i32 },
}
