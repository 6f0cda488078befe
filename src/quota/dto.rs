use serde::Deserialize;
use uuid::Uuid;

/// HR request to set (or create) an employee's referral ceiling.
#[derive(Debug, Deserialize)]
pub struct SetReferralLimitRequest {
    pub employee_id: Uuid,
    pub limit_count: i32,
}
