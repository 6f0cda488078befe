use rust_decimal::Decimal;
use serde::Deserialize;

/// HR request to open a posting.
#[derive(Debug, Deserialize)]
pub struct AddJobRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub referral_bonus: Decimal,
}
