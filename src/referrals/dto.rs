use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::referrals::lifecycle::Status;

/// JSON submission body. The resume travels base64-encoded; the multipart
/// endpoint takes the raw file instead.
#[derive(Debug, Deserialize)]
pub struct SubmitReferralRequest {
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub current_company: Option<String>,
    pub job_id: Uuid,
    #[serde(default)]
    pub resume_filename: Option<String>,
    #[serde(default)]
    pub resume_pdf_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReferralStatusRequest {
    pub referral_id: Uuid,
    pub new_status: Status,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub interview_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub id: Uuid,
    pub status: Status,
    /// Present only on confirmation; false when the candidate email could
    /// not be delivered (the confirmation itself stands).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_notified: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn status_request_parses_snake_case_and_rfc3339() {
        let id = Uuid::new_v4();
        let req: UpdateReferralStatusRequest = serde_json::from_str(&format!(
            r#"{{"referral_id":"{id}","new_status":"interview_scheduled","interview_at":"2025-10-01T14:30:00Z"}}"#
        ))
        .unwrap();
        assert_eq!(req.new_status, Status::InterviewScheduled);
        assert_eq!(req.interview_at, Some(datetime!(2025-10-01 14:30 UTC)));
    }

    #[test]
    fn status_request_interview_time_is_optional() {
        let id = Uuid::new_v4();
        let req: UpdateReferralStatusRequest = serde_json::from_str(&format!(
            r#"{{"referral_id":"{id}","new_status":"verified"}}"#
        ))
        .unwrap();
        assert_eq!(req.interview_at, None);
    }

    #[test]
    fn notified_flag_is_omitted_outside_confirmation() {
        let body = StatusUpdateResponse {
            id: Uuid::new_v4(),
            status: Status::Verified,
            candidate_notified: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("candidate_notified"));
    }
}
