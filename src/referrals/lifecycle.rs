//! Referral status state machine.
//!
//! The pipeline is a strict chain: Pending -> Verified -> Interview
//! Scheduled -> Confirmed. Rejected and Cancelled are absorbing from any
//! non-terminal state; Confirmed is immutable once reached. Planning a
//! transition is pure; persistence and side effects live in the services.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "referral_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Verified,
    InterviewScheduled,
    Confirmed,
    Rejected,
    Cancelled,
}

impl Status {
    /// The single allowed forward step, if any.
    pub fn successor(self) -> Option<Status> {
        match self {
            Status::Pending => Some(Status::Verified),
            Status::Verified => Some(Status::InterviewScheduled),
            Status::InterviewScheduled => Some(Status::Confirmed),
            Status::Confirmed | Status::Rejected | Status::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Confirmed | Status::Rejected | Status::Cancelled
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Pending => "Pending",
            Status::Verified => "Verified",
            Status::InterviewScheduled => "Interview Scheduled",
            Status::Confirmed => "Confirmed",
            Status::Rejected => "Rejected",
            Status::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },
    #[error("cannot cancel a confirmed referral")]
    CannotCancelConfirmed,
    #[error("interview date/time is required to schedule an interview")]
    InterviewTimeRequired,
}

/// How the stored interview timestamp changes with a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewUpdate {
    Keep,
    Set(OffsetDateTime),
}

/// A validated transition, ready to persist.
#[derive(Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: Status,
    pub interview_at: InterviewUpdate,
    /// True when this transition enters Confirmed and must record an
    /// earning and notify the candidate.
    pub confirms: bool,
}

/// Validate a requested transition against the current status.
pub fn plan(
    current: Status,
    requested: Status,
    interview_at: Option<OffsetDateTime>,
) -> Result<Transition, TransitionError> {
    if current == Status::Confirmed {
        // Confirmed is immutable; cancellation gets its own error.
        return Err(match requested {
            Status::Cancelled => TransitionError::CannotCancelConfirmed,
            _ => TransitionError::InvalidTransition {
                from: current,
                to: requested,
            },
        });
    }
    if current.is_terminal() {
        return Err(TransitionError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    match requested {
        Status::Rejected | Status::Cancelled => Ok(Transition {
            next: requested,
            interview_at: InterviewUpdate::Keep,
            confirms: false,
        }),
        Status::InterviewScheduled if current.successor() == Some(requested) => {
            match interview_at {
                Some(at) => Ok(Transition {
                    next: requested,
                    interview_at: InterviewUpdate::Set(at),
                    confirms: false,
                }),
                None => Err(TransitionError::InterviewTimeRequired),
            }
        }
        _ if current.successor() == Some(requested) => Ok(Transition {
            next: requested,
            interview_at: InterviewUpdate::Keep,
            confirms: requested == Status::Confirmed,
        }),
        _ => Err(TransitionError::InvalidTransition {
            from: current,
            to: requested,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const ALL: [Status; 6] = [
        Status::Pending,
        Status::Verified,
        Status::InterviewScheduled,
        Status::Confirmed,
        Status::Rejected,
        Status::Cancelled,
    ];

    fn when() -> OffsetDateTime {
        datetime!(2025-10-01 14:30 UTC)
    }

    #[test]
    fn successor_chain_is_strict() {
        assert_eq!(Status::Pending.successor(), Some(Status::Verified));
        assert_eq!(
            Status::Verified.successor(),
            Some(Status::InterviewScheduled)
        );
        assert_eq!(
            Status::InterviewScheduled.successor(),
            Some(Status::Confirmed)
        );
        assert_eq!(Status::Confirmed.successor(), None);
        assert_eq!(Status::Rejected.successor(), None);
        assert_eq!(Status::Cancelled.successor(), None);
    }

    #[test]
    fn forward_steps_succeed_in_order() {
        let t = plan(Status::Pending, Status::Verified, None).unwrap();
        assert_eq!(t.next, Status::Verified);
        assert!(!t.confirms);
        assert_eq!(t.interview_at, InterviewUpdate::Keep);

        let t = plan(Status::Verified, Status::InterviewScheduled, Some(when())).unwrap();
        assert_eq!(t.next, Status::InterviewScheduled);
        assert_eq!(t.interview_at, InterviewUpdate::Set(when()));

        let t = plan(Status::InterviewScheduled, Status::Confirmed, None).unwrap();
        assert_eq!(t.next, Status::Confirmed);
        assert!(t.confirms);
        assert_eq!(t.interview_at, InterviewUpdate::Keep);
    }

    #[test]
    fn skipping_states_fails() {
        let err = plan(Status::Pending, Status::Confirmed, None).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: Status::Pending,
                to: Status::Confirmed,
            }
        );
        assert!(plan(Status::Pending, Status::InterviewScheduled, Some(when())).is_err());
        assert!(plan(Status::Verified, Status::Confirmed, None).is_err());
    }

    #[test]
    fn moving_backwards_fails() {
        assert!(plan(Status::Verified, Status::Pending, None).is_err());
        assert!(plan(Status::InterviewScheduled, Status::Verified, None).is_err());
    }

    #[test]
    fn rejection_reachable_from_any_non_terminal_state() {
        for from in [Status::Pending, Status::Verified, Status::InterviewScheduled] {
            let t = plan(from, Status::Rejected, None).unwrap();
            assert_eq!(t.next, Status::Rejected);
            assert!(!t.confirms);
        }
    }

    #[test]
    fn cancellation_reachable_from_any_non_terminal_state() {
        for from in [Status::Pending, Status::Verified, Status::InterviewScheduled] {
            let t = plan(from, Status::Cancelled, None).unwrap();
            assert_eq!(t.next, Status::Cancelled);
        }
    }

    #[test]
    fn confirmed_is_immutable() {
        for to in ALL {
            let err = plan(Status::Confirmed, to, Some(when())).unwrap_err();
            match to {
                Status::Cancelled => assert_eq!(err, TransitionError::CannotCancelConfirmed),
                _ => assert!(matches!(err, TransitionError::InvalidTransition { .. })),
            }
        }
    }

    #[test]
    fn rejected_and_cancelled_are_absorbing() {
        for from in [Status::Rejected, Status::Cancelled] {
            for to in ALL {
                assert!(plan(from, to, Some(when())).is_err());
            }
        }
    }

    #[test]
    fn interview_requires_timestamp() {
        let err = plan(Status::Verified, Status::InterviewScheduled, None).unwrap_err();
        assert_eq!(err, TransitionError::InterviewTimeRequired);
    }

    #[test]
    fn confirmation_keeps_existing_interview_timestamp() {
        // The timestamp supplied with a confirm request is ignored rather
        // than clobbering the scheduled slot.
        let t = plan(Status::InterviewScheduled, Status::Confirmed, Some(when())).unwrap();
        assert_eq!(t.interview_at, InterviewUpdate::Keep);
    }

    #[test]
    fn only_confirmation_triggers_side_effects() {
        for from in [Status::Pending, Status::Verified] {
            let to = from.successor().unwrap();
            assert!(!plan(from, to, Some(when())).unwrap().confirms);
        }
        assert!(plan(Status::InterviewScheduled, Status::Confirmed, None)
            .unwrap()
            .confirms);
    }

    #[test]
    fn display_uses_human_names() {
        assert_eq!(Status::InterviewScheduled.to_string(), "Interview Scheduled");
        let err = plan(Status::Pending, Status::Confirmed, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid status transition from Pending to Confirmed"
        );
    }
}
