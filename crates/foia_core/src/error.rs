use serde::Serialize;
use std::fmt;

use crate::schema::Status;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Malformed date, unrecognized enum value or malformed record shape.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Status change attempted out of a terminal state.
    #[error("cannot move request from {from} to {to}: {from} is a closed state")]
    InvalidTransition { from: Status, to: Status },
}

impl LifecycleError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        LifecycleError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Non-fatal incompleteness reported next to a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ValidationWarning {
    MissingDenialReason { request_id: String },
    StateCodeIgnored { request_id: String, state_code: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::MissingDenialReason { request_id } => {
                write!(f, "{request_id}: status is Denied but no denial reason is recorded")
            }
            ValidationWarning::StateCodeIgnored {
                request_id,
                state_code,
            } => write!(
                f,
                "{request_id}: state code {state_code} ignored for a Federal agency"
            ),
        }
    }
}

/// A successful result plus any warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub warnings: Vec<ValidationWarning>,
}

impl<T> Validated<T> {
    pub fn new(value: T, warnings: Vec<ValidationWarning>) -> Self {
        for warning in &warnings {
            tracing::warn!(%warning, "validation warning");
        }
        Self { value, warnings }
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}
