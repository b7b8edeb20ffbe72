use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LifecycleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AgencyType {
    Federal,
    State,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Status {
    #[default]
    Filed,
    Acknowledged,
    Processing,
    #[serde(rename = "Responsive Records Identified")]
    ResponsiveRecordsIdentified,
    #[serde(rename = "Partial Release")]
    PartialRelease,
    Denied,
    #[serde(rename = "Fee Dispute")]
    FeeDispute,
    #[serde(rename = "Awaiting Clarification")]
    AwaitingClarification,
    #[serde(rename = "Appeal Needed")]
    AppealNeeded,
    #[serde(rename = "Appeal Filed")]
    AppealFiled,
    #[serde(rename = "Appeal Denied")]
    AppealDenied,
    #[serde(rename = "Appeal Granted")]
    AppealGranted,
    #[serde(rename = "Past Due")]
    PastDue,
    #[serde(rename = "Closed - Complete")]
    ClosedComplete,
    #[serde(rename = "Closed - Abandoned")]
    ClosedAbandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AppealStatus {
    #[serde(rename = "N/A")]
    NotApplicable,
    Needed,
    Filed,
    Denied,
    Granted,
    Exhausted,
}

/// A FOIA request as stored by the external record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Request {
    pub request_id: String,                // human-assigned, e.g. "FOIA-2026-001"
    pub agency_name: String,
    pub agency_type: AgencyType,
    #[serde(default)]
    pub state_code: Option<String>,        // present iff agency_type is State or Local
    pub filed_date: String,                // YYYY-MM-DD
    pub subject: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub response_deadline: Option<String>, // YYYY-MM-DD, fixed at creation
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub next_action_date: Option<String>,
    #[serde(default)]
    pub denial_reason: Option<String>,
    #[serde(default)]
    pub appeal_status: Option<AppealStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub days_pending: Option<i64>,         // explicit override of the derived value
    #[serde(default)]
    pub days_in_status: Option<i64>,
    #[serde(default)]
    pub investigation: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,        // ISO-8601, set by the store
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields collected by the new-request form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewRequest {
    pub request_id: String,
    pub agency_name: String,
    pub agency_type: AgencyType,
    #[serde(default)]
    pub state_code: Option<String>,
    pub filed_date: String,
    pub subject: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub investigation: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AgencyType {
    pub const ALL: [AgencyType; 3] = [AgencyType::Federal, AgencyType::State, AgencyType::Local];

    pub fn as_str(self) -> &'static str {
        match self {
            AgencyType::Federal => "Federal",
            AgencyType::State => "State",
            AgencyType::Local => "Local",
        }
    }

    pub fn requires_state_code(self) -> bool {
        matches!(self, AgencyType::State | AgencyType::Local)
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl Status {
    pub const ALL: [Status; 15] = [
        Status::Filed,
        Status::Acknowledged,
        Status::Processing,
        Status::ResponsiveRecordsIdentified,
        Status::PartialRelease,
        Status::Denied,
        Status::FeeDispute,
        Status::AwaitingClarification,
        Status::AppealNeeded,
        Status::AppealFiled,
        Status::AppealDenied,
        Status::AppealGranted,
        Status::PastDue,
        Status::ClosedComplete,
        Status::ClosedAbandoned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Filed => "Filed",
            Status::Acknowledged => "Acknowledged",
            Status::Processing => "Processing",
            Status::ResponsiveRecordsIdentified => "Responsive Records Identified",
            Status::PartialRelease => "Partial Release",
            Status::Denied => "Denied",
            Status::FeeDispute => "Fee Dispute",
            Status::AwaitingClarification => "Awaiting Clarification",
            Status::AppealNeeded => "Appeal Needed",
            Status::AppealFiled => "Appeal Filed",
            Status::AppealDenied => "Appeal Denied",
            Status::AppealGranted => "Appeal Granted",
            Status::PastDue => "Past Due",
            Status::ClosedComplete => "Closed - Complete",
            Status::ClosedAbandoned => "Closed - Abandoned",
        }
    }
}

impl AppealStatus {
    pub const ALL: [AppealStatus; 6] = [
        AppealStatus::NotApplicable,
        AppealStatus::Needed,
        AppealStatus::Filed,
        AppealStatus::Denied,
        AppealStatus::Granted,
        AppealStatus::Exhausted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppealStatus::NotApplicable => "N/A",
            AppealStatus::Needed => "Needed",
            AppealStatus::Filed => "Filed",
            AppealStatus::Denied => "Denied",
            AppealStatus::Granted => "Granted",
            AppealStatus::Exhausted => "Exhausted",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = LifecycleError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str() == trimmed)
                    .ok_or_else(|| {
                        LifecycleError::invalid_input($field, format!("unrecognized value {value:?}"))
                    })
            }
        }
    };
}

display_and_parse!(AgencyType, "agency_type");
display_and_parse!(Priority, "priority");
display_and_parse!(Status, "status");
display_and_parse!(AppealStatus, "appeal_status");
