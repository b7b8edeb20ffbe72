//! Request status lifecycle.
//!
//! Status changes are loose: any open status may move to any other status.
//! The two closed statuses are terminal. What the lifecycle does enforce is
//! field presence around a change, reported as [`ValidationWarning`]s rather
//! than errors so that a change is never blocked by incomplete paperwork.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::{days_between, format_date, parse_date};
use crate::error::{LifecycleError, Validated, ValidationWarning};
use crate::schema::{AppealStatus, NewRequest, Priority, Request, Status};
use crate::windows::{normalize_state_code, ResponseWindows};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Filed,
    Acknowledged,
    Processing,
    Denied,
    Appeal,
    Complete,
    Abandoned,
    Overdue,
    Warning,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::ClosedComplete | Status::ClosedAbandoned)
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Statuses under which the appeal status is worth tracking.
    pub fn is_appeal_track(self) -> bool {
        matches!(
            self,
            Status::Denied
                | Status::AppealNeeded
                | Status::AppealFiled
                | Status::AppealDenied
                | Status::AppealGranted
        )
    }

    pub fn category(self) -> StatusCategory {
        match self {
            Status::Filed => StatusCategory::Filed,
            Status::Acknowledged => StatusCategory::Acknowledged,
            Status::Processing | Status::ResponsiveRecordsIdentified | Status::PartialRelease => {
                StatusCategory::Processing
            }
            Status::Denied | Status::AppealDenied => StatusCategory::Denied,
            Status::AppealNeeded | Status::AppealFiled | Status::AppealGranted => {
                StatusCategory::Appeal
            }
            Status::ClosedComplete => StatusCategory::Complete,
            Status::ClosedAbandoned => StatusCategory::Abandoned,
            Status::PastDue => StatusCategory::Overdue,
            Status::FeeDispute | Status::AwaitingClarification => StatusCategory::Warning,
        }
    }
}

/// Which conditional fields an edit form should show for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldVisibility {
    pub denial_reason: bool,
    pub appeal_status: bool,
}

pub fn visible_fields(status: Status) -> FieldVisibility {
    FieldVisibility {
        denial_reason: status == Status::Denied,
        appeal_status: status.is_appeal_track(),
    }
}

/// Fields accepted by the edit form. `None` keeps the current value; an
/// empty string clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequestUpdate {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
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
    pub updated_at: Option<String>,
}

/// Builds a new `Filed` request with its response deadline fixed.
pub fn create_request(
    new: NewRequest,
    windows: &ResponseWindows,
    created_at: Option<&str>,
) -> Result<Validated<Request>, LifecycleError> {
    require_text("request_id", &new.request_id)?;
    require_text("agency_name", &new.agency_name)?;
    require_text("subject", &new.subject)?;

    let request_id = new.request_id.trim().to_string();
    let mut warnings = Vec::new();
    let supplied_code = new
        .state_code
        .as_deref()
        .map(normalize_state_code)
        .filter(|code| !code.is_empty());
    let state_code = if new.agency_type.requires_state_code() {
        match supplied_code {
            Some(code) => Some(code),
            None => {
                return Err(LifecycleError::invalid_input(
                    "state_code",
                    format!("required for {} agencies", new.agency_type),
                ));
            }
        }
    } else {
        if let Some(code) = supplied_code {
            warnings.push(ValidationWarning::StateCodeIgnored {
                request_id: request_id.clone(),
                state_code: code,
            });
        }
        None
    };

    let filed = parse_date("filed_date", &new.filed_date)?;
    let deadline = windows.deadline(filed, new.agency_type, state_code.as_deref())?;

    let request = Request {
        request_id,
        agency_name: new.agency_name,
        agency_type: new.agency_type,
        state_code,
        filed_date: format_date(filed)?,
        subject: new.subject,
        priority: new.priority,
        status: Status::Filed,
        response_deadline: Some(format_date(deadline)?),
        tracking_number: None,
        next_action: None,
        next_action_date: None,
        denial_reason: None,
        appeal_status: None,
        notes: non_empty(new.notes),
        days_pending: None,
        days_in_status: None,
        investigation: non_empty(new.investigation),
        contact_name: non_empty(new.contact_name),
        contact_email: non_empty(new.contact_email),
        created_at: created_at.map(str::to_string),
        updated_at: created_at.map(str::to_string),
    };
    tracing::info!(
        request_id = %request.request_id,
        %deadline,
        "created request"
    );
    Ok(Validated::new(request, warnings))
}

/// Moves a request to `to`, leaving every other field alone.
pub fn transition(request: &Request, to: Status) -> Result<Validated<Request>, LifecycleError> {
    apply_update(
        request,
        &RequestUpdate {
            status: Some(to),
            ..RequestUpdate::default()
        },
    )
}

/// Applies an edit to a copy of `request`. The original is never touched, so
/// a rejected edit leaves the caller's record as it was.
pub fn apply_update(
    request: &Request,
    update: &RequestUpdate,
) -> Result<Validated<Request>, LifecycleError> {
    let from = request.status;
    if let Some(to) = update.status {
        if from.is_terminal() && to != from {
            return Err(LifecycleError::InvalidTransition { from, to });
        }
    }
    if let Some(date) = update.next_action_date.as_deref() {
        if !date.trim().is_empty() {
            parse_date("next_action_date", date)?;
        }
    }

    let mut next = request.clone();
    if let Some(status) = update.status {
        next.status = status;
    }
    if let Some(priority) = update.priority {
        next.priority = priority;
    }
    merge_text(&mut next.tracking_number, &update.tracking_number);
    merge_text(&mut next.next_action, &update.next_action);
    merge_text(&mut next.next_action_date, &update.next_action_date);
    merge_text(&mut next.denial_reason, &update.denial_reason);
    merge_text(&mut next.notes, &update.notes);
    if let Some(appeal_status) = update.appeal_status {
        next.appeal_status = Some(appeal_status);
    }
    if let Some(updated_at) = &update.updated_at {
        next.updated_at = Some(updated_at.clone());
    }

    let mut warnings = Vec::new();
    if next.status == Status::Denied && is_blank(&next.denial_reason) {
        warnings.push(ValidationWarning::MissingDenialReason {
            request_id: next.request_id.clone(),
        });
    }
    if next.status != from {
        tracing::info!(
            request_id = %next.request_id,
            from = %from,
            to = %next.status,
            "status changed"
        );
    }
    Ok(Validated::new(next, warnings))
}

/// Recomputes the response deadline from the filing date. Edits never do
/// this on their own.
pub fn recompute_deadline(
    request: &Request,
    windows: &ResponseWindows,
) -> Result<Request, LifecycleError> {
    let filed = parse_date("filed_date", &request.filed_date)?;
    let deadline = windows.deadline(filed, request.agency_type, request.state_code.as_deref())?;
    let mut next = request.clone();
    next.response_deadline = Some(format_date(deadline)?);
    Ok(next)
}

/// Per-record values a dashboard card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derived {
    pub days_pending: i64,
    pub overdue: bool,
    pub response_deadline: Option<String>,
    pub category: StatusCategory,
    pub fields: FieldVisibility,
}

pub fn derive(request: &Request, today: Date) -> Result<Derived, LifecycleError> {
    Ok(Derived {
        days_pending: days_pending(request, today)?,
        overdue: is_overdue(request, today)?,
        response_deadline: request
            .response_deadline
            .as_deref()
            .map(|raw| parse_date("response_deadline", raw).and_then(format_date))
            .transpose()?,
        category: request.status.category(),
        fields: visible_fields(request.status),
    })
}

/// Days since filing, unless the store carries a non-zero override.
pub fn days_pending(request: &Request, today: Date) -> Result<i64, LifecycleError> {
    match request.days_pending {
        Some(days) if days != 0 => Ok(days),
        _ => {
            let filed = parse_date("filed_date", &request.filed_date)?;
            Ok(days_between(filed, today))
        }
    }
}

/// Past its deadline and still open. Requests without a deadline are never
/// overdue.
pub fn is_overdue(request: &Request, today: Date) -> Result<bool, LifecycleError> {
    if !request.status.is_active() {
        return Ok(false);
    }
    match request.response_deadline.as_deref() {
        Some(raw) => Ok(parse_date("response_deadline", raw)? < today),
        None => Ok(false),
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), LifecycleError> {
    if value.trim().is_empty() {
        return Err(LifecycleError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

fn merge_text(current: &mut Option<String>, update: &Option<String>) {
    if let Some(value) = update {
        *current = non_empty(Some(value.clone()));
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|text| text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AgencyType;
    use time::macros::date;

    fn new_request(agency_type: AgencyType, state_code: Option<&str>) -> NewRequest {
        NewRequest {
            request_id: "FOIA-2026-001".to_string(),
            agency_name: "Missouri Department of Revenue".to_string(),
            agency_type,
            state_code: state_code.map(str::to_string),
            filed_date: "2024-03-01".to_string(),
            subject: "Contract records".to_string(),
            priority: Priority::High,
            investigation: Some(String::new()),
            contact_name: None,
            contact_email: None,
            notes: None,
        }
    }

    fn filed(status: Status) -> Request {
        let mut request = create_request(
            new_request(AgencyType::Federal, None),
            &ResponseWindows::default(),
            None,
        )
        .unwrap()
        .value;
        request.status = status;
        request
    }

    #[test]
    fn creation_fixes_deadline_and_status() {
        let created = create_request(
            new_request(AgencyType::State, Some("mo")),
            &ResponseWindows::default(),
            Some("2024-03-01T09:00:00Z"),
        )
        .unwrap();
        assert!(created.is_complete());
        let request = created.value;
        assert_eq!(request.status, Status::Filed);
        assert_eq!(request.state_code.as_deref(), Some("MO"));
        assert_eq!(request.response_deadline.as_deref(), Some("2024-03-06"));
        assert_eq!(request.investigation, None);
        assert_eq!(request.created_at.as_deref(), Some("2024-03-01T09:00:00Z"));
    }

    #[test]
    fn state_agency_without_code_is_rejected() {
        let err = create_request(
            new_request(AgencyType::Local, Some("  ")),
            &ResponseWindows::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput { field: "state_code", .. }));
    }

    #[test]
    fn federal_agency_drops_state_code_with_warning() {
        let created = create_request(
            new_request(AgencyType::Federal, Some("MO")),
            &ResponseWindows::default(),
            None,
        )
        .unwrap();
        assert_eq!(created.value.state_code, None);
        assert_eq!(created.value.response_deadline.as_deref(), Some("2024-03-29"));
        assert!(matches!(
            created.warnings.as_slice(),
            [ValidationWarning::StateCodeIgnored { .. }]
        ));
    }

    #[test]
    fn warning_and_record_share_the_trimmed_id() {
        let mut new = new_request(AgencyType::Federal, Some("MO"));
        new.request_id = "  FOIA-2026-009 ".to_string();
        let created = create_request(new, &ResponseWindows::default(), None).unwrap();
        assert_eq!(created.value.request_id, "FOIA-2026-009");
        assert_eq!(
            created.warnings,
            vec![ValidationWarning::StateCodeIgnored {
                request_id: "FOIA-2026-009".to_string(),
                state_code: "MO".to_string(),
            }]
        );
    }

    #[test]
    fn blank_subject_is_rejected() {
        let mut new = new_request(AgencyType::Federal, None);
        new.subject = " ".to_string();
        assert!(create_request(new, &ResponseWindows::default(), None).is_err());
    }

    #[test]
    fn closed_requests_reject_transitions() {
        let request = filed(Status::ClosedAbandoned);
        let before = request.clone();
        for to in Status::ALL.into_iter().filter(|s| *s != Status::ClosedAbandoned) {
            let err = transition(&request, to).unwrap_err();
            assert_eq!(
                err,
                LifecycleError::InvalidTransition {
                    from: Status::ClosedAbandoned,
                    to
                }
            );
        }
        assert_eq!(request, before);
    }

    #[test]
    fn closed_request_can_still_take_notes() {
        let request = filed(Status::ClosedComplete);
        let update = RequestUpdate {
            status: Some(Status::ClosedComplete),
            notes: Some("records received".to_string()),
            ..RequestUpdate::default()
        };
        let updated = apply_update(&request, &update).unwrap().value;
        assert_eq!(updated.notes.as_deref(), Some("records received"));
    }

    #[test]
    fn open_statuses_move_freely() {
        let request = filed(Status::PastDue);
        let updated = transition(&request, Status::Acknowledged).unwrap();
        assert_eq!(updated.value.status, Status::Acknowledged);
        let closed = transition(&updated.value, Status::ClosedComplete).unwrap();
        assert_eq!(closed.value.status, Status::ClosedComplete);
    }

    #[test]
    fn denial_without_reason_warns_but_succeeds() {
        let request = filed(Status::Processing);
        let denied = transition(&request, Status::Denied).unwrap();
        assert_eq!(denied.value.status, Status::Denied);
        assert_eq!(
            denied.warnings,
            vec![ValidationWarning::MissingDenialReason {
                request_id: "FOIA-2026-001".to_string()
            }]
        );

        let update = RequestUpdate {
            status: Some(Status::Denied),
            denial_reason: Some("Exemption 5".to_string()),
            ..RequestUpdate::default()
        };
        assert!(apply_update(&request, &update).unwrap().is_complete());
    }

    #[test]
    fn leaving_appeal_track_keeps_appeal_status() {
        let mut request = filed(Status::AppealFiled);
        request.appeal_status = Some(AppealStatus::Filed);
        let updated = transition(&request, Status::Processing).unwrap().value;
        assert_eq!(updated.appeal_status, Some(AppealStatus::Filed));
    }

    #[test]
    fn edits_never_move_the_deadline() {
        let request = filed(Status::Filed);
        let update = RequestUpdate {
            status: Some(Status::Processing),
            priority: Some(Priority::Critical),
            tracking_number: Some("DOJ-77".to_string()),
            ..RequestUpdate::default()
        };
        let updated = apply_update(&request, &update).unwrap().value;
        assert_eq!(updated.response_deadline, request.response_deadline);
        assert_eq!(updated.filed_date, request.filed_date);
        assert_eq!(updated.tracking_number.as_deref(), Some("DOJ-77"));
    }

    #[test]
    fn empty_text_clears_field() {
        let mut request = filed(Status::Processing);
        request.tracking_number = Some("DOJ-77".to_string());
        let update = RequestUpdate {
            tracking_number: Some(String::new()),
            ..RequestUpdate::default()
        };
        assert_eq!(apply_update(&request, &update).unwrap().value.tracking_number, None);
    }

    #[test]
    fn malformed_next_action_date_is_rejected() {
        let request = filed(Status::Processing);
        let update = RequestUpdate {
            next_action_date: Some("next week".to_string()),
            ..RequestUpdate::default()
        };
        assert!(matches!(
            apply_update(&request, &update),
            Err(LifecycleError::InvalidInput { field: "next_action_date", .. })
        ));
    }

    #[test]
    fn explicit_recompute_uses_current_jurisdiction() {
        let mut request = filed(Status::Processing);
        request.agency_type = AgencyType::State;
        request.state_code = Some("MN".to_string());
        let recomputed = recompute_deadline(&request, &ResponseWindows::default()).unwrap();
        assert_eq!(recomputed.response_deadline.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn field_visibility_follows_status() {
        assert_eq!(
            visible_fields(Status::Denied),
            FieldVisibility {
                denial_reason: true,
                appeal_status: true
            }
        );
        assert!(visible_fields(Status::AppealGranted).appeal_status);
        assert!(!visible_fields(Status::AppealGranted).denial_reason);
        assert_eq!(
            visible_fields(Status::Processing),
            FieldVisibility {
                denial_reason: false,
                appeal_status: false
            }
        );
    }

    #[test]
    fn derived_values_for_open_and_closed_requests() {
        let today = date!(2024 - 04 - 01);
        let open = filed(Status::Processing);
        let derived = derive(&open, today).unwrap();
        assert_eq!(derived.days_pending, 31);
        assert!(derived.overdue);
        assert_eq!(derived.response_deadline.as_deref(), Some("2024-03-29"));
        assert_eq!(derived.category, StatusCategory::Processing);

        let closed = filed(Status::ClosedComplete);
        assert!(!derive(&closed, today).unwrap().overdue);
    }

    #[test]
    fn override_wins_unless_zero() {
        let today = date!(2024 - 03 - 11);
        let mut request = filed(Status::Processing);
        request.days_pending = Some(4);
        assert_eq!(days_pending(&request, today).unwrap(), 4);
        request.days_pending = Some(0);
        assert_eq!(days_pending(&request, today).unwrap(), 10);
    }
}
