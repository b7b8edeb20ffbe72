use schemars::JsonSchema;
use serde::Serialize;
use time::Date;

use crate::error::LifecycleError;
use crate::lifecycle::{days_pending, is_overdue};
use crate::schema::{AppealStatus, Priority, Request, Status};

/// Statuses reported individually in the dashboard breakdown.
pub const REPORTED_STATUSES: [Status; 5] = [
    Status::Filed,
    Status::Acknowledged,
    Status::Processing,
    Status::Denied,
    Status::AppealFiled,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Metrics {
    pub total: usize,
    pub overdue: usize,
    pub critical: usize,
    pub appeals_needed: usize,
    pub avg_days_pending: i64,
    pub longest_pending: i64,
    pub avg_days_in_status: i64,
    pub status_breakdown: Vec<StatusCount>,
}

pub fn compute_metrics(requests: &[Request], today: Date) -> Result<Metrics, LifecycleError> {
    let total = requests.len();
    let mut overdue = 0;
    let mut critical = 0;
    let mut appeals_needed = 0;
    let mut active = 0usize;
    let mut pending_sum = 0i64;
    let mut longest_pending = 0i64;
    let mut in_status_sum = 0i64;

    for request in requests {
        if is_overdue(request, today)? {
            overdue += 1;
        }
        if request.priority == Priority::Critical {
            critical += 1;
        }
        if request.appeal_status == Some(AppealStatus::Needed) || request.status == Status::Denied {
            appeals_needed += 1;
        }
        if request.status.is_active() {
            let pending = days_pending(request, today)?;
            if active == 0 || pending > longest_pending {
                longest_pending = pending;
            }
            active += 1;
            pending_sum += pending;
            in_status_sum += request.days_in_status.unwrap_or(0);
        }
    }

    let status_breakdown = REPORTED_STATUSES
        .into_iter()
        .map(|status| {
            let count = requests.iter().filter(|r| r.status == status).count();
            StatusCount {
                status,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    let metrics = Metrics {
        total,
        overdue,
        critical,
        appeals_needed,
        avg_days_pending: rounded_mean(pending_sum, active),
        longest_pending,
        avg_days_in_status: rounded_mean(in_status_sum, active),
        status_breakdown,
    };
    tracing::debug!(
        %today,
        total = metrics.total,
        active,
        overdue = metrics.overdue,
        "computed metrics"
    );
    Ok(metrics)
}

/// Mean rounded half-up; 0 for an empty set.
fn rounded_mean(sum: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64 + 0.5).floor() as i64
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 * 100.0 / total as f64 + 0.5).floor() as u32
}
