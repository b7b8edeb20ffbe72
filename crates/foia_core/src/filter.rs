use std::fmt;
use std::str::FromStr;

use crate::error::LifecycleError;
use crate::schema::{Priority, Request, Status};

/// A dropdown filter: either everything or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr<Err = LifecycleError>,
{
    type Err = LifecycleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        value.parse().map(Selection::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Only(value) => write!(f, "{value}"),
        }
    }
}

/// Requests matching the search term and both dropdowns, in input order.
pub fn filter<'a>(
    requests: &'a [Request],
    search_term: &str,
    status: Selection<Status>,
    priority: Selection<Priority>,
) -> Vec<&'a Request> {
    let needle = search_term.to_lowercase();
    let matched: Vec<&Request> = requests
        .iter()
        .filter(|request| matches_search(request, &needle))
        .filter(|request| status.matches(&request.status))
        .filter(|request| priority.matches(&request.priority))
        .collect();
    tracing::debug!(
        search = %needle,
        status = %status,
        priority = %priority,
        matched = matched.len(),
        of = requests.len(),
        "filtered requests"
    );
    matched
}

fn matches_search(request: &Request, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(needle);
    contains(&request.request_id)
        || contains(&request.agency_name)
        || contains(&request.subject)
        || request.tracking_number.as_deref().is_some_and(contains)
}
