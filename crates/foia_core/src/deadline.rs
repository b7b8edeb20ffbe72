use time::{Date, Weekday};

use crate::dates::parse_date;
use crate::error::LifecycleError;
use crate::schema::AgencyType;
use crate::windows::ResponseWindows;

pub fn is_business_day(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Advances `days` business days past `start`. `start` itself is never
/// counted.
pub fn add_business_days(start: Date, days: u32) -> Result<Date, LifecycleError> {
    let mut current = start;
    let mut counted = 0;
    while counted < days {
        current = current.next_day().ok_or_else(|| {
            LifecycleError::invalid_input("filed_date", "deadline falls outside the supported calendar")
        })?;
        if is_business_day(current) {
            counted += 1;
        }
    }
    Ok(current)
}

impl ResponseWindows {
    pub fn deadline(
        &self,
        filed: Date,
        agency_type: AgencyType,
        state_code: Option<&str>,
    ) -> Result<Date, LifecycleError> {
        let days = self.window_for(agency_type, state_code);
        let deadline = add_business_days(filed, days)?;
        tracing::debug!(
            %filed,
            agency_type = %agency_type,
            state_code = state_code.unwrap_or("-"),
            days,
            %deadline,
            "computed response deadline"
        );
        Ok(deadline)
    }
}

/// Response deadline for a request filed on `filed_date`, using the
/// built-in jurisdiction table.
pub fn compute_deadline(
    filed_date: &str,
    agency_type: &str,
    state_code: Option<&str>,
) -> Result<Date, LifecycleError> {
    let filed = parse_date("filed_date", filed_date)?;
    let agency_type: AgencyType = agency_type.parse()?;
    ResponseWindows::default().deadline(filed, agency_type, state_code)
}
