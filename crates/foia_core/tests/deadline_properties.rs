use foia_core::deadline::{add_business_days, is_business_day};
use foia_core::{compute_deadline, AgencyType, ResponseWindows};
use proptest::prelude::*;
use time::macros::date;
use time::{Date, Duration, Weekday};

fn filed_date_strategy() -> impl Strategy<Value = Date> {
    (0i64..20_000).prop_map(|offset| date!(2000 - 01 - 01) + Duration::days(offset))
}

fn weekdays_after(start: Date, end: Date) -> u32 {
    let mut count = 0;
    let mut current = start;
    while current < end {
        current = current.next_day().unwrap();
        if is_business_day(current) {
            count += 1;
        }
    }
    count
}

proptest! {
    #[test]
    fn deadline_is_strictly_after_filing(filed in filed_date_strategy(), days in 1u32..60) {
        let deadline = add_business_days(filed, days).unwrap();
        prop_assert!(deadline > filed);
        prop_assert!(is_business_day(deadline));
    }

    #[test]
    fn longer_windows_never_end_earlier(filed in filed_date_strategy(), days in 0u32..60, extra in 0u32..30) {
        let shorter = add_business_days(filed, days).unwrap();
        let longer = add_business_days(filed, days + extra).unwrap();
        prop_assert!(longer >= shorter);
    }

    #[test]
    fn exactly_the_window_of_weekdays_elapses(filed in filed_date_strategy(), days in 1u32..60) {
        let deadline = add_business_days(filed, days).unwrap();
        prop_assert_eq!(weekdays_after(filed, deadline), days);
    }

    #[test]
    fn unlisted_states_match_federal(filed in filed_date_strategy(), code in "[A-Z]{2}") {
        prop_assume!(!["MO", "IN", "MN"].contains(&code.as_str()));
        let windows = ResponseWindows::default();
        prop_assert_eq!(
            windows.deadline(filed, AgencyType::Local, Some(code.as_str())).unwrap(),
            windows.deadline(filed, AgencyType::Federal, None).unwrap()
        );
    }
}

#[test]
fn friday_filing_lands_on_a_weekday_twenty_business_days_out() {
    let filed = date!(2024 - 03 - 01);
    assert_eq!(filed.weekday(), Weekday::Friday);
    let deadline = compute_deadline("2024-03-01", "Federal", None).unwrap();
    assert_eq!(deadline, date!(2024 - 03 - 29));
    assert!(is_business_day(deadline));
    assert_eq!(weekdays_after(filed, deadline), 20);
}

#[test]
fn texas_local_agency_uses_fallback_window() {
    let local = compute_deadline("2026-01-16", "Local", Some("TX")).unwrap();
    let federal = compute_deadline("2026-01-16", "Federal", None).unwrap();
    assert_eq!(local, federal);
}
