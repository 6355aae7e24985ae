use chrono::{Datelike, Duration, NaiveDate};
use pennyfox_domain::{RecurrenceGranularity as G, RecurrenceRule};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Every day from 2023-01-01 through 2026-12-31, used as the evaluation date.
fn reference_dates() -> impl Iterator<Item = NaiveDate> {
    let start = date(2023, 1, 1);
    let end = date(2026, 12, 31);
    (0..=(end - start).num_days()).map(move |offset| start + Duration::days(offset))
}

fn due_after(granularity: G, days_passed: i64, today: NaiveDate) -> bool {
    RecurrenceRule::new(granularity, today - Duration::days(days_passed)).is_due(today)
}

#[test]
fn elapsed_day_table_holds_for_any_reference_date() {
    let cases = [
        (G::Daily, 1, true),
        (G::Weekly, 8, true),
        (G::Biweekly, 14, true),
        (G::Monthly, 31, true),
        (G::Bimonthly, 62, true),
        (G::Quarterly, 94, true),
        (G::Biannually, 184, true),
        (G::Daily, 0, false),
        (G::Weekly, 5, false),
        (G::Biweekly, 10, false),
        (G::Bimonthly, 20, false),
        (G::Quarterly, 59, false),
        (G::Biannually, 137, false),
        (G::Yearly, 300, false),
        (G::Biannually, 355, true),
        (G::Quarterly, 355, true),
    ];

    for today in reference_dates() {
        for (granularity, days, expected) in cases {
            assert_eq!(
                due_after(granularity, days, today),
                expected,
                "{granularity} after {days} days evaluated on {today}"
            );
        }
    }
}

#[test]
fn day_based_thresholds_are_inclusive() {
    let today = date(2025, 5, 20);
    for (granularity, threshold) in [(G::Daily, 1), (G::Weekly, 7), (G::Biweekly, 14)] {
        assert!(!due_after(granularity, threshold - 1, today));
        assert!(due_after(granularity, threshold, today));
    }
}

#[test]
fn every_granularity_flips_exactly_at_next_due_date() {
    let anchors = [
        date(2023, 1, 31),
        date(2023, 7, 1),
        date(2024, 2, 29),
        date(2024, 11, 15),
        date(2025, 12, 31),
    ];
    for anchor in anchors {
        for granularity in G::ALL {
            let rule = RecurrenceRule::new(granularity, anchor);
            let due = rule.next_due_date();
            assert!(
                !rule.is_due(due - Duration::days(1)),
                "{granularity} anchored {anchor} should not be due the day before {due}"
            );
            assert!(
                rule.is_due(due),
                "{granularity} anchored {anchor} should be due on {due}"
            );
        }
    }
}

#[test]
fn yearly_waits_for_the_anniversary_month() {
    assert!(due_after(G::Yearly, 365, date(2026, 3, 1)));
    let rule = RecurrenceRule::new(G::Yearly, date(2025, 3, 15));
    assert!(!rule.is_due(date(2026, 2, 28)));
    assert!(rule.is_due(date(2026, 3, 1)));
}

#[test]
fn quarterly_crossing_year_end_is_due_before_a_full_year() {
    let rule = RecurrenceRule::new(G::Quarterly, date(2024, 12, 20));
    assert!(rule.is_due(date(2025, 3, 1)));
    assert!(!rule.is_due(date(2025, 2, 28)));
}

#[test]
fn biannual_span_depends_on_months_crossed() {
    // 184 days from January 1st reaches the seventh month...
    let january = RecurrenceRule::new(G::Biannually, date(2025, 1, 1));
    assert_eq!((date(2025, 7, 4) - january.anchor_date).num_days(), 184);
    assert!(january.is_due(date(2025, 7, 4)));
    // ...while 166 days from mid-January has not reached the seventh month.
    let mid_january = RecurrenceRule::new(G::Biannually, date(2025, 1, 15));
    assert!(!mid_january.is_due(date(2025, 6, 30)));
}

#[test]
fn monthly_anchored_on_first_of_month_waits_for_next_month() {
    for today in reference_dates() {
        let first = today.with_day(1).unwrap();
        let rule = RecurrenceRule::new(G::Monthly, first);
        assert!(!rule.is_due(today), "monthly anchored {first} evaluated {today}");
    }
}

#[test]
fn future_anchor_is_never_due() {
    let today = date(2025, 8, 10);
    for (granularity, days_ahead) in [
        (G::Daily, 0),
        (G::Weekly, 5),
        (G::Biweekly, 10),
        (G::Monthly, 28),
        (G::Bimonthly, 55),
        (G::Yearly, 340),
    ] {
        let rule = RecurrenceRule::new(granularity, today + Duration::days(days_ahead));
        assert!(!rule.is_due(today), "{granularity} anchored {days_ahead} days ahead");
    }
}
