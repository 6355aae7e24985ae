//! Recurrence rules for scheduled payments and the due-date predicate.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{days_in_month, months_between, shift_months},
    RecurrenceError,
};

/// Enumerates the repeat cadences a recurring payment can follow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceGranularity {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Biannually,
    Yearly,
}

impl RecurrenceGranularity {
    /// Every granularity in legacy code order.
    pub const ALL: [RecurrenceGranularity; 8] = [
        RecurrenceGranularity::Daily,
        RecurrenceGranularity::Weekly,
        RecurrenceGranularity::Biweekly,
        RecurrenceGranularity::Monthly,
        RecurrenceGranularity::Bimonthly,
        RecurrenceGranularity::Quarterly,
        RecurrenceGranularity::Biannually,
        RecurrenceGranularity::Yearly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RecurrenceGranularity::Daily => "Daily",
            RecurrenceGranularity::Weekly => "Weekly",
            RecurrenceGranularity::Biweekly => "Biweekly",
            RecurrenceGranularity::Monthly => "Monthly",
            RecurrenceGranularity::Bimonthly => "Bimonthly",
            RecurrenceGranularity::Quarterly => "Quarterly",
            RecurrenceGranularity::Biannually => "Biannually",
            RecurrenceGranularity::Yearly => "Yearly",
        }
    }

    /// Integer code used by persisted payment records.
    pub fn code(self) -> i32 {
        match self {
            RecurrenceGranularity::Daily => 0,
            RecurrenceGranularity::Weekly => 1,
            RecurrenceGranularity::Biweekly => 2,
            RecurrenceGranularity::Monthly => 3,
            RecurrenceGranularity::Bimonthly => 4,
            RecurrenceGranularity::Quarterly => 5,
            RecurrenceGranularity::Biannually => 6,
            RecurrenceGranularity::Yearly => 7,
        }
    }

    /// Calendar months that must advance before a month-based cadence fires.
    fn month_step(self) -> Option<i32> {
        match self {
            RecurrenceGranularity::Monthly => Some(1),
            RecurrenceGranularity::Bimonthly => Some(2),
            RecurrenceGranularity::Quarterly => Some(3),
            RecurrenceGranularity::Biannually => Some(6),
            RecurrenceGranularity::Yearly => Some(12),
            _ => None,
        }
    }

    fn day_step(self) -> Option<i64> {
        match self {
            RecurrenceGranularity::Daily => Some(1),
            RecurrenceGranularity::Weekly => Some(7),
            RecurrenceGranularity::Biweekly => Some(14),
            _ => None,
        }
    }
}

impl fmt::Display for RecurrenceGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecurrenceGranularity {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        RecurrenceGranularity::ALL
            .into_iter()
            .find(|granularity| granularity.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| RecurrenceError::InvalidRecurrenceKind(value.trim().to_string()))
    }
}

impl TryFrom<i32> for RecurrenceGranularity {
    type Error = RecurrenceError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        RecurrenceGranularity::ALL
            .into_iter()
            .find(|granularity| granularity.code() == code)
            .ok_or_else(|| RecurrenceError::InvalidRecurrenceKind(code.to_string()))
    }
}

/// A recurring payment schedule anchored on the date it was established or
/// last fired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub granularity: RecurrenceGranularity,
    pub anchor_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(granularity: RecurrenceGranularity, anchor_date: NaiveDate) -> Self {
        Self {
            granularity,
            anchor_date,
            end_date: None,
        }
    }

    /// Builds a rule from a persisted granularity code.
    pub fn from_code(code: i32, anchor_date: NaiveDate) -> Result<Self, RecurrenceError> {
        Ok(Self::new(RecurrenceGranularity::try_from(code)?, anchor_date))
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_endless(&self) -> bool {
        self.end_date.is_none()
    }

    /// Decides whether the recurrence should fire on `today`.
    ///
    /// Day-based cadences compare elapsed days. Month-based cadences compare
    /// (year, month) pairs so that spans crossing months of different lengths
    /// or a year boundary are judged by the calendar, not by day counts. A
    /// rule anchored after `today` has not cleared yet and is never due.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        let days_elapsed = (today - self.anchor_date).num_days();
        if days_elapsed < 0 {
            return false;
        }
        let months_advanced = months_between(self.anchor_date, today);

        match self.granularity {
            RecurrenceGranularity::Monthly => {
                let anchor_month_len =
                    days_in_month(self.anchor_date.year(), self.anchor_date.month());
                days_elapsed >= i64::from(anchor_month_len) || months_advanced >= 1
            }
            granularity => match (granularity.day_step(), granularity.month_step()) {
                (Some(days), _) => days_elapsed >= days,
                (None, Some(months)) => months_advanced >= months,
                (None, None) => false,
            },
        }
    }

    /// True once the rule has an end date and `today` is past it.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| today > end)
    }

    /// First date on which [`RecurrenceRule::is_due`] returns true.
    pub fn next_due_date(&self) -> NaiveDate {
        if let Some(days) = self.granularity.day_step() {
            return self.anchor_date + Duration::days(days);
        }
        let months = self.granularity.month_step().unwrap_or(1);
        let month_start = self.anchor_date.with_day(1).unwrap_or(self.anchor_date);
        shift_months(month_start, months)
    }

    /// Re-anchors the rule after it fired on `today`, returning the previous anchor.
    pub fn advance(&mut self, today: NaiveDate) -> NaiveDate {
        std::mem::replace(&mut self.anchor_date, today)
    }
}

/// Returns the positions of rules that are due on `today` and not expired.
pub fn due_rules(rules: &[RecurrenceRule], today: NaiveDate) -> Vec<usize> {
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| !rule.is_expired(today) && rule.is_due(today))
        .map(|(index, _)| index)
        .collect()
}
