//! Scope selection when a payment belonging to a recurring series is edited.

use serde::{Deserialize, Serialize};

/// Which occurrences a change to a recurring payment applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurringEditScope {
    JustThis,
    AllSubsequent,
}

/// Supplied by the caller (typically the presentation layer) to choose the
/// scope of an edit.
pub trait RecurringEditDecider {
    fn decide(&self) -> RecurringEditScope;
}

impl<F> RecurringEditDecider for F
where
    F: Fn() -> RecurringEditScope,
{
    fn decide(&self) -> RecurringEditScope {
        self()
    }
}

/// Asks `decider` for the scope of an edit and runs `series_action` when the
/// change applies to all subsequent occurrences.
///
/// Non-recurring payments never consult the decider and return `None`.
pub fn apply_recurring_edit<D, A>(
    is_recurring: bool,
    decider: &D,
    series_action: A,
) -> Option<RecurringEditScope>
where
    D: RecurringEditDecider + ?Sized,
    A: FnOnce(),
{
    if !is_recurring {
        return None;
    }
    let scope = decider.decide();
    if scope == RecurringEditScope::AllSubsequent {
        series_action();
    }
    Some(scope)
}
