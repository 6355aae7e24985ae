//! pennyfox-domain
//!
//! Pure recurrence types and date arithmetic for scheduled payments.
//! No I/O, no storage, no presentation concerns.

pub mod calendar;
pub mod edit;
pub mod error;
pub mod recurrence;

pub use calendar::{days_in_month, months_between, shift_months};
pub use edit::{apply_recurring_edit, RecurringEditDecider, RecurringEditScope};
pub use error::RecurrenceError;
pub use recurrence::{due_rules, RecurrenceGranularity, RecurrenceRule};
