use clap::Args;
use pennyfox_backup::{Clock, SystemClock};
use pennyfox_domain::{RecurrenceGranularity, RecurrenceRule};

use super::{output::Formatter, parse_date};
use crate::errors::Result;

#[derive(Debug, Args)]
pub struct DueArgs {
    /// Cadence: daily, weekly, biweekly, monthly, bimonthly, quarterly,
    /// biannually or yearly.
    pub granularity: String,

    /// Date the payment last fired or was set up (YYYY-MM-DD).
    pub anchor: String,

    /// Evaluate as of this date instead of today.
    #[arg(long)]
    pub today: Option<String>,

    /// Last date the schedule is active.
    #[arg(long)]
    pub end: Option<String>,
}

pub(super) fn run(args: &DueArgs, formatter: &Formatter) -> Result<()> {
    let granularity: RecurrenceGranularity = args.granularity.parse()?;
    let mut rule = RecurrenceRule::new(granularity, parse_date(&args.anchor)?);
    if let Some(end) = &args.end {
        rule = rule.with_end_date(parse_date(end)?);
    }
    let today = match &args.today {
        Some(value) => parse_date(value)?,
        None => SystemClock.today(),
    };

    if rule.is_expired(today) {
        formatter.print_warning(format!("{granularity} payment ended, not due on {today}"));
    } else if rule.is_due(today) {
        formatter.print_success(format!("{granularity} payment is due on {today}"));
    } else {
        println!("{granularity} payment is not due on {today}");
    }

    let mut rows = vec![
        ("Anchor", rule.anchor_date.to_string()),
        ("Next due", rule.next_due_date().to_string()),
    ];
    if let Some(end) = rule.end_date {
        rows.push(("Ends", end.to_string()));
    }
    formatter.print_two_column(&rows);
    Ok(())
}
