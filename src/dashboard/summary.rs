use serde::Serialize;

use crate::model::SessionRecord;

/// Aggregates over a set of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub sessions: usize,
    /// Sum of the numeric hours, rounded to two decimals.
    pub total_hours: f64,
    /// Sessions whose hours are missing or not a number.
    pub sessions_without_hours: usize,
}

impl Summary {
    pub fn of<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut summary = Summary::default();
        for record in records {
            summary.sessions += 1;
            match record.hours_worked.as_ref().and_then(|hours| hours.as_number()) {
                Some(hours) => summary.total_hours += hours,
                None => summary.sessions_without_hours += 1,
            }
        }
        summary.total_hours = (summary.total_hours * 100.0).round() / 100.0;
        summary
    }
}
