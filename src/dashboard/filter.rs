use serde::Serialize;

use crate::model::{SessionRecord, SessionTable};

/// Row selection by month, mentor, program, day and client. An empty
/// criterion accepts every row; criteria are combined with AND. Values are
/// compared trimmed and without regard to case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionFilter {
    pub months: Vec<String>,
    pub mentors: Vec<String>,
    pub programs: Vec<String>,
    pub days: Vec<String>,
    pub clients: Vec<String>,
}

impl SessionFilter {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
            && self.mentors.is_empty()
            && self.programs.is_empty()
            && self.days.is_empty()
            && self.clients.is_empty()
    }

    pub fn matches(&self, record: &SessionRecord) -> bool {
        accepts(&self.months, record.month.as_deref().unwrap_or_default())
            && accepts(&self.mentors, &record.mentor)
            && accepts(&self.programs, &record.program_name)
            && accepts(&self.days, record.day.as_deref().unwrap_or_default())
            && accepts(&self.clients, &record.client)
    }

    /// Matching records in table order.
    pub fn apply<'a>(&self, table: &'a SessionTable) -> Vec<&'a SessionRecord> {
        table.iter().filter(|record| self.matches(record)).collect()
    }
}

fn accepts(allowed: &[String], value: &str) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let value = value.trim().to_lowercase();
    allowed
        .iter()
        .any(|candidate| candidate.trim().to_lowercase() == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::sample_table;

    #[test]
    fn empty_filter_keeps_everything() {
        let table = sample_table();
        let filter = SessionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&table).len(), table.len());
    }

    #[test]
    fn criteria_combine_and_ignore_case() {
        let table = sample_table();
        let filter = SessionFilter {
            months: vec!["january".into()],
            mentors: vec![" ARYA ".into(), "Dev".into()],
            ..SessionFilter::default()
        };
        let serials: Vec<_> = filter
            .apply(&table)
            .into_iter()
            .filter_map(|record| record.serial_number)
            .collect();
        assert_eq!(serials, vec![1, 2, 3]);

        let by_client = SessionFilter {
            clients: vec!["Globex".into()],
            days: vec!["Friday".into()],
            ..SessionFilter::default()
        };
        let serials: Vec<_> = by_client
            .apply(&table)
            .into_iter()
            .filter_map(|record| record.serial_number)
            .collect();
        assert_eq!(serials, vec![3, 6]);
    }

    #[test]
    fn rows_without_a_month_fail_a_month_criterion() {
        let table = sample_table();
        let filter = SessionFilter {
            months: vec!["February".into()],
            ..SessionFilter::default()
        };
        let serials: Vec<_> = filter
            .apply(&table)
            .into_iter()
            .filter_map(|record| record.serial_number)
            .collect();
        assert_eq!(serials, vec![4, 6]);
    }
}
