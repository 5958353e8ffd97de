//! Turns raw source rows into the numbered, sorted session table.
//!
//! Every step works on one row at a time and never fails: a date or time
//! range that cannot be read leaves the derived fields empty and records a
//! [`RowWarning`] so the caller can report it.

pub mod dates;
pub mod hours;

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::model::{Hours, SessionRecord, SessionTable, SourceRow};

pub use hours::{calculate_hours, normalize_time_range};

/// Knobs that change how source values are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Read ambiguous numeric dates such as `05/01/2024` as day first.
    pub day_first: bool,
}

/// A problem confined to a single source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// 1-based row number in the source sheet.
    pub row: usize,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    /// The date cell could not be read; day, month and year are left empty.
    InvalidDate { value: String },
    /// Hours had to be derived but the time range could not be read.
    InvalidTimeRange { value: String },
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::InvalidDate { value } => {
                write!(f, "row {}: unreadable date '{value}'", self.row)
            }
            WarningKind::InvalidTimeRange { value } => {
                write!(f, "row {}: cannot derive hours from '{value}'", self.row)
            }
        }
    }
}

/// Session table plus the per-row warnings raised while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    pub table: SessionTable,
    pub warnings: Vec<RowWarning>,
}

/// Normalises, sorts and numbers the source rows.
#[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
pub fn transform(rows: Vec<SourceRow>, options: &TransformOptions) -> TransformOutput {
    let mut warnings = Vec::new();
    let mut records: Vec<SessionRecord> = rows
        .into_iter()
        .map(|row| {
            let (record, row_warnings) = normalize_row(row, options);
            warnings.extend(row_warnings);
            record
        })
        .collect();

    sort_records(&mut records);
    assign_serial_numbers(&mut records);

    for warning in &warnings {
        warn!(row = warning.row, "{warning}");
    }
    debug!(
        records = records.len(),
        warnings = warnings.len(),
        "transform finished"
    );

    TransformOutput {
        table: SessionTable::new(records),
        warnings,
    }
}

/// Builds the record for a single source row. The serial number is left
/// unassigned.
pub fn normalize_row(
    row: SourceRow,
    options: &TransformOptions,
) -> (SessionRecord, Vec<RowWarning>) {
    let mut warnings = Vec::new();

    let date = dates::parse_date(&row.date, options.day_first);
    if date.is_none() {
        warnings.push(RowWarning {
            row: row.row_number,
            kind: WarningKind::InvalidDate {
                value: row.date.display_text(),
            },
        });
    }

    let session_time = normalize_time_range(&row.session_time);
    let source_hours = Hours::from_cell(&row.hours_worked);
    let hours_worked = if needs_derived_hours(source_hours.as_ref()) {
        let derived = calculate_hours(&session_time);
        if derived.is_none() {
            warnings.push(RowWarning {
                row: row.row_number,
                kind: WarningKind::InvalidTimeRange {
                    value: session_time.clone(),
                },
            });
        }
        derived.map(Hours::Number)
    } else {
        source_hours
    };

    let record = SessionRecord {
        serial_number: None,
        date,
        day: date.map(dates::weekday_name),
        session_time,
        client: row.client,
        program_name: row.program_name,
        batch: row.batch,
        session_name: row.session_name,
        mentor: row.mentor,
        year: date.map(dates::year),
        month: date.map(dates::month_name),
        vendor_name: row.vendor_name,
        hours_worked,
        remarks: row.remarks,
    };
    (record, warnings)
}

/// Missing, zero and blank hours are replaced by the derived duration.
fn needs_derived_hours(hours: Option<&Hours>) -> bool {
    match hours {
        None => true,
        Some(Hours::Number(value)) => *value == 0.0,
        Some(Hours::Text(text)) => text.trim().is_empty(),
    }
}

/// Stable sort by date then time range text. Rows without a date come first.
pub fn sort_records(records: &mut [SessionRecord]) {
    records.sort_by(|lhs, rhs| {
        lhs.date
            .cmp(&rhs.date)
            .then_with(|| lhs.session_time.cmp(&rhs.session_time))
    });
}

/// Numbers the records 1..=N in their current order.
pub fn assign_serial_numbers(records: &mut [SessionRecord]) {
    for (index, record) in records.iter_mut().enumerate() {
        record.serial_number = Some(index + 1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::CellValue;

    fn row(number: usize, date: &str, time: &str, hours: CellValue) -> SourceRow {
        SourceRow {
            date: CellValue::Text(date.to_string()),
            session_time: time.to_string(),
            hours_worked: hours,
            mentor: format!("mentor-{number}"),
            ..SourceRow::new(number)
        }
    }

    #[test]
    fn zero_hours_are_derived_and_explicit_hours_are_kept() {
        let rows = vec![
            row(2, "2024-01-05", "2:00 PM - 3:00 PM", CellValue::Number(0.0)),
            row(3, "2024-01-06", "2:00 PM - 3:00 PM", CellValue::Number(5.0)),
            row(4, "2024-01-07", "9:00 AM to 10:30 AM", CellValue::Text(" ".into())),
            row(5, "2024-01-08", "9:00 AM - 10:00 AM", CellValue::Text("n/a".into())),
        ];
        let output = transform(rows, &TransformOptions::default());
        let hours: Vec<_> = output
            .table
            .iter()
            .map(|record| record.hours_worked.clone())
            .collect();

        assert_eq!(
            hours,
            vec![
                Some(Hours::Number(1.0)),
                Some(Hours::Number(5.0)),
                Some(Hours::Number(1.5)),
                Some(Hours::Text("n/a".into())),
            ]
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn underivable_hours_stay_empty_with_a_warning() {
        let rows = vec![row(7, "2024-01-05", "morning", CellValue::Empty)];
        let output = transform(rows, &TransformOptions::default());

        assert_eq!(output.table.records[0].hours_worked, None);
        assert_eq!(
            output.warnings,
            vec![RowWarning {
                row: 7,
                kind: WarningKind::InvalidTimeRange {
                    value: "morning".into()
                },
            }]
        );
    }

    #[test]
    fn calendar_fields_are_always_rederived() {
        let (record, warnings) = normalize_row(
            row(2, "2024-01-05", "9:00 AM - 10:00 AM", CellValue::Number(1.0)),
            &TransformOptions::default(),
        );
        assert!(warnings.is_empty());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(record.day.as_deref(), Some("Friday"));
        assert_eq!(record.month.as_deref(), Some("January"));
        assert_eq!(record.year, Some(2024));

        let (record, warnings) = normalize_row(
            row(3, "not a date", "9:00 AM - 10:00 AM", CellValue::Number(1.0)),
            &TransformOptions::default(),
        );
        assert_eq!(record.date, None);
        assert_eq!(record.day, None);
        assert_eq!(record.month, None);
        assert_eq!(record.year, None);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].to_string(), "row 3: unreadable date 'not a date'");
    }

    #[test]
    fn sort_is_stable_with_undated_rows_first() {
        let rows = vec![
            row(2, "2024-01-06", "9:00 AM - 10:00 AM", CellValue::Number(1.0)),
            row(3, "2024-01-05", "2:00 PM - 3:00 PM", CellValue::Number(1.0)),
            row(4, "2024-01-05", "10:00 AM - 11:00 AM", CellValue::Number(1.0)),
            row(5, "2024-01-05", "2:00 PM - 3:00 PM", CellValue::Number(1.0)),
            row(6, "", "9:00 AM - 10:00 AM", CellValue::Number(1.0)),
        ];
        let output = transform(rows, &TransformOptions::default());
        let order: Vec<_> = output
            .table
            .iter()
            .map(|record| record.mentor.as_str())
            .collect();

        assert_eq!(
            order,
            vec!["mentor-6", "mentor-4", "mentor-3", "mentor-5", "mentor-2"]
        );
    }

    #[test]
    fn serial_numbers_cover_one_to_n() {
        for count in [0usize, 1, 5] {
            let rows = (0..count)
                .map(|i| row(i + 2, "2024-02-01", "9:00 AM - 10:00 AM", CellValue::Number(1.0)))
                .collect();
            let output = transform(rows, &TransformOptions::default());
            let serials: Vec<_> = output
                .table
                .iter()
                .map(|record| record.serial_number)
                .collect();
            let expected: Vec<_> = (1..=count).map(Some).collect();
            assert_eq!(serials, expected);
        }
    }
}
