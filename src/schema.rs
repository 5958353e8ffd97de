//! The fixed column set shared by the source reader, the transform, the
//! destination writer and the dashboard.
//!
//! Header cells are matched after normalisation (lower-cased, with
//! whitespace and punctuation removed), so `Session Time`,
//! `SessionTimeRange` and `session_time_range` all resolve to
//! [`Column::SessionTime`].

use std::collections::HashMap;

/// One column of the session schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    SerialNumber,
    Date,
    Day,
    SessionTime,
    Client,
    ProgramName,
    Batch,
    SessionName,
    Mentor,
    Year,
    Month,
    VendorName,
    HoursWorked,
    Remarks,
}

/// Every column in destination order. The serial number comes first.
pub const SESSION_COLUMNS: [Column; 14] = [
    Column::SerialNumber,
    Column::Date,
    Column::Day,
    Column::SessionTime,
    Column::Client,
    Column::ProgramName,
    Column::Batch,
    Column::SessionName,
    Column::Mentor,
    Column::Year,
    Column::Month,
    Column::VendorName,
    Column::HoursWorked,
    Column::Remarks,
];

/// Columns a source sheet must carry. The serial number is always
/// recomputed, so it is not expected in the source.
pub const SOURCE_COLUMNS: [Column; 13] = [
    Column::Date,
    Column::Day,
    Column::SessionTime,
    Column::Client,
    Column::ProgramName,
    Column::Batch,
    Column::SessionName,
    Column::Mentor,
    Column::Year,
    Column::Month,
    Column::VendorName,
    Column::HoursWorked,
    Column::Remarks,
];

impl Column {
    /// Header label written to the destination section.
    pub fn header(self) -> &'static str {
        match self {
            Column::SerialNumber => "S. No",
            Column::Date => "Date",
            Column::Day => "Day",
            Column::SessionTime => "Session Time",
            Column::Client => "Client",
            Column::ProgramName => "Program Name",
            Column::Batch => "Batch",
            Column::SessionName => "Session Name",
            Column::Mentor => "Mentor / Faculty",
            Column::Year => "Year",
            Column::Month => "Month",
            Column::VendorName => "Vendor Name",
            Column::HoursWorked => "No.of Hours",
            Column::Remarks => "Remarks",
        }
    }

    /// Alternative labels accepted when reading a header row.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::SerialNumber => &["S.No", "Serial Number", "SerialNumber"],
            Column::SessionTime => &["SessionTimeRange", "Session Time Range"],
            Column::ProgramName => &["Program"],
            Column::Mentor => &["Mentor", "Faculty"],
            Column::VendorName => &["Vendor"],
            Column::HoursWorked => &["HoursWorked", "Hours Worked", "Hours"],
            _ => &[],
        }
    }

    fn matches(self, normalized: &str) -> bool {
        normalize_header(self.header()) == normalized
            || self
                .aliases()
                .iter()
                .any(|alias| normalize_header(alias) == normalized)
    }

    /// Resolves a header cell to a column, if it names one.
    pub fn from_header(label: &str) -> Option<Column> {
        let normalized = normalize_header(label);
        if normalized.is_empty() {
            return None;
        }
        SESSION_COLUMNS
            .into_iter()
            .find(|column| column.matches(&normalized))
    }
}

/// Position of each schema column inside a concrete header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: HashMap<Column, usize>,
}

impl ColumnMap {
    /// Maps the header row, keeping the first occurrence of a column when a
    /// label is repeated.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions = HashMap::new();
        for (index, label) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(label.as_ref()) {
                positions.entry(column).or_insert(index);
            }
        }
        Self { positions }
    }

    /// Index of `column` in the header row.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    /// Header labels of the `required` columns that were not found.
    pub fn missing(&self, required: &[Column]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.positions.contains_key(column))
            .map(|column| column.header().to_string())
            .collect()
    }
}

fn normalize_header(label: &str) -> String {
    label
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
