use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::Column;

/// Text form used for dates in terminal output and CSV exports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Spreadsheet cell as seen by the rest of the crate. Readers translate the
/// spreadsheet library's cell type into this so that the transform stays
/// independent of it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    /// Excel date serial (days since 1899-12-30, fraction is time of day).
    DateTime(f64),
    Bool(bool),
}

impl CellValue {
    /// Renders the cell the way it reads in a spreadsheet.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(value) => value.clone(),
            CellValue::Number(value) | CellValue::DateTime(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
        }
    }

    /// Returns `true` for empty cells and text cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

/// Value of the hours column. Finite numeric text is stored as a number;
/// anything else the source wrote is kept verbatim as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hours {
    Number(f64),
    Text(String),
}

impl Hours {
    /// Converts a cell into an hours value; blank cells have none.
    pub fn from_cell(cell: &CellValue) -> Option<Hours> {
        match cell {
            CellValue::Empty => None,
            CellValue::Number(value) | CellValue::DateTime(value) => Some(Hours::Number(*value)),
            CellValue::Bool(value) => Some(Hours::Text(value.to_string())),
            CellValue::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else if let Some(number) = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|number| number.is_finite())
                {
                    Some(Hours::Number(number))
                } else {
                    Some(Hours::Text(value.clone()))
                }
            }
        }
    }

    /// Numeric value, if the hours are a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Hours::Number(value) => Some(*value),
            Hours::Text(_) => None,
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            Hours::Number(value) => value.to_string(),
            Hours::Text(value) => value.clone(),
        }
    }
}

/// Raw cells of one data row of the source sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based row number in the source sheet, used in diagnostics.
    pub row_number: usize,
    pub date: CellValue,
    pub session_time: String,
    pub client: String,
    pub program_name: String,
    pub batch: String,
    pub session_name: String,
    pub mentor: String,
    pub vendor_name: String,
    pub hours_worked: CellValue,
    pub remarks: String,
}

impl SourceRow {
    /// Creates a row with every cell empty.
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            date: CellValue::Empty,
            session_time: String::new(),
            client: String::new(),
            program_name: String::new(),
            batch: String::new(),
            session_name: String::new(),
            mentor: String::new(),
            vendor_name: String::new(),
            hours_worked: CellValue::Empty,
            remarks: String::new(),
        }
    }
}

/// One scheduled session after normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// 1-based position in the sorted table; `None` until numbered.
    pub serial_number: Option<usize>,
    pub date: Option<NaiveDate>,
    pub day: Option<String>,
    pub session_time: String,
    pub client: String,
    pub program_name: String,
    pub batch: String,
    pub session_name: String,
    pub mentor: String,
    pub year: Option<i32>,
    pub month: Option<String>,
    pub vendor_name: String,
    pub hours_worked: Option<Hours>,
    pub remarks: String,
}

impl SessionRecord {
    /// Printed form of one column, empty when the value is null.
    pub fn display(&self, column: Column) -> String {
        match column {
            Column::SerialNumber => self
                .serial_number
                .map(|serial| serial.to_string())
                .unwrap_or_default(),
            Column::Date => self
                .date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Column::Day => self.day.clone().unwrap_or_default(),
            Column::SessionTime => self.session_time.clone(),
            Column::Client => self.client.clone(),
            Column::ProgramName => self.program_name.clone(),
            Column::Batch => self.batch.clone(),
            Column::SessionName => self.session_name.clone(),
            Column::Mentor => self.mentor.clone(),
            Column::Year => self.year.map(|year| year.to_string()).unwrap_or_default(),
            Column::Month => self.month.clone().unwrap_or_default(),
            Column::VendorName => self.vendor_name.clone(),
            Column::HoursWorked => self
                .hours_worked
                .as_ref()
                .map(Hours::display_text)
                .unwrap_or_default(),
            Column::Remarks => self.remarks.clone(),
        }
    }
}

/// Ordered sessions produced by one transform run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTable {
    pub records: Vec<SessionRecord>,
}

impl SessionTable {
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a SessionTable {
    type Item = &'a SessionRecord;
    type IntoIter = std::slice::Iter<'a, SessionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
