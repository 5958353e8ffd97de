use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::model::CellValue;

/// Largest serial Excel accepts (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const ISO_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const ISO_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];
const NAMED_MONTH_FORMATS: [&str; 7] = [
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%A, %d %B %Y",
];
const DAY_FIRST_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const MONTH_FIRST_FORMATS: [&str; 3] = ["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Converts an Excel date serial into a calendar date, dropping the time of
/// day. Serials outside Excel's calendar yield `None`.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    excel_epoch().checked_add_days(Days::new(serial.floor() as u64))
}

/// Converts a calendar date into the Excel serial of its midnight. Dates
/// outside Excel's calendar have no serial.
pub fn to_excel_serial(date: NaiveDate) -> Option<f64> {
    let serial = date.signed_duration_since(excel_epoch()).num_days() as f64;
    (1.0..=MAX_EXCEL_SERIAL).contains(&serial).then_some(serial)
}

/// Parses a date cell. Numeric cells are read as Excel serials; text is
/// tried against ISO, named-month and numeric layouts. Ambiguous numeric
/// layouts such as `05/01/2024` are read day-first when `day_first` is set
/// and month-first otherwise.
pub fn parse_date(cell: &CellValue, day_first: bool) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(serial) | CellValue::Number(serial) => from_excel_serial(*serial),
        CellValue::Text(text) => parse_date_text(text.trim(), day_first),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

fn parse_date_text(text: &str, day_first: bool) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    let (preferred, fallback) = if day_first {
        (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS)
    } else {
        (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS)
    };

    ISO_DATE_FORMATS
        .iter()
        .chain(NAMED_MONTH_FORMATS.iter())
        .chain(preferred.iter())
        .chain(fallback.iter())
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            ISO_DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// Full weekday name, `Monday` through `Sunday`.
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Full month name, `January` through `December`.
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

pub fn year(date: NaiveDate) -> i32 {
    date.year()
}
