use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet, XlsxError};
use tempfile::Builder;
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::io::excel_read::{self, SheetSnapshot};
use crate::model::{CellValue, Hours, SessionRecord, SessionTable};
use crate::schema::{Column, SESSION_COLUMNS};
use crate::transform::dates;

/// Height applied to every row of the written section.
pub const ROW_HEIGHT: f64 = 20.0;
/// Solid fill of the header row (orange).
pub const HEADER_FILL: u32 = 0xFFA500;
/// Extra characters added to the widest cell of a column.
pub const WIDTH_PADDING: usize = 2;

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes `table` into the `section` sheet of the workbook at `path`.
///
/// Other sheets of an existing workbook are carried over by value and keep
/// their position; an existing sheet with the same name is replaced as a
/// whole. The workbook is assembled in memory and moved over `path` only
/// once it is complete, so a failed write leaves the previous file intact.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %path.display(), section = %section, rows = table.len())
)]
pub fn write_section(path: &Path, section: &str, table: &SessionTable) -> Result<()> {
    let existing = if path.exists() {
        excel_read::read_sheets(path).map_err(|error| destination_error(path, error))?
    } else {
        Vec::new()
    };
    debug!(sheets = existing.len(), "loaded existing destination sheets");

    let mut workbook = assemble_workbook(&existing, section, table)
        .map_err(|error| destination_error(path, error))?;
    let buffer = workbook
        .save_to_buffer()
        .map_err(|error| destination_error(path, error))?;
    replace_file(path, &buffer).map_err(|error| destination_error(path, error))?;

    info!(section, rows = table.len(), "section written");
    Ok(())
}

fn assemble_workbook(
    existing: &[SheetSnapshot],
    section: &str,
    table: &SessionTable,
) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let mut written = false;

    for sheet in existing {
        if sheet.name.to_lowercase() == section.to_lowercase() {
            write_session_sheet(workbook.add_worksheet(), section, table)?;
            written = true;
        } else {
            copy_sheet(workbook.add_worksheet(), sheet)?;
        }
    }
    if !written {
        write_session_sheet(workbook.add_worksheet(), section, table)?;
    }

    Ok(workbook)
}

fn write_session_sheet(
    worksheet: &mut Worksheet,
    section: &str,
    table: &SessionTable,
) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(section)?;

    let header_format = Format::new()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_pattern(FormatPattern::Solid);
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    for (col_idx, column) in SESSION_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, column.header(), &header_format)?;
    }
    for (row_idx, record) in table.iter().enumerate() {
        write_record(worksheet, (row_idx + 1) as u32, record, &date_format)?;
    }

    for (col_idx, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, width as f64)?;
    }
    for row_idx in 0..=table.len() {
        worksheet.set_row_height(row_idx as u32, ROW_HEIGHT)?;
    }
    Ok(())
}

fn write_record(
    worksheet: &mut Worksheet,
    row: u32,
    record: &SessionRecord,
    date_format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col_idx, column) in SESSION_COLUMNS.iter().enumerate() {
        let col = col_idx as u16;
        match column {
            Column::SerialNumber => {
                if let Some(serial) = record.serial_number {
                    worksheet.write_number(row, col, serial as f64)?;
                }
            }
            Column::Date => match record.date.and_then(dates::to_excel_serial) {
                Some(serial) => {
                    worksheet.write_number_with_format(row, col, serial, date_format)?;
                }
                None => write_text(worksheet, row, col, &record.display(*column))?,
            },
            Column::Year => {
                if let Some(year) = record.year {
                    worksheet.write_number(row, col, f64::from(year))?;
                }
            }
            Column::HoursWorked => match &record.hours_worked {
                Some(Hours::Number(hours)) => {
                    worksheet.write_number(row, col, *hours)?;
                }
                Some(Hours::Text(text)) => write_text(worksheet, row, col, text)?,
                None => {}
            },
            _ => write_text(worksheet, row, col, &record.display(*column))?,
        }
    }
    Ok(())
}

fn write_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
) -> std::result::Result<(), XlsxError> {
    if !text.is_empty() {
        worksheet.write_string(row, col, text)?;
    }
    Ok(())
}

/// Width of each column: the longest printed cell, header included, plus
/// [`WIDTH_PADDING`].
pub fn column_widths(table: &SessionTable) -> Vec<usize> {
    SESSION_COLUMNS
        .iter()
        .map(|column| {
            let widest = table
                .iter()
                .map(|record| record.display(*column).chars().count())
                .chain(std::iter::once(column.header().chars().count()))
                .max()
                .unwrap_or(0);
            widest + WIDTH_PADDING
        })
        .collect()
}

fn copy_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetSnapshot,
) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(&sheet.name)?;

    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
    let (row_origin, col_origin) = sheet.origin;

    for (row_idx, cells) in sheet.rows.iter().enumerate() {
        let row = row_origin + row_idx as u32;
        for (col_idx, cell) in cells.iter().enumerate() {
            let col = (col_origin as usize + col_idx) as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(value) => {
                    worksheet.write_string(row, col, value)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row, col, *value)?;
                }
                CellValue::DateTime(value) => {
                    let format = if value.fract() == 0.0 {
                        &date_format
                    } else {
                        &datetime_format
                    };
                    worksheet.write_number_with_format(row, col, *value, format)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row, col, *value)?;
                }
            }
        }
    }
    Ok(())
}

/// Writes `bytes` to a temporary file beside `path` and renames it over
/// `path`.
fn replace_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = Builder::new()
        .prefix(".session-sheets-")
        .suffix(".xlsx")
        .tempfile_in(directory)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|error| error.error)?;
    Ok(())
}

fn destination_error(path: &Path, error: impl std::fmt::Display) -> ToolError {
    ToolError::DestinationWrite {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}
