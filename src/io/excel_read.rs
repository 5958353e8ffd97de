use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{CellValue, Hours, SessionRecord, SessionTable, SourceRow};
use crate::schema::{Column, ColumnMap, SESSION_COLUMNS, SOURCE_COLUMNS};
use crate::transform::dates;

/// Cell values of one sheet, anchored at the sheet position of its first
/// used cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub name: String,
    /// Zero-based (row, column) of the top-left used cell.
    pub origin: (u32, u32),
    pub rows: Vec<Vec<CellValue>>,
}

/// Reads the data rows of the source sheet. The first sheet is used unless
/// `sheet` names another. Fails before returning any row when the header
/// lacks one of the required columns.
pub fn read_source(path: &Path, sheet: Option<&str>) -> Result<Vec<SourceRow>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ToolError::EmptyWorkbook {
                path: path.to_path_buf(),
            })?,
    };
    let range = read_required_sheet(&mut workbook, path, &sheet_name)?;
    let (columns, first_data_row) = resolve_header(&range, path, &SOURCE_COLUMNS)?;

    let mut rows = Vec::new();
    for (offset, cells) in range.rows().enumerate().skip(1) {
        if cells.iter().all(|cell| to_cell_value(Some(cell)).is_blank()) {
            continue;
        }
        let text = |column| cell_to_string(column_cell(cells, &columns, column));
        rows.push(SourceRow {
            row_number: first_data_row + offset - 1,
            date: to_cell_value(column_cell(cells, &columns, Column::Date)),
            session_time: text(Column::SessionTime),
            client: text(Column::Client),
            program_name: text(Column::ProgramName),
            batch: text(Column::Batch),
            session_name: text(Column::SessionName),
            mentor: text(Column::Mentor),
            vendor_name: text(Column::VendorName),
            hours_worked: to_cell_value(column_cell(cells, &columns, Column::HoursWorked)),
            remarks: text(Column::Remarks),
        });
    }

    debug!(sheet = %sheet_name, rows = rows.len(), "read source rows");
    Ok(rows)
}

/// Reads a section previously written by
/// [`write_section`](crate::io::excel_write::write_section) back into a
/// session table, keeping row order.
pub fn read_section(path: &Path, section: &str) -> Result<SessionTable> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, path, section)?;
    let (columns, _) = resolve_header(&range, path, &SESSION_COLUMNS)?;

    let mut records = Vec::new();
    for cells in range.rows().skip(1) {
        if cells.iter().all(|cell| to_cell_value(Some(cell)).is_blank()) {
            continue;
        }
        let cell = |column| to_cell_value(column_cell(cells, &columns, column));
        let text = |column| cell_to_string(column_cell(cells, &columns, column));
        records.push(SessionRecord {
            serial_number: cell_to_integer(&cell(Column::SerialNumber))
                .and_then(|serial| usize::try_from(serial).ok()),
            date: dates::parse_date(&cell(Column::Date), false),
            day: non_empty(text(Column::Day)),
            session_time: text(Column::SessionTime),
            client: text(Column::Client),
            program_name: text(Column::ProgramName),
            batch: text(Column::Batch),
            session_name: text(Column::SessionName),
            mentor: text(Column::Mentor),
            year: cell_to_integer(&cell(Column::Year)).and_then(|year| i32::try_from(year).ok()),
            month: non_empty(text(Column::Month)),
            vendor_name: text(Column::VendorName),
            hours_worked: Hours::from_cell(&cell(Column::HoursWorked)),
            remarks: text(Column::Remarks),
        });
    }

    debug!(section, records = records.len(), "read section");
    Ok(SessionTable::new(records))
}

/// Captures the cell values of every sheet in workbook order.
pub fn read_sheets(path: &Path) -> Result<Vec<SheetSnapshot>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = read_required_sheet(&mut workbook, path, &name)?;
        let origin = range.start().unwrap_or((0, 0));
        let rows = range
            .rows()
            .map(|cells| cells.iter().map(|cell| to_cell_value(Some(cell))).collect())
            .collect();
        sheets.push(SheetSnapshot { name, origin, rows });
    }
    Ok(sheets)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    path: &Path,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::MissingSection {
            path: path.to_path_buf(),
            section: name.to_string(),
        })?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// Maps the header row and returns it with the 1-based sheet row number of
/// the first data row.
fn resolve_header(
    range: &Range<DataType>,
    path: &Path,
    required: &[Column],
) -> Result<(ColumnMap, usize)> {
    let headers: Vec<String> = match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };

    let columns = ColumnMap::from_headers(&headers);
    let missing = columns.missing(required);
    if !missing.is_empty() {
        return Err(ToolError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let header_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    Ok((columns, header_row + 2))
}

fn column_cell<'a>(
    cells: &'a [DataType],
    columns: &ColumnMap,
    column: Column,
) -> Option<&'a DataType> {
    columns.position(column).and_then(|index| cells.get(index))
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn to_cell_value(cell: Option<&DataType>) -> CellValue {
    match cell {
        Some(DataType::String(value)) => CellValue::Text(value.clone()),
        Some(DataType::Float(value)) => CellValue::Number(*value),
        Some(DataType::Int(value)) => CellValue::Number(*value as f64),
        Some(DataType::Bool(value)) => CellValue::Bool(*value),
        Some(DataType::DateTime(value)) => CellValue::DateTime(*value),
        Some(DataType::Empty) | None => CellValue::Empty,
        Some(other) => CellValue::Text(other.to_string()),
    }
}

fn cell_to_integer(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(value) if value.fract() == 0.0 => Some(*value as i64),
        CellValue::Text(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
