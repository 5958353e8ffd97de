use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::SessionRecord;
use crate::schema::SESSION_COLUMNS;

/// Writes the records to a CSV file with the destination header row.
pub fn export_csv<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let file = File::create(path)?;
    let written = write_csv(file, records)?;
    debug!(path = %path.display(), rows = written, "exported CSV");
    Ok(())
}

/// Writes the records as CSV to `writer` and returns the number of data
/// rows written. Dates use the `YYYY-MM-DD` form.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(SESSION_COLUMNS.iter().map(|column| column.header()))?;

    let mut written = 0;
    for record in records {
        csv_writer.write_record(SESSION_COLUMNS.iter().map(|column| record.display(*column)))?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}
