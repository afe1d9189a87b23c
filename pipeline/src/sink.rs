//! Writes an [InvoiceTable] as semicolon delimited CSV.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use crate::table::{Cell, InvoiceTable};

/// Writes `table` to a CSV file at `path`, creating its parent directories as needed.
///
/// The file is replaced atomically, so an interrupted write leaves any previous file intact.
pub fn write_csv(table: &InvoiceTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {parent:?}"))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("opening output file {path:?}"))?;
    write_csv_to(table, &mut file)?;
    file.commit()
        .with_context(|| format!("committing output file {path:?}"))?;

    Ok(())
}

/// Writes `table` as CSV to `writer`: a header row followed by one row per record, with no index
/// column.
pub fn write_csv_to<W: Write>(table: &InvoiceTable, writer: W) -> Result<()> {
    let mut output = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    output
        .write_record(table.columns())
        .context("writing header row")?;
    for (record_index, record) in table.records().iter().enumerate() {
        output
            .write_record(record.iter().map(Cell::to_field))
            .with_context(|| format!("writing record index {record_index}"))?;
    }

    // Check for error rather than implicitly flushing and ignoring.
    output.flush().context("flushing CSV output")?;

    Ok(())
}
