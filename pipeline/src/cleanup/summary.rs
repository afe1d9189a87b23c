use crate::{
    error::CleanupError,
    table::{Cell, InvoiceTable, Table},
};

pub const DEFAULT_SUMMARY_FIELDS: [&str; 3] = ["MÊS/ANO", "VENCIMENTO", "TOTAL A PAGAR"];

/// Fields copied from the invoice summary table (billing month, due date, total) onto every
/// record.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryFields {
    /// Column names for the fields, in the order they appear in the summary row.
    pub names: Vec<String>,
    /// Index of the summary table row holding the values.
    pub row: usize,
}

/// Appends one column per summary field to `table`, each holding the field's value from
/// `summary` on every record.
pub fn attach_summary_fields(
    table: &mut InvoiceTable,
    summary: &Table,
    fields: &SummaryFields,
) -> Result<(), CleanupError> {
    let values = (0..fields.names.len())
        .map(|column| {
            summary
                .get(fields.row)
                .and_then(|row| row.get(column))
                .cloned()
                .ok_or(CleanupError::SummaryFieldMissing {
                    row: fields.row,
                    column,
                })
        })
        .collect::<Result<Vec<String>, _>>()?;

    for (name, value) in fields.names.iter().zip(values) {
        let index = table.ensure_column(name);
        for record in table.records_mut() {
            record[index] = Cell::Text(value.clone());
        }
    }

    Ok(())
}
