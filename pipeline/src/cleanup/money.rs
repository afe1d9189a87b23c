use crate::{
    error::CleanupError,
    table::{Cell, InvoiceTable},
};

/// Parses a Brazilian formatted monetary amount, e.g. `"1.234,56"` or `"105,47-"`.
///
/// `.` separates thousands, `,` separates decimals, and a trailing `-` negates the amount.
/// Returns `None` for blank or unparseable text.
pub fn parse_monetary(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_suffix('-') {
        Some(rest) => (true, rest.trim_end()),
        None => (false, text),
    };
    if digits.is_empty() {
        return None;
    }

    let value: f64 = digits.replace('.', "").replace(',', ".").parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(if negative { -value } else { value })
}

/// Converts the text cells of `column` into numbers, in place. Cells that do not parse become
/// [Cell::Missing], and cells that are already numbers are left as they are.
pub fn normalize_monetary(table: &mut InvoiceTable, column: &str) -> Result<(), CleanupError> {
    let index = table
        .column_index(column)
        .ok_or_else(|| CleanupError::MissingColumn(column.to_string()))?;

    for record in table.records_mut() {
        let cell = &mut record[index];
        if let Cell::Text(text) = cell {
            *cell = match parse_monetary(text) {
                Some(value) => Cell::Number(value),
                None => {
                    if !text.trim().is_empty() {
                        log::debug!("Could not parse {text:?} as a monetary value.");
                    }
                    Cell::Missing
                }
            };
        }
    }

    Ok(())
}
