use crate::{table::InvoiceTable, textutil::contains_ignore_case};

/// Marks the end of the itemised billing detail on Coelce invoices.
pub const DEFAULT_SUBTOTAL_MARKER: &str = "Subtotal Faturamento";

/// Drops the first record with a cell containing `marker` (ignoring case) and every record after
/// it. Returns `true` if such a record was found.
pub fn trim_at_subtotal(table: &mut InvoiceTable, marker: &str) -> bool {
    let found = table.records().iter().position(|record| {
        record
            .iter()
            .filter_map(|cell| cell.as_text())
            .any(|text| contains_ignore_case(text, marker))
    });

    match found {
        Some(index) => {
            log::debug!(
                "Dropping {} record(s) from the subtotal onwards.",
                table.records().len() - index
            );
            table.records_mut().truncate(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::table::Row;

    fn table(labels: &[&str]) -> InvoiceTable {
        InvoiceTable::from_text_rows(
            vec!["Itens_de_Fatura".into(), "Valor_(R$)".into()],
            labels.iter().map(|label| Row::from([*label, "1,00"])),
        )
    }

    #[gtest]
    fn drops_marker_row_and_everything_after() {
        let mut t = table(&["A", "B", "Subtotal Faturamento total", "C"]);

        expect_true!(trim_at_subtotal(&mut t, DEFAULT_SUBTOTAL_MARKER));
        expect_eq!(t, table(&["A", "B"]));
    }

    #[gtest]
    fn matches_ignoring_case() {
        let mut t = table(&["A", "SUBTOTAL FATURAMENTO", "C"]);

        trim_at_subtotal(&mut t, DEFAULT_SUBTOTAL_MARKER);

        expect_eq!(t, table(&["A"]));
    }

    #[gtest]
    fn leaves_table_without_marker_unchanged() {
        let mut t = table(&["A", "B", "C"]);

        expect_false!(trim_at_subtotal(&mut t, DEFAULT_SUBTOTAL_MARKER));
        expect_eq!(t, table(&["A", "B", "C"]));
    }

    #[gtest]
    fn marker_in_first_row_empties_table() {
        let mut t = table(&["Subtotal Faturamento", "A"]);

        trim_at_subtotal(&mut t, DEFAULT_SUBTOTAL_MARKER);

        expect_true!(t.records().is_empty());
    }
}
