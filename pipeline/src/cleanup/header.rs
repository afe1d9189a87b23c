use crate::{
    error::CleanupError,
    table::{InvoiceTable, Row, Table},
    textutil::contains_ignore_case,
};

/// Column names of the itemised billing table on Coelce invoices, used when the header cannot be
/// read from the table itself.
pub const DEFAULT_EXPECTED_HEADER: [&str; 10] = [
    "Itens_de_Fatura",
    "Unid",
    "Quant",
    "Preço_unit_(R$)_com_tributos",
    "Valor_(R$)",
    "PIS/COFINS",
    "Base_Calc_ICMS_(R$)",
    "Alíquota_ICMS",
    "ICMS",
    "Tarifa_unit_(R$)",
];

/// Rows containing any of these are leftovers of the invoice's own header layout.
pub const DEFAULT_NOISE_PATTERNS: [&str; 3] = [";;;", "com tributos", "ICMS"];

/// How to find and name the columns of an extracted table.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderRules {
    /// Header to use when the one found in the table is not recognised.
    pub expected_header: Vec<String>,
    /// A found header is only recognised if it contains this column.
    pub required_column: String,
    /// Case-insensitive substrings marking rows to drop.
    pub noise_patterns: Vec<String>,
}

/// Promotes the first fully populated row of `table` to the header and drops everything above
/// it, along with blank rows and noise rows.
///
/// Rows are treated as padded to the width of the grid, so a fully populated row has a non-blank
/// cell in every column that holds a value in any row.
pub fn normalize_header(table: Table, rules: &HeaderRules) -> Result<InvoiceTable, CleanupError> {
    let mut rows: Vec<Row> = table.0.into_iter().filter(|row| !row.is_blank()).collect();
    let grid_width = rows.iter().map(Row::filled_len).max().unwrap_or(0);

    let header_index = rows
        .iter()
        .position(|row| row.is_populated_to(grid_width))
        .ok_or(CleanupError::NoHeaderRow)?;
    let body = rows.split_off(header_index + 1);
    let found_header: Vec<String> = rows
        .pop()
        .ok_or(CleanupError::NoHeaderRow)?
        .iter()
        .take(grid_width)
        .map(|cell| header_name(cell))
        .collect();

    let columns = if is_recognised(&found_header, rules) {
        log::debug!("Using header found in table: {found_header:?}.");
        found_header
    } else {
        log::debug!("Header {found_header:?} not recognised, using the expected header.");
        rules.expected_header.clone()
    };

    let width = columns.len();
    let mut kept = Vec::with_capacity(body.len());
    for mut row in body {
        if is_noise(&row, &rules.noise_patterns) {
            continue;
        }
        while row.len() > width && row.last().is_some_and(|cell| cell.trim().is_empty()) {
            row.pop();
        }
        if row.len() > width {
            return Err(CleanupError::ColumnCountMismatch {
                expected: width,
                found: row.len(),
            });
        }
        kept.push(row);
    }

    Ok(InvoiceTable::from_text_rows(columns, kept))
}

/// Turns header cell text into a column name, e.g. `"Valor (R$)"` into `"Valor_(R$)"`.
fn header_name(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<_>>().join("_")
}

fn is_recognised(found_header: &[String], rules: &HeaderRules) -> bool {
    found_header.len() == rules.expected_header.len()
        && found_header.iter().any(|name| *name == rules.required_column)
}

fn is_noise(row: &Row, patterns: &[String]) -> bool {
    row.iter().any(|cell| {
        patterns
            .iter()
            .any(|pattern| contains_ignore_case(cell, pattern))
    })
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::table::Cell;

    fn coelce_rules() -> HeaderRules {
        HeaderRules {
            expected_header: DEFAULT_EXPECTED_HEADER.map(String::from).to_vec(),
            required_column: "Valor_(R$)".to_string(),
            noise_patterns: DEFAULT_NOISE_PATTERNS.map(String::from).to_vec(),
        }
    }

    fn short_rules() -> HeaderRules {
        HeaderRules {
            expected_header: vec!["Item".into(), "Valor".into(), "Taxa".into()],
            required_column: "Valor".into(),
            noise_patterns: vec!["com tributos".into()],
        }
    }

    #[gtest]
    fn applies_expected_header_after_first_full_row() {
        let table = Table::from([
            vec!["", "", ""],
            vec!["Itens", "", "Valor"],
            vec!["Itens de Fatura", "Preço", "Tarifa"],
            vec!["Energia Ativa Fornecida TE", "100,00", "0,5"],
            vec!["", "", ""],
            vec!["Energia Ativa Fornecida TUSD", "50,00", ""],
        ]);

        let out = normalize_header(table, &short_rules()).expect("should find header");

        expect_eq!(out.columns(), &["Item", "Valor", "Taxa"]);
        expect_eq!(out.records().len(), 2);
        expect_eq!(
            out.records()[1][0],
            Cell::from("Energia Ativa Fornecida TUSD")
        );
    }

    #[gtest]
    fn keeps_recognised_header() {
        let table = Table::from([
            vec!["Item", "Valor", "Taxa"],
            vec!["CIP ILUM PUB PREF MUNICIPAL", "15,00", ""],
        ]);

        let mut rules = short_rules();
        rules.expected_header = vec!["A".into(), "B".into(), "C".into()];
        let out = normalize_header(table, &rules).expect("should find header");

        expect_eq!(out.columns(), &["Item", "Valor", "Taxa"]);
    }

    #[gtest]
    fn full_coelce_width_has_ten_columns_and_no_noise() {
        let table = Table::from([
            vec![
                "Itens de Fatura",
                "Unid",
                "Quant",
                "Preço unit",
                "Valor",
                "PIS/",
                "Base Calc",
                "Alíquota",
                "ICMS",
                "Tarifa",
            ],
            vec!["", "", "", "com tributos", "(R$)", "COFINS", "ICMS (R$)", "ICMS", "", "unit"],
            vec![
                "Energia Ativa Fornecida TE",
                "kWh",
                "300",
                "0,33",
                "100,00",
                "1,20",
                "100,00",
                "20%",
                "20,00",
                "0,30",
            ],
            vec!["CIP ILUM PUB PREF MUNICIPAL", "", "", "", "15,00", "", "", "", "", ""],
        ]);

        let out = normalize_header(table, &coelce_rules()).expect("should find header");

        expect_eq!(out.columns().len(), 10);
        expect_eq!(out.columns(), &DEFAULT_EXPECTED_HEADER);
        expect_eq!(out.records().len(), 2);
        expect_true!(out.records().iter().all(|record| {
            record
                .iter()
                .all(|cell| !cell.as_text().is_some_and(|t| t.contains("com tributos")))
        }));
    }

    #[gtest]
    fn noise_match_is_case_insensitive() {
        let table = Table::from([
            vec!["a", "b", "c"],
            vec!["Preço COM TRIBUTOS", "", ""],
            vec!["Energia", "1,00", ""],
        ]);

        let out = normalize_header(table, &short_rules()).expect("should find header");

        expect_eq!(out.records().len(), 1);
    }

    #[gtest]
    fn fails_without_fully_populated_row() {
        let table = Table::from([vec!["Itens", "", "Valor"], vec!["", "", ""]]);

        expect_that!(
            normalize_header(table, &short_rules()),
            err(eq(&CleanupError::NoHeaderRow))
        );
    }

    #[gtest]
    fn fails_on_empty_table() {
        expect_that!(
            normalize_header(Table::default(), &short_rules()),
            err(eq(&CleanupError::NoHeaderRow))
        );
    }

    #[gtest]
    fn skips_short_rows_when_finding_header() {
        let table = Table::from([
            vec!["FATURA"],
            vec!["Item", "Valor", "Taxa"],
            vec!["CIP ILUM PUB PREF MUNICIPAL", "15,00", ""],
        ]);

        let mut rules = short_rules();
        rules.expected_header = vec!["A".into(), "B".into(), "C".into()];
        let out = normalize_header(table, &rules).expect("should find header");

        expect_eq!(out.columns(), &["Item", "Valor", "Taxa"]);
        expect_eq!(
            out.records(),
            &[vec![
                Cell::from("CIP ILUM PUB PREF MUNICIPAL"),
                Cell::from("15,00"),
                Cell::from(""),
            ]]
        );
    }

    #[gtest]
    fn header_must_span_values_in_later_rows() {
        let table = Table::from([
            vec!["Itens", "Valor"],
            vec!["Energia", "1,00", "0,5"],
            vec!["", "", ""],
        ]);

        let out = normalize_header(table, &short_rules()).expect("should find header");

        expect_eq!(out.columns(), &["Item", "Valor", "Taxa"]);
        expect_eq!(out.records().len(), 0);
    }

    #[gtest]
    fn ignores_trailing_blank_cells_of_header_row() {
        let table = Table::from([
            vec!["Item", "Valor", "Taxa", ""],
            vec!["Energia", "1,00", "0,5"],
        ]);

        let out = normalize_header(table, &short_rules()).expect("should find header");

        expect_eq!(out.columns(), &["Item", "Valor", "Taxa"]);
        expect_eq!(out.records().len(), 1);
    }

    #[gtest]
    fn fails_on_rows_wider_than_fallback_header() {
        let table = Table::from([
            vec!["Item", "Preço", "Taxa", "Obs"],
            vec!["x", "y", "z", "extra"],
        ]);

        expect_that!(
            normalize_header(table, &short_rules()),
            err(eq(&CleanupError::ColumnCountMismatch {
                expected: 3,
                found: 4
            }))
        );
    }

    #[gtest]
    fn drops_trailing_blank_cells_beyond_header() {
        let table = Table::from([vec!["a", "b", "c"], vec!["x", "y", "z", " "]]);

        let out = normalize_header(table, &short_rules()).expect("should find header");

        expect_eq!(out.records()[0].len(), 3);
    }
}
