use std::ops::{Deref, DerefMut};

use crate::textutil::clean_text;

/// Raw grid of text cells, as extracted from a PDF.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Table(pub Vec<Row>);

impl Table {
    /// Cleans leading, trailing, and redundant whitespace from every cell, in-place.
    pub fn clean(&mut self) {
        for row in self.iter_mut() {
            for cell in row.iter_mut() {
                clean_text(cell);
            }
        }
    }

    /// Number of cells in the widest row.
    pub fn width(&self) -> usize {
        self.iter().map(|row| row.len()).max().unwrap_or(0)
    }
}

impl Deref for Table {
    type Target = Vec<Row>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Table {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<C, R> From<C> for Table
where
    C: IntoIterator<Item = R>,
    R: Into<Row>,
{
    fn from(value: C) -> Self {
        Table(value.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row(pub Vec<String>);

impl Row {
    /// Returns `true` if every cell is blank (or there are no cells).
    pub fn is_blank(&self) -> bool {
        self.iter().all(|cell| cell.trim().is_empty())
    }

    /// Number of cells up to and including the last non-blank one.
    pub fn filled_len(&self) -> usize {
        self.iter()
            .rposition(|cell| !cell.trim().is_empty())
            .map_or(0, |index| index + 1)
    }

    /// Returns `true` if the row has at least `width` cells and none of the first `width` is
    /// blank.
    pub fn is_populated_to(&self, width: usize) -> bool {
        self.len() >= width && self[..width].iter().all(|cell| !cell.trim().is_empty())
    }
}

impl Deref for Row {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<C, S> From<C> for Row
where
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from(value: C) -> Self {
        Row(value.into_iter().map(Into::into).collect())
    }
}

/// Single value within an [InvoiceTable].
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// No value. Also stands in for text that failed numeric conversion.
    Missing,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the cell as a CSV field.
    ///
    /// Numbers use the shortest representation that round-trips, always with a fractional part
    /// or exponent (e.g. `10.0`, `-105.47`).
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format!("{n:?}"),
            Cell::Missing => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Table with named columns, produced by the cleanup stages and consumed by the sink.
///
/// Every record has exactly one cell per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceTable {
    columns: Vec<String>,
    records: Vec<Vec<Cell>>,
}

impl InvoiceTable {
    /// Creates an [InvoiceTable] from text rows. Rows shorter than `columns` are padded with
    /// empty text; longer rows are truncated, so callers must check widths beforehand when that
    /// matters.
    pub fn from_text_rows<I>(columns: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        let width = columns.len();
        let records = rows
            .into_iter()
            .map(|row| {
                let mut record: Vec<Cell> = row.0.into_iter().take(width).map(Cell::Text).collect();
                record.resize(width, Cell::Text(String::new()));
                record
            })
            .collect();
        Self { columns, records }
    }

    /// Creates an [InvoiceTable] from a raw grid, naming the columns by position (`0`, `1`, ...).
    pub fn from_raw(table: Table) -> Self {
        let columns = (0..table.width()).map(|i| i.to_string()).collect();
        Self::from_text_rows(columns, table.0)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Vec<Cell>] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Vec<Cell>> {
        &mut self.records
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Returns the index of the named column, appending it (with every record set to
    /// [Cell::Missing]) if not already present.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.columns.push(name.to_string());
        for record in &mut self.records {
            record.push(Cell::Missing);
        }
        self.columns.len() - 1
    }

    /// Concatenates tables. The resulting columns are the union of all columns in order of first
    /// appearance, and cells for columns absent from a source table are [Cell::Missing].
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = InvoiceTable>,
    {
        let mut out = InvoiceTable::default();
        for table in tables {
            let indices: Vec<usize> = table
                .columns
                .iter()
                .map(|column| out.ensure_column(column))
                .collect();
            for record in table.records {
                let mut out_record = vec![Cell::Missing; out.columns.len()];
                for (cell, &index) in record.into_iter().zip(&indices) {
                    out_record[index] = cell;
                }
                out.records.push(out_record);
            }
        }
        out
    }
}
