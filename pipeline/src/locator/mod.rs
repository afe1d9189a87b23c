//! Locating a table within a PDF by fixed page geometry.

pub mod tabulalocator;

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{
    table::{Row, Table},
    textutil::strip_chars,
};

/// Finds a single table in a PDF file.
pub trait TableLocator {
    /// Extracts the table in `region` of the PDF at `pdf_path`.
    ///
    /// Returns `Ok(None)` if the extractor found no table there.
    fn locate_table(&self, pdf_path: &Path, region: &TableRegion) -> Result<Option<Table>>;
}

/// Everything needed to find a table on a page of a PDF.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRegion {
    /// 1-based page number.
    pub page: i32,
    pub method: ExtractionMethod,
    pub area: TableArea,
    /// Horizontal positions of the boundaries between columns, in ascending order. Empty to keep
    /// the columns that the extractor finds on its own.
    pub columns: Vec<f32>,
    /// Characters to remove from every cell.
    pub strip_text: String,
    pub password: Option<String>,
}

/// Rectangular region within a page of a PDF, in PDF points, using the Tabula origin at the
/// top-left of the page rather than the standard PDF origin at the bottom left.
///
/// NOTE: for a valid [TableArea] the following must be true: `left <= right && top <= bottom`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl TableArea {
    pub fn is_valid(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    pub fn to_tabula_rectangle(self) -> tabula::Rectangle {
        tabula::Rectangle::new(
            self.left,
            self.top,
            self.right - self.left,
            self.bottom - self.top,
        )
    }

    pub fn to_tabula_page_area(self) -> (i32, tabula::Rectangle) {
        (
            tabula::ABSOLUTE_AREA_CALCULATION_MODE,
            self.to_tabula_rectangle(),
        )
    }
}

/// Table detection algorithm for the extractor to use.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Guess,
    Lattice,
    /// Whitespace-separated text, with no ruling lines.
    #[default]
    Stream,
}

impl ExtractionMethod {
    pub fn to_tabula_extraction_method(self) -> tabula::ExtractionMethod {
        match self {
            ExtractionMethod::Stream => tabula::ExtractionMethod::Basic,
            ExtractionMethod::Guess => tabula::ExtractionMethod::Decide,
            ExtractionMethod::Lattice => tabula::ExtractionMethod::Spreadsheet,
        }
    }
}

/// A sequence of extracted tables from a PDF file, as output by Tabula.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct JsonTableSet(pub Vec<JsonTable>);

#[derive(Deserialize, Debug)]
pub(crate) struct JsonTable {
    pub data: Vec<JsonRow>,
}

#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct JsonRow(pub Vec<JsonCell>);

#[derive(Deserialize, Debug)]
pub(crate) struct JsonCell {
    pub left: f32,
    pub width: f32,
    pub text: String,
}

/// Converts an extracted table into a [Table], placing cells into the columns of `region` and
/// stripping and cleaning their text.
pub(crate) fn grid_from_json(json_table: JsonTable, region: &TableRegion) -> Table {
    let mut table = Table(
        json_table
            .data
            .into_iter()
            .map(|json_row| bin_row(json_row, &region.columns))
            .collect(),
    );

    for row in table.iter_mut() {
        for cell in row.iter_mut() {
            strip_chars(cell, &region.strip_text);
        }
    }
    table.clean();

    table
}

/// Places each non-blank cell into the column whose boundaries contain the cell's horizontal
/// midpoint. Cells sharing a column are joined by a space, in left to right order.
fn bin_row(json_row: JsonRow, columns: &[f32]) -> Row {
    if columns.is_empty() {
        return Row(json_row.0.into_iter().map(|cell| cell.text).collect());
    }

    let mut cells: Vec<JsonCell> = json_row
        .0
        .into_iter()
        .filter(|cell| !cell.text.trim().is_empty())
        .collect();
    cells.sort_by(|a, b| a.left.total_cmp(&b.left));

    let mut row = Row(vec![String::new(); columns.len() + 1]);
    for cell in cells {
        let midpoint = cell.left + cell.width / 2.0;
        let index = columns.partition_point(|&boundary| boundary <= midpoint);
        let target = &mut row[index];
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(cell.text.trim());
    }

    row
}
