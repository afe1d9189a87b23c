use std::path::Path;

use anyhow::{Context, Result};

use super::{JsonTableSet, TableLocator, TableRegion, grid_from_json};
use crate::table::Table;

/// [TableLocator] that delegates to Tabula, running inside a JVM.
pub struct TabulaLocator {
    vm: tabula::TabulaVM,
}

impl TabulaLocator {
    /// Starts the JVM with the Tabula JAR file at `libpath`.
    pub fn new(libpath: &str) -> Result<Self> {
        let vm = tabula::TabulaVM::new(libpath, false)
            .with_context(|| format!("starting Tabula from {libpath:?}"))?;
        Ok(Self { vm })
    }
}

impl TableLocator for TabulaLocator {
    fn locate_table(&self, pdf_path: &Path, region: &TableRegion) -> Result<Option<Table>> {
        let env = self.vm.attach().context("attaching to TabulaVM")?;

        let page_areas = [region.area.to_tabula_page_area()];
        let tabula = env
            .configure_tabula(
                Some(&page_areas),
                Some(&[region.page]),
                tabula::OutputFormat::Json,
                false,
                region.method.to_tabula_extraction_method(),
                false,
                region.password.as_deref(),
            )
            .context("configuring Tabula to extract table")?;

        let extracted_file = tempfile::NamedTempFile::new()
            .context("creating temporary file for extracting PDF table data")?;
        tabula
            .parse_document_into(pdf_path, extracted_file.path())
            .with_context(|| format!("extracting PDF table data from {pdf_path:?}"))?;
        let table_set: JsonTableSet = serde_json::from_reader(extracted_file)
            .context("parsing extracted PDF table data")?;

        log::debug!(
            "Tabula found {} table(s) on page {} of {:?}.",
            table_set.0.len(),
            region.page,
            pdf_path
        );

        Ok(table_set
            .0
            .into_iter()
            .next()
            .map(|json_table| grid_from_json(json_table, region)))
    }
}
