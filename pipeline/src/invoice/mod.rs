//! Extraction of the itemised billing table from a single invoice PDF.


use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    cleanup::{
        header::normalize_header, metric::apply_percentage_metric, money::normalize_monetary,
        subtotal::trim_at_subtotal, summary::attach_summary_fields,
    },
    config::Provider,
    error::CleanupError,
    locator::TableLocator,
    table::{InvoiceTable, Table},
};

/// Extracts and cleans invoice tables for a single provider.
pub struct InvoiceExtractor<'a> {
    locator: &'a dyn TableLocator,
    provider: &'a Provider,
}

impl<'a> InvoiceExtractor<'a> {
    pub fn new(locator: &'a dyn TableLocator, provider: &'a Provider) -> Self {
        Self { locator, provider }
    }

    /// Extracts the invoice table from the PDF at `pdf_path`.
    ///
    /// Returns `Ok(None)` if a configured table was not found in the PDF.
    pub fn extract(&self, pdf_path: &Path) -> Result<Option<InvoiceTable>> {
        let Some(grid) = self
            .locator
            .locate_table(pdf_path, &self.provider.table)
            .context("locating itemised billing table")?
        else {
            log::warn!("No table found in {pdf_path:?}.");
            return Ok(None);
        };
        log::debug!("Extracted {} row(s) from {pdf_path:?}.", grid.len());

        let summary = match &self.provider.summary {
            Some((region, fields)) => {
                let Some(summary_table) = self
                    .locator
                    .locate_table(pdf_path, region)
                    .context("locating summary table")?
                else {
                    log::warn!("No summary table found in {pdf_path:?}.");
                    return Ok(None);
                };
                Some((summary_table, fields))
            }
            None => None,
        };

        let mut table = self.clean(grid).context("cleaning itemised billing table")?;

        if let Some((summary_table, fields)) = summary {
            attach_summary_fields(&mut table, &summary_table, fields)
                .context("reading summary table")?;
        }

        Ok(Some(table))
    }

    /// Applies the provider's cleanup stages to a raw grid.
    ///
    /// When the provider does not ask for cleanup, the grid is returned with positional column
    /// names instead.
    pub fn clean(&self, grid: Table) -> Result<InvoiceTable, CleanupError> {
        if !self.provider.fix {
            return Ok(InvoiceTable::from_raw(grid));
        }

        let mut table = normalize_header(grid, &self.provider.header)?;
        trim_at_subtotal(&mut table, &self.provider.subtotal_marker);
        normalize_monetary(&mut table, &self.provider.metric.value_column)?;
        apply_percentage_metric(&mut table, &self.provider.metric)?;

        Ok(table)
    }
}
