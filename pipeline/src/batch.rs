//! Processing of every invoice of a provider, writing the results below a root directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    config::Provider,
    invoice::InvoiceExtractor,
    locator::TableLocator,
    sink::write_csv,
    table::InvoiceTable,
};

/// Locations of input PDFs and output CSVs below a root directory.
#[derive(Clone, Debug)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory holding the provider's PDFs: `<root>/files/pdf/<provider>`.
    pub fn pdf_dir(&self, provider: &Provider) -> PathBuf {
        self.root
            .join("files")
            .join("pdf")
            .join(provider.pdf_dir_name())
    }

    pub fn pdf_path(&self, provider: &Provider, name: &str) -> PathBuf {
        self.pdf_dir(provider).join(format!("{name}.pdf"))
    }

    /// Per-invoice output: `<root>/files/csv/<name>.csv`.
    pub fn csv_path(&self, name: &str) -> PathBuf {
        self.root
            .join("files")
            .join("csv")
            .join(format!("{name}.csv"))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.root.join("files").join("combined_data.csv")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    /// One CSV file per invoice.
    PerInvoice,
    /// All invoice tables concatenated into a single CSV file.
    Combined,
}

pub enum BatchEvent<'a> {
    /// Extraction of the named invoice has started.
    Started { name: &'a str },
    /// The invoice had no table to extract, so it was skipped.
    NoTable { name: &'a str },
    /// Extraction or cleanup of the invoice failed, so it was skipped.
    Failed { name: &'a str, err: anyhow::Error },
    /// A CSV file was written.
    Written { path: &'a Path },
    /// Combined output was requested, but no invoice produced a table.
    NothingToCombine,
    /// Processing has finished and no more events will follow.
    Completed { extracted: usize, total: usize },
}

/// Trait to implement to receive notifications about batch progress.
pub trait BatchEvents {
    fn on_event(&mut self, event: BatchEvent);
}

/// Extracts the invoices of a single provider.
pub struct Batch<'a> {
    extractor: InvoiceExtractor<'a>,
    provider: &'a Provider,
    layout: &'a Layout,
}

impl<'a> Batch<'a> {
    pub fn new(locator: &'a dyn TableLocator, provider: &'a Provider, layout: &'a Layout) -> Self {
        Self {
            extractor: InvoiceExtractor::new(locator, provider),
            provider,
            layout,
        }
    }

    /// Processes the named invoices in order.
    ///
    /// Invoices that fail to extract are reported through `events` and skipped. Failure to write
    /// output ends processing with an error.
    pub fn run(
        &self,
        names: &[String],
        mode: OutputMode,
        events: &mut dyn BatchEvents,
    ) -> Result<()> {
        let mut combined: Vec<InvoiceTable> = Vec::new();
        let mut extracted = 0;

        for name in names {
            events.on_event(BatchEvent::Started { name });

            let pdf_path = self.layout.pdf_path(self.provider, name);
            let table = match self
                .extractor
                .extract(&pdf_path)
                .with_context(|| format!("extracting from {pdf_path:?}"))
            {
                Ok(Some(table)) => table,
                Ok(None) => {
                    events.on_event(BatchEvent::NoTable { name });
                    continue;
                }
                Err(err) => {
                    events.on_event(BatchEvent::Failed { name, err });
                    continue;
                }
            };
            extracted += 1;

            match mode {
                OutputMode::PerInvoice => {
                    let csv_path = self.layout.csv_path(name);
                    write_csv(&table, &csv_path)?;
                    events.on_event(BatchEvent::Written { path: &csv_path });
                }
                OutputMode::Combined => combined.push(table),
            }
        }

        if mode == OutputMode::Combined {
            if combined.is_empty() {
                events.on_event(BatchEvent::NothingToCombine);
            } else {
                let combined_path = self.layout.combined_path();
                write_csv(&InvoiceTable::concat(combined), &combined_path)?;
                events.on_event(BatchEvent::Written {
                    path: &combined_path,
                });
            }
        }

        events.on_event(BatchEvent::Completed {
            extracted,
            total: names.len(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::{Result, anyhow};
    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        table::Table,
        testutil::{MockLocator, coelce_grid, coelce_provider},
    };

    /// Records events as text.
    #[derive(Default)]
    struct EventLog(Vec<String>);

    impl BatchEvents for EventLog {
        fn on_event(&mut self, event: BatchEvent) {
            use BatchEvent::*;
            self.0.push(match event {
                Started { name } => format!("started {name}"),
                NoTable { name } => format!("no table {name}"),
                Failed { name, .. } => format!("failed {name}"),
                Written { path } => format!(
                    "written {}",
                    path.file_name().and_then(|s| s.to_str()).unwrap_or("?")
                ),
                NothingToCombine => "nothing to combine".to_string(),
                Completed { extracted, total } => format!("completed {extracted}/{total}"),
            });
        }
    }

    /// Locator that finds the Coelce grid in `good.pdf`, nothing in `blank.pdf`, and fails on
    /// anything else.
    fn locator() -> MockLocator {
        let mut locator = MockLocator::new();
        locator.expect_locate_table().returning_st(|pdf_path, _| {
            match pdf_path.file_name().and_then(|s| s.to_str()) {
                Some("good.pdf") | Some("other.pdf") => Ok(Some(coelce_grid())),
                Some("blank.pdf") => Ok(None),
                Some("noheader.pdf") => Ok(Some(Table::from([vec!["", "x"]]))),
                _ => Err(anyhow!("unreadable PDF")),
            }
        });
        locator
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[gtest]
    fn layout_paths() {
        let layout = Layout::new(PathBuf::from("/data"));
        let provider = coelce_provider();

        expect_eq!(
            layout.pdf_path(&provider, "09_24"),
            PathBuf::from("/data/files/pdf/coelce/09_24.pdf")
        );
        expect_eq!(
            layout.csv_path("09_24"),
            PathBuf::from("/data/files/csv/09_24.csv")
        );
        expect_eq!(
            layout.combined_path(),
            PathBuf::from("/data/files/combined_data.csv")
        );
    }

    #[gtest]
    fn writes_one_csv_per_invoice_and_skips_failures() -> Result<()> {
        let root = TempDir::new()?;
        let layout = Layout::new(root.path().to_owned());
        let provider = coelce_provider();
        let locator = locator();
        let mut events = EventLog::default();

        Batch::new(&locator, &provider, &layout).run(
            &names(&["good", "blank", "noheader", "broken", "other"]),
            OutputMode::PerInvoice,
            &mut events,
        )?;

        expect_eq!(
            events.0,
            vec![
                "started good",
                "written good.csv",
                "started blank",
                "no table blank",
                "started noheader",
                "failed noheader",
                "started broken",
                "failed broken",
                "started other",
                "written other.csv",
                "completed 2/5",
            ]
        );
        expect_true!(layout.csv_path("good").is_file());
        expect_true!(layout.csv_path("other").is_file());
        expect_false!(layout.csv_path("blank").exists());
        expect_false!(layout.csv_path("noheader").exists());
        Ok(())
    }

    #[gtest]
    fn combines_invoices_into_one_csv() -> Result<()> {
        let root = TempDir::new()?;
        let layout = Layout::new(root.path().to_owned());
        let provider = coelce_provider();
        let locator = locator();
        let mut events = EventLog::default();

        Batch::new(&locator, &provider, &layout).run(
            &names(&["good", "blank", "other"]),
            OutputMode::Combined,
            &mut events,
        )?;

        expect_true!(events.0.iter().any(|e| e == "written combined_data.csv"));
        expect_false!(layout.csv_path("good").exists());
        let combined = fs::read_to_string(layout.combined_path())?;
        // Header plus four line items from each of the two invoices.
        expect_eq!(combined.lines().count(), 9);
        Ok(())
    }

    #[gtest]
    fn combining_nothing_writes_nothing() -> Result<()> {
        let root = TempDir::new()?;
        let layout = Layout::new(root.path().to_owned());
        let provider = coelce_provider();
        let locator = locator();
        let mut events = EventLog::default();

        Batch::new(&locator, &provider, &layout).run(
            &names(&["blank"]),
            OutputMode::Combined,
            &mut events,
        )?;

        expect_true!(events.0.iter().any(|e| e == "nothing to combine"));
        expect_false!(layout.combined_path().exists());
        Ok(())
    }

    #[gtest]
    fn output_failure_ends_processing() -> Result<()> {
        let root = TempDir::new()?;
        fs::create_dir_all(root.path().join("files"))?;
        // A file where the output directory should be.
        fs::write(root.path().join("files").join("csv"), "")?;
        let layout = Layout::new(root.path().to_owned());
        let provider = coelce_provider();
        let locator = locator();
        let mut events = EventLog::default();

        let result = Batch::new(&locator, &provider, &layout).run(
            &names(&["good", "other"]),
            OutputMode::PerInvoice,
            &mut events,
        );

        expect_true!(result.is_err());
        expect_eq!(events.0, vec!["started good"]);
        Ok(())
    }
}
