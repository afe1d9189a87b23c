use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use pipeline::{
    batch::{Batch, Layout, OutputMode},
    config::load_providers_file,
    locator::tabulalocator::TabulaLocator,
};
use simplelog::LevelFilter;

use crate::{distpaths, listing::list_invoices};

mod events;

/// Extracts the itemised billing tables from electricity invoice PDFs into CSV files.
///
/// Reads `<root>/files/pdf/<provider>/*.pdf` and writes `<root>/files/csv/<name>.csv` for each.
#[derive(Parser, Debug)]
struct Args {
    /// Root directory containing the `files` directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path to the provider configuration YAML file. Defaults to
    /// `<root>/config/providers.yaml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ID of the provider whose invoices to process.
    #[arg(long, default_value = "coelce")]
    provider: String,

    /// Path to Tabula JAR file. Defaults to `tabula.jar` next to this program, if present.
    #[arg(long)]
    tabula_libpath: Option<String>,

    /// Write all invoice tables into `<root>/files/combined_data.csv` instead of one file per
    /// invoice.
    #[arg(long)]
    combine: bool,

    /// Logging level.
    #[arg(long, default_value = "Info")]
    log_level: LevelFilter,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.root.join("config").join("providers.yaml"));
    let providers = load_providers_file(&config_path)?;
    let provider = providers.get(&args.provider).with_context(|| {
        format!(
            "selecting provider (configured providers: {:?})",
            providers.ids()
        )
    })?;

    let tabula_libpath = args
        .tabula_libpath
        .clone()
        .or_else(distpaths::tabula_jar)
        .ok_or_else(|| anyhow!("--tabula-libpath is required"))?;
    let locator = TabulaLocator::new(&tabula_libpath).context("initialising Tabula")?;

    let layout = Layout::new(args.root.clone());
    let pdf_dir = layout.pdf_dir(provider);
    let names = list_invoices(&pdf_dir);
    log::info!(
        "Found {} invoice(s) of provider {:?} in {pdf_dir:?}.",
        names.len(),
        provider.id
    );

    let mode = if args.combine {
        OutputMode::Combined
    } else {
        OutputMode::PerInvoice
    };

    Batch::new(&locator, provider, &layout).run(&names, mode, &mut events::LogEvents)
}
