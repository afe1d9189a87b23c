use anyhow::Result;

mod cli;
mod distpaths;
mod listing;

fn main() -> Result<()> {
    cli::run()
}
