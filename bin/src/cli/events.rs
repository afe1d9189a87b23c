use pipeline::batch::{BatchEvent, BatchEvents};

/// Reports batch progress through the log.
pub struct LogEvents;

impl BatchEvents for LogEvents {
    fn on_event(&mut self, event: BatchEvent) {
        use BatchEvent::*;
        match event {
            Started { name } => log::info!("Processing {name:?}."),
            NoTable { name } => log::warn!("Skipping {name:?}: no table found."),
            Failed { name, err } => log::error!("Skipping {name:?}: {err:#}."),
            Written { path } => log::info!("Saved CSV {path:?}."),
            NothingToCombine => log::warn!("No invoice tables extracted, nothing to combine."),
            Completed { extracted, total } => {
                log::info!("Done: extracted {extracted} of {total} invoice(s).")
            }
        }
    }
}
