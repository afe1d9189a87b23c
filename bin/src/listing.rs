use std::{ffi::OsStr, path::Path};

use anyhow::{Result, anyhow};

/// Returns the names (file stems) of the PDF files directly inside `dir`, sorted.
///
/// Failure to list the directory is logged and results in no names.
pub fn list_invoices(dir: &Path) -> Vec<String> {
    match try_list_invoices(dir) {
        Ok(names) => names,
        Err(err) => {
            log::error!("Could not list invoices in {dir:?}: {err:#}.");
            Vec::new()
        }
    }
}

fn try_list_invoices(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for dir_entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let dir_entry = dir_entry.map_err(|e| anyhow!(e))?;
        if !dir_entry.file_type().is_file() {
            continue;
        }
        let path = dir_entry.path();
        let is_pdf = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
            names.push(stem.to_owned());
        }
    }
    names.sort();
    Ok(names)
}
