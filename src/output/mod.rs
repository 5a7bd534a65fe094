use anyhow::{Context, Result};
use std::path::Path;

use crate::pipeline::Insertion;

pub mod formatters;

pub use formatters::*;

/// Read the note a transcript should be inserted into
pub fn read_document(path: &Path) -> Result<String> {
    fs_err::read_to_string(path).context("Failed to read note")
}

/// Persist the updated note
pub fn save_document(insertion: &Insertion, path: &Path) -> Result<()> {
    fs_err::write(path, &insertion.document).context("Failed to write note")?;
    Ok(())
}

/// Print the fragment that would be appended, without touching the note
pub fn print_fragment(insertion: &Insertion) {
    println!("{}", insertion.fragment);
}
