//! Offline inspection of files on disk, used by the `inspect` subcommand.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rayon::prelude::*;

use crate::error::Result;
use crate::inspect::inspect;
use crate::types::InspectionResult;

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<InspectionResult>,
}

/// Maps the file read-only and inspects the mapping in place.
pub fn inspect_file(path: &Path) -> Result<InspectionResult> {
    let file = File::open(path)?;

    if file.metadata()?.len() == 0 {
        return Ok(inspect(&[]));
    }

    // The mapping is read-only and dropped before returning.
    let mmap = unsafe { Mmap::map(&file) }?;
    Ok(inspect(&mmap))
}

/// Inspects every path in parallel; reports keep the input order.
pub fn inspect_files(paths: &[PathBuf]) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|path| FileReport {
            path: path.clone(),
            outcome: inspect_file(path),
        })
        .collect()
}
