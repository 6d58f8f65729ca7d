//! # Workflows Module
//!
//! The three batch jobs, each driving the [`StructureEngine`](crate::engine::session::StructureEngine)
//! or plain report files over one directory.
//!
//! - **Chi Angles** ([`chi_angles`]) - side-chain dihedrals of one structure, written as a report
//! - **Batch** ([`batch`]) - the chi-angle scan over every structure file of a directory
//! - **Aggregate** ([`aggregate`]) - merges per-structure reports into one CSV table
//! - **Convert** ([`convert`]) - rewrites every structure of one format in another
//!
//! Directory listings are sorted by file name, so repeated runs visit files in
//! the same order.

pub mod aggregate;
pub mod batch;
pub mod chi_angles;
pub mod convert;

use crate::engine::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};

/// Regular files of `directory` accepted by `keep`, sorted by file name.
pub(crate) fn list_files(
    directory: &Path,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, EngineError> {
    let entries = fs::read_dir(directory).map_err(|e| EngineError::io(directory, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| EngineError::io(directory, e))?.path();
        if path.is_file() && keep(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
