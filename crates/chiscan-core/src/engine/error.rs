use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::format::StructureFormat;
use crate::core::io::structure::StructureIoError;
use crate::core::topology::registry::DefinitionLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {format} file '{}': {source}", path.display())]
    ReadStructure {
        path: PathBuf,
        format: StructureFormat,
        source: StructureIoError,
    },

    #[error("Failed to write {format} file '{}': {source}", path.display())]
    WriteStructure {
        path: PathBuf,
        format: StructureFormat,
        source: StructureIoError,
    },

    #[error("Unsupported structure format for '{}' (expected .pdb, .ent, .cif or .mmcif)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("No loaded object named '{0}'")]
    ObjectNotFound(String),

    #[error("Selection '{0}' matches no atoms")]
    EmptySelection(String),

    #[error("Selection '{selector}' matches {count} atoms; exactly one is required")]
    AmbiguousSelection { selector: String, count: usize },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Failed to load chi definitions: {source}")]
    Definitions {
        #[from]
        source: DefinitionLoadError,
    },

    #[error(
        "File name '{}' has no token {token_index} when split on '{delimiter}'",
        path.display()
    )]
    FileNamePattern {
        path: PathBuf,
        delimiter: String,
        token_index: usize,
    },

    #[error("Malformed report line {line} in '{}': {reason}", path.display())]
    MalformedReportLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("CSV error for '{}': {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
