use super::chi_angles::compute_chi_angles;
use super::{file_name_of, list_files};
use crate::core::topology::registry::ChiDefinitionTable;
use crate::engine::config::BatchConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::StructureEngine;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Summary of one structure processed by [`run_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub structure_file: PathBuf,
    pub report_file: PathBuf,
    pub residues: usize,
    pub missing: usize,
    pub errors: usize,
}

/// Report path for a structure: `<stem><suffix>` inside `output_dir`.
pub fn report_path(structure_file: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let stem = structure_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}{}", stem, suffix))
}

/// Runs the chi-angle scan on every structure file of `directory`.
///
/// Files are visited in file-name order. The first failing structure aborts
/// the batch; reports already written are left in place.
#[instrument(skip_all, name = "chi_batch", fields(directory = %directory.display()))]
pub fn run_directory<E: StructureEngine + ?Sized>(
    engine: &mut E,
    directory: &Path,
    definitions: &ChiDefinitionTable,
    config: &BatchConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<BatchOutcome>, EngineError> {
    let structures = list_files(directory, |path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| config.matches_extension(e))
    })?;
    info!(
        files = structures.len(),
        extensions = ?config.extensions,
        "Scanning chain {} of structure files.",
        config.chain_id
    );

    let output_dir = config.output_dir.as_deref().unwrap_or(directory);
    if config.output_dir.is_some() {
        fs::create_dir_all(output_dir).map_err(|e| EngineError::io(output_dir, e))?;
    }

    reporter.report(Progress::BatchStart {
        total_files: structures.len() as u64,
    });
    let mut outcomes = Vec::with_capacity(structures.len());
    for structure in structures {
        reporter.report(Progress::FileStart {
            name: file_name_of(&structure),
        });
        let report_file = report_path(&structure, output_dir, &config.report_suffix);
        let report = compute_chi_angles(
            engine,
            &structure,
            &report_file,
            definitions,
            &config.chain_id,
        )?;
        let (missing, errors) = (report.missing_count(), report.error_count());
        if missing + errors > 0 {
            reporter.report(Progress::Message(format!(
                "{}: {} MISSING, {} ERROR",
                file_name_of(&structure),
                missing,
                errors
            )));
        }
        outcomes.push(BatchOutcome {
            residues: report.rows.len(),
            missing,
            errors,
            structure_file: report.structure_file,
            report_file: report.output_file,
        });
        reporter.report(Progress::FileFinish);
    }
    reporter.report(Progress::BatchFinish);

    info!(files = outcomes.len(), "Chi-angle batch finished.");
    Ok(outcomes)
}
