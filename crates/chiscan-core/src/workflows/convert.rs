use super::{file_name_of, list_files};
use crate::core::io::format::StructureFormat;
use crate::engine::config::ConvertConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::StructureEngine;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Rewrites every `config.source` structure of `directory` as `config.target`.
///
/// Each file is loaded under its stem, saved next to the source with the
/// target extension, and deleted from the engine before the next one.
/// Existing targets are overwritten. The first failure aborts the run.
#[instrument(skip_all, name = "convert", fields(directory = %directory.display()))]
pub fn convert_all<E: StructureEngine + ?Sized>(
    engine: &mut E,
    directory: &Path,
    config: &ConvertConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, EngineError> {
    let sources = list_files(directory, |path| {
        StructureFormat::from_path(path) == Some(config.source)
    })?;
    info!(
        files = sources.len(),
        "Converting {} files to {}.",
        config.source,
        config.target
    );

    engine.reinitialize();
    reporter.report(Progress::BatchStart {
        total_files: sources.len() as u64,
    });

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        reporter.report(Progress::FileStart {
            name: file_name_of(&source),
        });
        let target = source.with_extension(config.target.extension());
        let name = engine.load(&source, None)?;
        engine.save(&target, &name)?;
        engine.delete(&name)?;
        info!("Converted {} -> {}", source.display(), target.display());
        written.push(target);
        reporter.report(Progress::FileFinish);
    }
    reporter.report(Progress::BatchFinish);
    Ok(written)
}
