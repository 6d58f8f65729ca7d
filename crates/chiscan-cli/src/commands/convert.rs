use crate::cli::ConvertArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chiscan::{
    engine::{progress::ProgressReporter, session::Session},
    workflows,
};

pub fn run(args: ConvertArgs) -> Result<()> {
    super::ensure_directory(&args.dir)?;
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let config = partial_config.merge_convert(&args)?;

    let progress_handler = CliProgressHandler::new("Converting structures");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut session = Session::new();

    let written = workflows::convert::convert_all(&mut session, &args.dir, &config, &reporter)?;

    if written.is_empty() {
        println!(
            "Warning: no .{} files found in {}.",
            config.source.extension(),
            args.dir.display()
        );
    } else {
        println!(
            "✓ Converted {} file(s) from {} to {}.",
            written.len(),
            config.source,
            config.target
        );
    }
    Ok(())
}
