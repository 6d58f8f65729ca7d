use crate::cli::AggregateArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chiscan::{engine::progress::ProgressReporter, workflows};
use tracing::info;

pub fn run(args: AggregateArgs) -> Result<()> {
    super::ensure_directory(&args.dir)?;
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let config = partial_config.merge_aggregate(&args)?;
    info!(
        delimiter = %config.delimiter,
        token_index = config.token_index,
        "Identifiers are taken from report file names."
    );

    let progress_handler = CliProgressHandler::new("Reading reports");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let summary = workflows::aggregate::aggregate(&args.dir, &args.output, &config, &reporter)?;

    println!(
        "✓ Aggregated {} row(s) from {} report(s) into {}",
        summary.rows,
        summary.files,
        summary.output_file.display()
    );
    Ok(())
}
