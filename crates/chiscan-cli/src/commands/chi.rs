use crate::cli::ChiArgs;
use crate::commands::definitions::load_table;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chiscan::{
    engine::{progress::ProgressReporter, session::Session},
    workflows,
};
use tracing::{info, warn};

pub fn run(args: ChiArgs) -> Result<()> {
    super::ensure_directory(&args.dir)?;
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_chi(&args)?;
    let definitions = load_table(settings.definitions.as_deref())?;
    info!(
        residues = definitions.len(),
        "Chi definitions ready; scanning chain {}.",
        settings.batch.chain_id
    );

    let progress_handler = CliProgressHandler::new("Computing chi angles");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut session = Session::new();

    println!("Scanning structures in {}...", args.dir.display());
    let outcomes = workflows::batch::run_directory(
        &mut session,
        &args.dir,
        &definitions,
        &settings.batch,
        &reporter,
    )?;

    if outcomes.is_empty() {
        warn!("No structure files matched {:?}.", settings.batch.extensions);
        println!(
            "Warning: no structure files with extension(s) {} found in {}.",
            settings.batch.extensions.join(", "),
            args.dir.display()
        );
        return Ok(());
    }

    let flagged = outcomes.iter().filter(|o| o.missing + o.errors > 0).count();
    if flagged > 0 {
        warn!(files = flagged, "Some reports contain MISSING or ERROR values.");
    }
    println!("✓ Wrote {} chi-angle report(s).", outcomes.len());

    Ok(())
}
