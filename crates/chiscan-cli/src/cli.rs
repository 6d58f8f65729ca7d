use chiscan::core::io::format::StructureFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "chiscan contributors",
    version,
    about = "chiscan - batch side-chain dihedral (chi angle) extraction, report aggregation and PDB/mmCIF conversion.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a Chi1-Chi4 report for every structure file in a directory.
    Chi(ChiArgs),
    /// Merge the chi-angle reports of a directory into a single CSV table.
    Aggregate(AggregateArgs),
    /// Convert every structure of one format in a directory to another format.
    Convert(ConvertArgs),
    /// Inspect or export the chi dihedral definition table.
    Definitions(DefinitionsArgs),
}

/// Arguments for the `chi` subcommand.
#[derive(Args, Debug)]
pub struct ChiArgs {
    /// Directory holding the structure files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub dir: PathBuf,

    /// Optional configuration file in TOML format (reads the `[chi]` section).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Chain whose residues are scanned.
    #[arg(long, value_name = "ID")]
    pub chain: Option<String>,

    /// Structure file extension to pick up. Can be used multiple times.
    #[arg(short, long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Suffix appended to the structure file stem to name each report.
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Write reports here instead of next to the structure files.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Replace the built-in chi definitions with a TOML table.
    #[arg(long, value_name = "PATH")]
    pub definitions: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S chi.chain=B
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `aggregate` subcommand.
#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Directory holding the chi-angle reports.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub dir: PathBuf,

    /// Path of the CSV table to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format (reads the `[aggregate]` section).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Separator used to split report file names.
    #[arg(long, value_name = "STR")]
    pub delimiter: Option<String>,

    /// Zero-based position of the structure identifier in the split file name.
    #[arg(long, value_name = "INT")]
    pub token_index: Option<usize>,

    /// Suffix identifying report files.
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Add a status column per chi angle (value, not_applicable, missing, error).
    #[arg(long)]
    pub with_status: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S aggregate.token-index=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory holding the structure files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub dir: PathBuf,

    /// Format of the files to convert (pdb or cif).
    #[arg(long = "from", value_name = "FORMAT")]
    pub source: Option<StructureFormat>,

    /// Format to write (pdb or cif).
    #[arg(long = "to", value_name = "FORMAT")]
    pub target: Option<StructureFormat>,

    /// Optional configuration file in TOML format (reads the `[convert]` section).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `definitions` subcommand.
#[derive(Args, Debug)]
pub struct DefinitionsArgs {
    #[command(subcommand)]
    pub command: DefinitionsCommands,
}

#[derive(Subcommand, Debug)]
pub enum DefinitionsCommands {
    /// Print the chi definitions per residue.
    Show {
        /// Show a custom TOML table instead of the built-in one.
        #[arg(long, value_name = "PATH")]
        definitions: Option<PathBuf>,
    },
    /// Write the built-in table as TOML, ready to be edited and passed back with --definitions.
    Export {
        #[arg(required = true)]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chi_accepts_repeated_extensions_and_set_values() {
        let cli = Cli::parse_from([
            "chiscan", "-vv", "chi", "--dir", "models", "-e", "pdb", "-e", "cif", "-S",
            "chi.chain=B",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Chi(args) = cli.command else {
            panic!("expected the chi subcommand");
        };
        assert_eq!(args.dir, PathBuf::from("models"));
        assert_eq!(args.extensions, vec!["pdb", "cif"]);
        assert_eq!(args.set_values, vec!["chi.chain=B"]);
        assert!(args.config.is_none());
    }

    #[test]
    fn convert_parses_format_names() {
        let cli = Cli::parse_from(["chiscan", "convert", "-d", ".", "--from", "pdb", "--to", "mmcif"]);
        let Commands::Convert(args) = cli.command else {
            panic!("expected the convert subcommand");
        };
        assert_eq!(args.source, Some(StructureFormat::Pdb));
        assert_eq!(args.target, Some(StructureFormat::Cif));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["chiscan", "-q", "-v", "definitions", "show"]);
        assert!(result.is_err());
    }

    #[test]
    fn aggregate_requires_an_output_path() {
        let result = Cli::try_parse_from(["chiscan", "aggregate", "--dir", "reports"]);
        assert!(result.is_err());
    }
}
