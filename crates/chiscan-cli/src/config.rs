use crate::cli::{AggregateArgs, ChiArgs, ConvertArgs};
use crate::error::{CliError, Result};
use chiscan::core::io::format::StructureFormat;
use chiscan::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialChiConfig {
    chain: Option<String>,
    extensions: Option<Vec<String>>,
    suffix: Option<String>,
    output_dir: Option<PathBuf>,
    definitions: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAggregateConfig {
    suffix: Option<String>,
    delimiter: Option<String>,
    token_index: Option<usize>,
    with_status: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialConvertConfig {
    from: Option<StructureFormat>,
    to: Option<StructureFormat>,
}

/// Contents of an optional `chiscan.toml`; every field may be left out.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    chi: Option<PartialChiConfig>,
    aggregate: Option<PartialAggregateConfig>,
    convert: Option<PartialConvertConfig>,
}

/// Fully resolved settings of the `chi` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSettings {
    pub batch: core_config::BatchConfig,
    /// Custom definition table; `None` keeps the built-in one.
    pub definitions: Option<PathBuf>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_chi(mut self, args: &ChiArgs) -> Result<ChiSettings> {
        self.apply_set_values(&args.set_values)?;
        let file = self.chi.take().unwrap_or_default();

        let mut builder = core_config::BatchConfigBuilder::new();
        if let Some(chain) = args.chain.as_ref().or(file.chain.as_ref()) {
            builder = builder.chain_id(chain);
        }
        if !args.extensions.is_empty() {
            builder = builder.extensions(args.extensions.clone());
        } else if let Some(extensions) = file.extensions {
            builder = builder.extensions(extensions);
        }
        if let Some(suffix) = args.suffix.as_ref().or(file.suffix.as_ref()) {
            builder = builder.report_suffix(suffix);
        }
        if let Some(dir) = args.output_dir.clone().or(file.output_dir) {
            builder = builder.output_dir(dir);
        }

        let batch = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        Ok(ChiSettings {
            batch,
            definitions: args.definitions.clone().or(file.definitions),
        })
    }

    pub fn merge_aggregate(
        mut self,
        args: &AggregateArgs,
    ) -> Result<core_config::AggregateConfig> {
        self.apply_set_values(&args.set_values)?;
        let file = self.aggregate.take().unwrap_or_default();

        let mut builder = core_config::AggregateConfigBuilder::new();
        if let Some(suffix) = args.suffix.as_ref().or(file.suffix.as_ref()) {
            builder = builder.report_suffix(suffix);
        }
        if let Some(delimiter) = args.delimiter.as_ref().or(file.delimiter.as_ref()) {
            builder = builder.delimiter(delimiter);
        }
        if let Some(index) = args.token_index.or(file.token_index) {
            builder = builder.token_index(index);
        }
        let with_status = args.with_status || file.with_status.unwrap_or(false);

        builder
            .include_status_columns(with_status)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_convert(mut self, args: &ConvertArgs) -> Result<core_config::ConvertConfig> {
        let file = self.convert.take().unwrap_or_default();

        let mut builder = core_config::ConvertConfigBuilder::new();
        if let Some(source) = args.source.or(file.from) {
            builder = builder.source(source);
        }
        if let Some(target) = args.target.or(file.to) {
            builder = builder.target(target);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "chi.chain" => {
                    self.chi_section().chain = Some(value_str.to_string());
                }
                "chi.extensions" => {
                    self.chi_section().extensions =
                        Some(value_str.split(',').map(|e| e.trim().to_string()).collect());
                }
                "chi.suffix" => {
                    self.chi_section().suffix = Some(value_str.to_string());
                }
                "chi.output-dir" => {
                    self.chi_section().output_dir = Some(PathBuf::from(value_str));
                }
                "chi.definitions" => {
                    self.chi_section().definitions = Some(PathBuf::from(value_str));
                }
                "aggregate.suffix" => {
                    self.aggregate_section().suffix = Some(value_str.to_string());
                }
                "aggregate.delimiter" => {
                    self.aggregate_section().delimiter = Some(value_str.to_string());
                }
                "aggregate.token-index" => {
                    self.aggregate_section().token_index =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid integer value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "aggregate.with-status" => {
                    self.aggregate_section().with_status =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid boolean value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn chi_section(&mut self) -> &mut PartialChiConfig {
        self.chi.get_or_insert_with(Default::default)
    }

    fn aggregate_section(&mut self) -> &mut PartialAggregateConfig {
        self.aggregate.get_or_insert_with(Default::default)
    }
}
