use crate::core::io::format::StructureFormat;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CHAIN_ID: &str = "A";
pub const DEFAULT_STRUCTURE_EXTENSION: &str = "pdb";
pub const DEFAULT_REPORT_SUFFIX: &str = "_chi_angles.dat";
pub const DEFAULT_IDENTIFIER_DELIMITER: &str = "_";
pub const DEFAULT_IDENTIFIER_TOKEN: usize = 1;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{0}' must not be empty")]
    EmptyValue(&'static str),
    #[error("Source and target formats are both '{0}'")]
    SameSourceAndTarget(StructureFormat),
}

/// Settings for running the chi-angle calculator over a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub chain_id: String,
    /// Lower-case extensions, without the leading dot, selecting structure files.
    pub extensions: Vec<String>,
    pub report_suffix: String,
    /// Where reports are written; `None` writes next to the structure files.
    pub output_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            extensions: vec![DEFAULT_STRUCTURE_EXTENSION.to_string()],
            report_suffix: DEFAULT_REPORT_SUFFIX.to_string(),
            output_dir: None,
        }
    }
}

impl BatchConfig {
    /// Whether `extension` (any case, with or without a dot) selects a structure file.
    pub fn matches_extension(&self, extension: &str) -> bool {
        let normalized = normalize_extension(extension);
        self.extensions.iter().any(|e| *e == normalized)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    chain_id: Option<String>,
    extensions: Option<Vec<String>>,
    report_suffix: Option<String>,
    output_dir: Option<PathBuf>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = Some(chain_id.to_string());
        self
    }
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }
    pub fn report_suffix(mut self, suffix: &str) -> Self {
        self.report_suffix = Some(suffix.to_string());
        self
    }
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let defaults = BatchConfig::default();

        let chain_id = self.chain_id.unwrap_or(defaults.chain_id);
        if chain_id.trim().is_empty() {
            return Err(ConfigError::EmptyValue("chain_id"));
        }

        let extensions: Vec<String> = self
            .extensions
            .unwrap_or(defaults.extensions)
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        if extensions.is_empty() || extensions.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyValue("extensions"));
        }

        let report_suffix = self.report_suffix.unwrap_or(defaults.report_suffix);
        if report_suffix.is_empty() {
            return Err(ConfigError::EmptyValue("report_suffix"));
        }

        Ok(BatchConfig {
            chain_id: chain_id.trim().to_string(),
            extensions,
            report_suffix,
            output_dir: self.output_dir,
        })
    }
}

/// Settings for merging per-structure reports into one CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateConfig {
    pub report_suffix: String,
    /// Separator used to split report file names.
    pub delimiter: String,
    /// Zero-based position of the identifier among the split tokens.
    pub token_index: usize,
    pub include_status_columns: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            report_suffix: DEFAULT_REPORT_SUFFIX.to_string(),
            delimiter: DEFAULT_IDENTIFIER_DELIMITER.to_string(),
            token_index: DEFAULT_IDENTIFIER_TOKEN,
            include_status_columns: false,
        }
    }
}

#[derive(Default)]
pub struct AggregateConfigBuilder {
    report_suffix: Option<String>,
    delimiter: Option<String>,
    token_index: Option<usize>,
    include_status_columns: Option<bool>,
}

impl AggregateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_suffix(mut self, suffix: &str) -> Self {
        self.report_suffix = Some(suffix.to_string());
        self
    }
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = Some(delimiter.to_string());
        self
    }
    pub fn token_index(mut self, index: usize) -> Self {
        self.token_index = Some(index);
        self
    }
    pub fn include_status_columns(mut self, include: bool) -> Self {
        self.include_status_columns = Some(include);
        self
    }

    pub fn build(self) -> Result<AggregateConfig, ConfigError> {
        let defaults = AggregateConfig::default();

        let report_suffix = self.report_suffix.unwrap_or(defaults.report_suffix);
        if report_suffix.is_empty() {
            return Err(ConfigError::EmptyValue("report_suffix"));
        }
        let delimiter = self.delimiter.unwrap_or(defaults.delimiter);
        if delimiter.is_empty() {
            return Err(ConfigError::EmptyValue("delimiter"));
        }

        Ok(AggregateConfig {
            report_suffix,
            delimiter,
            token_index: self.token_index.unwrap_or(defaults.token_index),
            include_status_columns: self
                .include_status_columns
                .unwrap_or(defaults.include_status_columns),
        })
    }
}

/// Settings for converting every structure of one format in a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertConfig {
    pub source: StructureFormat,
    pub target: StructureFormat,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source: StructureFormat::Cif,
            target: StructureFormat::Pdb,
        }
    }
}

#[derive(Default)]
pub struct ConvertConfigBuilder {
    source: Option<StructureFormat>,
    target: Option<StructureFormat>,
}

impl ConvertConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, format: StructureFormat) -> Self {
        self.source = Some(format);
        self
    }
    pub fn target(mut self, format: StructureFormat) -> Self {
        self.target = Some(format);
        self
    }

    pub fn build(self) -> Result<ConvertConfig, ConfigError> {
        let defaults = ConvertConfig::default();
        let source = self.source.unwrap_or(defaults.source);
        let target = self.target.unwrap_or(defaults.target);
        if source == target {
            return Err(ConfigError::SameSourceAndTarget(source));
        }
        Ok(ConvertConfig { source, target })
    }
}
