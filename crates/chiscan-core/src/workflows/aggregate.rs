use super::chi_angles::ChiValue;
use super::{file_name_of, list_files};
use crate::core::topology::registry::MAX_CHI_ANGLES;
use crate::engine::config::AggregateConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const CSV_HEADER: [&str; 7] = [
    "pdb_ID",
    "residue_number",
    "residue_name",
    "CHI1",
    "CHI2",
    "CHI3",
    "CHI4",
];
pub const STATUS_HEADER: [&str; MAX_CHI_ANGLES] =
    ["CHI1_status", "CHI2_status", "CHI3_status", "CHI4_status"];

const REPORT_FIELDS: usize = 2 + MAX_CHI_ANGLES;

/// One chi field of a report: the text as written plus its parsed meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiField {
    pub text: String,
    pub value: ChiValue,
}

/// One row of the aggregated table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub identifier: String,
    pub residue_number: String,
    pub residue_name: String,
    pub chis: [ChiField; MAX_CHI_ANGLES],
}

impl AggregateRow {
    fn record(&self, include_status: bool) -> Vec<&str> {
        let mut record = vec![
            self.identifier.as_str(),
            self.residue_number.as_str(),
            self.residue_name.as_str(),
        ];
        record.extend(self.chis.iter().map(|chi| chi.text.as_str()));
        if include_status {
            record.extend(self.chis.iter().map(|chi| chi.value.status()));
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    pub output_file: PathBuf,
    pub files: usize,
    pub rows: usize,
}

/// Report files of `directory`, sorted by file name.
pub fn report_files(
    directory: &Path,
    config: &AggregateConfig,
) -> Result<Vec<PathBuf>, EngineError> {
    list_files(directory, |path| {
        file_name_of(path).ends_with(&config.report_suffix)
    })
}

/// Extracts the structure identifier from a report's file name.
///
/// # Errors
///
/// Returns [`EngineError::FileNamePattern`] when the name has no non-empty
/// token at `config.token_index`.
pub fn extract_identifier(path: &Path, config: &AggregateConfig) -> Result<String, EngineError> {
    file_name_of(path)
        .split(config.delimiter.as_str())
        .nth(config.token_index)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| EngineError::FileNamePattern {
            path: path.to_path_buf(),
            delimiter: config.delimiter.clone(),
            token_index: config.token_index,
        })
}

/// Parses the rows of one report, skipping its header and blank lines.
pub fn parse_report(path: &Path, identifier: &str) -> Result<Vec<AggregateRow>, EngineError> {
    let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
    let malformed = |line: usize, reason: String| EngineError::MalformedReportLine {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut rows = Vec::new();
    for (line_idx, line) in content.lines().enumerate().skip(1) {
        let line_num = line_idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != REPORT_FIELDS {
            return Err(malformed(
                line_num,
                format!("expected {} fields, found {}", REPORT_FIELDS, fields.len()),
            ));
        }
        let (residue_number, residue_name, chi_fields) = (fields[0], fields[1], &fields[2..]);

        let mut chis = Vec::with_capacity(MAX_CHI_ANGLES);
        for text in chi_fields {
            let value = ChiValue::parse(text)
                .ok_or_else(|| malformed(line_num, format!("unrecognized chi value '{}'", text)))?;
            chis.push(ChiField {
                text: text.to_string(),
                value,
            });
        }
        let chis: [ChiField; MAX_CHI_ANGLES] = chis
            .try_into()
            .map_err(|_| malformed(line_num, "wrong number of chi values".to_string()))?;

        rows.push(AggregateRow {
            identifier: identifier.to_string(),
            residue_number: residue_number.to_string(),
            residue_name: residue_name.to_string(),
            chis,
        });
    }
    Ok(rows)
}

fn collect_from(
    files: &[PathBuf],
    config: &AggregateConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<AggregateRow>, EngineError> {
    reporter.report(Progress::BatchStart {
        total_files: files.len() as u64,
    });
    let mut rows = Vec::new();
    for file in files {
        reporter.report(Progress::FileStart {
            name: file_name_of(file),
        });
        let identifier = extract_identifier(file, config)?;
        let parsed = parse_report(file, &identifier)?;
        debug!(identifier = %identifier, rows = parsed.len(), "Parsed {}", file.display());
        rows.extend(parsed);
        reporter.report(Progress::FileFinish);
    }
    reporter.report(Progress::BatchFinish);
    Ok(rows)
}

/// Reads every report of `directory` without writing anything.
pub fn collect_rows(
    directory: &Path,
    config: &AggregateConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<AggregateRow>, EngineError> {
    let files = report_files(directory, config)?;
    collect_from(&files, config, reporter)
}

/// Writes the table header and `rows` to `path` as CSV.
pub fn write_csv(
    rows: &[AggregateRow],
    path: &Path,
    include_status_columns: bool,
) -> Result<(), EngineError> {
    let csv_error = |source: csv::Error| EngineError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    if include_status_columns {
        header.extend(STATUS_HEADER);
    }
    writer.write_record(&header).map_err(csv_error)?;
    for row in rows {
        writer
            .write_record(row.record(include_status_columns))
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|e| EngineError::io(path, e))
}

/// Merges every report of `directory` into one CSV at `output_csv`.
///
/// Rows follow file-name order, then line order within each report. Any
/// badly named file or malformed line aborts the run before the CSV is written.
#[instrument(skip_all, name = "aggregate", fields(directory = %directory.display()))]
pub fn aggregate(
    directory: &Path,
    output_csv: &Path,
    config: &AggregateConfig,
    reporter: &ProgressReporter,
) -> Result<AggregateSummary, EngineError> {
    let files = report_files(directory, config)?;
    info!(files = files.len(), "Aggregating chi-angle reports.");

    let rows = collect_from(&files, config, reporter)?;
    write_csv(&rows, output_csv, config.include_status_columns)?;

    info!(rows = rows.len(), "Wrote {}", output_csv.display());
    Ok(AggregateSummary {
        output_file: output_csv.to_path_buf(),
        files: files.len(),
        rows: rows.len(),
    })
}
