use crate::core::topology::registry::{ChiDefinitionTable, DihedralDefinition, MAX_CHI_ANGLES};
use crate::engine::error::EngineError;
use crate::engine::selection::AtomSelector;
use crate::engine::session::{LoadGuard, StructureEngine};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub const REPORT_HEADER: &str = "Residue Chi1 Chi2 Chi3 Chi4";

const NOT_APPLICABLE: &str = "N/A";
const MISSING: &str = "MISSING";
const ERROR: &str = "ERROR";

/// Outcome of evaluating one chi slot of one residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChiValue {
    /// Dihedral in degrees.
    Angle(f64),
    /// The residue type has no dihedral in this slot.
    NotApplicable,
    /// At least one of the four defining atoms is absent from the structure.
    Missing,
    /// The atoms exist but the dihedral could not be computed.
    Error,
}

impl ChiValue {
    /// Reads the textual form written to reports; `None` for anything else.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            NOT_APPLICABLE => Some(Self::NotApplicable),
            MISSING => Some(Self::Missing),
            ERROR => Some(Self::Error),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Angle),
        }
    }

    /// Machine-readable status used in the aggregated table.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Angle(_) => "value",
            Self::NotApplicable => "not_applicable",
            Self::Missing => "missing",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ChiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Angle(value) => write!(f, "{:.2}", value),
            Self::NotApplicable => f.write_str(NOT_APPLICABLE),
            Self::Missing => f.write_str(MISSING),
            Self::Error => f.write_str(ERROR),
        }
    }
}

/// A residue of the scanned chain, identified as in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueRecord {
    /// Sequence number plus insertion code, kept verbatim.
    pub index: String,
    pub name: String,
}

/// One line of a per-structure report.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiRow {
    pub residue_index: String,
    pub residue_name: String,
    pub chis: [ChiValue; MAX_CHI_ANGLES],
}

impl fmt::Display for ChiRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.residue_index, self.residue_name)?;
        for chi in &self.chis {
            write!(f, " {}", chi)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChiReport {
    pub structure_file: PathBuf,
    pub output_file: PathBuf,
    pub rows: Vec<ChiRow>,
}

impl ChiReport {
    pub fn missing_count(&self) -> usize {
        self.count_where(|chi| *chi == ChiValue::Missing)
    }

    pub fn error_count(&self) -> usize {
        self.count_where(|chi| *chi == ChiValue::Error)
    }

    fn count_where(&self, predicate: impl Fn(&ChiValue) -> bool) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.chis.iter())
            .filter(|chi| predicate(chi))
            .count()
    }
}

/// Residues of `chain_id` in file order, one per alpha carbon.
///
/// Alternate locations of the same CA collapse into a single record.
pub fn enumerate_residues<E: StructureEngine + ?Sized>(
    engine: &E,
    chain_id: &str,
) -> Vec<ResidueRecord> {
    let mut records: Vec<ResidueRecord> = Vec::new();
    let selector = AtomSelector::new().chain(chain_id).name("CA");
    engine.iterate(&selector, &mut |atom| {
        if records.last().is_some_and(|last| last.index == atom.residue_index) {
            return;
        }
        records.push(ResidueRecord {
            index: atom.residue_index.clone(),
            name: atom.residue_name.clone(),
        });
    });
    records
}

fn evaluate<E: StructureEngine + ?Sized>(
    engine: &E,
    chain_id: &str,
    residue: &ResidueRecord,
    definition: &DihedralDefinition,
) -> ChiValue {
    let Some(atoms) = definition.atoms() else {
        return ChiValue::NotApplicable;
    };
    let selectors = atoms
        .each_ref()
        .map(|name| AtomSelector::residue_atom(chain_id, &residue.index, name));

    if let Some(absent) = selectors.iter().find(|s| engine.count_atoms(s) == 0) {
        debug!(residue = %residue.index, dihedral = %definition, "No atom for '{}'", absent);
        return ChiValue::Missing;
    }

    let [s1, s2, s3, s4] = &selectors;
    match engine.get_dihedral(s1, s2, s3, s4) {
        Ok(angle) => ChiValue::Angle(angle),
        Err(e) => {
            warn!(
                residue = %residue.index,
                name = %residue.name,
                dihedral = %definition,
                "Dihedral could not be computed: {}",
                e
            );
            ChiValue::Error
        }
    }
}

/// Evaluates every tabulated residue of `chain_id` in the currently loaded structure.
///
/// Residue names absent from `definitions` produce no row. Failures are
/// recorded per angle and never abort the scan.
pub fn calculate<E: StructureEngine + ?Sized>(
    engine: &E,
    definitions: &ChiDefinitionTable,
    chain_id: &str,
) -> Vec<ChiRow> {
    let mut rows = Vec::new();
    for residue in enumerate_residues(engine, chain_id) {
        let Some(residue_definitions) = definitions.get(&residue.name) else {
            debug!(residue = %residue.index, name = %residue.name, "No chi definitions; skipping");
            continue;
        };

        let mut chis = [ChiValue::NotApplicable; MAX_CHI_ANGLES];
        for (slot, definition) in chis.iter_mut().zip(residue_definitions) {
            *slot = evaluate(engine, chain_id, &residue, definition);
        }
        rows.push(ChiRow {
            residue_index: residue.index,
            residue_name: residue.name,
            chis,
        });
    }
    rows
}

/// Writes the header line followed by one line per row.
pub fn write_report(rows: &[ChiRow], path: &Path) -> Result<(), EngineError> {
    let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let write_all = |writer: &mut BufWriter<File>| -> std::io::Result<()> {
        writeln!(writer, "{}", REPORT_HEADER)?;
        for row in rows {
            writeln!(writer, "{}", row)?;
        }
        writer.flush()
    };
    write_all(&mut writer).map_err(|e| EngineError::io(path, e))
}

/// Loads one structure, scans `chain_id`, and writes its report to `output_file`.
///
/// The engine is reset before the load and after the scan.
///
/// # Errors
///
/// Fails when the structure cannot be loaded or the report cannot be written.
#[instrument(skip_all, name = "chi_angles", fields(structure = %structure_file.display()))]
pub fn compute_chi_angles<E: StructureEngine + ?Sized>(
    engine: &mut E,
    structure_file: &Path,
    output_file: &Path,
    definitions: &ChiDefinitionTable,
    chain_id: &str,
) -> Result<ChiReport, EngineError> {
    let rows = {
        let loaded = LoadGuard::load(engine, structure_file)?;
        calculate(&*loaded, definitions, chain_id)
    };
    write_report(&rows, output_file)?;

    let report = ChiReport {
        structure_file: structure_file.to_path_buf(),
        output_file: output_file.to_path_buf(),
        rows,
    };
    info!(
        residues = report.rows.len(),
        missing = report.missing_count(),
        errors = report.error_count(),
        "Wrote {}",
        output_file.display()
    );
    Ok(report)
}
