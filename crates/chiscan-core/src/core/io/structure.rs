use super::format::StructureFormat;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::site::AtomSite;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use pdbtbx::{Format, PDB, PDBError, ReadOptions, StrictnessLevel};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

/// Residue numbers that fit the four-column PDB `resSeq` field.
const PDB_RESIDUE_NUMBERS: RangeInclusive<isize> = -999..=9999;

#[derive(Debug, Error)]
pub enum StructureIoError {
    #[error("path is not valid UTF-8")]
    NonUtf8Path,

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Save(String),

    #[error("chain ID '{chain}' does not fit the one-character PDB chain column")]
    ChainIdTooLong { chain: String },

    #[error("residue number {number} of chain '{chain}' does not fit the four-column PDB field")]
    ResidueNumberOutOfRange { chain: String, number: isize },
}

fn pdbtbx_format(format: StructureFormat) -> Format {
    match format {
        StructureFormat::Pdb => Format::Pdb,
        StructureFormat::Cif => Format::Mmcif,
    }
}

fn join_errors(errors: &[PDBError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses a structure file with pdbtbx at loose strictness.
///
/// Problems pdbtbx reports without failing are logged at `debug` level.
pub fn read_structure(path: &Path, format: StructureFormat) -> Result<PDB, StructureIoError> {
    let path_str = path.to_str().ok_or(StructureIoError::NonUtf8Path)?;
    let (pdb, warnings) = ReadOptions::new()
        .set_format(pdbtbx_format(format))
        .set_level(StrictnessLevel::Loose)
        .read(path_str)
        .map_err(|errors| StructureIoError::Parse(join_errors(&errors)))?;

    if !warnings.is_empty() {
        debug!(
            warnings = warnings.len(),
            "pdbtbx reported problems in {}",
            path.display()
        );
        for warning in &warnings {
            trace!("{}", warning);
        }
    }
    Ok(pdb)
}

/// Writes `pdb` in `format`.
///
/// PDB output is refused when a chain ID or residue number does not fit its
/// fixed-width column, so that nothing is truncated into another chain or
/// shifted into the neighbouring columns.
pub fn write_structure(
    pdb: &PDB,
    path: &Path,
    format: StructureFormat,
) -> Result<(), StructureIoError> {
    let path_str = path.to_str().ok_or(StructureIoError::NonUtf8Path)?;
    match format {
        StructureFormat::Pdb => {
            check_pdb_columns(pdb)?;
            pdbtbx::save_pdb(pdb, path_str, StrictnessLevel::Loose)
        }
        StructureFormat::Cif => pdbtbx::save_mmcif(pdb, path_str, StrictnessLevel::Loose),
    }
    .map_err(|errors| StructureIoError::Save(join_errors(&errors)))
}

/// Checks that every chain ID and residue number fits the PDB columns.
pub fn check_pdb_columns(pdb: &PDB) -> Result<(), StructureIoError> {
    for chain in pdb.models().flat_map(|model| model.chains()) {
        if chain.id().chars().count() > 1 {
            return Err(StructureIoError::ChainIdTooLong {
                chain: chain.id().to_string(),
            });
        }
        if let Some(residue) = chain
            .residues()
            .find(|r| !PDB_RESIDUE_NUMBERS.contains(&r.serial_number()))
        {
            return Err(StructureIoError::ResidueNumberOutOfRange {
                chain: chain.id().to_string(),
                number: residue.serial_number(),
            });
        }
    }
    Ok(())
}

/// Maps the first model of `pdb` into a [`MolecularSystem`].
///
/// Each conformer contributes its atoms with the conformer's residue name and
/// alternate location, so alternate positions stay distinct atoms.
pub fn to_system(pdb: &PDB) -> MolecularSystem {
    let mut builder = MolecularSystemBuilder::new();
    let Some(model) = pdb.models().next() else {
        return builder.build();
    };

    for chain in model.chains() {
        for residue in chain.residues() {
            let insertion_code = residue.insertion_code().and_then(|c| c.chars().next());
            for conformer in residue.conformers() {
                let alt_loc = conformer
                    .alternative_location()
                    .and_then(|a| a.chars().next());
                for atom in conformer.atoms() {
                    builder.push_site(AtomSite {
                        is_hetero: atom.hetero(),
                        serial: atom.serial_number(),
                        name: atom.name().to_string(),
                        alt_loc,
                        residue_name: conformer.name().to_string(),
                        chain_id: chain.id().to_string(),
                        residue_number: residue.serial_number(),
                        insertion_code,
                        position: Point3::new(atom.x(), atom.y(), atom.z()),
                        occupancy: atom.occupancy(),
                        b_factor: atom.b_factor(),
                        element: atom
                            .element()
                            .map(|e| e.symbol().to_string())
                            .unwrap_or_default(),
                        formal_charge: i8::try_from(atom.charge()).unwrap_or_default(),
                    });
                }
            }
        }
    }
    builder.build()
}
