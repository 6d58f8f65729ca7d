use phf::{Map, phf_map};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Maximum number of side-chain dihedrals tracked per residue (Chi1 to Chi4).
pub const MAX_CHI_ANGLES: usize = 4;

const NOT_APPLICABLE: &str = "N/A";

static STANDARD_CHI_DEFINITIONS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "ALA" => &["N/A"],
    "ARG" => &["N-CA-CB-CG", "CA-CB-CG-CD", "CB-CG-CD-NE", "CG-CD-NE-CZ"],
    "ASN" => &["N-CA-CB-CG", "CA-CB-CG-OD1"],
    "ASP" => &["N-CA-CB-CG", "CA-CB-CG-OD1"],
    "CYS" => &["N-CA-CB-SG"],
    "GLN" => &["N-CA-CB-CG", "CA-CB-CG-CD", "CB-CG-CD-OE1"],
    "GLU" => &["N-CA-CB-CG", "CA-CB-CG-CD", "CB-CG-CD-OE1"],
    "GLY" => &["N/A"],
    "HIS" => &["N-CA-CB-CG", "CA-CB-CG-ND1"],
    "ILE" => &["N-CA-CB-CG1", "CA-CB-CG1-CD1"],
    "LEU" => &["N-CA-CB-CG", "CA-CB-CG-CD1"],
    "LYS" => &["N-CA-CB-CG", "CA-CB-CG-CD", "CB-CG-CD-CE", "CG-CD-CE-NZ"],
    "MET" => &["N-CA-CB-CG", "CA-CB-CG-SD", "CB-CG-SD-CE"],
    "PHE" => &["N-CA-CB-CG", "CA-CB-CG-CD1"],
    "PRO" => &["N-CA-CB-CG", "CA-CB-CG-CD"],
    "SER" => &["N-CA-CB-OG"],
    "THR" => &["N-CA-CB-OG1"],
    "TRP" => &["N-CA-CB-CG", "CA-CB-CG-CD1"],
    "TYR" => &["N-CA-CB-CG", "CA-CB-CG-CD1"],
    "VAL" => &["N-CA-CB-CG1"],
};

/// One entry of a residue's side-chain dihedral list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DihedralDefinition {
    /// The slot has no dihedral for this residue type.
    NotApplicable,
    /// The four atoms, in order, defining a proper dihedral.
    Atoms([String; 4]),
}

impl DihedralDefinition {
    /// Parses the textual `A-B-C-D` form.
    ///
    /// `"N/A"` and anything that does not split into exactly four non-empty
    /// atom names are both read as [`DihedralDefinition::NotApplicable`].
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == NOT_APPLICABLE {
            return Self::NotApplicable;
        }
        let names: Vec<&str> = text.split('-').map(str::trim).collect();
        match names.as_slice() {
            [a, b, c, d] if names.iter().all(|n| !n.is_empty()) => Self::Atoms([
                a.to_string(),
                b.to_string(),
                c.to_string(),
                d.to_string(),
            ]),
            _ => Self::NotApplicable,
        }
    }

    pub fn atoms(&self) -> Option<&[String; 4]> {
        match self {
            Self::Atoms(atoms) => Some(atoms),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for DihedralDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => f.write_str(NOT_APPLICABLE),
            Self::Atoms(atoms) => f.write_str(&atoms.join("-")),
        }
    }
}

/// Lookup table from residue name to its ordered side-chain dihedral definitions.
///
/// The table is built once and never mutated afterwards. Residue names are
/// matched exactly (three-letter, upper-case codes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChiDefinitionTable {
    definitions: HashMap<String, Vec<DihedralDefinition>>,
}

impl Default for ChiDefinitionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ChiDefinitionTable {
    /// The built-in table for the 20 standard amino acids.
    pub fn standard() -> Self {
        let definitions = STANDARD_CHI_DEFINITIONS
            .entries()
            .map(|(name, defs)| {
                (
                    name.to_string(),
                    defs.iter().map(|d| DihedralDefinition::parse(d)).collect(),
                )
            })
            .collect();
        Self { definitions }
    }

    /// Loads a replacement table from a TOML file of the form
    /// `LEU = ["N-CA-CB-CG", "CA-CB-CG-CD1"]`.
    pub fn load(path: &Path) -> Result<Self, DefinitionLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| DefinitionLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            DefinitionLoadError::Toml { source, .. } => DefinitionLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionLoadError> {
        let raw: HashMap<String, Vec<String>> =
            toml::from_str(content).map_err(|e| DefinitionLoadError::Toml {
                path: "<inline>".to_string(),
                source: e,
            })?;

        let mut definitions = HashMap::with_capacity(raw.len());
        for (residue, entries) in raw {
            if entries.len() > MAX_CHI_ANGLES {
                return Err(DefinitionLoadError::TooManyDefinitions {
                    residue,
                    count: entries.len(),
                });
            }
            let parsed = entries.iter().map(|e| DihedralDefinition::parse(e)).collect();
            definitions.insert(residue, parsed);
        }
        Ok(Self { definitions })
    }

    /// Serializes the table in the same TOML shape accepted by [`Self::load`],
    /// with residues in alphabetical order.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let ordered: BTreeMap<&str, Vec<String>> = self
            .definitions
            .iter()
            .map(|(name, defs)| (name.as_str(), defs.iter().map(|d| d.to_string()).collect()))
            .collect();
        toml::to_string(&ordered)
    }

    pub fn get(&self, residue_name: &str) -> Option<&[DihedralDefinition]> {
        self.definitions.get(residue_name).map(Vec::as_slice)
    }

    pub fn contains(&self, residue_name: &str) -> bool {
        self.definitions.contains_key(residue_name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Residue names in alphabetical order.
    pub fn residue_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Error)]
pub enum DefinitionLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Residue '{residue}' lists {count} dihedral definitions; at most 4 are allowed")]
    TooManyDefinitions { residue: String, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn standard_table_covers_the_twenty_amino_acids() {
        let table = ChiDefinitionTable::standard();
        assert_eq!(table.len(), 20);
        for name in ["ALA", "GLY", "TRP", "VAL", "ARG"] {
            assert!(table.contains(name), "missing {name}");
        }
        assert!(!table.contains("HOH"));
        assert!(!table.contains("MSE"));
        assert!(!table.contains("leu"));
    }

    #[test]
    fn standard_table_entries_match_expected_lengths() {
        let table = ChiDefinitionTable::standard();
        assert_eq!(table.get("ARG").unwrap().len(), 4);
        assert_eq!(table.get("LYS").unwrap().len(), 4);
        assert_eq!(table.get("MET").unwrap().len(), 3);
        assert_eq!(table.get("ILE").unwrap().len(), 2);
        assert_eq!(table.get("SER").unwrap().len(), 1);
        assert_eq!(
            table.get("ALA").unwrap(),
            &[DihedralDefinition::NotApplicable]
        );
    }

    #[test]
    fn standard_table_keeps_atom_order() {
        let table = ChiDefinitionTable::standard();
        let ile = table.get("ILE").unwrap();
        assert_eq!(
            ile[1].atoms().unwrap(),
            &["CA", "CB", "CG1", "CD1"].map(String::from)
        );
    }

    #[test]
    fn parse_reads_four_atom_names() {
        let def = DihedralDefinition::parse("N-CA-CB-CG");
        assert_eq!(def.atoms().unwrap(), &["N", "CA", "CB", "CG"].map(String::from));
        assert_eq!(def.to_string(), "N-CA-CB-CG");
    }

    #[test]
    fn parse_treats_malformed_entries_as_not_applicable() {
        assert_eq!(DihedralDefinition::parse("N/A"), DihedralDefinition::NotApplicable);
        assert_eq!(DihedralDefinition::parse("N-CA-CB"), DihedralDefinition::NotApplicable);
        assert_eq!(
            DihedralDefinition::parse("N-CA-CB-CG-CD"),
            DihedralDefinition::NotApplicable
        );
        assert_eq!(DihedralDefinition::parse("N--CB-CG"), DihedralDefinition::NotApplicable);
        assert_eq!(DihedralDefinition::parse(""), DihedralDefinition::NotApplicable);
    }

    #[test]
    fn load_reads_custom_table_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chi.toml");
        fs::write(
            &path,
            r#"
            MSE = ["N-CA-CB-CG", "CA-CB-CG-SE"]
            ALA = ["N/A"]
            "#,
        )
        .unwrap();

        let table = ChiDefinitionTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("MSE").unwrap()[1].atoms().unwrap()[3],
            "SE".to_string()
        );
    }

    #[test]
    fn load_rejects_more_than_four_definitions() {
        let result = ChiDefinitionTable::from_toml_str(
            r#"XXX = ["A-B-C-D", "A-B-C-D", "A-B-C-D", "A-B-C-D", "A-B-C-D"]"#,
        );
        assert!(matches!(
            result,
            Err(DefinitionLoadError::TooManyDefinitions { count: 5, .. })
        ));
    }

    #[test]
    fn load_reports_missing_file_as_io_error() {
        let dir = tempdir().unwrap();
        let result = ChiDefinitionTable::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(DefinitionLoadError::Io { .. })));
    }

    #[test]
    fn toml_export_round_trips_through_load() {
        let table = ChiDefinitionTable::standard();
        let text = table.to_toml_string().unwrap();
        assert!(text.contains("ALA = [\"N/A\"]"));
        let reloaded = ChiDefinitionTable::from_toml_str(&text).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn residue_names_are_sorted() {
        let table = ChiDefinitionTable::standard();
        let names = table.residue_names();
        assert_eq!(names.first(), Some(&"ALA"));
        assert_eq!(names.last(), Some(&"VAL"));
    }
}
