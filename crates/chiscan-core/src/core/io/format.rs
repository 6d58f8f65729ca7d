use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Structure file formats understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureFormat {
    #[serde(alias = "ent")]
    Pdb,
    #[serde(alias = "mmcif")]
    Cif,
}

impl StructureFormat {
    /// Detects the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// The canonical extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Cif => "cif",
        }
    }
}

impl FromStr for StructureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdb" | "ent" => Ok(Self::Pdb),
            "cif" | "mmcif" => Ok(Self::Cif),
            other => Err(format!("unsupported structure format '{}'", other)),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
