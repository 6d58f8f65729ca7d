use nalgebra::Point3;
use std::fmt;

/// A conjunction of atom properties; unset fields match anything.
///
/// Residues are addressed by their index label (sequence number plus
/// insertion code, e.g. `52A`) exactly as read from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomSelector {
    pub object: Option<String>,
    pub chain: Option<String>,
    pub residue: Option<String>,
    pub name: Option<String>,
}

impl AtomSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects one named atom of one residue.
    pub fn residue_atom(chain: &str, residue: &str, name: &str) -> Self {
        Self::new().chain(chain).residue(residue).name(name)
    }

    pub fn object(mut self, object: &str) -> Self {
        self.object = Some(object.to_string());
        self
    }
    pub fn chain(mut self, chain: &str) -> Self {
        self.chain = Some(chain.to_string());
        self
    }
    pub fn residue(mut self, residue: &str) -> Self {
        self.residue = Some(residue.to_string());
        self
    }
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn matches_object(&self, object: &str) -> bool {
        self.object.as_deref().is_none_or(|o| o == object)
    }

    pub fn matches_chain(&self, chain: &str) -> bool {
        self.chain.as_deref().is_none_or(|c| c == chain)
    }

    pub fn matches_residue(&self, residue: &str) -> bool {
        self.residue.as_deref().is_none_or(|r| r == residue)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.as_deref().is_none_or(|n| n == name)
    }
}

impl fmt::Display for AtomSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = [
            ("model", &self.object),
            ("chain", &self.chain),
            ("resi", &self.residue),
            ("name", &self.name),
        ]
        .into_iter()
        .filter_map(|(keyword, value)| value.as_ref().map(|v| format!("{} {}", keyword, v)))
        .collect();

        if clauses.is_empty() {
            f.write_str("all")
        } else {
            f.write_str(&clauses.join(" and "))
        }
    }
}

/// Read-only view of one atom handed to [`StructureEngine::iterate`](super::session::StructureEngine::iterate) callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub object: String,
    pub chain: String,
    pub residue_index: String,
    pub residue_name: String,
    pub atom_name: String,
    pub alt_loc: Option<char>,
    pub position: Point3<f64>,
}
