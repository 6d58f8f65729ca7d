use super::ids::{AtomId, ChainId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                  // Residue sequence number from source file
    pub insertion_code: Option<char>,   // Insertion code, if any
    pub name: String,                   // Name of the residue (e.g., "ALA", "GLY")
    pub chain_id: ChainId,              // ID of the parent chain
    pub is_hetero: bool,                // Whether the residue came from HETATM records
    pub(crate) atoms: Vec<AtomId>,      // Atoms belonging to this residue, in file order
}

impl Residue {
    pub(crate) fn new(
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
        is_hetero: bool,
    ) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            chain_id,
            is_hetero,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_id: AtomId) {
        self.atoms.push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// The residue index as written in the source file: sequence number
    /// followed by the insertion code (e.g. `52` or `52A`).
    pub fn index_label(&self) -> String {
        match self.insertion_code {
            Some(code) => format!("{}{}", self.number, code),
            None => self.number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::{AtomId, ChainId};
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(10, None, "GLY", chain_id, false);
        assert_eq!(residue.number, 10);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, chain_id);
        assert!(!residue.is_hetero);
        assert!(residue.atoms().is_empty());
    }

    #[test]
    fn add_atom_keeps_file_order() {
        let mut residue = Residue::new(5, None, "ALA", dummy_chain_id(2), false);
        residue.add_atom(dummy_atom_id(42));
        residue.add_atom(dummy_atom_id(7));
        assert_eq!(residue.atoms(), &[dummy_atom_id(42), dummy_atom_id(7)]);
    }

    #[test]
    fn index_label_appends_insertion_code() {
        let chain_id = dummy_chain_id(3);
        assert_eq!(Residue::new(52, None, "SER", chain_id, false).index_label(), "52");
        assert_eq!(Residue::new(52, Some('A'), "SER", chain_id, false).index_label(), "52A");
        assert_eq!(Residue::new(-3, None, "MET", chain_id, false).index_label(), "-3");
    }
}
