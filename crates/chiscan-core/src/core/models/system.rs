use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents a complete molecular system with atoms, residues, and chains.
///
/// Storage is arena-based: atoms, residues, and chains live in slot maps and
/// refer to each other by stable IDs. The order in which chains and residues
/// were first seen in the source file is kept separately so that iteration and
/// serialization follow file order.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in the order they were first added.
    chain_order: Vec<ChainId>,
    /// Residues in the order they were first added, across all chains.
    residue_order: Vec<ResidueId>,
    /// Lookup map for finding residues by chain, sequence number, and insertion code.
    residue_id_map: HashMap<(ChainId, isize, Option<char>), ResidueId>,
    /// Lookup map for finding chains by their identifier.
    chain_id_map: HashMap<String, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Total number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns `true` if no atom has been added.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in file order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ChainId, &Chain)` pairs.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Returns an iterator over all residues in file order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ResidueId, &Residue)` pairs.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residue_order
            .iter()
            .filter_map(|&id| self.residues.get(id).map(|residue| (id, residue)))
    }

    /// Returns an iterator over all atoms, grouped by residue in file order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.residues_iter().flat_map(move |(_, residue)| {
            residue
                .atoms()
                .iter()
                .filter_map(move |&id| self.atoms.get(id).map(|atom| (id, atom)))
        })
    }

    /// Finds a chain ID by its identifier.
    pub fn find_chain_by_id(&self, id: &str) -> Option<ChainId> {
        self.chain_id_map.get(id).copied()
    }

    /// Finds a residue ID by its chain, sequence number, and insertion code.
    pub fn find_residue(
        &self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, number, insertion_code))
            .copied()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given identifier already
    /// exists, its ID is returned without creating a duplicate.
    pub fn add_chain(&mut self, id: &str) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_id_map.insert(id.to_string(), chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// The chain is registered first if it has not been seen. Residues are keyed
    /// by chain, sequence number, and insertion code. When a key is seen again
    /// (for example a microheterogeneous residue listed with a second name) the
    /// first residue is reused and its name is kept.
    pub fn add_residue(
        &mut self,
        chain: &str,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        is_hetero: bool,
    ) -> ResidueId {
        let chain_id = self.add_chain(chain);
        let key = (chain_id, number, insertion_code);
        if let Some(&existing) = self.residue_id_map.get(&key) {
            return existing;
        }

        let residue_id = self.residues.insert(Residue::new(
            number,
            insertion_code,
            name,
            chain_id,
            is_hetero,
        ));
        self.residue_id_map.insert(key, residue_id);
        self.residue_order.push(residue_id);
        self.chains[chain_id].residues.push(residue_id);
        residue_id
    }

    /// Adds an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `None` if the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }
        atom.residue_id = residue_id;
        let atom_id = self.atoms.insert(atom);
        self.residues[residue_id].add_atom(atom_id);
        Some(atom_id)
    }
}
