use super::atom::{Atom, infer_element};
use super::ids::ResidueId;
use super::site::AtomSite;
use super::system::MolecularSystem;

/// Incrementally assembles a [`MolecularSystem`] from coordinate records.
///
/// Records are expected in file order. The builder caches the residue of the
/// previous record so that consecutive atoms of the same residue skip the
/// lookup maps.
#[derive(Default)]
pub struct MolecularSystemBuilder {
    system: MolecularSystem,

    // --- Builder-specific state for efficient construction ---
    current_residue: Option<(String, isize, Option<char>, ResidueId)>,
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_site(&mut self, site: AtomSite) -> &mut Self {
        let cached = self
            .current_residue
            .as_ref()
            .filter(|(chain, number, code, _)| {
                *chain == site.chain_id
                    && *number == site.residue_number
                    && *code == site.insertion_code
            })
            .map(|(.., residue_id)| *residue_id);
        let residue_id = match cached {
            Some(residue_id) => residue_id,
            None => {
                let residue_id = self.system.add_residue(
                    &site.chain_id,
                    site.residue_number,
                    site.insertion_code,
                    &site.residue_name,
                    site.is_hetero,
                );
                self.current_residue = Some((
                    site.chain_id.clone(),
                    site.residue_number,
                    site.insertion_code,
                    residue_id,
                ));
                residue_id
            }
        };

        let element = if site.element.is_empty() {
            infer_element(&site.name)
        } else {
            site.element
        };
        let atom = Atom {
            serial: site.serial,
            name: site.name,
            alt_loc: site.alt_loc,
            element,
            residue_id,
            position: site.position,
            occupancy: site.occupancy,
            b_factor: site.b_factor,
            formal_charge: site.formal_charge,
        };
        self.system.add_atom_to_residue(residue_id, atom);
        self
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}
