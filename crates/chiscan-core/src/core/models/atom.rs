use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents a single atom record loaded from a structure file.
///
/// Only the per-atom fields shared by the PDB and mmCIF coordinate sections
/// are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "OG1").
    pub name: String,
    /// Alternate location indicator, if the atom has more than one conformer.
    pub alt_loc: Option<char>,
    /// Element symbol (e.g., "C", "SE").
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy factor.
    pub occupancy: f64,
    /// Isotropic temperature factor.
    pub b_factor: f64,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
}

impl Atom {
    /// Creates a new `Atom` with default values for the crystallographic fields.
    ///
    /// The element is inferred from the atom name; occupancy defaults to 1.0.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            alt_loc: None,
            element: infer_element(name),
            residue_id,
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            formal_charge: 0,
        }
    }
}

/// Infers an element symbol from an atom name.
///
/// Leading digits (as in `1HB`) are skipped and the first alphabetic character
/// is taken, which is correct for every atom named in a standard amino acid.
pub fn infer_element(atom_name: &str) -> String {
    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.element, "C");
        assert_eq!(atom.alt_loc, None);
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.b_factor, 0.0);
        assert_eq!(atom.formal_charge, 0);
    }

    #[test]
    fn infer_element_skips_leading_digits() {
        assert_eq!(infer_element("1HB"), "H");
        assert_eq!(infer_element(" OG1"), "O");
        assert_eq!(infer_element("sd"), "S");
        assert_eq!(infer_element(""), "");
    }
}
