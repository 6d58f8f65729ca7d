use nalgebra::Point3;

/// A flat, format-neutral view of one coordinate record.
///
/// The structure reader flattens every parsed atom into an `AtomSite` and
/// hands it to the [`MolecularSystemBuilder`](super::builder::MolecularSystemBuilder).
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSite {
    /// `true` for `HETATM` records.
    pub is_hetero: bool,
    pub serial: usize,
    pub name: String,
    pub alt_loc: Option<char>,
    pub residue_name: String,
    pub chain_id: String,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub b_factor: f64,
    /// Element symbol; empty when the source did not provide one.
    pub element: String,
    pub formal_charge: i8,
}

impl Default for AtomSite {
    fn default() -> Self {
        Self {
            is_hetero: false,
            serial: 0,
            name: String::new(),
            alt_loc: None,
            residue_name: String::new(),
            chain_id: String::new(),
            residue_number: 0,
            insertion_code: None,
            position: Point3::origin(),
            occupancy: 1.0,
            b_factor: 0.0,
            element: String::new(),
            formal_charge: 0,
        }
    }
}
