//! # Topology Module
//!
//! Static structural knowledge about residue types.
//!
//! ## Key Components
//!
//! - [`registry`] - The side-chain dihedral (Chi1 to Chi4) definition table: which
//!   ordered atom quadruplets define each chi angle of every standard amino acid.
//!
//! ## Usage
//!
//! The built-in table is compiled into the library; a replacement can be loaded
//! from a TOML file.
//!
//! ```ignore
//! use chiscan::core::topology::registry::ChiDefinitionTable;
//!
//! let table = ChiDefinitionTable::standard();
//! let leu = table.get("LEU").unwrap();
//! ```

pub mod registry;
