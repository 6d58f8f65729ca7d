//! # Core Models Module
//!
//! Data structures representing a loaded macromolecular structure.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with coordinates and crystallographic fields
//! - [`residue`] - Residue with sequence number, insertion code, and its atoms
//! - [`chain`] - Chain identifier and its residues in file order
//! - [`system`] - Arena holding all chains, residues, and atoms of one structure
//! - [`site`] - Flat per-atom record produced by the structure reader
//! - [`builder`] - Incremental construction of a system from coordinate records
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use chiscan::core::models::{builder::MolecularSystemBuilder, site::AtomSite};
//!
//! let mut builder = MolecularSystemBuilder::new();
//! builder.push_site(AtomSite { chain_id: "A".into(), name: "CA".into(), ..Default::default() });
//! let system = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod site;
pub mod system;
