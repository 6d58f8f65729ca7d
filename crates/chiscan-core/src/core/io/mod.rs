//! Reading and writing of macromolecular structure files.
//!
//! Parsing and serialization are done by `pdbtbx`. The engine keeps the parsed
//! `pdbtbx::PDB` for saving and queries the
//! [`MolecularSystem`](crate::core::models::system::MolecularSystem) mapped
//! from its first model.

pub mod format;
pub mod structure;
