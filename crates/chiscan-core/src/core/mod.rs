//! # Core Module
//!
//! The stateless foundation of chiscan: data models for loaded structures,
//! structure file I/O through `pdbtbx`, the residue dihedral definition table,
//! and geometry helpers.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, and systems
//! - **File I/O** ([`io`]) - PDB and mmCIF loading and saving via `pdbtbx`
//! - **Structural Knowledge** ([`topology`]) - Side-chain dihedral definitions per residue
//! - **Geometry** ([`utils`]) - Dihedral angle computation

pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
