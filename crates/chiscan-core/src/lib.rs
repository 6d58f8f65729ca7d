//! # chiscan
//!
//! Batch processing of protein structure files: side-chain dihedral (chi angle)
//! reports, their aggregation into one table, and PDB/mmCIF conversion.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`), PDB and
//!   mmCIF I/O through `pdbtbx`, the residue chi-definition table, and dihedral geometry.
//!
//! - **[`engine`]: The Structure Engine.** The `StructureEngine` capability with its
//!   in-process `Session`, atom selectors, configuration, progress reporting, and the
//!   shared `EngineError`. Exactly one structure is loaded at a time while chi angles
//!   are computed; the `LoadGuard` enforces the reset between files.
//!
//! - **[`workflows`]: The Public API.** The chi-angle calculator and its directory batch
//!   driver, the report aggregator, and the format converter.
//!
//! ## Example
//!
//! ```no_run
//! use chiscan::core::topology::registry::ChiDefinitionTable;
//! use chiscan::engine::config::BatchConfig;
//! use chiscan::engine::progress::ProgressReporter;
//! use chiscan::engine::session::Session;
//! use chiscan::workflows::batch::run_directory;
//! use std::path::Path;
//!
//! let mut session = Session::new();
//! let outcomes = run_directory(
//!     &mut session,
//!     Path::new("structures"),
//!     &ChiDefinitionTable::standard(),
//!     &BatchConfig::default(),
//!     &ProgressReporter::new(),
//! )?;
//! println!("wrote {} reports", outcomes.len());
//! # Ok::<(), chiscan::engine::error::EngineError>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
