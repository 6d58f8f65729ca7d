//! # Engine Module
//!
//! The structure-modeling layer the workflows are written against.
//!
//! - **Session** ([`session`]) - the [`StructureEngine`](session::StructureEngine)
//!   capability, the in-process [`Session`](session::Session) implementing it, and
//!   the [`LoadGuard`](session::LoadGuard) that keeps one structure loaded at a time
//! - **Selection** ([`selection`]) - atom selectors and the records handed to iteration callbacks
//! - **Configuration** ([`config`]) - batch, aggregation, and conversion settings with builders
//! - **Progress Monitoring** ([`progress`]) - progress events and the optional callback sink
//! - **Error Handling** ([`error`]) - the [`EngineError`](error::EngineError) type shared by all workflows

pub mod config;
pub mod error;
pub mod progress;
pub mod selection;
pub mod session;
