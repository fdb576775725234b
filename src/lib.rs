//! `ine-indicators` library crate.
//!
//! The binary (`ine`) is a thin wrapper around this library so the pipeline
//! stages can be tested without spawning processes or reaching the INE API:
//!
//! - `data`: INE client, payload validation, regional enrichment
//! - `store`: SQLite schema, loaders and readers
//! - `transform`: cleaning, variations, annual comparison
//! - `io` and `plot`: CSV exports, boundary file, HTML charts

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod store;
pub mod transform;
