//! Remote data sources.
//!
//! - INE API client and payload validation (`ine`)
//! - regional enrichment of the IPC by autonomous community (`regions`)

pub mod ine;
pub mod regions;

pub use ine::{IneClient, SeriesPayload};
pub use regions::extract_regional_variations;
