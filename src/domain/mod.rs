//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the indicator catalogue (`Indicator`) and its table names
//! - run configuration (`StoreConfig`, `OutputConfig`, `AnalysisConfig`)
//! - raw, cleaned and derived rows (`RawObservation` .. `VariationRecord`)

pub mod types;

pub use types::*;
