//! Input/output helpers.
//!
//! - CSV exports of the derived tables (`export`)
//! - region boundary GeoJSON for the choropleth (`boundaries`)

pub mod boundaries;
pub mod export;

pub use boundaries::*;
pub use export::*;
