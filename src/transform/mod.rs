//! Transform engine: raw store rows -> cleaned series and comparison tables.
//!
//! Steps, per indicator: parse year/value (dropping bad rows), stable sort by
//! year, positional variation, annual means. The two indicators then meet in an
//! inner join on year, which feeds the ratio and the reduced variations table.

use crate::domain::{CleanObservation, ComparativeRecord, VariationRecord};
use crate::store::RawTables;

pub mod annual;
pub mod clean;

pub use annual::{annual_aggregates, join_annual, variation_table};
pub use clean::{Cleaned, clean_observations, parse_year};

/// Every table produced by one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedTables {
    pub ipc: Vec<CleanObservation>,
    pub ipv: Vec<CleanObservation>,
    pub comparative: Vec<ComparativeRecord>,
    pub variations: Vec<VariationRecord>,
}

/// Run the full transform.
///
/// When either indicator has no usable rows, the comparative and variations
/// tables come back empty; the per-indicator tables are still returned.
pub fn derive_tables(raw: &RawTables) -> DerivedTables {
    let ipc = clean_observations(&raw.ipc);
    let ipv = clean_observations(&raw.ipv);

    for (label, cleaned) in [("IPC", &ipc), ("IPV", &ipv)] {
        if cleaned.dropped > 0 {
            tracing::info!(dropped = cleaned.dropped, "{label}: dropped rows without a parseable year or value");
        }
    }

    let (comparative, variations) = if ipc.rows.is_empty() || ipv.rows.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let comparative = join_annual(&annual_aggregates(&ipc.rows), &annual_aggregates(&ipv.rows));
        let variations = variation_table(&comparative);
        (comparative, variations)
    };

    tracing::info!(
        ipc = ipc.rows.len(),
        ipv = ipv.rows.len(),
        comparative = comparative.len(),
        variations = variations.len(),
        "transformations complete"
    );

    DerivedTables {
        ipc: ipc.rows,
        ipv: ipv.rows,
        comparative,
        variations,
    }
}
