//! Shared pipeline steps used by every subcommand.
//!
//! Ingestion: INE fetch -> payload validation -> store (one transaction)
//! Analysis: store -> derived tables -> CSV exports -> charts (+ regional map)

use std::path::PathBuf;

use crate::data::ine::observation_span;
use crate::data::{IneClient, extract_regional_variations};
use crate::domain::{AnalysisConfig, Indicator, LoadMode, RegionalVariation, StoreConfig};
use crate::error::AppError;
use crate::io::export::export_tables;
use crate::plot::{ChartReport, render_charts};
use crate::store::{LoadReport, load_series, read_tables};
use crate::transform::{DerivedTables, derive_tables};

/// Outputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub tables: DerivedTables,
    pub exports: Vec<PathBuf>,
    pub charts: ChartReport,
    /// `None` when the regional fetch was skipped or failed.
    pub regional: Option<Vec<RegionalVariation>>,
}

/// Fetch one indicator and load it into the store.
pub fn run_ingest(
    client: &IneClient,
    store: &StoreConfig,
    indicator: Indicator,
    mode: LoadMode,
) -> Result<LoadReport, AppError> {
    tracing::info!("Fetching {indicator} from INE...");
    let series = client.fetch_indicator(indicator)?;

    if let Some((first, last)) = observation_span(&series) {
        tracing::info!("{indicator}: {} series, {first} .. {last}", series.len());
    }

    let mut conn = crate::store::open(store)?;
    let report = load_series(&mut conn, indicator, &series, mode)?;

    tracing::info!(
        series = report.series,
        observations = report.observations,
        replaced = report.replaced_series,
        "{indicator} data loaded"
    );
    Ok(report)
}

/// Latest regional IPC variation per autonomous community.
pub fn fetch_regional(client: &IneClient) -> Result<Vec<RegionalVariation>, AppError> {
    tracing::info!("Fetching regional IPC...");
    let series = client.fetch_regional_ipc()?;
    let rows = extract_regional_variations(&series);
    tracing::info!("{} regions with an annual variation", rows.len());
    Ok(rows)
}

/// Full analysis, fetching the regional table unless `skip_regional` is set.
///
/// A failed regional fetch does not stop the exports or the other charts; it is
/// returned once they are done.
pub fn run_analysis(config: &AnalysisConfig, client: &IneClient) -> Result<AnalysisOutput, AppError> {
    if config.skip_regional {
        tracing::info!("Regional IPC fetch skipped");
        return run_analysis_with_regional(config, None);
    }

    match fetch_regional(client) {
        Ok(rows) => run_analysis_with_regional(config, Some(rows)),
        Err(err) => {
            tracing::error!("Regional IPC fetch failed: {err}");
            run_analysis_with_regional(config, None)?;
            Err(err)
        }
    }
}

/// Analysis with pre-fetched regional data (or none).
pub fn run_analysis_with_regional(
    config: &AnalysisConfig,
    regional: Option<Vec<RegionalVariation>>,
) -> Result<AnalysisOutput, AppError> {
    tracing::info!("Starting analysis...");

    let raw = {
        let conn = crate::store::open_existing(&config.store)?;
        read_tables(&conn)?
    };

    let tables = derive_tables(&raw);

    let exports = export_tables(&tables, &config.output.export_dir)?;
    tracing::info!("Exports written to {}", config.output.export_dir.display());

    tracing::info!("Rendering charts...");
    let charts = render_charts(
        &tables,
        regional.as_deref(),
        &config.output.chart_dir,
        config.output.geojson.as_deref(),
    );

    if charts.is_success() {
        tracing::info!("Analysis complete");
    } else {
        tracing::warn!("{} chart(s) failed", charts.failed.len());
    }

    Ok(AnalysisOutput {
        tables,
        exports,
        charts,
        regional,
    })
}
