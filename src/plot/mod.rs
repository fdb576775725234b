//! Static charts written as standalone HTML pages (inline SVG via Plotters).
//!
//! - `evolution`: annual mean IPC and IPV, one panel each
//! - `correlation`: IPC vs IPV scatter coloured by year
//! - `choropleth`: latest regional IPC variation per autonomous community
//!
//! Each chart is attempted on its own: a failure is logged and recorded in the
//! returned [`ChartReport`] while the remaining charts are still produced.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::domain::RegionalVariation;
use crate::error::AppError;
use crate::io::boundaries::{read_boundaries, resolve_boundary_path};
use crate::transform::DerivedTables;

pub mod choropleth;
pub mod correlation;
pub mod evolution;
pub mod html;
pub mod scale;

/// Outcome of one visualization pass.
#[derive(Debug, Clone, Default)]
pub struct ChartReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<&'static str>,
    pub failed: Vec<(&'static str, AppError)>,
}

impl ChartReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, name: &'static str, result: Result<PathBuf, AppError>) {
        match result {
            Ok(path) => {
                tracing::info!("  {}", path.display());
                self.written.push(path);
            }
            Err(err) => {
                tracing::error!(chart = name, "{err}");
                self.failed.push((name, err));
            }
        }
    }
}

/// Render every chart under `dir`.
///
/// `regional` is `None` when the regional fetch was skipped or failed.
pub fn render_charts(
    tables: &DerivedTables,
    regional: Option<&[RegionalVariation]>,
    dir: &Path,
    boundary_file: Option<&Path>,
) -> ChartReport {
    let mut report = ChartReport::default();

    if let Err(e) = create_dir_all(dir) {
        let err = AppError::output(format!("Failed to create chart dir '{}': {e}", dir.display()));
        tracing::error!("{err}");
        report.failed.push(("visualizations", err));
        return report;
    }

    if tables.comparative.is_empty() {
        tracing::info!("No data for the evolution and correlation charts");
        report.skipped.push(evolution::FILE_NAME);
        report.skipped.push(correlation::FILE_NAME);
    } else {
        let result = evolution::render_evolution_svg(&tables.comparative)
            .and_then(|svg| write_chart(dir, evolution::FILE_NAME, evolution::TITLE, &svg));
        report.record(evolution::FILE_NAME, result);

        if correlation::scatter_points(&tables.comparative).is_empty() {
            tracing::info!("No year has both means and a ratio; correlation chart skipped");
            report.skipped.push(correlation::FILE_NAME);
        } else {
            let result = correlation::render_correlation_svg(&tables.comparative)
                .and_then(|svg| write_chart(dir, correlation::FILE_NAME, correlation::TITLE, &svg));
            report.record(correlation::FILE_NAME, result);
        }
    }

    match regional {
        Some(rows) if !rows.is_empty() => {
            let path = resolve_boundary_path(boundary_file);
            let result = read_boundaries(&path)
                .and_then(|fc| choropleth::render_choropleth_svg(rows, &fc))
                .and_then(|svg| write_chart(dir, choropleth::FILE_NAME, choropleth::TITLE, &svg));
            report.record(choropleth::FILE_NAME, result);
        }
        _ => {
            tracing::info!("No regional IPC data for the map");
            report.skipped.push(choropleth::FILE_NAME);
        }
    }

    report
}

fn write_chart(dir: &Path, file_name: &str, title: &str, svg: &str) -> Result<PathBuf, AppError> {
    let path = dir.join(file_name);
    html::write_html(&path, title, svg)?;
    Ok(path)
}

pub(crate) fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo <= hi).then_some((lo, hi))
}

/// Min/max of `values` widened by `frac` of their span on both sides.
pub(crate) fn padded_bounds(values: impl Iterator<Item = f64>, frac: f64) -> (f64, f64) {
    let Some((lo, hi)) = min_max(values) else {
        return (0.0, 1.0);
    };
    let span = hi - lo;
    let delta = if span > 0.0 { span * frac } else { lo.abs().max(1.0) * frac };
    (lo - delta, hi + delta)
}

/// Year axis: half a year of slack around the first and last year.
pub(crate) fn year_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match min_max(values) {
        Some((lo, hi)) => (lo - 0.5, hi + 0.5),
        None => (0.0, 1.0),
    }
}
