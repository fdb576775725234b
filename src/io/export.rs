//! Export derived tables to CSV.
//!
//! The files are meant to be easy to consume in spreadsheets or downstream
//! scripts: fixed column order, one header row, empty fields for nulls.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{CleanObservation, Indicator};
use crate::error::AppError;
use crate::transform::DerivedTables;

pub const IPC_FILE: &str = "Evolucion_IPC.csv";
pub const IPV_FILE: &str = "Evolucion_IPV.csv";
pub const COMPARATIVE_FILE: &str = "Comparativa_IPC_IPV.csv";
pub const VARIATIONS_FILE: &str = "Variaciones_Interanuales.csv";

/// Write every non-empty table under `dir` and return the written paths.
///
/// Empty tables are skipped without creating a file.
pub fn export_tables(tables: &DerivedTables, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::output(format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();

    if !tables.ipc.is_empty() {
        let path = dir.join(IPC_FILE);
        write_observations_csv(&path, Indicator::Ipc, &tables.ipc)?;
        written.push(path);
    }
    if !tables.ipv.is_empty() {
        let path = dir.join(IPV_FILE);
        write_observations_csv(&path, Indicator::Ipv, &tables.ipv)?;
        written.push(path);
    }
    if !tables.comparative.is_empty() {
        let path = dir.join(COMPARATIVE_FILE);
        write_records_csv(&path, &tables.comparative)?;
        written.push(path);
    }
    if !tables.variations.is_empty() {
        let path = dir.join(VARIATIONS_FILE);
        write_records_csv(&path, &tables.variations)?;
        written.push(path);
    }

    for path in &written {
        tracing::info!("  {}", path.display());
    }
    Ok(written)
}

/// Cleaned series rows; the variation column is named after the indicator.
pub fn write_observations_csv(
    path: &Path,
    indicator: Indicator,
    rows: &[CleanObservation],
) -> Result<(), AppError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| create_err(path, e))?;

    wtr.write_record([
        "id",
        "COD",
        "Nombre",
        "Fecha",
        "FK_Periodo",
        "Anyo",
        "Valor",
        indicator.variation_column(),
    ])
    .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        wtr.serialize((
            r.series_id,
            &r.cod,
            &r.nombre,
            &r.fecha,
            &r.periodo,
            r.anyo,
            r.valor,
            r.variation,
        ))
        .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::output(format!("Failed to flush '{}': {e}", path.display())))
}

/// Records whose field names are the CSV header.
pub fn write_records_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| create_err(path, e))?;
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::output(format!("Failed to flush '{}': {e}", path.display())))
}

fn create_err(path: &Path, e: csv::Error) -> AppError {
    AppError::output(format!("Failed to create export CSV '{}': {e}", path.display()))
}
