//! Data access: joined dimension + observation rows for each indicator.

use rusqlite::Connection;
use rusqlite::types::Value;

use crate::domain::{Indicator, RawObservation};
use crate::error::AppError;

/// Raw rows for both indicators. An absent table yields an empty vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTables {
    pub ipc: Vec<RawObservation>,
    pub ipv: Vec<RawObservation>,
}

pub fn read_tables(conn: &Connection) -> Result<RawTables, AppError> {
    let tables = RawTables {
        ipc: read_indicator(conn, Indicator::Ipc)?,
        ipv: read_indicator(conn, Indicator::Ipv)?,
    };
    tracing::info!(ipc = tables.ipc.len(), ipv = tables.ipv.len(), "loaded raw rows");
    Ok(tables)
}

/// Inner join of the indicator's table pair, in insertion order.
///
/// A missing table is logged and treated as "no data"; other store errors
/// propagate.
pub fn read_indicator(conn: &Connection, indicator: Indicator) -> Result<Vec<RawObservation>, AppError> {
    let series = indicator.series_table();
    let data = indicator.data_table();
    let fk = indicator.fk_column();
    let sql = format!(
        "SELECT s.id, s.COD, s.Nombre, d.Fecha, d.FK_Periodo, d.Anyo, d.Valor
         FROM {series} s JOIN {data} d ON s.id = d.{fk}
         ORDER BY d.id"
    );

    let mut stmt = match conn.prepare(&sql) {
        Ok(stmt) => stmt,
        Err(e) if is_missing_table(&e) => {
            tracing::info!("{} table not found: {e}", indicator.label());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(AppError::store(format!(
                "Failed to query {} rows: {e}",
                indicator.label()
            )));
        }
    };

    let rows = stmt
        .query_map([], |row| {
            Ok(RawObservation {
                series_id: row.get(0)?,
                cod: value_to_text(row.get(1)?),
                nombre: value_to_text(row.get(2)?),
                fecha: value_to_text(row.get(3)?),
                periodo: value_to_text(row.get(4)?),
                anyo: value_to_text(row.get(5)?),
                valor: value_to_f64(row.get(6)?),
            })
        })
        .map_err(|e| AppError::store(format!("Failed to read {} rows: {e}", indicator.label())))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::store(format!("Failed to decode {} row: {e}", indicator.label())))
}

// Prepare errors surface either as `SqliteFailure` or, with offsets available,
// as `SqlInputError`; both render the engine message.
fn is_missing_table(err: &rusqlite::Error) -> bool {
    err.to_string().contains("no such table")
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(v) => v.to_string(),
        Value::Real(v) => v.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
    }
}

/// Decimal columns leave the store as plain `f64`, whatever their storage class.
fn value_to_f64(value: Value) -> Option<f64> {
    let v = match value {
        Value::Integer(v) => v as f64,
        Value::Real(v) => v,
        Value::Text(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::Blob(_) => return None,
    };
    v.is_finite().then_some(v)
}
