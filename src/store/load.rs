//! Ingestion writer: INE series payloads -> dimension + observation rows.

use rusqlite::{Connection, params};

use crate::data::SeriesPayload;
use crate::domain::{Indicator, LoadMode};
use crate::error::AppError;
use crate::store::schema::ensure_schema;

/// Scale of the `Valor DECIMAL(10, 2)` column.
const VALOR_DECIMALS: i32 = 2;

/// Rows written by one loader run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub series: usize,
    pub observations: usize,
    /// Series rows deleted beforehand (`LoadMode::Replace` only).
    pub replaced_series: usize,
}

/// Insert every series and its observations in a single transaction.
///
/// Observation rows are tagged with the identity the store assigned to their
/// series row. Nothing is committed if any statement fails.
pub fn load_series(
    conn: &mut Connection,
    indicator: Indicator,
    series: &[SeriesPayload],
    mode: LoadMode,
) -> Result<LoadReport, AppError> {
    ensure_schema(conn, indicator)?;

    let series_table = indicator.series_table();
    let data_table = indicator.data_table();
    let fk = indicator.fk_column();

    let tx = conn
        .transaction()
        .map_err(|e| AppError::store(format!("Failed to start transaction: {e}")))?;

    let mut report = LoadReport::default();

    if mode == LoadMode::Replace {
        tx.execute(&format!("DELETE FROM {data_table}"), [])
            .map_err(|e| AppError::store(format!("Failed to clear {data_table}: {e}")))?;
        report.replaced_series = tx
            .execute(&format!("DELETE FROM {series_table}"), [])
            .map_err(|e| AppError::store(format!("Failed to clear {series_table}: {e}")))?;
    }

    {
        let mut insert_series = tx
            .prepare(&format!("INSERT INTO {series_table} (COD, Nombre) VALUES (?1, ?2)"))
            .map_err(|e| AppError::store(format!("Failed to prepare {series_table} insert: {e}")))?;
        let mut insert_obs = tx
            .prepare(&format!(
                "INSERT INTO {data_table} (Fecha, FK_Periodo, Anyo, Valor, {fk}) VALUES (?1, ?2, ?3, ?4, ?5)"
            ))
            .map_err(|e| AppError::store(format!("Failed to prepare {data_table} insert: {e}")))?;

        for s in series {
            let series_id = insert_series
                .insert(params![s.cod, s.nombre])
                .map_err(|e| AppError::store(format!("Failed to insert series {}: {e}", s.cod)))?;
            report.series += 1;

            for p in &s.data {
                let valor = p.valor.as_ref().map(|v| v.rounded(VALOR_DECIMALS));
                insert_obs
                    .execute(params![p.fecha, p.periodo, p.anyo, valor, series_id])
                    .map_err(|e| {
                        AppError::store(format!("Failed to insert observation of {}: {e}", s.cod))
                    })?;
                report.observations += 1;
            }
        }
    }

    tx.commit()
        .map_err(|e| AppError::store(format!("Failed to commit {} load: {e}", indicator.label())))?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ine::parse_series_payload;
    use crate::store::open_in_memory;

    const IPV_BODY: &str = r#"[
        {"COD": "IPV769", "Nombre": "Nacional. General. Índice.", "Data": [
            {"Fecha": 1672531200000, "FK_Periodo": 19, "Anyo": 2023, "Valor": 150.1},
            {"Fecha": 1680300000000, "FK_Periodo": 20, "Anyo": 2023, "Valor": 152.4},
            {"Fecha": 1688162400000, "FK_Periodo": 21, "Anyo": 2023, "Valor": 153.0}
        ]},
        {"COD": "IPV770", "Nombre": "Andalucía. General. Índice.", "Data": [
            {"Fecha": 1672531200000, "FK_Periodo": 19, "Anyo": 2023, "Valor": 140.2}
        ]}
    ]"#;

    fn count(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn inserts_one_dimension_row_per_series_and_all_observations() {
        let mut conn = open_in_memory().unwrap();
        let series = parse_series_payload(IPV_BODY).unwrap();

        let report = load_series(&mut conn, Indicator::Ipv, &series, LoadMode::Append).unwrap();
        assert_eq!(report.series, 2);
        assert_eq!(report.observations, 4);

        assert_eq!(count(&conn, "SELECT COUNT(*) FROM ipv"), 2);
        assert_eq!(
            count(&conn, "SELECT COUNT(*) FROM data_ipv d JOIN ipv s ON s.id = d.id_ipv WHERE s.COD = 'IPV769'"),
            3
        );
        assert_eq!(
            count(&conn, "SELECT COUNT(*) FROM data_ipv d JOIN ipv s ON s.id = d.id_ipv WHERE s.COD = 'IPV770'"),
            1
        );
    }

    #[test]
    fn uses_store_assigned_identity_with_preexisting_rows() {
        let mut conn = open_in_memory().unwrap();
        ensure_schema(&conn, Indicator::Ipv).unwrap();
        conn.execute("INSERT INTO ipv (COD, Nombre) VALUES ('OLD', 'old')", []).unwrap();
        conn.execute("DELETE FROM ipv", []).unwrap();
        conn.execute("INSERT INTO ipv (COD, Nombre) VALUES ('OLD2', 'old2')", []).unwrap();

        let series = parse_series_payload(IPV_BODY).unwrap();
        load_series(&mut conn, Indicator::Ipv, &series, LoadMode::Append).unwrap();

        let orphans = count(
            &conn,
            "SELECT COUNT(*) FROM data_ipv d LEFT JOIN ipv s ON s.id = d.id_ipv WHERE s.id IS NULL",
        );
        assert_eq!(orphans, 0);
        let first_id = count(&conn, "SELECT id FROM ipv WHERE COD = 'IPV769'");
        assert_eq!(
            count(&conn, &format!("SELECT COUNT(*) FROM data_ipv WHERE id_ipv = {first_id}")),
            3
        );
    }

    #[test]
    fn append_duplicates_and_replace_reloads() {
        let mut conn = open_in_memory().unwrap();
        let series = parse_series_payload(IPV_BODY).unwrap();

        load_series(&mut conn, Indicator::Ipv, &series, LoadMode::Append).unwrap();
        load_series(&mut conn, Indicator::Ipv, &series, LoadMode::Append).unwrap();
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM ipv"), 4);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM data_ipv"), 8);

        let report = load_series(&mut conn, Indicator::Ipv, &series, LoadMode::Replace).unwrap();
        assert_eq!(report.replaced_series, 4);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM ipv"), 2);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM data_ipv"), 4);
    }

    #[test]
    fn keeps_source_scalars_in_native_columns() {
        let mut conn = open_in_memory().unwrap();
        let body = r#"{"COD": "IPC251856", "Nombre": "Total Nacional. Índice general. Índice.", "Data": [
            {"Fecha": 1704063600000, "FK_Periodo": 1, "Anyo": "Año 2024", "Valor": "112.30"}
        ]}"#;
        let series = parse_series_payload(body).unwrap();
        load_series(&mut conn, Indicator::Ipc, &series, LoadMode::Append).unwrap();

        let (fecha, anyo, valor): (String, String, f64) = conn
            .query_row("SELECT Fecha, Anyo, Valor FROM data_ipc", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert_eq!(fecha, "1704063600000");
        assert_eq!(anyo, "Año 2024");
        assert!((valor - 112.3).abs() < 1e-9);
    }

    #[test]
    fn values_are_stored_with_two_decimals() {
        let mut conn = open_in_memory().unwrap();
        let body = r#"{"COD": "IPC251856", "Nombre": "Total Nacional.", "Data": [
            {"Fecha": 1704063600000, "FK_Periodo": 1, "Anyo": 2024, "Valor": 112.3456},
            {"Fecha": 1706742000000, "FK_Periodo": 2, "Anyo": 2024, "Valor": null}
        ]}"#;
        let series = parse_series_payload(body).unwrap();
        load_series(&mut conn, Indicator::Ipc, &series, LoadMode::Append).unwrap();

        let valor: f64 = conn
            .query_row("SELECT Valor FROM data_ipc WHERE FK_Periodo = '1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(valor, 112.35);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM data_ipc WHERE Valor IS NULL"), 1);
    }
}
