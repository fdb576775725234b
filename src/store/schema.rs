//! Idempotent table creation.

use rusqlite::Connection;

use crate::domain::Indicator;
use crate::error::AppError;

/// Create the indicator's dimension and observation tables if absent.
pub fn ensure_schema(conn: &Connection, indicator: Indicator) -> Result<(), AppError> {
    conn.execute_batch(&schema_sql(indicator)).map_err(|e| {
        AppError::store(format!(
            "Failed to create {} tables: {e}",
            indicator.label()
        ))
    })
}

fn schema_sql(indicator: Indicator) -> String {
    let series = indicator.series_table();
    let data = indicator.data_table();
    let fk = indicator.fk_column();
    format!(
        "CREATE TABLE IF NOT EXISTS {series} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            COD VARCHAR(50),
            Nombre VARCHAR(255)
        );
        CREATE TABLE IF NOT EXISTS {data} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            Fecha VARCHAR(50),
            FK_Periodo VARCHAR(50),
            Anyo INT,
            Valor DECIMAL(10, 2),
            {fk} INT,
            FOREIGN KEY ({fk}) REFERENCES {series}(id)
        );"
    )
}
