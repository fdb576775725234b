//! Shared domain types.
//!
//! These types are intentionally kept plain so they can be:
//!
//! - produced by the store reader and the INE client
//! - transformed in-memory during an analysis run
//! - serialized straight into CSV exports

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// The two indicators persisted in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Indicator {
    /// Consumer price index (Índice de Precios de Consumo).
    Ipc,
    /// Housing price index (Índice de Precios de Vivienda).
    Ipv,
}

impl Indicator {
    pub const ALL: [Indicator; 2] = [Indicator::Ipc, Indicator::Ipv];

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Ipc => "IPC",
            Indicator::Ipv => "IPV",
        }
    }

    /// Dimension table (one row per series).
    pub fn series_table(self) -> &'static str {
        match self {
            Indicator::Ipc => "ipc",
            Indicator::Ipv => "ipv",
        }
    }

    /// Observation table (one row per data point).
    pub fn data_table(self) -> &'static str {
        match self {
            Indicator::Ipc => "data_ipc",
            Indicator::Ipv => "data_ipv",
        }
    }

    /// Foreign-key column in the observation table.
    pub fn fk_column(self) -> &'static str {
        match self {
            Indicator::Ipc => "id_ipc",
            Indicator::Ipv => "id_ipv",
        }
    }

    /// Header of the per-row variation column in CSV exports.
    pub fn variation_column(self) -> &'static str {
        match self {
            Indicator::Ipc => "Variacion_Interanual_IPC",
            Indicator::Ipv => "Variacion_Interanual_IPV",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do with rows already stored for an indicator when ingesting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LoadMode {
    /// Insert on top of existing rows (reruns duplicate series).
    #[default]
    Append,
    /// Delete the indicator's rows and reload them in the same transaction.
    Replace,
}

/// Relational store settings, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Location of the SQLite file backing `database`.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.sqlite3", self.database))
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("database", &self.database)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

/// Where exports and charts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub export_dir: PathBuf,
    pub chart_dir: PathBuf,
    /// Explicit boundary file; `None` resolves `spain_ccaa.geojson` next to the
    /// working directory or the executable.
    pub geojson: Option<PathBuf>,
}

/// Settings for `ine analyze`.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub store: StoreConfig,
    pub output: OutputConfig,
    /// Skip the regional fetch (offline runs); the map is then skipped too.
    pub skip_regional: bool,
}

/// One joined dimension + observation row as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub series_id: i64,
    pub cod: String,
    pub nombre: String,
    pub fecha: String,
    pub periodo: String,
    /// Year as stored; may carry decoration such as `"Año 2023"`.
    pub anyo: String,
    pub valor: Option<f64>,
}

/// A row that survived year/value cleaning, with its positional variation.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanObservation {
    pub series_id: i64,
    pub cod: String,
    pub nombre: String,
    pub fecha: String,
    pub periodo: String,
    pub anyo: i32,
    pub valor: f64,
    pub variation: Option<f64>,
}

/// Per-indicator, per-year means.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualAggregate {
    pub anyo: i32,
    pub mean_value: f64,
    pub mean_variation: Option<f64>,
}

/// IPC and IPV annual aggregates for a year present in both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparativeRecord {
    #[serde(rename = "Anyo")]
    pub anyo: i32,
    #[serde(rename = "IPC_Promedio")]
    pub ipc_mean: f64,
    #[serde(rename = "Variacion_IPC")]
    pub ipc_variation: Option<f64>,
    #[serde(rename = "IPV_Promedio")]
    pub ipv_mean: f64,
    #[serde(rename = "Variacion_IPV")]
    pub ipv_variation: Option<f64>,
    #[serde(rename = "Ratio_IPV_IPC")]
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationRecord {
    #[serde(rename = "Anyo")]
    pub anyo: i32,
    #[serde(rename = "Variacion_IPC")]
    pub ipc_variation: f64,
    #[serde(rename = "Variacion_IPV")]
    pub ipv_variation: f64,
}

/// Latest IPC variation for one autonomous community, keyed by boundary name.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalVariation {
    pub region: String,
    pub variation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_config(password: &str) -> StoreConfig {
        StoreConfig {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: password.to_string(),
            database: "fila_2".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }

    #[test]
    fn database_file_lives_in_data_dir() {
        assert_eq!(store_config("").database_path(), PathBuf::from("data/fila_2.sqlite3"));
    }

    #[test]
    fn debug_output_hides_password() {
        let text = format!("{:?}", store_config("hunter2"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("***"));
    }

    #[test]
    fn indicator_tables() {
        assert_eq!(Indicator::Ipv.series_table(), "ipv");
        assert_eq!(Indicator::Ipv.data_table(), "data_ipv");
        assert_eq!(Indicator::Ipc.fk_column(), "id_ipc");
        assert_eq!(Indicator::Ipc.to_string(), "IPC");
    }
}
