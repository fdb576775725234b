//! Command-line parsing for the INE indicator pipeline.
//!
//! Argument parsing stays here; `app` turns the parsed values into domain
//! configuration and dispatches to the pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::ine::DEFAULT_BASE_URL;
use crate::domain::{Indicator, LoadMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ine", version, about = "INE IPC/IPV ingestion and analysis pipeline")]
pub struct Cli {
    /// Log at debug level (ignored when RUST_LOG is set).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one indicator from the INE API and load it into the store.
    Ingest(IngestArgs),
    /// Read the store, derive the annual tables, export CSVs and render charts.
    Analyze(AnalyzeArgs),
    /// Ingest IPC and IPV, then analyze.
    Run(RunArgs),
}

/// Connection settings for the relational store.
#[derive(Debug, Args, Clone)]
pub struct StoreArgs {
    /// Store host. Only recorded in debug logs; the embedded engine runs in-process.
    #[arg(long = "db-host", env = "MYSQL_HOST", default_value = "localhost")]
    pub host: String,

    /// Store user. Only recorded in debug logs; the database file has no login.
    #[arg(long = "db-user", env = "MYSQL_USER", default_value = "root")]
    pub user: String,

    /// Store password. Not used to open the database file (accepted for
    /// compatibility with existing `.env` files and never logged).
    #[arg(long = "db-password", env = "MYSQL_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database name; the file `<data-dir>/<database>.sqlite3` holds it.
    #[arg(long, env = "MYSQL_DATABASE", default_value = "fila_2")]
    pub database: String,

    /// Directory holding the database file.
    #[arg(long, env = "INE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,
}

/// INE API settings.
#[derive(Debug, Args, Clone)]
pub struct ApiArgs {
    /// Base URL of the INE Tempus web service.
    #[arg(long, env = "INE_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,
}

/// Where and what the analysis writes.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Directory for the CSV exports.
    #[arg(long, env = "INE_EXPORT_DIR", default_value = "data_output")]
    pub export_dir: PathBuf,

    /// Directory for the HTML charts.
    #[arg(long, env = "INE_CHART_DIR", default_value = "visualizations")]
    pub chart_dir: PathBuf,

    /// Autonomous-community boundaries (GeoJSON, `properties.name` per region).
    #[arg(long, env = "INE_GEOJSON", value_name = "GEOJSON")]
    pub geojson: Option<PathBuf>,

    /// Do not fetch the regional IPC table; the map is skipped.
    #[arg(long)]
    pub skip_regional: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct IngestArgs {
    /// Indicator to load.
    #[arg(value_enum)]
    pub indicator: Indicator,

    /// Keep existing rows (append) or truncate and reload (replace).
    #[arg(long, value_enum, default_value_t = LoadMode::Append)]
    pub mode: LoadMode,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Load mode used for both indicators.
    #[arg(long, value_enum, default_value_t = LoadMode::Append)]
    pub mode: LoadMode,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ingest_parses_indicator_and_mode() {
        let cli = Cli::try_parse_from(["ine", "ingest", "ipv", "--mode", "replace", "--database", "test_db"]).unwrap();
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.indicator, Indicator::Ipv);
        assert_eq!(args.mode, LoadMode::Replace);
        assert_eq!(args.store.database, "test_db");
    }

    #[test]
    fn analyze_accepts_output_overrides() {
        let cli = Cli::try_parse_from([
            "ine",
            "-v",
            "analyze",
            "--export-dir",
            "out",
            "--geojson",
            "ccaa.geojson",
            "--skip-regional",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.output.export_dir, PathBuf::from("out"));
        assert_eq!(args.output.geojson, Some(PathBuf::from("ccaa.geojson")));
        assert!(args.output.skip_regional);
    }

    #[test]
    fn unknown_indicator_is_rejected() {
        assert!(Cli::try_parse_from(["ine", "ingest", "gdp"]).is_err());
    }

    #[test]
    fn credential_flags_say_they_are_not_used() {
        let cmd = Cli::command();
        let ingest = cmd.find_subcommand("ingest").unwrap();
        for id in ["host", "user", "password"] {
            let arg = ingest.get_arguments().find(|a| a.get_id() == id).unwrap();
            let help = arg.get_help().unwrap().to_string();
            assert!(help.contains("debug logs") || help.contains("Not used"), "{id}: {help}");
        }
    }
}
