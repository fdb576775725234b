//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - builds and validates the run configuration
//! - dispatches to the pipeline and prints the summaries

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, IngestArgs, OutputArgs, RunArgs, StoreArgs};
use crate::data::IneClient;
use crate::domain::{AnalysisConfig, Indicator, OutputConfig, StoreConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ine` binary.
pub fn run() -> Result<(), AppError> {
    // Must happen before parsing so `.env` values feed the `env` fallbacks.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    crate::logging::init_logging(cli.verbose);

    match cli.command {
        Command::Ingest(args) => handle_ingest(args),
        Command::Analyze(args) => handle_analyze(args),
        Command::Run(args) => handle_run(args),
    }
}

fn handle_ingest(args: IngestArgs) -> Result<(), AppError> {
    let store = store_config_from_args(&args.store)?;
    tracing::debug!(?store, "store configuration");

    let client = IneClient::new(args.api.api_base);
    let report = pipeline::run_ingest(&client, &store, args.indicator, args.mode)?;

    println!("{}", crate::report::format_load_summary(args.indicator, args.mode, &report));
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.store, &args.output)?;
    let client = IneClient::new(args.api.api_base);
    analyze(&config, &client)
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.store, &args.output)?;
    let client = IneClient::new(args.api.api_base);

    for indicator in Indicator::ALL {
        let report = pipeline::run_ingest(&client, &config.store, indicator, args.mode)?;
        println!("{}", crate::report::format_load_summary(indicator, args.mode, &report));
    }

    analyze(&config, &client)
}

fn analyze(config: &AnalysisConfig, client: &IneClient) -> Result<(), AppError> {
    tracing::debug!(?config, "analysis configuration");

    let output = pipeline::run_analysis(config, client)
        .inspect_err(|err| tracing::error!("Analysis failed: {err}"))?;

    println!("{}", crate::report::format_analysis_summary(&output));

    if let Some((name, err)) = output.charts.failed.first() {
        let message = format!(
            "{} chart(s) failed; first: {name}: {}",
            output.charts.failed.len(),
            err.message()
        );
        tracing::error!("{message}");
        return Err(AppError::new(err.exit_code(), message));
    }
    Ok(())
}

/// Build the store configuration, rejecting database names that are not a
/// plain file stem.
pub fn store_config_from_args(args: &StoreArgs) -> Result<StoreConfig, AppError> {
    let database = args.database.trim();
    if database.is_empty() {
        return Err(AppError::config("Database name must not be empty (MYSQL_DATABASE)."));
    }
    if database.contains(['/', '\\']) || database == "." || database == ".." {
        return Err(AppError::config(format!(
            "Database name '{database}' must be a plain name, not a path (use --data-dir / INE_DATA_DIR)."
        )));
    }

    Ok(StoreConfig {
        host: args.host.clone(),
        user: args.user.clone(),
        password: args.password.clone(),
        database: database.to_string(),
        data_dir: args.data_dir.clone(),
    })
}

pub fn output_config_from_args(args: &OutputArgs) -> OutputConfig {
    OutputConfig {
        export_dir: args.export_dir.clone(),
        chart_dir: args.chart_dir.clone(),
        geojson: args.geojson.clone(),
    }
}

pub fn analysis_config_from_args(store: &StoreArgs, output: &OutputArgs) -> Result<AnalysisConfig, AppError> {
    Ok(AnalysisConfig {
        store: store_config_from_args(store)?,
        output: output_config_from_args(output),
        skip_regional: output.skip_regional,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn store_args(database: &str) -> StoreArgs {
        StoreArgs {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: "secret".to_string(),
            database: database.to_string(),
            data_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn valid_database_name_is_accepted() {
        let cfg = store_config_from_args(&store_args(" fila_2 ")).unwrap();
        assert_eq!(cfg.database, "fila_2");
        assert_eq!(cfg.password, "secret");
    }

    #[test]
    fn empty_or_path_database_names_are_config_errors() {
        for name in ["", "  ", "../x", "a/b", ".."] {
            let err = store_config_from_args(&store_args(name)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{name}");
        }
    }

    #[test]
    fn analysis_config_carries_output_flags() {
        let output = OutputArgs {
            export_dir: PathBuf::from("csv"),
            chart_dir: PathBuf::from("html"),
            geojson: None,
            skip_regional: true,
        };
        let cfg = analysis_config_from_args(&store_args("db"), &output).unwrap();
        assert_eq!(cfg.output.export_dir, PathBuf::from("csv"));
        assert_eq!(cfg.output.chart_dir, PathBuf::from("html"));
        assert!(cfg.skip_regional);
    }
}
