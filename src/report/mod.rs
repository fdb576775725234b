//! Terminal summaries printed at the end of each subcommand.

pub mod format;

pub use format::{format_analysis_summary, format_comparative_table, format_load_summary};
