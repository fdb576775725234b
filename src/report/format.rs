//! Plain-text formatting of run results.
//!
//! Formatting stays here so the pipeline only returns data and the output
//! layout can change without touching it.

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{ComparativeRecord, Indicator, LoadMode};
use crate::store::LoadReport;

/// One-paragraph summary of an ingestion run.
pub fn format_load_summary(indicator: Indicator, mode: LoadMode, report: &LoadReport) -> String {
    let mut out = format!(
        "{indicator}: {} series, {} observations loaded",
        report.series, report.observations
    );
    if mode == LoadMode::Replace {
        out.push_str(&format!(" (replaced {} series)", report.replaced_series));
    }
    out
}

/// Files written, charts skipped or failed, and the comparative table.
pub fn format_analysis_summary(output: &AnalysisOutput) -> String {
    let mut out = String::new();

    out.push_str("=== ine - IPC / IPV ===\n");
    out.push_str(&format!(
        "Rows: IPC={} IPV={} | years compared={}\n",
        output.tables.ipc.len(),
        output.tables.ipv.len(),
        output.tables.comparative.len(),
    ));
    if let Some(regional) = &output.regional {
        out.push_str(&format!("Regions: {}\n", regional.len()));
    }

    out.push_str("\nFiles:\n");
    for path in output.exports.iter().chain(&output.charts.written) {
        out.push_str(&format!("- {}\n", path.display()));
    }
    for name in &output.charts.skipped {
        out.push_str(&format!("  (skipped {name})\n"));
    }
    for (name, err) in &output.charts.failed {
        out.push_str(&format!("  (failed {name}) {err}\n"));
    }

    if !output.tables.comparative.is_empty() {
        out.push('\n');
        out.push_str(&format_comparative_table(&output.tables.comparative));
    }

    out
}

/// Annual comparison, one line per year.
pub fn format_comparative_table(rows: &[ComparativeRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:>10} {:>8} {:>10} {:>8} {:>8}\n",
        "Anyo", "IPC", "var%", "IPV", "var%", "ratio"
    ));
    out.push_str(&format!(
        "{:-<6} {:-<10} {:-<8} {:-<10} {:-<8} {:-<8}\n",
        "", "", "", "", "", ""
    ));

    for r in rows {
        out.push_str(
            format!(
                "{:<6} {:>10.3} {:>8} {:>10.3} {:>8} {:>8}\n",
                r.anyo,
                r.ipc_mean,
                fmt_opt(r.ipc_variation, 2),
                r.ipv_mean,
                fmt_opt(r.ipv_variation, 2),
                fmt_opt(r.ratio, 4),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}
