//! Row-level cleaning and positional year-over-year variation.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CleanObservation, RawObservation};

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Cleaned rows plus the number of raw rows dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cleaned {
    pub rows: Vec<CleanObservation>,
    pub dropped: usize,
}

/// First run of digits in `raw` as a year (`"Año 2023"` -> `2023`).
pub fn parse_year(raw: &str) -> Option<i32> {
    DIGITS.find(raw)?.as_str().parse().ok()
}

/// Drop rows without a year or value, sort by year (stable) and attach the
/// positional variation.
pub fn clean_observations(raw: &[RawObservation]) -> Cleaned {
    let mut rows: Vec<CleanObservation> = raw
        .iter()
        .filter_map(|r| {
            let anyo = parse_year(&r.anyo)?;
            let valor = r.valor.filter(|v| v.is_finite())?;
            Some(CleanObservation {
                series_id: r.series_id,
                cod: r.cod.clone(),
                nombre: r.nombre.clone(),
                fecha: r.fecha.clone(),
                periodo: r.periodo.clone(),
                anyo,
                valor,
                variation: None,
            })
        })
        .collect();
    let dropped = raw.len() - rows.len();

    rows.sort_by_key(|r| r.anyo);
    apply_positional_variation(&mut rows);

    Cleaned { rows, dropped }
}

/// `(v[t] - v[t-1]) / v[t-1] * 100` over row order; the lag is the previous
/// row, not the previous calendar year.
pub fn apply_positional_variation(rows: &mut [CleanObservation]) {
    let mut prev: Option<f64> = None;
    for row in rows.iter_mut() {
        row.variation = prev.and_then(|p| pct_change(p, row.valor));
        prev = Some(row.valor);
    }
}

fn pct_change(prev: f64, curr: f64) -> Option<f64> {
    let v = (curr - prev) / prev * 100.0;
    v.is_finite().then_some(v)
}
