//! Annual aggregation and the IPC/IPV comparison tables.

use std::collections::BTreeMap;

use crate::domain::{AnnualAggregate, CleanObservation, ComparativeRecord, VariationRecord};

/// Mean value and mean variation per year, ascending by year.
///
/// Null variations are ignored; a year whose variations are all null keeps a
/// null mean variation.
pub fn annual_aggregates(rows: &[CleanObservation]) -> Vec<AnnualAggregate> {
    #[derive(Default)]
    struct Acc {
        value_sum: f64,
        value_n: usize,
        var_sum: f64,
        var_n: usize,
    }

    let mut by_year: BTreeMap<i32, Acc> = BTreeMap::new();
    for r in rows {
        let acc = by_year.entry(r.anyo).or_default();
        acc.value_sum += r.valor;
        acc.value_n += 1;
        if let Some(v) = r.variation {
            acc.var_sum += v;
            acc.var_n += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(anyo, acc)| AnnualAggregate {
            anyo,
            mean_value: acc.value_sum / acc.value_n as f64,
            mean_variation: (acc.var_n > 0).then(|| acc.var_sum / acc.var_n as f64),
        })
        .collect()
}

/// Inner join on year; years missing from either side are excluded.
pub fn join_annual(ipc: &[AnnualAggregate], ipv: &[AnnualAggregate]) -> Vec<ComparativeRecord> {
    let ipv_by_year: BTreeMap<i32, &AnnualAggregate> = ipv.iter().map(|a| (a.anyo, a)).collect();

    let mut out: Vec<ComparativeRecord> = ipc
        .iter()
        .filter_map(|c| {
            let v = ipv_by_year.get(&c.anyo)?;
            let ratio = v.mean_value / c.mean_value;
            Some(ComparativeRecord {
                anyo: c.anyo,
                ipc_mean: c.mean_value,
                ipc_variation: c.mean_variation,
                ipv_mean: v.mean_value,
                ipv_variation: v.mean_variation,
                ratio: ratio.is_finite().then_some(ratio),
            })
        })
        .collect();
    out.sort_by_key(|r| r.anyo);
    out
}

/// Year plus both variations, for rows where both are present.
pub fn variation_table(comparative: &[ComparativeRecord]) -> Vec<VariationRecord> {
    comparative
        .iter()
        .filter_map(|r| {
            Some(VariationRecord {
                anyo: r.anyo,
                ipc_variation: r.ipc_variation?,
                ipv_variation: r.ipv_variation?,
            })
        })
        .collect()
}
