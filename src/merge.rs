//! # Table Merging
//!
//! Joins the two per-family peak tables on node id into the final report
//! rows. A metric with no reading in either family is reported as
//! [`NO_DATA`], keeping "never observed" apart from a genuine 0% peak.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregator::{NodeMetricRecord, PeakAggregator};
use crate::metric::Metric;

/// Reported for a metric with no observed value.
pub const NO_DATA: f64 = -1.0;

/// One output row per fiber node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergedNodeRecord {
    pub fn_name: String,
    pub ds_fn_utilization: f64,
    pub ofdm_fn_utilization: f64,
    pub us_fn_low_split_utilization: f64,
    pub us_fn_high_split_utilization: f64,
    pub ofdma_fn_utilization: f64,
    pub us_fn_low_plus_ofdma_utilization: f64,
}

impl MergedNodeRecord {
    /// Value reported for `metric`.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Downstream => self.ds_fn_utilization,
            Metric::DownstreamOfdm => self.ofdm_fn_utilization,
            Metric::UpstreamLowSplit => self.us_fn_low_split_utilization,
            Metric::UpstreamHighSplit => self.us_fn_high_split_utilization,
            Metric::UpstreamOfdma => self.ofdma_fn_utilization,
            Metric::UpstreamLowPlusOfdma => self.us_fn_low_plus_ofdma_utilization,
        }
    }
}

/// Final report keyed by node id, in id order.
pub type MergedTable = BTreeMap<String, MergedNodeRecord>;

/// Joins `family_a` and `family_b` over the union of their node ids.
///
/// The display name comes from `family_a` when both tables know the node.
/// When both families hold the same metric the larger peak is reported.
pub fn merge_tables(family_a: &PeakAggregator, family_b: &PeakAggregator) -> MergedTable {
    family_a
        .ids()
        .chain(family_b.ids())
        .filter_map(|id| {
            let a = family_a.get(id);
            let b = family_b.get(id);
            let name = a.or(b)?.name.clone();
            Some((id.to_string(), merge_record(name, a, b)))
        })
        .collect()
}

fn merge_record(
    fn_name: String,
    a: Option<&NodeMetricRecord>,
    b: Option<&NodeMetricRecord>,
) -> MergedNodeRecord {
    let peak = |metric: Metric| {
        let from_a = a.and_then(|r| r.peak(metric));
        let from_b = b.and_then(|r| r.peak(metric));
        match (from_a, from_b) {
            (Some(x), Some(y)) => x.max(y),
            (Some(x), None) | (None, Some(x)) => x,
            (None, None) => NO_DATA,
        }
    };

    MergedNodeRecord {
        fn_name,
        ds_fn_utilization: peak(Metric::Downstream),
        ofdm_fn_utilization: peak(Metric::DownstreamOfdm),
        us_fn_low_split_utilization: peak(Metric::UpstreamLowSplit),
        us_fn_high_split_utilization: peak(Metric::UpstreamHighSplit),
        ofdma_fn_utilization: peak(Metric::UpstreamOfdma),
        us_fn_low_plus_ofdma_utilization: peak(Metric::UpstreamLowPlusOfdma),
    }
}
