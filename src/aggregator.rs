//! # Peak Aggregation
//!
//! Running maximum of every metric per fiber node, accumulated across all
//! files and days of one run. One [`PeakAggregator`] is built per log family.

use std::collections::HashMap;

use crate::metric::Metric;
use crate::row_parser::ParsedRow;

/// Peaks observed for one node within one family.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMetricRecord {
    /// Display name from the most recently observed row.
    pub name: String,
    peaks: [Option<f64>; Metric::COUNT],
}

impl NodeMetricRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            peaks: [None; Metric::COUNT],
        }
    }

    /// Peak for `metric`, or `None` if no valid value was ever seen.
    pub fn peak(&self, metric: Metric) -> Option<f64> {
        self.peaks[metric.index()]
    }

    /// Records `value` if it is the first or a strictly larger reading.
    fn raise(&mut self, metric: Metric, value: f64) {
        let slot = &mut self.peaks[metric.index()];
        match *slot {
            Some(current) if value <= current => {}
            _ => *slot = Some(value),
        }
    }
}

/// Per-family table of node peaks.
#[derive(Debug, Default, Clone)]
pub struct PeakAggregator {
    nodes: HashMap<String, NodeMetricRecord>,
}

impl PeakAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one reading into the table.
    ///
    /// An unseen node gets a fresh record with only `metric` set. A known
    /// node takes the new display name and keeps the larger of the stored and
    /// new value.
    pub fn observe(&mut self, id: &str, name: &str, metric: Metric, value: f64) {
        if let Some(record) = self.nodes.get_mut(id) {
            if record.name != name {
                record.name = name.to_string();
            }
            record.raise(metric, value);
            return;
        }

        let mut record = NodeMetricRecord::new(name);
        record.raise(metric, value);
        self.nodes.insert(id.to_string(), record);
    }

    /// Folds every value of a parsed row.
    pub fn observe_row(&mut self, row: &ParsedRow<'_>) {
        for &(metric, value) in &row.values {
            self.observe(row.id, row.name, metric, value);
        }
    }

    /// Merges another table of the same family into this one.
    ///
    /// Each metric keeps the larger peak; display names from `other` win.
    pub fn absorb(&mut self, other: PeakAggregator) {
        for (id, incoming) in other.nodes {
            match self.nodes.get_mut(&id) {
                Some(record) => {
                    for metric in Metric::ALL {
                        if let Some(value) = incoming.peak(metric) {
                            record.raise(metric, value);
                        }
                    }
                    record.name = incoming.name;
                }
                None => {
                    self.nodes.insert(id, incoming);
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&NodeMetricRecord> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_max_is_order_independent() {
        for (first, second) in [(42.5, 57.0), (57.0, 42.5)] {
            let mut agg = PeakAggregator::new();
            agg.observe("N1", "Node1", Metric::Downstream, first);
            agg.observe("N1", "Node1", Metric::Downstream, second);
            assert_eq!(agg.get("N1").unwrap().peak(Metric::Downstream), Some(57.0));
        }
    }

    #[test]
    fn metrics_start_absent() {
        let mut agg = PeakAggregator::new();
        agg.observe("N1", "Node1", Metric::UpstreamOfdma, 0.0);

        let record = agg.get("N1").unwrap();
        assert_eq!(record.peak(Metric::UpstreamOfdma), Some(0.0));
        assert_eq!(record.peak(Metric::UpstreamLowSplit), None);
    }

    #[test]
    fn first_value_is_recorded_even_if_negative() {
        let mut agg = PeakAggregator::new();
        agg.observe("N1", "Node1", Metric::UpstreamOfdma, 1.0);
        agg.observe("N1", "Node1", Metric::UpstreamHighSplit, -3.0);
        assert_eq!(agg.get("N1").unwrap().peak(Metric::UpstreamHighSplit), Some(-3.0));
    }

    #[test]
    fn metrics_are_tracked_independently() {
        let mut agg = PeakAggregator::new();
        let rows = [
            ParsedRow {
                id: "N1",
                name: "Node1",
                values: vec![
                    (Metric::UpstreamLowSplit, 10.0),
                    (Metric::UpstreamHighSplit, 20.0),
                    (Metric::UpstreamLowPlusOfdma, 25.0),
                ],
            },
            ParsedRow {
                id: "N1",
                name: "Node1",
                values: vec![
                    (Metric::UpstreamLowSplit, 15.0),
                    (Metric::UpstreamHighSplit, 18.0),
                    (Metric::UpstreamLowPlusOfdma, 30.0),
                ],
            },
        ];
        for row in &rows {
            agg.observe_row(row);
        }

        let record = agg.get("N1").unwrap();
        assert_eq!(record.peak(Metric::UpstreamLowSplit), Some(15.0));
        assert_eq!(record.peak(Metric::UpstreamHighSplit), Some(20.0));
        assert_eq!(record.peak(Metric::UpstreamLowPlusOfdma), Some(30.0));
    }

    #[test]
    fn last_name_wins() {
        let mut agg = PeakAggregator::new();
        agg.observe("N1", "Old", Metric::Downstream, 5.0);
        agg.observe("N1", "New", Metric::Downstream, 1.0);

        let record = agg.get("N1").unwrap();
        assert_eq!(record.name, "New");
        assert_eq!(record.peak(Metric::Downstream), Some(5.0));
    }

    #[test]
    fn absorb_keeps_larger_peaks() {
        let mut left = PeakAggregator::new();
        left.observe("N1", "Node1", Metric::Downstream, 40.0);
        left.observe("N2", "Node2", Metric::Downstream, 10.0);

        let mut right = PeakAggregator::new();
        right.observe("N1", "Node1b", Metric::Downstream, 35.0);
        right.observe("N1", "Node1b", Metric::DownstreamOfdm, 5.0);
        right.observe("N3", "Node3", Metric::Downstream, 1.0);

        left.absorb(right);

        assert_eq!(left.len(), 3);
        let n1 = left.get("N1").unwrap();
        assert_eq!(n1.name, "Node1b");
        assert_eq!(n1.peak(Metric::Downstream), Some(40.0));
        assert_eq!(n1.peak(Metric::DownstreamOfdm), Some(5.0));
        assert!(left.contains("N3"));
    }
}
