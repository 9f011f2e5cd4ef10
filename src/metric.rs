//! The fixed set of utilization metrics tracked per fiber node.

use std::fmt;

/// A utilization metric reported by one of the log families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Downstream,
    DownstreamOfdm,
    UpstreamLowSplit,
    UpstreamHighSplit,
    UpstreamOfdma,
    UpstreamLowPlusOfdma,
}

impl Metric {
    pub const COUNT: usize = 6;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Downstream,
        Metric::DownstreamOfdm,
        Metric::UpstreamLowSplit,
        Metric::UpstreamHighSplit,
        Metric::UpstreamOfdma,
        Metric::UpstreamLowPlusOfdma,
    ];

    /// Slot of this metric in per-node storage.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Downstream => "downstream",
            Metric::DownstreamOfdm => "downstream_ofdm",
            Metric::UpstreamLowSplit => "upstream_low_split",
            Metric::UpstreamHighSplit => "upstream_high_split",
            Metric::UpstreamOfdma => "upstream_ofdma",
            Metric::UpstreamLowPlusOfdma => "upstream_low_plus_ofdma",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_all_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }
}
