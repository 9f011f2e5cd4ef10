//! # Fiber Node Peak Utilization
//!
//! Reads per-day utilization logs for a requested time window and reports,
//! per fiber node, the peak value of every downstream and upstream metric.
//!
//! Log trees live under a root directory, one subdirectory per category
//! (`DS_PEAK`, `OFDM_PEAK`, `US_PEAK`, `OFDMA_PEAK`), each split into
//! `yyyy/mm/dd` day directories. Every file in a day directory is read.
//!
//! ## Usage
//!
//! ```no_run
//! use fiber_node_peaks::{Mode, PeakConfig, RunRequest, run};
//!
//! let request = RunRequest {
//!     start: "03/01/2024 00:00:00".to_string(),
//!     end: "03/08/2024 00:00:00".to_string(),
//!     mode: Mode::Downstream,
//! };
//! if let Some(report) = run(&PeakConfig::default(), &request)? {
//!     println!("{}", report.to_json(true)?);
//! }
//! # Ok::<(), fiber_node_peaks::PeakError>(())
//! ```

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod date_range;
pub mod directories;
pub mod error;
pub mod merge;
pub mod metric;
pub mod pipeline;
pub mod row_parser;
pub mod schema;

pub use aggregator::{NodeMetricRecord, PeakAggregator};
pub use cli::fiber_node_peaks_main;
pub use config::{CategoryPair, Mode, PeakConfig};
pub use error::PeakError;
pub use merge::{MergedNodeRecord, MergedTable, NO_DATA, merge_tables};
pub use metric::Metric;
pub use pipeline::{PeakReport, RunRequest, RunStats, run};
