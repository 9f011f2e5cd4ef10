//! Fiber Node Peak Utilization - Main Application
//!
//! # Usage
//!
//! ```bash
//! # Downstream peaks for one week, JSON on stdout
//! $ fiber_node_peaks --start "03/01/2024 00:00:00" --end "03/08/2024 00:00:00"
//!
//! # Upstream peaks read from a custom root, written to a file
//! $ fiber_node_peaks --upstream --root /data/SessionRecords \
//!     --start "03/01/2024 00:00:00" --end "03/08/2024 00:00:00" --output peaks.json
//! ```

use fiber_node_peaks::fiber_node_peaks_main;

/// call from library
fn main() -> anyhow::Result<()> {
    fiber_node_peaks_main()
}
