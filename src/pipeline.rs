//! # Peak Report Pipeline
//!
//! Drives one run end to end: expand the window into day directories for
//! both families, stream every log file through the row parser into one
//! [`PeakAggregator`] per family, then merge the two tables.
//!
//! Failures below the run level never abort it. A missing day directory or an
//! unreadable directory or file is logged and skipped, so the caller always
//! gets the best partial report available. Malformed rows are skipped
//! silently.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregator::PeakAggregator;
use crate::config::{Mode, PeakConfig};
use crate::date_range::{RunWindow, expand_day_directories, parse_timestamp};
use crate::directories::{list_log_files, retain_existing_directories};
use crate::error::{PeakError, Result};
use crate::merge::{MergedTable, merge_tables};
use crate::metric::Metric;
use crate::row_parser::{ColumnLayout, Dialect, RowOutcome, parse_row};
use crate::schema::detect_schema;

/// Inputs supplied by the host for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Window start, `MM/DD/YYYY HH:MM:SS`.
    pub start: String,
    /// Window end, `MM/DD/YYYY HH:MM:SS`.
    pub end: String,
    pub mode: Mode,
}

/// How the files of one family are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// No header handling; every line uses the reduced layout for `Metric`.
    Fixed(Metric),
    /// First line is a header that selects the layout.
    HeaderSelected,
}

impl FileKind {
    /// File kinds of family A and family B in `mode`.
    pub fn for_mode(mode: Mode) -> (FileKind, FileKind) {
        match mode {
            Mode::Downstream => (
                FileKind::Fixed(Metric::Downstream),
                FileKind::Fixed(Metric::DownstreamOfdm),
            ),
            Mode::Upstream => (FileKind::HeaderSelected, FileKind::HeaderSelected),
        }
    }
}

/// Counters describing what a run touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub directories_scanned: usize,
    pub directories_missing: usize,
    pub directories_failed: usize,
    pub files_read: usize,
    pub files_failed: usize,
    pub rows_parsed: usize,
    pub rows_skipped: usize,
}

impl RunStats {
    fn add(&mut self, other: &RunStats) {
        self.directories_scanned += other.directories_scanned;
        self.directories_missing += other.directories_missing;
        self.directories_failed += other.directories_failed;
        self.files_read += other.files_read;
        self.files_failed += other.files_failed;
        self.rows_parsed += other.rows_parsed;
        self.rows_skipped += other.rows_skipped;
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct PeakReport {
    pub nodes: MergedTable,
    pub stats: RunStats,
}

impl PeakReport {
    /// Renders the merged node table as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(&self.nodes)?
        } else {
            serde_json::to_string(&self.nodes)?
        };
        Ok(json)
    }
}

/// Runs the pipeline for `request`.
///
/// # Returns
///
/// * `Ok(Some(report))` - The merged report
/// * `Ok(None)` - A timestamp was malformed and strict checking is off; nothing was read
/// * `Err(PeakError::InvalidTimestamp)` - A timestamp was malformed under strict checking
pub fn run(config: &PeakConfig, request: &RunRequest) -> Result<Option<PeakReport>> {
    let Some(window) = RunWindow::parse(&request.start, &request.end) else {
        if config.strict_timestamps {
            let value = if parse_timestamp(&request.start).is_none() {
                &request.start
            } else {
                &request.end
            };
            return Err(PeakError::InvalidTimestamp {
                value: value.clone(),
            });
        }
        debug!(
            start = %request.start,
            end = %request.end,
            "window does not parse, producing no output"
        );
        return Ok(None);
    };

    info!(
        mode = ?request.mode,
        days = window.span_days(),
        root = %config.root.display(),
        "building peak report"
    );

    let categories = config.categories(request.mode);
    let (kind_a, kind_b) = FileKind::for_mode(request.mode);
    let dialect = config.dialect();
    let mut stats = RunStats::default();

    let family_a = collect_family(
        &config.root.join(&categories.family_a),
        &window,
        kind_a,
        &dialect,
        config.parallel,
        &mut stats,
    );
    let family_b = collect_family(
        &config.root.join(&categories.family_b),
        &window,
        kind_b,
        &dialect,
        config.parallel,
        &mut stats,
    );

    let nodes = merge_tables(&family_a, &family_b);

    info!(
        nodes = nodes.len(),
        files = stats.files_read,
        files_failed = stats.files_failed,
        directories_missing = stats.directories_missing,
        rows_skipped = stats.rows_skipped,
        "peak report complete"
    );

    Ok(Some(PeakReport { nodes, stats }))
}

/// Builds the peak table of one family over every day of `window`.
pub fn collect_family(
    category_root: &Path,
    window: &RunWindow,
    kind: FileKind,
    dialect: &Dialect,
    parallel: bool,
    stats: &mut RunStats,
) -> PeakAggregator {
    let (directories, missing) =
        retain_existing_directories(expand_day_directories(window, category_root));
    stats.directories_missing += missing;

    if !parallel {
        let mut aggregator = PeakAggregator::new();
        for directory in &directories {
            scan_directory(directory, kind, dialect, &mut aggregator, stats);
        }
        return aggregator;
    }

    let (aggregator, scanned) = directories
        .par_iter()
        .map(|directory| {
            let mut aggregator = PeakAggregator::new();
            let mut local = RunStats::default();
            scan_directory(directory, kind, dialect, &mut aggregator, &mut local);
            (aggregator, local)
        })
        .reduce(
            || (PeakAggregator::new(), RunStats::default()),
            |(mut agg, mut acc), (other, other_stats)| {
                agg.absorb(other);
                acc.add(&other_stats);
                (agg, acc)
            },
        );
    stats.add(&scanned);
    aggregator
}

/// Feeds every file of one day directory into `aggregator`.
fn scan_directory(
    directory: &Path,
    kind: FileKind,
    dialect: &Dialect,
    aggregator: &mut PeakAggregator,
    stats: &mut RunStats,
) {
    let files = match list_log_files(directory) {
        Ok(files) => files,
        Err(e) => {
            warn!(path = %directory.display(), error = %e, "could not list day directory");
            stats.directories_failed += 1;
            return;
        }
    };
    stats.directories_scanned += 1;
    scan_files(&files, kind, dialect, aggregator, stats);
}

/// Feeds each file into `aggregator`, logging and counting the ones that fail.
fn scan_files(
    files: &[PathBuf],
    kind: FileKind,
    dialect: &Dialect,
    aggregator: &mut PeakAggregator,
    stats: &mut RunStats,
) {
    for path in files {
        match process_file(path, kind, dialect, aggregator) {
            Ok(file_stats) => {
                debug!(path = %path.display(), rows = file_stats.rows_parsed, "read log file");
                stats.files_read += 1;
                stats.add(&file_stats);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not process log file");
                stats.files_failed += 1;
            }
        }
    }
}

/// Opens one log file and streams it into `aggregator`.
///
/// The file handle is dropped before this returns, whatever the outcome.
pub fn process_file(
    path: &Path,
    kind: FileKind,
    dialect: &Dialect,
    aggregator: &mut PeakAggregator,
) -> Result<RunStats> {
    let file = File::open(path).map_err(|e| PeakError::io(path, e))?;
    read_log(BufReader::new(file), kind, dialect, aggregator).map_err(|e| PeakError::io(path, e))
}

/// Streams lines from `reader` into `aggregator`.
///
/// For [`FileKind::HeaderSelected`] the first line is consumed as the header
/// and picks the layout for the rest of the file. A leading UTF-8 byte order
/// mark is dropped, and bytes that are not valid UTF-8 decode to U+FFFD so the
/// row is still parsed. Only read failures end the file early.
pub fn read_log<R: BufRead>(
    mut reader: R,
    kind: FileKind,
    dialect: &Dialect,
    aggregator: &mut PeakAggregator,
) -> io::Result<RunStats> {
    let mut stats = RunStats::default();
    let mut buf = Vec::new();
    let mut first_line = true;

    let mut layout = match kind {
        FileKind::Fixed(metric) => Some(ColumnLayout::reduced(metric)),
        FileKind::HeaderSelected => None,
    };

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = decode_line(&buf, first_line);
        first_line = false;

        let Some(active) = layout else {
            layout = Some(ColumnLayout::upstream(detect_schema(&line)));
            continue;
        };

        match parse_row(&line, &active, dialect) {
            RowOutcome::Parsed(row) => {
                aggregator.observe_row(&row);
                stats.rows_parsed += 1;
            }
            RowOutcome::Skipped(_) => stats.rows_skipped += 1,
        }
    }

    Ok(stats)
}

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Strips the line terminator (and the BOM on the first line) and decodes.
fn decode_line(raw: &[u8], first_line: bool) -> Cow<'_, str> {
    let mut bytes = raw.strip_suffix(b"\n").unwrap_or(raw);
    bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    if first_line {
        bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    }
    String::from_utf8_lossy(bytes)
}
