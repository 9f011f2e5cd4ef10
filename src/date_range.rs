//! # Date Range Expansion
//!
//! Turns a requested time window into the per-day directories that may hold
//! log files for it. Log trees are laid out as `<category>/<yyyy>/<mm>/<dd>`.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};

/// Textual format of the window boundaries supplied by the caller.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Days scanned when start and end fall within the same day.
const MIN_SPAN_DAYS: i64 = 1;

/// A parsed start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RunWindow {
    /// Parses both boundaries, returning `None` if either fails the strict
    /// format check.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }

    /// Number of day directories to visit.
    ///
    /// Whole days between the two instants, taken as an absolute value so an
    /// inverted window still scans backward from `end`, and never less than one.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days().abs().max(MIN_SPAN_DAYS)
    }
}

/// Exact shape of a timestamp: `0` marks a digit, anything else a literal.
const TIMESTAMP_SHAPE: &[u8; 19] = b"00/00/0000 00:00:00";

/// Parses a `MM/DD/YYYY HH:MM:SS` timestamp.
///
/// Every field must be zero-padded to its full width with single separators
/// and no surrounding whitespace; chrono alone would accept looser input.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if !has_timestamp_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

fn has_timestamp_shape(value: &str) -> bool {
    value.len() == TIMESTAMP_SHAPE.len()
        && value
            .bytes()
            .zip(TIMESTAMP_SHAPE)
            .all(|(byte, &expected)| match expected {
                b'0' => byte.is_ascii_digit(),
                literal => byte == literal,
            })
}

/// Expands a window into day directories under `category_root`.
///
/// Paths are produced newest first: the end instant's day, then each
/// preceding day until [`RunWindow::span_days`] directories have been listed.
///
/// # Arguments
///
/// * `window` - The parsed start/end pair
/// * `category_root` - Directory holding the `yyyy/mm/dd` tree for one category
///
/// # Returns
///
/// * `Vec<PathBuf>` - Candidate directories; existence is not checked here
pub fn expand_day_directories(window: &RunWindow, category_root: &Path) -> Vec<PathBuf> {
    let end_day = window.end.date();

    (0..window.span_days())
        .map(|offset| {
            let day = end_day - Duration::days(offset);
            day_directory(category_root, day)
        })
        .collect()
}

fn day_directory(category_root: &Path, day: chrono::NaiveDate) -> PathBuf {
    category_root
        .join(day.format("%Y").to_string())
        .join(day.format("%m").to_string())
        .join(day.format("%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> RunWindow {
        RunWindow::parse(start, end).unwrap()
    }

    #[test]
    fn same_day_window_yields_one_directory() {
        let w = window("03/15/2024 01:00:00", "03/15/2024 23:00:00");
        let paths = expand_day_directories(&w, Path::new("root/DS_PEAK"));
        assert_eq!(paths, vec![PathBuf::from("root/DS_PEAK/2024/03/15")]);
    }

    #[test]
    fn walks_backward_from_end_day() {
        let w = window("02/27/2024 12:00:00", "03/01/2024 12:00:00");
        let paths = expand_day_directories(&w, Path::new("base"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("base/2024/03/01"),
                PathBuf::from("base/2024/02/29"),
                PathBuf::from("base/2024/02/28"),
            ]
        );
    }

    #[test]
    fn partial_days_are_truncated() {
        // 1 day 23 hours
        let w = window("01/01/2024 00:00:00", "01/02/2024 23:00:00");
        assert_eq!(w.span_days(), 1);
    }

    #[test]
    fn inverted_window_uses_absolute_span() {
        let w = window("01/10/2024 00:00:00", "01/07/2024 00:00:00");
        assert_eq!(w.span_days(), 3);

        let paths = expand_day_directories(&w, Path::new("b"));
        assert_eq!(paths.first(), Some(&PathBuf::from("b/2024/01/07")));
        assert_eq!(paths.last(), Some(&PathBuf::from("b/2024/01/05")));
    }

    #[test]
    fn rejects_other_formats() {
        assert!(parse_timestamp("2024-03-15 01:00:00").is_none());
        assert!(parse_timestamp("03/15/2024").is_none());
        assert!(parse_timestamp("13/15/2024 01:00:00").is_none());
        assert!(RunWindow::parse("03/15/2024 01:00:00", "garbage").is_none());
    }

    #[test]
    fn rejects_loose_shapes() {
        for value in [
            "3/5/2024 1:2:3",
            "03/15/202410:00:00",
            "03/15/+2024 10:00:00",
            "03/15/2024  10:00:00",
            " 03/15/2024 10:00:00",
            "03/15/2024 10:00:00 ",
            "03-15-2024 10:00:00",
        ] {
            assert!(parse_timestamp(value).is_none(), "{value:?} should not parse");
        }
    }

    #[test]
    fn accepts_padded_timestamp() {
        let parsed = parse_timestamp("03/05/2024 01:02:03").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-05 01:02:03");
    }
}
