//! # Row Parsing
//!
//! Splits one log line into a node id, a display name and the utilization
//! values its layout defines. Parsing is deliberately tolerant: short rows
//! are skipped as a whole, and individual values that are not numbers are
//! dropped without affecting the rest of the row.

use crate::metric::Metric;
use crate::schema::SchemaVariant;

/// Metrics carried by the value columns of an extended upstream row, in
/// column order.
const EXTENDED_METRICS: &[Metric] = &[
    Metric::UpstreamLowSplit,
    Metric::UpstreamHighSplit,
    Metric::UpstreamLowPlusOfdma,
];

static SINGLE_METRICS: [Metric; Metric::COUNT] = Metric::ALL;

/// How the columns of a file map onto metrics.
///
/// Resolved once per file and passed to every [`parse_row`] call for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub schema: SchemaVariant,
    metrics: &'static [Metric],
}

impl ColumnLayout {
    /// Reduced layout whose single value column feeds `metric`.
    ///
    /// Downstream files always use this shape.
    pub fn reduced(metric: Metric) -> Self {
        Self {
            schema: SchemaVariant::Reduced,
            metrics: std::slice::from_ref(&SINGLE_METRICS[metric.index()]),
        }
    }

    /// Layout for an upstream file whose header selected `schema`.
    pub fn upstream(schema: SchemaVariant) -> Self {
        match schema {
            SchemaVariant::Reduced => Self::reduced(Metric::UpstreamOfdma),
            SchemaVariant::Extended => Self {
                schema,
                metrics: EXTENDED_METRICS,
            },
        }
    }

    pub fn metrics(&self) -> &'static [Metric] {
        self.metrics
    }
}

/// Field splitting and unquoting characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub separator: char,
    pub quote: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            separator: ',',
            quote: '"',
        }
    }
}

/// A row that yielded at least one value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub values: Vec<(Metric, f64)>,
}

/// Why a row contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewFields { found: usize, required: usize },
    NoNumericValues,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<'a> {
    Parsed(ParsedRow<'a>),
    Skipped(SkipReason),
}

/// Parses one data line under `layout`.
///
/// # Arguments
///
/// * `line` - Raw line, without its terminator
/// * `layout` - Column layout resolved for the file
/// * `dialect` - Separator and quote characters
///
/// # Returns
///
/// * `RowOutcome` - The id, name and parsed values, or why the row was skipped
pub fn parse_row<'a>(line: &'a str, layout: &ColumnLayout, dialect: &Dialect) -> RowOutcome<'a> {
    let fields: Vec<&str> = line.split(dialect.separator).collect();

    let required = layout.schema.field_count();
    if fields.len() < required {
        return RowOutcome::Skipped(SkipReason::TooFewFields {
            found: fields.len(),
            required,
        });
    }

    let id = unquote(fields[0], dialect.quote);
    let name = unquote(fields[1], dialect.quote);

    let values: Vec<(Metric, f64)> = layout
        .metrics
        .iter()
        .zip(&fields[2..])
        .filter_map(|(&metric, raw)| parse_value(raw, dialect.quote).map(|v| (metric, v)))
        .collect();

    if values.is_empty() {
        return RowOutcome::Skipped(SkipReason::NoNumericValues);
    }

    RowOutcome::Parsed(ParsedRow { id, name, values })
}

/// Removes one quote character from each end of `field`, where present.
fn unquote(field: &str, quote: char) -> &str {
    let field = field.strip_prefix(quote).unwrap_or(field);
    field.strip_suffix(quote).unwrap_or(field)
}

fn parse_value(raw: &str, quote: char) -> Option<f64> {
    unquote(raw, quote)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
