//! Column layout detection for upstream log files.

/// Header of upstream files carrying a single peak utilization column.
pub const REDUCED_HEADER: &str = r#""ID","Fiber Node","Peak Utilization""#;

/// Header of upstream files carrying the split utilization columns.
pub const EXTENDED_HEADER: &str =
    r#""ID","Fiber Node","Low Split Utilization","High Split Utilization""#;

/// Known column layouts of a log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// `id, name, utilization`
    Reduced,
    /// `id, name, low split, high split, low split + OFDMA`
    Extended,
}

impl SchemaVariant {
    /// Minimum number of fields a data row needs under this layout.
    pub fn field_count(self) -> usize {
        match self {
            SchemaVariant::Reduced => 3,
            SchemaVariant::Extended => 5,
        }
    }
}

/// Picks the layout for an upstream file from its first line.
///
/// Anything that does not start with one of the known headers is read as
/// [`SchemaVariant::Extended`].
pub fn detect_schema(header: &str) -> SchemaVariant {
    if header.starts_with(REDUCED_HEADER) {
        SchemaVariant::Reduced
    } else {
        // covers EXTENDED_HEADER and unrecognised headers alike
        SchemaVariant::Extended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_header_with_trailing_columns() {
        let header = format!("{REDUCED_HEADER},\"Timestamp\"");
        assert_eq!(detect_schema(&header), SchemaVariant::Reduced);
    }

    #[test]
    fn extended_header() {
        let header = format!("{EXTENDED_HEADER},\"Low Split + OFDMA Utilization\"");
        assert_eq!(detect_schema(&header), SchemaVariant::Extended);
    }

    #[test]
    fn unknown_header_falls_back_to_extended() {
        assert_eq!(detect_schema("node,name,value"), SchemaVariant::Extended);
        assert_eq!(detect_schema(""), SchemaVariant::Extended);
    }

    #[test]
    fn prefix_match_is_exact() {
        // unquoted variant of the reduced header is not recognised
        assert_eq!(
            detect_schema("ID,Fiber Node,Peak Utilization"),
            SchemaVariant::Extended
        );
    }
}
