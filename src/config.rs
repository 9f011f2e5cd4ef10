//! Run configuration, loaded from TOML and overridden by CLI flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PeakError, Result};
use crate::row_parser::Dialect;

/// Which pair of log families a run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Combined QAM downstream plus downstream OFDM.
    Downstream,
    /// Upstream split utilization plus upstream OFDMA.
    Upstream,
}

impl Mode {
    pub fn from_flag(is_downstream: bool) -> Self {
        if is_downstream {
            Mode::Downstream
        } else {
            Mode::Upstream
        }
    }
}

/// Top-level configuration for a peak report run.
#[derive(Debug, Clone, Deserialize)]
pub struct PeakConfig {
    /// Directory holding one subdirectory per category.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Category directory names for downstream runs.
    #[serde(default = "default_downstream_categories")]
    pub downstream: CategoryPair,

    /// Category directory names for upstream runs.
    #[serde(default = "default_upstream_categories")]
    pub upstream: CategoryPair,

    /// Field separator of the log files. Default: ','.
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Quote character wrapped around fields. Default: '"'.
    #[serde(default = "default_quote")]
    pub quote: char,

    /// Scan day directories on the rayon pool.
    #[serde(default)]
    pub parallel: bool,

    /// Fail on malformed timestamps instead of producing no output.
    #[serde(default)]
    pub strict_timestamps: bool,
}

/// Directory names of the two families read in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryPair {
    pub family_a: String,
    pub family_b: String,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            downstream: default_downstream_categories(),
            upstream: default_upstream_categories(),
            separator: default_separator(),
            quote: default_quote(),
            parallel: false,
            strict_timestamps: false,
        }
    }
}

impl PeakConfig {
    /// Loads a TOML configuration file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PeakError::io(path, e))?;
        Self::from_toml(&contents).map_err(|source| PeakError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn categories(&self, mode: Mode) -> &CategoryPair {
        match mode {
            Mode::Downstream => &self.downstream,
            Mode::Upstream => &self.upstream,
        }
    }

    pub fn dialect(&self) -> Dialect {
        Dialect {
            separator: self.separator,
            quote: self.quote,
        }
    }
}

fn default_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Skyline_Data\DataMiner_Aggregator\SessionRecords")
    } else {
        PathBuf::from("SessionRecords")
    }
}

fn default_downstream_categories() -> CategoryPair {
    CategoryPair {
        family_a: "DS_PEAK".to_string(),
        family_b: "OFDM_PEAK".to_string(),
    }
}

fn default_upstream_categories() -> CategoryPair {
    CategoryPair {
        family_a: "US_PEAK".to_string(),
        family_b: "OFDMA_PEAK".to_string(),
    }
}

fn default_separator() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}
