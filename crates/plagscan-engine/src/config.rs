//! Configuration for analysis runs
//!
//! Cutoffs, the suspect threshold, the header marker and the policy for
//! unreadable documents.

use crate::{EngineError, Result};
use plagscan_domain::suspect::DEFAULT_SUSPECT_THRESHOLD;
use plagscan_domain::tier::{DEFAULT_HIGH_CUTOFF, DEFAULT_LOW_CUTOFF, DEFAULT_MID_CUTOFF};
use plagscan_domain::{Cutoffs, ThresholdClassifier};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with documents that could not be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Leave the subject out of the matrix and report it
    #[default]
    Skip,
    /// Keep the subject in the matrix with failed cells
    Include,
    /// Abort the whole run
    Abort,
}

/// Risk-tier cutoffs as they appear in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffsConfig {
    /// Scores at or above this are high risk
    /// Default: 80.0
    #[serde(default = "default_high")]
    pub high: f64,

    /// Scores at or above this are mid risk
    /// Default: 60.0
    #[serde(default = "default_mid")]
    pub mid: f64,

    /// Scores at or below this are low risk
    /// Default: 30.0
    #[serde(default = "default_low")]
    pub low: f64,
}

impl CutoffsConfig {
    /// Validate into domain cutoffs
    pub fn to_cutoffs(&self) -> Result<Cutoffs> {
        Ok(Cutoffs::new(self.high, self.mid, self.low)?)
    }
}

impl Default for CutoffsConfig {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_CUTOFF,
            mid: DEFAULT_MID_CUTOFF,
            low: DEFAULT_LOW_CUTOFF,
        }
    }
}

fn default_high() -> f64 {
    DEFAULT_HIGH_CUTOFF
}

fn default_mid() -> f64 {
    DEFAULT_MID_CUTOFF
}

fn default_low() -> f64 {
    DEFAULT_LOW_CUTOFF
}

fn default_suspect_threshold() -> f64 {
    DEFAULT_SUSPECT_THRESHOLD
}

/// Configuration for the analysis engine
///
/// # Examples
///
/// ```
/// use plagscan_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.suspect_threshold, 80.0);
///
/// let config = EngineConfig::from_toml_str("suspect_threshold = 70.0").unwrap();
/// assert_eq!(config.suspect_threshold, 70.0);
/// assert_eq!(config.cutoffs.high, 80.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pairs scoring at or above this are reported as suspects
    /// Default: 80.0
    #[serde(default = "default_suspect_threshold")]
    pub suspect_threshold: f64,

    /// Delimiter line after which a document's body begins
    /// Default: none (the whole document is the body)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_marker: Option<String>,

    /// Handling of unreadable documents
    /// Default: skip
    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,

    /// Ignore very frequent characters when seeding matches in long documents
    /// Default: false
    #[serde(default)]
    pub autojunk: bool,

    /// Risk-tier cutoffs
    #[serde(default)]
    pub cutoffs: CutoffsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suspect_threshold: DEFAULT_SUSPECT_THRESHOLD,
            header_marker: None,
            on_unreadable: UnreadablePolicy::Skip,
            autojunk: false,
            cutoffs: CutoffsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Strict configuration: lower cutoffs, more pairs flagged
    ///
    /// - High: 70, Mid: 50, Low: 20
    /// - Suspect threshold: 70
    pub fn strict() -> Self {
        Self {
            cutoffs: CutoffsConfig {
                high: 70.0,
                mid: 50.0,
                low: 20.0,
            },
            suspect_threshold: 70.0,
            ..Self::default()
        }
    }

    /// Lenient configuration: only near-copies are flagged
    ///
    /// - High: 90, Mid: 75, Low: 40
    /// - Suspect threshold: 90
    pub fn lenient() -> Self {
        Self {
            cutoffs: CutoffsConfig {
                high: 90.0,
                mid: 75.0,
                low: 40.0,
            },
            suspect_threshold: 90.0,
            ..Self::default()
        }
    }

    /// Parse from a TOML document (missing keys take their defaults)
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check cutoff ordering and the suspect threshold range
    pub fn validate(&self) -> Result<()> {
        self.cutoffs.to_cutoffs()?;
        if !(0.0..=100.0).contains(&self.suspect_threshold) {
            return Err(EngineError::Config(format!(
                "suspect_threshold must be within [0, 100], got {}",
                self.suspect_threshold
            )));
        }
        Ok(())
    }

    /// Build the classifier for these cutoffs
    pub fn classifier(&self) -> Result<ThresholdClassifier> {
        Ok(ThresholdClassifier::new(self.cutoffs.to_cutoffs()?)?)
    }

    /// Header marker, ignoring an empty string
    pub fn header_marker(&self) -> Option<&str> {
        self.header_marker.as_deref().filter(|m| !m.is_empty())
    }
}
