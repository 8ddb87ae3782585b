//! Risk tier module - classification of similarity scores

use std::fmt;

/// Risk tier of a similarity score
///
/// - High: score at or above the high cutoff
/// - Mid: score at or above the mid cutoff
/// - Low: score at or below the low cutoff
/// - Unclassified: anything in between (or not a number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    /// Little shared text
    Low,

    /// Noticeable overlap
    Mid,

    /// Likely copied
    High,

    /// Between the low and mid cutoffs
    Unclassified,
}

impl RiskTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Mid => "mid",
            RiskTier::High => "high",
            RiskTier::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default cutoff for the high tier
pub const DEFAULT_HIGH_CUTOFF: f64 = 80.0;

/// Default cutoff for the mid tier
pub const DEFAULT_MID_CUTOFF: f64 = 60.0;

/// Default cutoff for the low tier
pub const DEFAULT_LOW_CUTOFF: f64 = 30.0;

/// Error raised when cutoffs violate `high > mid > low`
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdError {
    /// Cutoffs are not strictly ordered or not finite
    InvalidThresholdConfig {
        /// High cutoff as given
        high: f64,
        /// Mid cutoff as given
        mid: f64,
        /// Low cutoff as given
        low: f64,
    },
}

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdError::InvalidThresholdConfig { high, mid, low } => write!(
                f,
                "Invalid threshold config: expected high > mid > low, got high={}, mid={}, low={}",
                high, mid, low
            ),
        }
    }
}

impl std::error::Error for ThresholdError {}

/// Score cutoffs for the risk tiers, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoffs {
    /// Scores at or above this are high risk
    pub high: f64,
    /// Scores at or above this (and below high) are mid risk
    pub mid: f64,
    /// Scores at or below this are low risk
    pub low: f64,
}

impl Cutoffs {
    /// Create validated cutoffs
    pub fn new(high: f64, mid: f64, low: f64) -> Result<Self, ThresholdError> {
        let cutoffs = Self { high, mid, low };
        cutoffs.validate()?;
        Ok(cutoffs)
    }

    /// Check the required ordering `high > mid > low`
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let finite = self.high.is_finite() && self.mid.is_finite() && self.low.is_finite();
        if finite && self.high > self.mid && self.mid > self.low {
            Ok(())
        } else {
            Err(ThresholdError::InvalidThresholdConfig {
                high: self.high,
                mid: self.mid,
                low: self.low,
            })
        }
    }
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_CUTOFF,
            mid: DEFAULT_MID_CUTOFF,
            low: DEFAULT_LOW_CUTOFF,
        }
    }
}

/// Maps scores to risk tiers using cutoffs validated once at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdClassifier {
    cutoffs: Cutoffs,
}

impl ThresholdClassifier {
    /// Create a classifier, rejecting misordered cutoffs
    pub fn new(cutoffs: Cutoffs) -> Result<Self, ThresholdError> {
        cutoffs.validate()?;
        Ok(Self { cutoffs })
    }

    /// The cutoffs in use
    pub fn cutoffs(&self) -> &Cutoffs {
        &self.cutoffs
    }

    /// Classify a score
    pub fn classify(&self, score: f64) -> RiskTier {
        tier_for(score, &self.cutoffs)
    }
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self {
            cutoffs: Cutoffs::default(),
        }
    }
}

/// Classify a score against cutoffs, validating the cutoffs first
pub fn classify(score: f64, cutoffs: &Cutoffs) -> Result<RiskTier, ThresholdError> {
    cutoffs.validate()?;
    Ok(tier_for(score, cutoffs))
}

fn tier_for(score: f64, cutoffs: &Cutoffs) -> RiskTier {
    if score.is_nan() {
        RiskTier::Unclassified
    } else if score >= cutoffs.high {
        RiskTier::High
    } else if score >= cutoffs.mid {
        RiskTier::Mid
    } else if score <= cutoffs.low {
        RiskTier::Low
    } else {
        RiskTier::Unclassified
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every score maps to exactly one tier, identically on repeated calls
        #[test]
        fn test_classify_is_pure(score in 0.0f64..=100.0) {
            let cutoffs = Cutoffs::default();
            let first = classify(score, &cutoffs).unwrap();
            let second = classify(score, &cutoffs).unwrap();
            prop_assert_eq!(first, second);
            prop_assert!(matches!(
                first,
                RiskTier::Low | RiskTier::Mid | RiskTier::High | RiskTier::Unclassified
            ));
        }

        /// Property: tiers are monotonic in the score
        #[test]
        fn test_tiers_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let classifier = ThresholdClassifier::default();
            let rank = |tier: RiskTier| match tier {
                RiskTier::Low => 0,
                RiskTier::Unclassified => 1,
                RiskTier::Mid => 2,
                RiskTier::High => 3,
            };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rank(classifier.classify(lo)) <= rank(classifier.classify(hi)));
        }

        /// Property: the classifier and the free function agree for valid cutoffs
        #[test]
        fn test_classifier_matches_free_fn(
            low in 0.0f64..30.0,
            gap1 in 1.0f64..30.0,
            gap2 in 1.0f64..30.0,
            score in 0.0f64..=100.0,
        ) {
            let cutoffs = Cutoffs::new(low + gap1 + gap2, low + gap1, low).unwrap();
            let classifier = ThresholdClassifier::new(cutoffs).unwrap();
            prop_assert_eq!(classifier.classify(score), classify(score, &cutoffs).unwrap());
        }
    }
}
