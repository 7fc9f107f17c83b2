// Significance filtering for transitions
//
// Not a statistical test: a noise floor that keeps a small history fully
// visible and thins out a large one. The constants are tunable; the
// defaults are the most recent values the tool has shipped with.

use super::stats::{PairCounts, Transition};
use serde::{Deserialize, Serialize};

/// Threshold rule selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Absolute floor that rises once the history is large (default)
    #[default]
    Dense,
    /// Keep transitions that make up at least a fixed share of the volume
    Sparse,
}

impl PolicyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyMode::Dense => "dense",
            PolicyMode::Sparse => "sparse",
        }
    }
}

/// Rule deciding which transitions are drawn
///
/// # Example
/// ```
/// use cmdflow::transition::SignificancePolicy;
///
/// let policy = SignificancePolicy::dense();
/// assert!(!policy.is_significant(4, 1000));
/// assert!(policy.is_significant(5, 1000));
/// assert!(policy.is_significant(1, 999));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificancePolicy {
    pub mode: PolicyMode,

    /// Sparse mode: minimum share of the total transition volume
    ///
    /// Default: 0.01 (1%)
    pub sparse_share: f64,

    /// Dense mode: floor used while the volume is below the cutoff
    ///
    /// Default: 1 (every observed transition is drawn)
    pub dense_floor: u64,

    /// Dense mode: floor used once the volume reaches the cutoff
    ///
    /// Default: 5
    pub dense_high_floor: u64,

    /// Dense mode: transition volume at which the high floor applies
    ///
    /// Default: 1000
    pub dense_volume_cutoff: u64,

    /// Keep at most this many transitions, strongest first
    ///
    /// Default: None (no limit)
    pub max_transitions: Option<usize>,
}

impl Default for SignificancePolicy {
    fn default() -> Self {
        Self {
            mode: PolicyMode::Dense,
            sparse_share: 0.01,
            dense_floor: 1,
            dense_high_floor: 5,
            dense_volume_cutoff: 1000,
            max_transitions: None,
        }
    }
}

impl SignificancePolicy {
    /// Dense mode with default constants
    pub fn dense() -> Self {
        Self::default()
    }

    /// Sparse mode with default constants
    pub fn sparse() -> Self {
        Self {
            mode: PolicyMode::Sparse,
            ..Self::default()
        }
    }

    /// Dense mode with the older constants (floor 3 from 300 transitions)
    pub fn legacy() -> Self {
        Self {
            dense_high_floor: 3,
            dense_volume_cutoff: 300,
            ..Self::default()
        }
    }

    /// Same constants, different mode
    pub fn with_mode(mut self, mode: PolicyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Minimum count a transition needs for the given total volume
    ///
    /// In sparse mode this is `total * sparse_share`; the comparison in
    /// [`Self::is_significant`] is done on the ratio instead so that an
    /// exact share is never lost to rounding.
    pub fn min_count(&self, total: u64) -> f64 {
        match self.mode {
            PolicyMode::Sparse => total as f64 * self.sparse_share,
            PolicyMode::Dense => self.dense_floor_for(total) as f64,
        }
    }

    /// Inclusive threshold check for one transition count
    pub fn is_significant(&self, count: u64, total: u64) -> bool {
        match self.mode {
            PolicyMode::Sparse => {
                total > 0 && count as f64 / total as f64 >= self.sparse_share
            }
            PolicyMode::Dense => count >= self.dense_floor_for(total),
        }
    }

    fn dense_floor_for(&self, total: u64) -> u64 {
        if total >= self.dense_volume_cutoff {
            self.dense_high_floor
        } else {
            self.dense_floor
        }
    }

    /// Filter pair counts down to the significant transitions
    ///
    /// The result is in canonical order (count descending, then pair).
    pub fn apply(&self, pairs: &PairCounts) -> Vec<Transition> {
        let total = pairs.total();
        let mut kept: Vec<Transition> = pairs
            .sorted_desc()
            .into_iter()
            .filter(|t| self.is_significant(t.count, total))
            .collect();

        if let Some(limit) = self.max_transitions {
            kept.truncate(limit);
        }

        tracing::debug!(
            "{} policy (min count {:.2}) kept {} of {} transitions",
            self.mode.as_str(),
            self.min_count(total),
            kept.len(),
            pairs.len()
        );

        kept
    }

    /// Validate policy constants
    pub fn validate(&self) -> Result<(), String> {
        if !self.sparse_share.is_finite() || self.sparse_share <= 0.0 || self.sparse_share > 1.0 {
            return Err(format!(
                "sparse_share must be in (0, 1], got {}",
                self.sparse_share
            ));
        }

        if self.dense_high_floor < self.dense_floor {
            return Err(format!(
                "dense_high_floor ({}) must not be below dense_floor ({})",
                self.dense_high_floor, self.dense_floor
            ));
        }

        if self.max_transitions == Some(0) {
            return Err("max_transitions must be at least 1".to_string());
        }

        Ok(())
    }
}
