//! SAM (Self-Assessment Manikin) scale domain logic
//!
//! All ratings use the canonical 1-9 SAM scale with 5.0 as the neutral
//! midpoint, for both the human ratings and the RVM pre-filter scores.
//! Entry points must reject anything outside that range before writing.
//!
//! A video is promoted to "approved" once it has accumulated at least
//! [`CONSENSUS_THRESHOLD`] human ratings AND the consensus gate passes:
//! the raters' mean must fall on the same side of neutral as the RVM
//! pre-filter score on BOTH dimensions, and rater variance must stay below
//! [`VARIANCE_LIMIT`] on both dimensions.

/// Lowest valid SAM score
pub const SAM_MIN: f64 = 1.0;

/// Highest valid SAM score
pub const SAM_MAX: f64 = 9.0;

/// Neutral midpoint of the SAM scale
pub const SAM_NEUTRAL: f64 = 5.0;

/// Number of ratings required before the approval gate is evaluated
pub const CONSENSUS_THRESHOLD: i64 = 16;

/// Exclusive upper bound on rater variance for approval
pub const VARIANCE_LIMIT: f64 = 4.0;

/// Exclusive lower bound on the RVM pre-filter magnitude (valence² + arousal²)
pub const RVM_PREFILTER_MIN: f64 = 1.0;

/// Check that a score lies on the 1-9 SAM scale
pub fn is_valid_sam_score(score: f64) -> bool {
    score.is_finite() && (SAM_MIN..=SAM_MAX).contains(&score)
}

/// Aggregate statistics over the SAM ratings of one video
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    /// Number of ratings aggregated
    pub count: i64,
    pub mean_valence: f64,
    pub mean_arousal: f64,
    /// Sample variance (n-1 denominator), 0.0 when count < 2
    pub var_valence: f64,
    pub var_arousal: f64,
}

impl RatingStats {
    /// Compute aggregate statistics from (valence, arousal) samples
    ///
    /// Returns None for an empty sample set.
    pub fn from_samples(samples: &[(f64, f64)]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean_valence = samples.iter().map(|(v, _)| v).sum::<f64>() / n;
        let mean_arousal = samples.iter().map(|(_, a)| a).sum::<f64>() / n;

        let (var_valence, var_arousal) = if samples.len() < 2 {
            (0.0, 0.0)
        } else {
            let ssv: f64 = samples
                .iter()
                .map(|(v, _)| (v - mean_valence) * (v - mean_valence))
                .sum();
            let ssa: f64 = samples
                .iter()
                .map(|(_, a)| (a - mean_arousal) * (a - mean_arousal))
                .sum();
            (ssv / (n - 1.0), ssa / (n - 1.0))
        };

        Some(Self {
            count: samples.len() as i64,
            mean_valence,
            mean_arousal,
            var_valence,
            var_arousal,
        })
    }
}

/// Directional agreement: both values on the same side of neutral
///
/// Evaluated independently for valence and arousal. Values exactly at
/// neutral count as the low side, matching the `<= 5` branch of the
/// original consensus rule.
pub fn signs_agree(rvm_score: f64, rater_mean: f64) -> bool {
    (rvm_score > SAM_NEUTRAL && rater_mean > SAM_NEUTRAL)
        || (rvm_score <= SAM_NEUTRAL && rater_mean <= SAM_NEUTRAL)
}

/// Consensus approval gate
///
/// Passes when the rater mean agrees in direction with the RVM pre-filter
/// score on both dimensions and rater variance is below the limit on both
/// dimensions. A video with no RVM score cannot be approved: there is
/// nothing for the raters to agree with.
pub fn approval_gate(
    rvm_valence: Option<f64>,
    rvm_arousal: Option<f64>,
    stats: &RatingStats,
) -> bool {
    let (Some(rvm_valence), Some(rvm_arousal)) = (rvm_valence, rvm_arousal) else {
        return false;
    };

    signs_agree(rvm_valence, stats.mean_valence)
        && signs_agree(rvm_arousal, stats.mean_arousal)
        && stats.var_valence < VARIANCE_LIMIT
        && stats.var_arousal < VARIANCE_LIMIT
}

/// RVM pre-filter: magnitude of the raw (valence, arousal) score
///
/// The pre-filter squares the raw scores, not their offsets from neutral.
pub fn rvm_prefilter_passes(rvm_valence: f64, rvm_arousal: f64) -> bool {
    rvm_valence * rvm_valence + rvm_arousal * rvm_arousal > RVM_PREFILTER_MIN
}
