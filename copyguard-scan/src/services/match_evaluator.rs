//! Match evaluation
//!
//! Classifies a similarity score against the configured threshold. The
//! decision rule is deterministic: `match_found` iff the rounded score
//! percentage meets the threshold. Score *sources* are currently
//! presence-based placeholders and live in the two functions below so a
//! real similarity computation can replace them without touching the
//! decision rule.
//!
//! TODO: replace presence-based scoring with pairwise fingerprint
//! similarity once the analysis service exposes a comparison endpoint.

use crate::models::{ContentKind, MatchOutcome};
use rand::Rng;

/// Fixed message for text scans that produced no transcript
pub const NO_TRANSCRIPT_MESSAGE: &str = "No transcript could be generated.";

/// Fixed message for audio scans with no usable signal
pub const AUDIO_NO_MATCH_MESSAGE: &str = "Audio scan did not find a match.";

/// Fixed message for video scans with no usable signal
pub const VIDEO_NO_MATCH_MESSAGE: &str = "Video scan did not find a match.";

/// Score for audio/video comparisons
///
/// 1.0 whenever any fingerprint was extracted: presence of a signal is
/// treated as a full-confidence match.
pub fn presence_score(signal_found: bool) -> f64 {
    if signal_found {
        1.0
    } else {
        0.0
    }
}

/// Score for text comparisons
///
/// Uniform pseudo-random in [0.6, 1.0] when a transcript exists, else 0.
pub fn transcript_score(has_transcript: bool) -> f64 {
    if has_transcript {
        rand::thread_rng().gen_range(0.6..=1.0)
    } else {
        0.0
    }
}

/// Classify a raw score against the threshold
///
/// `raw_score` is normalized to [0, 1]; `threshold_pct` is a percentage.
/// The message embeds the rounded percentage with explicit above/below
/// wording.
pub fn evaluate(kind: ContentKind, raw_score: f64, threshold_pct: u8) -> MatchOutcome {
    let score_pct = (raw_score * 100.0).round() as i64;
    let match_found = score_pct >= threshold_pct as i64;

    let relation = if match_found { "above" } else { "below" };
    let result_message = format!(
        "{} match score {}% is {} {}% threshold",
        kind.label(),
        score_pct,
        relation,
        threshold_pct
    );

    tracing::debug!(
        kind = %kind,
        score_pct,
        threshold_pct,
        match_found,
        "Evaluated match score"
    );

    MatchOutcome {
        match_found,
        match_score: raw_score,
        result_message,
        threshold_used: threshold_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant_holds(outcome: &MatchOutcome) -> bool {
        let score_pct = (outcome.match_score * 100.0).round() as i64;
        outcome.match_found == (score_pct >= outcome.threshold_used as i64)
    }

    #[test]
    fn test_full_score_above_default_threshold() {
        let outcome = evaluate(ContentKind::Audio, 1.0, 85);
        assert!(outcome.match_found);
        assert_eq!(outcome.match_score, 1.0);
        assert!(outcome.result_message.contains("above 85% threshold"));
        assert!(outcome.result_message.starts_with("Audio match score 100%"));
        assert!(invariant_holds(&outcome));
    }

    #[test]
    fn test_zero_score_below_threshold() {
        let outcome = evaluate(ContentKind::Video, 0.0, 85);
        assert!(!outcome.match_found);
        assert!(outcome.result_message.contains("below 85% threshold"));
        assert!(invariant_holds(&outcome));
    }

    #[test]
    fn test_exact_threshold_counts_as_match() {
        let outcome = evaluate(ContentKind::Text, 0.85, 85);
        assert!(outcome.match_found);
        assert!(outcome.result_message.contains("above 85% threshold"));
        assert!(invariant_holds(&outcome));
    }

    #[test]
    fn test_one_below_threshold_is_not_a_match() {
        let outcome = evaluate(ContentKind::Text, 0.84, 85);
        assert!(!outcome.match_found);
        assert!(invariant_holds(&outcome));
    }

    #[test]
    fn test_rounding_applies_before_comparison() {
        // 0.846 rounds to 85%, meeting an 85% threshold
        let outcome = evaluate(ContentKind::Text, 0.846, 85);
        assert!(outcome.match_found);
        assert!(invariant_holds(&outcome));
    }

    #[test]
    fn test_invariant_across_threshold_sweep() {
        for threshold in [0u8, 1, 50, 84, 85, 86, 100] {
            for score in [0.0, 0.1, 0.5, 0.59, 0.6, 0.849, 0.85, 0.99, 1.0] {
                let outcome = evaluate(ContentKind::Audio, score, threshold);
                assert!(
                    invariant_holds(&outcome),
                    "invariant broken at score {} threshold {}",
                    score,
                    threshold
                );
            }
        }
    }

    #[test]
    fn test_presence_score() {
        assert_eq!(presence_score(true), 1.0);
        assert_eq!(presence_score(false), 0.0);
    }

    #[test]
    fn test_transcript_score_range() {
        for _ in 0..100 {
            let score = transcript_score(true);
            assert!((0.6..=1.0).contains(&score), "score out of range: {}", score);
        }
        assert_eq!(transcript_score(false), 0.0);
    }
}
