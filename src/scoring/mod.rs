//! Deterministic rules that turn raw scores into labels and advice.
//!
//! Everything in here is pure: no I/O, no randomness, no rendering.

pub mod recommendations;
pub mod risk;

use crate::assessment::StatusLabel;

/// Map a numeric score to its status tier.
///
/// Thresholds are inclusive lower bounds: 85 Excellent, 75 Good,
/// 65 Satisfactory, 50 Needs Improvement, anything below is Poor.
/// Total over all integers; out-of-range inputs land in the outer tiers.
pub fn classify(score: i32) -> StatusLabel {
    match score {
        s if s >= 85 => StatusLabel::Excellent,
        s if s >= 75 => StatusLabel::Good,
        s if s >= 65 => StatusLabel::Satisfactory,
        s if s >= 50 => StatusLabel::NeedsImprovement,
        _ => StatusLabel::Poor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(85), StatusLabel::Excellent);
        assert_eq!(classify(84), StatusLabel::Good);
        assert_eq!(classify(75), StatusLabel::Good);
        assert_eq!(classify(74), StatusLabel::Satisfactory);
        assert_eq!(classify(65), StatusLabel::Satisfactory);
        assert_eq!(classify(64), StatusLabel::NeedsImprovement);
        assert_eq!(classify(50), StatusLabel::NeedsImprovement);
        assert_eq!(classify(49), StatusLabel::Poor);
    }

    #[test]
    fn test_classify_extremes() {
        assert_eq!(classify(0), StatusLabel::Poor);
        assert_eq!(classify(100), StatusLabel::Excellent);
        assert_eq!(classify(-10), StatusLabel::Poor);
        assert_eq!(classify(250), StatusLabel::Excellent);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let rank = |label: StatusLabel| match label {
            StatusLabel::Poor => 0,
            StatusLabel::NeedsImprovement => 1,
            StatusLabel::Satisfactory => 2,
            StatusLabel::Good => 3,
            StatusLabel::Excellent => 4,
        };
        for score in 0..100 {
            assert!(rank(classify(score)) <= rank(classify(score + 1)));
        }
    }
}
