/// Score awarded to an ideal ratio.
pub const MAX_SCORE: f64 = 100.0;

/// Map a ratio with ideal value 1 to a score.
///
/// Piecewise linear through (0, 0), (1, 100) and (2, 0); zero outside `(0, 2)`.
/// NaN (an undefined ratio) scores zero.
pub fn ratio_to_score(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return 0.0;
    }
    (MAX_SCORE * (1.0 - (1.0 - ratio).abs())).clamp(0.0, MAX_SCORE)
}

/// `ratio_to_score(numerator / denominator)`, or zero when the denominator is 0.
pub(crate) fn score_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    ratio_to_score(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_ratio_scores_full_marks() {
        assert_eq!(ratio_to_score(1.0), 100.0);
    }

    #[test]
    fn window_edges_score_zero() {
        assert_eq!(ratio_to_score(0.0), 0.0);
        assert_eq!(ratio_to_score(2.0), 0.0);
        assert_eq!(ratio_to_score(-3.5), 0.0);
        assert_eq!(ratio_to_score(7.0), 0.0);
    }

    #[test]
    fn half_deviation_scores_half() {
        assert!((ratio_to_score(0.5) - 50.0).abs() < 1e-9);
        assert!((ratio_to_score(1.5) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_inputs_are_clamped() {
        assert_eq!(ratio_to_score(f64::NAN), 0.0);
        assert_eq!(ratio_to_score(f64::INFINITY), 0.0);
        assert_eq!(ratio_to_score(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn zero_denominator_scores_zero() {
        assert_eq!(score_ratio(5.0, 0.0), 0.0);
        assert_eq!(score_ratio(0.0, 0.0), 0.0);
        assert_eq!(score_ratio(3.0, 3.0), 100.0);
    }
}
