//! Pair selection over one frame's candidate rectangles.

use serde::Serialize;

use crate::geometry::{enclose, BoundingPair, Rect};
use crate::score::ScoreBreakdown;

/// Six scores averaging 75 each.
pub const SCORE_THRESHOLD: f64 = 75.0 * 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectorParams {
    /// A pair is accepted only when its total is strictly above this.
    pub threshold: f64,
    /// Pairs with any single score below this are ignored. Zero disables the floor.
    pub min_component_score: f64,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            threshold: SCORE_THRESHOLD,
            min_component_score: 0.0,
        }
    }
}

/// Winning pair of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PairSelection {
    /// Candidate indices, `first < second`.
    pub first: usize,
    pub second: usize,
    pub bounding: BoundingPair,
    pub breakdown: ScoreBreakdown,
}

impl PairSelection {
    pub fn total(&self) -> f64 {
        self.breakdown.total()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PairSelector {
    params: SelectorParams,
}

impl PairSelector {
    pub fn new(params: SelectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SelectorParams {
        &self.params
    }

    /// Pick the best-scoring pair whose total clears the threshold.
    ///
    /// Every unordered pair `(i, j)` with `i < j` is scored in candidate order.
    /// On equal totals the pair met first wins.
    pub fn select(&self, rects: &[Rect]) -> Option<PairSelection> {
        let best = self.best_pair(rects)?;
        if best.total() > self.params.threshold {
            Some(best)
        } else {
            log::trace!(
                "best pair ({}, {}) scored {:.1}, below threshold {:.1}",
                best.first,
                best.second,
                best.total(),
                self.params.threshold
            );
            None
        }
    }

    /// Best-scoring pair regardless of the threshold. Still honours the
    /// per-component floor.
    pub fn best_pair(&self, rects: &[Rect]) -> Option<PairSelection> {
        if rects.len() < 2 {
            return None;
        }

        let mut best: Option<(usize, usize, ScoreBreakdown, f64)> = None;
        for (i, r1) in rects.iter().enumerate() {
            for (j, r2) in rects.iter().enumerate().skip(i + 1) {
                let breakdown = ScoreBreakdown::for_pair(r1, r2);
                if breakdown.weakest() < self.params.min_component_score {
                    continue;
                }
                let total = breakdown.total();
                if best.map_or(true, |(_, _, _, high)| total > high) {
                    best = Some((i, j, breakdown, total));
                }
            }
        }

        best.map(|(first, second, breakdown, _)| PairSelection {
            first,
            second,
            bounding: enclose(&rects[first], &rects[second]),
            breakdown,
        })
    }
}

/// Select with the default threshold and no component floor.
pub fn select_pair(rects: &[Rect]) -> Option<PairSelection> {
    PairSelector::default().select(rects)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: Rect = Rect::new(100, 50, 10, 40);
    const RIGHT: Rect = Rect::new(130, 50, 10, 40);

    #[test]
    fn fewer_than_two_candidates_selects_nothing() {
        assert!(select_pair(&[]).is_none());
        assert!(select_pair(&[LEFT]).is_none());
    }

    #[test]
    fn selects_matching_stripes() {
        let sel = select_pair(&[LEFT, RIGHT]).expect("target pair");
        assert_eq!((sel.first, sel.second), (0, 1));
        assert_eq!(sel.bounding, enclose(&LEFT, &RIGHT));
        assert!(sel.total() > SCORE_THRESHOLD);
    }

    #[test]
    fn threshold_is_strict() {
        let total = ScoreBreakdown::for_pair(&LEFT, &RIGHT).total();
        let at = PairSelector::new(SelectorParams {
            threshold: total,
            ..SelectorParams::default()
        });
        assert!(at.select(&[LEFT, RIGHT]).is_none());
        assert!(at.best_pair(&[LEFT, RIGHT]).is_some());
    }

    #[test]
    fn first_pair_wins_ties() {
        // Two identical copies of the target: (0,1) and (2,3) tie; (0,1) is met first.
        let rects = [LEFT, RIGHT, LEFT, RIGHT];
        let sel = select_pair(&rects).expect("target pair");
        assert_eq!((sel.first, sel.second), (0, 1));
    }

    #[test]
    fn component_floor_rejects_lopsided_pairs() {
        // The ideal pair's weakest component is the 50-point bounding ratio.
        let strict = PairSelector::new(SelectorParams {
            min_component_score: 60.0,
            ..SelectorParams::default()
        });
        assert!(strict.select(&[LEFT, RIGHT]).is_none());

        let lenient = PairSelector::new(SelectorParams {
            min_component_score: 15.0,
            ..SelectorParams::default()
        });
        assert!(lenient.select(&[LEFT, RIGHT]).is_some());
    }
}
