//! Combo-based scoring for answered questions.

/// Points for a correct answer with no streak behind it.
pub const BASE_POINTS: u32 = 10;

/// Extra points added for each step of the streak beyond the first.
const COMBO_STEP_POINTS: u32 = BASE_POINTS / 2;

/// Result of scoring a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDelta {
    /// Points earned by this answer.
    pub points: u32,
    /// Streak after this answer.
    pub combo: u32,
}

/// Score one answer given the streak before it.
///
/// A correct answer extends the streak and earns
/// `floor(10 × (1 + 0.5 × (combo - 1)))` points, which for whole numbers is
/// `10 + 5 × (combo - 1)`. A wrong answer resets the streak and earns nothing.
#[must_use]
pub fn score_answer(combo_before: u32, is_correct: bool) -> ScoreDelta {
    if !is_correct {
        return ScoreDelta { points: 0, combo: 0 };
    }
    let combo = combo_before.saturating_add(1);
    let points = BASE_POINTS.saturating_add(COMBO_STEP_POINTS.saturating_mul(combo - 1));
    ScoreDelta { points, combo }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_raises_points() {
        let points: Vec<u32> = (0..4).map(|before| score_answer(before, true).points).collect();
        assert_eq!(points, [10, 15, 20, 25]);
        assert_eq!(score_answer(3, true).combo, 4);
    }

    #[test]
    fn wrong_answer_resets_combo() {
        assert_eq!(score_answer(7, false), ScoreDelta { points: 0, combo: 0 });
        assert_eq!(score_answer(0, false), ScoreDelta { points: 0, combo: 0 });
    }

    #[test]
    fn matches_multiplier_formula() {
        for before in 0..50_u32 {
            let combo = before + 1;
            let multiplier = 1.0 + f64::from(combo - 1) * 0.5;
            let expected = (10.0 * multiplier).floor();
            assert_eq!(f64::from(score_answer(before, true).points), expected);
        }
    }

    #[test]
    fn huge_streak_saturates() {
        let delta = score_answer(u32::MAX, true);
        assert_eq!(delta.combo, u32::MAX);
        assert_eq!(delta.points, u32::MAX);
    }
}
