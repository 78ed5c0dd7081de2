use chrono::{DateTime, Duration, Utc};

use crate::model::ids::{SubjectId, UnitId};

//
// ─── MESSAGE TIER ─────────────────────────────────────────────────────────────
//

/// Encouragement level picked from the final accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTier {
    /// Every answer correct.
    Perfect,
    /// 80% or better.
    Great,
    /// 60% or better.
    Good,
    /// Below 60%.
    Retry,
}

impl MessageTier {
    /// Pick the tier for an accuracy percentage, checked from the top down.
    #[must_use]
    pub fn from_accuracy(accuracy: u32) -> Self {
        if accuracy >= 100 {
            Self::Perfect
        } else if accuracy >= 80 {
            Self::Great
        } else if accuracy >= 60 {
            Self::Good
        } else {
            Self::Retry
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Great => "great",
            Self::Good => "good",
            Self::Retry => "retry",
        }
    }

    /// Line shown to the player on the result screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect! Amazing work! 🏆",
            Self::Great => "Excellent! Well done! ⭐",
            Self::Good => "Nice effort! Keep it up! 💪",
            Self::Retry => "Let's try that one again! 📚",
        }
    }
}

/// Percentage of correct answers, rounded half up. Zero when `total` is zero.
#[must_use]
pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (200 * correct + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

/// The better of the stored best and a fresh score.
#[must_use]
pub fn best_score(existing: u32, score: u32) -> u32 {
    existing.max(score)
}

//
// ─── RESULT SUMMARY ───────────────────────────────────────────────────────────
//

/// Totals gathered while a session was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTally {
    pub score: u32,
    pub correct: u32,
    pub wrong: u32,
    pub max_combo: u32,
    pub final_combo: u32,
}

/// Outcome of a finished quiz session.
///
/// Both `max_combo` and `final_combo` are kept; the latter is the streak still
/// running when the last question was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    subject_id: SubjectId,
    unit_id: UnitId,
    tally: SessionTally,
    total_questions: u32,
    accuracy: u32,
    tier: MessageTier,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl ResultSummary {
    #[must_use]
    pub fn new(
        subject_id: SubjectId,
        unit_id: UnitId,
        tally: SessionTally,
        total_questions: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let accuracy = accuracy_percent(tally.correct, total_questions);
        Self {
            subject_id,
            unit_id,
            tally,
            total_questions,
            accuracy,
            tier: MessageTier::from_accuracy(accuracy),
            started_at,
            finished_at,
        }
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.tally.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.tally.correct
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.tally.wrong
    }

    #[must_use]
    pub fn max_combo(&self) -> u32 {
        self.tally.max_combo
    }

    #[must_use]
    pub fn final_combo(&self) -> u32 {
        self.tally.final_combo
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    #[must_use]
    pub fn tier(&self) -> MessageTier {
        self.tier
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Time between the start and the last answer, never negative.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(1, 8), 13);
        assert_eq!(accuracy_percent(10, 10), 100);
        assert_eq!(accuracy_percent(0, 10), 0);
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(MessageTier::from_accuracy(100), MessageTier::Perfect);
        assert_eq!(MessageTier::from_accuracy(99), MessageTier::Great);
        assert_eq!(MessageTier::from_accuracy(80), MessageTier::Great);
        assert_eq!(MessageTier::from_accuracy(79), MessageTier::Good);
        assert_eq!(MessageTier::from_accuracy(60), MessageTier::Good);
        assert_eq!(MessageTier::from_accuracy(59), MessageTier::Retry);
        assert_eq!(MessageTier::from_accuracy(0), MessageTier::Retry);
    }

    #[test]
    fn summary_derives_accuracy_and_tier() {
        let tally = SessionTally {
            score: 20,
            correct: 2,
            wrong: 1,
            max_combo: 1,
            final_combo: 1,
        };
        let summary = ResultSummary::new(
            SubjectId::new("math").unwrap(),
            UnitId::new("addition").unwrap(),
            tally,
            3,
            fixed_now(),
            fixed_now(),
        );
        assert_eq!(summary.accuracy(), 67);
        assert_eq!(summary.tier(), MessageTier::Good);
        assert_eq!(summary.tier().as_str(), "good");
        assert_eq!(summary.score(), 20);
    }

    #[test]
    fn elapsed_spans_start_to_finish() {
        let started = fixed_now();
        let summary = ResultSummary::new(
            SubjectId::new("science").unwrap(),
            UnitId::new("plants").unwrap(),
            SessionTally::default(),
            10,
            started,
            started + Duration::seconds(95),
        );
        assert_eq!(summary.started_at(), started);
        assert_eq!(summary.elapsed(), Duration::seconds(95));

        let backwards = ResultSummary::new(
            SubjectId::new("science").unwrap(),
            UnitId::new("plants").unwrap(),
            SessionTally::default(),
            10,
            started,
            started - Duration::seconds(5),
        );
        assert_eq!(backwards.elapsed(), Duration::zero());
    }

    #[test]
    fn best_score_keeps_maximum() {
        assert_eq!(best_score(50, 30), 50);
        assert_eq!(best_score(50, 80), 80);
    }
}
