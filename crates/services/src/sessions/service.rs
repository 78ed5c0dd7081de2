use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use quiz_core::model::{Question, QuestionSet, ResultSummary, SessionTally, SubjectId, UnitId};
use quiz_core::{DEFAULT_SAMPLE_SIZE, Sampler, score_answer};

use super::progress::{AnswerOutcome, LiveStats, QuestionView};
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgress,
    Finished,
}

/// What `advance` moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(QuestionView),
    Finished(ResultSummary),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of a unit.
///
/// Questions are drawn once at `start` and owned by the session. Answering and
/// moving on are separate steps so the presenter decides how long feedback stays
/// on screen before calling `advance`.
pub struct QuizSession {
    subject_id: SubjectId,
    unit_id: UnitId,
    state: SessionState,
    questions: Vec<Question>,
    current: usize,
    answered: Option<AnswerOutcome>,
    score: u32,
    combo: u32,
    max_combo: u32,
    correct: u32,
    wrong: u32,
    started_at: Option<DateTime<Utc>>,
    summary: Option<ResultSummary>,
}

impl QuizSession {
    #[must_use]
    pub fn new(subject_id: SubjectId, unit_id: UnitId) -> Self {
        Self {
            subject_id,
            unit_id,
            state: SessionState::Idle,
            questions: Vec::new(),
            current: 0,
            answered: None,
            score: 0,
            combo: 0,
            max_combo: 0,
            correct: 0,
            wrong: 0,
            started_at: None,
            summary: None,
        }
    }

    /// Draw up to `sample_size` questions and begin at the first one.
    ///
    /// Allowed from any state; progress from an earlier run is discarded. A
    /// `sample_size` of 0 means [`DEFAULT_SAMPLE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionSet` if `set` has no questions. The
    /// session is left as it was.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        set: &QuestionSet,
        sample_size: usize,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<QuestionView, SessionError> {
        if set.is_empty() {
            tracing::warn!(unit = %self.unit_id, "refusing to start with an empty question set");
            return Err(SessionError::EmptyQuestionSet);
        }
        let sample_size = if sample_size == 0 {
            DEFAULT_SAMPLE_SIZE
        } else {
            sample_size
        };

        self.questions = Sampler::draw(rng, set.questions(), sample_size);
        self.current = 0;
        self.answered = None;
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.correct = 0;
        self.wrong = 0;
        self.started_at = Some(started_at);
        self.summary = None;
        self.state = SessionState::InProgress;

        tracing::debug!(
            subject = %self.subject_id,
            unit = %self.unit_id,
            drawn = self.questions.len(),
            available = set.len(),
            "session started"
        );

        Ok(QuestionView::from_question(
            &self.questions[0],
            0,
            self.questions.len(),
        ))
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
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Questions drawn for this run, in play order.
    #[must_use]
    pub fn drawn_questions(&self) -> &[Question] {
        &self.questions
    }

    /// Zero-based index of the question on screen.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question awaiting (or showing feedback for) an answer.
    #[must_use]
    pub fn current_question(&self) -> Option<QuestionView> {
        if self.state != SessionState::InProgress {
            return None;
        }
        self.questions
            .get(self.current)
            .map(|q| QuestionView::from_question(q, self.current, self.questions.len()))
    }

    /// Outcome for the current question, once it has been answered.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.answered.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> LiveStats {
        LiveStats {
            score: self.score,
            combo: self.combo,
            show_combo: self.combo > 0,
            position: (self.current + 1).min(self.questions.len()),
            total: self.questions.len(),
        }
    }

    /// Final results, available once the session is finished.
    #[must_use]
    pub fn summary(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }

    /// Score the selected choice for the current question.
    ///
    /// Does not move to the next question; call [`QuizSession::advance`] for that.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotInProgress` before `start` or after the last question.
    /// - `SessionError::AlreadyAnswered` if the current question has an answer.
    /// - `SessionError::InvalidChoice` if `selected` does not index a choice.
    ///
    /// State is unchanged on error.
    pub fn submit_answer(&mut self, selected: usize) -> Result<AnswerOutcome, SessionError> {
        if self.state != SessionState::InProgress {
            tracing::warn!(state = ?self.state, "answer submitted outside a running session");
            return Err(SessionError::NotInProgress);
        }
        if self.answered.is_some() {
            tracing::warn!(index = self.current, "question already answered");
            return Err(SessionError::AlreadyAnswered);
        }
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::NotInProgress)?;
        if selected >= question.choices().len() {
            return Err(SessionError::InvalidChoice {
                index: selected,
                choices: question.choices().len(),
            });
        }

        let is_correct = question.is_correct(selected);
        let delta = score_answer(self.combo, is_correct);
        self.combo = delta.combo;
        self.max_combo = self.max_combo.max(delta.combo);
        self.score = self.score.saturating_add(delta.points);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }

        let outcome = AnswerOutcome {
            is_correct,
            selected_index: selected,
            correct_index: question.correct_index(),
            points: delta.points,
            combo: delta.combo,
            score: self.score,
        };
        self.answered = Some(outcome);

        tracing::debug!(
            index = self.current,
            is_correct,
            points = delta.points,
            combo = delta.combo,
            "answer scored"
        );
        Ok(outcome)
    }

    /// Move past an answered question, finishing after the last one.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotInProgress` when idle or already finished, so a
    ///   second `advance` after the last question is rejected.
    /// - `SessionError::AwaitingAnswer` if the current question has no answer yet.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if self.state != SessionState::InProgress {
            tracing::warn!(state = ?self.state, "advance outside a running session");
            return Err(SessionError::NotInProgress);
        }
        if self.answered.is_none() {
            return Err(SessionError::AwaitingAnswer);
        }

        self.answered = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            tracing::debug!(index = self.current, "advanced to next question");
            return Ok(Advance::Next(QuestionView::from_question(
                &self.questions[self.current],
                self.current,
                self.questions.len(),
            )));
        }

        let summary = self.build_summary(now);
        self.state = SessionState::Finished;
        self.summary = Some(summary.clone());
        tracing::debug!(
            score = summary.score(),
            accuracy = summary.accuracy(),
            "session finished"
        );
        Ok(Advance::Finished(summary))
    }

    fn build_summary(&self, finished_at: DateTime<Utc>) -> ResultSummary {
        let tally = SessionTally {
            score: self.score,
            correct: self.correct,
            wrong: self.wrong,
            max_combo: self.max_combo,
            final_combo: self.combo,
        };
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        ResultSummary::new(
            self.subject_id.clone(),
            self.unit_id.clone(),
            tally,
            total,
            self.started_at.unwrap_or(finished_at),
            finished_at,
        )
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject_id", &self.subject_id)
            .field("unit_id", &self.unit_id)
            .field("state", &self.state)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("combo", &self.combo)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
