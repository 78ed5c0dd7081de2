use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{Catalog, ResultSummary, SubjectId, UnitId};
use quiz_core::DEFAULT_SAMPLE_SIZE;
use storage::repository::{HighScoreRepository, QuestionSource};

use super::progress::{AnswerOutcome, QuestionView};
use super::service::{Advance, QuizSession};
use crate::Clock;
use crate::error::SessionError;

/// Result of moving on from an answered question through the loop service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopAdvance {
    Next(QuestionView),
    Finished {
        summary: ResultSummary,
        high_score: u32,
        is_new_record: bool,
    },
}

/// Orchestrates loading a unit, playing it, and recording the best score.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    catalog: Arc<Catalog>,
    questions: Arc<dyn QuestionSource>,
    high_scores: Arc<dyn HighScoreRepository>,
    sample_size: usize,
    rng_seed: Option<u64>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<Catalog>,
        questions: Arc<dyn QuestionSource>,
        high_scores: Arc<dyn HighScoreRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            questions,
            high_scores,
            sample_size: DEFAULT_SAMPLE_SIZE,
            rng_seed: None,
        }
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Draw questions from a seeded generator instead of the thread RNG.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load a unit's questions and start a new session on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` for an unknown subject or unit,
    /// and `SessionError::ResourceFetch` if the question set cannot be loaded.
    /// Sources reject a file without questions, so an empty unit also surfaces
    /// as `ResourceFetch`. No session is created on failure.
    pub async fn start_session(
        &self,
        subject_id: &SubjectId,
        unit_id: &UnitId,
    ) -> Result<QuizSession, SessionError> {
        let mut session = QuizSession::new(subject_id.clone(), unit_id.clone());
        self.start_into(&mut session).await?;
        Ok(session)
    }

    /// Play the same unit again with a fresh draw.
    ///
    /// # Errors
    ///
    /// Same as [`SessionLoopService::start_session`]. On failure the existing
    /// session is left untouched.
    pub async fn restart(&self, session: &mut QuizSession) -> Result<QuestionView, SessionError> {
        self.start_into(session).await
    }

    async fn start_into(&self, session: &mut QuizSession) -> Result<QuestionView, SessionError> {
        let unit = self
            .catalog
            .unit(session.subject_id(), session.unit_id())?;
        let set = self.questions.fetch(unit).await.inspect_err(|err| {
            tracing::error!(resource = unit.resource(), error = %err, "failed to load questions");
        })?;

        let started_at = self.clock.now();
        match self.rng_seed {
            Some(seed) => session.start(
                &set,
                self.sample_size,
                &mut StdRng::seed_from_u64(seed),
                started_at,
            ),
            None => session.start(&set, self.sample_size, &mut rand::rng(), started_at),
        }
    }

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::submit_answer`].
    pub fn answer(
        &self,
        session: &mut QuizSession,
        selected: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        session.submit_answer(selected)
    }

    /// Move past the answered question; on finishing, offer the score to the
    /// high-score store.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::advance`]. Returns `SessionError::Storage` if the best
    /// score cannot be saved; the session is already finished in that case.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<LoopAdvance, SessionError> {
        match session.advance(self.clock.now())? {
            Advance::Next(view) => Ok(LoopAdvance::Next(view)),
            Advance::Finished(summary) => {
                let update = self.high_scores.record_score(summary.score()).await?;
                Ok(LoopAdvance::Finished {
                    summary,
                    high_score: update.high_score,
                    is_new_record: update.is_new_record,
                })
            }
        }
    }

    /// Best score recorded so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn high_score(&self) -> Result<u32, SessionError> {
        Ok(self.high_scores.get_high_score().await?)
    }
}
