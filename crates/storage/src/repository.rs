use async_trait::async_trait;
use quiz_core::model::{QuestionSet, QuestionSetError, Unit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors raised while fetching a unit's question set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question set not found: {resource}")]
    NotFound { resource: String },

    #[error("failed to read {resource}: {message}")]
    Io { resource: String, message: String },

    #[error("request for {resource} failed: {message}")]
    Http { resource: String, message: String },

    #[error("invalid question set {resource}: {source}")]
    Invalid {
        resource: String,
        #[source]
        source: QuestionSetError,
    },
}

//
// ─── QUESTION SOURCES ─────────────────────────────────────────────────────────
//

/// Where a unit's question set is fetched from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch and validate the question set backing `unit`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the resource is missing, unreadable, or invalid.
    async fn fetch(&self, unit: &Unit) -> Result<QuestionSet, SourceError>;
}

/// Question sets held in memory, keyed by resource path.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    sets: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON for a resource. Validation happens on fetch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_json(
        &self,
        resource: impl Into<String>,
        json: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(resource.into(), json.into());
        Ok(())
    }

    /// Store an already-built set under a resource path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the set cannot be encoded.
    pub fn insert_set(
        &self,
        resource: impl Into<String>,
        set: &QuestionSet,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(&set.to_file())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.insert_json(resource, json)
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn fetch(&self, unit: &Unit) -> Result<QuestionSet, SourceError> {
        let raw = {
            let guard = self.sets.lock().map_err(|e| SourceError::Io {
                resource: unit.resource().to_owned(),
                message: e.to_string(),
            })?;
            guard
                .get(unit.resource())
                .cloned()
                .ok_or_else(|| SourceError::NotFound {
                    resource: unit.resource().to_owned(),
                })?
        };
        QuestionSet::from_json_str(&raw).map_err(|source| SourceError::Invalid {
            resource: unit.resource().to_owned(),
            source,
        })
    }
}

//
// ─── HIGH SCORE ───────────────────────────────────────────────────────────────
//

/// Result of offering a finished session's score to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighScoreUpdate {
    /// Best score after the update.
    pub high_score: u32,
    /// True when `score` beat the previous best.
    pub is_new_record: bool,
}

/// Single global best score, shared by every subject and unit.
#[async_trait]
pub trait HighScoreRepository: Send + Sync {
    /// Current best score, or 0 if nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_high_score(&self) -> Result<u32, StorageError>;

    /// Keep `max(existing, score)`. Writes only when the score improves.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    async fn record_score(&self, score: u32) -> Result<HighScoreUpdate, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    high_score: Arc<Mutex<u32>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HighScoreRepository for InMemoryRepository {
    async fn get_high_score(&self) -> Result<u32, StorageError> {
        let guard = self
            .high_score
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn record_score(&self, score: u32) -> Result<HighScoreUpdate, StorageError> {
        let mut guard = self
            .high_score
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let is_new_record = score > *guard;
        *guard = quiz_core::model::best_score(*guard, score);
        Ok(HighScoreUpdate {
            high_score: *guard,
            is_new_record,
        })
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub high_scores: Arc<dyn HighScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let high_scores: Arc<dyn HighScoreRepository> = Arc::new(InMemoryRepository::new());
        Self { high_scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Catalog, Question, SubjectId, UnitId};

    fn addition_unit() -> Unit {
        Catalog::builtin()
            .unit(
                &SubjectId::new("math").unwrap(),
                &UnitId::new("addition").unwrap(),
            )
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn high_score_only_moves_up() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_high_score().await.unwrap(), 0);

        let first = repo.record_score(40).await.unwrap();
        assert_eq!(first, HighScoreUpdate { high_score: 40, is_new_record: true });

        let lower = repo.record_score(25).await.unwrap();
        assert_eq!(lower, HighScoreUpdate { high_score: 40, is_new_record: false });

        let tie = repo.record_score(40).await.unwrap();
        assert!(!tie.is_new_record);
        assert_eq!(repo.get_high_score().await.unwrap(), 40);
    }

    #[tokio::test]
    async fn in_memory_source_round_trips_sets() {
        let source = InMemoryQuestionSource::new();
        let unit = addition_unit();
        let set = QuestionSet::new(vec![
            Question::new("1 + 2 = ?", vec!["3".into(), "4".into()], 0, None).unwrap(),
        ]);
        source.insert_set(unit.resource(), &set).unwrap();

        assert_eq!(source.fetch(&unit).await.unwrap(), set);
    }

    #[tokio::test]
    async fn in_memory_source_reports_missing_and_invalid() {
        let source = InMemoryQuestionSource::new();
        let unit = addition_unit();
        assert!(matches!(
            source.fetch(&unit).await.unwrap_err(),
            SourceError::NotFound { .. }
        ));

        source
            .insert_json(unit.resource(), r#"{ "questions": [] }"#)
            .unwrap();
        assert!(matches!(
            source.fetch(&unit).await.unwrap_err(),
            SourceError::Invalid {
                source: QuestionSetError::Empty,
                ..
            }
        ));
    }
}
