//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::CatalogError;
use storage::repository::{SourceError, StorageError};

/// Errors emitted by quiz sessions and the session loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question set has no questions")]
    EmptyQuestionSet,
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered yet")]
    AwaitingAnswer,
    #[error("no session in progress")]
    NotInProgress,
    #[error("choice {index} is out of range for {choices} choices")]
    InvalidChoice { index: usize, choices: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("could not load questions: {0}")]
    ResourceFetch(#[from] SourceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
