use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{QuestionSet, Unit};

use crate::repository::{QuestionSource, SourceError};

/// Reads question files from a directory tree, one JSON file per unit.
#[derive(Debug, Clone)]
pub struct FsQuestionSource {
    root: PathBuf,
}

impl FsQuestionSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a unit's question file under the root.
    #[must_use]
    pub fn path_for(&self, unit: &Unit) -> PathBuf {
        self.root.join(unit.resource())
    }
}

#[async_trait]
impl QuestionSource for FsQuestionSource {
    async fn fetch(&self, unit: &Unit) -> Result<QuestionSet, SourceError> {
        let path = self.path_for(unit);
        tracing::debug!(path = %path.display(), "reading question set");

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => SourceError::NotFound {
                    resource: unit.resource().to_owned(),
                },
                _ => SourceError::Io {
                    resource: unit.resource().to_owned(),
                    message: err.to_string(),
                },
            })?;

        QuestionSet::from_json_str(&raw).map_err(|source| SourceError::Invalid {
            resource: unit.resource().to_owned(),
            source,
        })
    }
}
