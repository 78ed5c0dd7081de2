pub mod catalog;
mod ids;
mod question;
mod summary;

pub use catalog::{Catalog, CatalogError, Subject, Unit};
pub use ids::{SubjectId, UnitId};
pub use question::{
    Question, QuestionError, QuestionRecord, QuestionSet, QuestionSetError, QuestionSetFile,
};
pub use summary::{MessageTier, ResultSummary, SessionTally, accuracy_percent, best_score};
