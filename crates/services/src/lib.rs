#![forbid(unsafe_code)]

pub mod error;
pub mod http_source;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::SessionError;
pub use http_source::HttpQuestionSource;
pub use sessions::{
    Advance, AnswerOutcome, LiveStats, LoopAdvance, QuestionView, QuizSession,
    SessionLoopService, SessionState,
};
