mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::{AnswerOutcome, LiveStats, QuestionView};
pub use service::{Advance, QuizSession, SessionState};
pub use workflow::{LoopAdvance, SessionLoopService};
