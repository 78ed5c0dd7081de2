use quiz_core::model::Question;

/// What the presenter needs to draw the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// One-based position in the session.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub choices: Vec<String>,
    pub hint: Option<String>,
}

impl QuestionView {
    pub(crate) fn from_question(question: &Question, index: usize, total: usize) -> Self {
        Self {
            number: index + 1,
            total,
            prompt: question.prompt().to_owned(),
            choices: question.choices().to_vec(),
            hint: question.hint().map(str::to_owned),
        }
    }
}

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub selected_index: usize,
    pub correct_index: usize,
    /// Points earned by this answer.
    pub points: u32,
    /// Streak after this answer.
    pub combo: u32,
    /// Running score after this answer.
    pub score: u32,
}

/// Running numbers shown during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveStats {
    pub score: u32,
    pub combo: u32,
    /// The combo badge is only shown while a streak is running.
    pub show_combo: bool,
    /// One-based number of the question on screen.
    pub position: usize,
    pub total: usize,
}
