use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Reasons a single question record is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyPrompt,

    #[error("expected at least {min} choices, found {found}")]
    TooFewChoices { min: usize, found: usize },

    #[error("choice {index} is empty")]
    EmptyChoice { index: usize },

    #[error("correct index {correct} is outside 0..{choices}")]
    CorrectOutOfRange { correct: i64, choices: usize },
}

/// Errors that can occur while loading a question set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set has no questions")]
    Empty,

    #[error("question {position} is invalid: {source}")]
    InvalidQuestion {
        position: usize,
        #[source]
        source: QuestionError,
    },

    #[error("malformed question set: {0}")]
    Parse(String),
}

//
// ─── WIRE FORMAT ──────────────────────────────────────────────────────────────
//

/// On-disk shape of a unit's question file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSetFile {
    pub questions: Vec<QuestionRecord>,
}

/// Unvalidated question as it appears in a question file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub choices: Vec<String>,
    pub correct: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl QuestionRecord {
    /// Validate the record into a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or a choice is blank, fewer than two
    /// choices are given, or `correct` does not index a choice.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = self.question.trim();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.choices.len() < Question::MIN_CHOICES {
            return Err(QuestionError::TooFewChoices {
                min: Question::MIN_CHOICES,
                found: self.choices.len(),
            });
        }
        if let Some(index) = self.choices.iter().position(|c| c.trim().is_empty()) {
            return Err(QuestionError::EmptyChoice { index });
        }
        let correct_index = usize::try_from(self.correct)
            .ok()
            .filter(|idx| *idx < self.choices.len())
            .ok_or(QuestionError::CorrectOutOfRange {
                correct: self.correct,
                choices: self.choices.len(),
            })?;
        let hint = self
            .hint
            .map(|h| h.trim().to_owned())
            .filter(|h| !h.is_empty());

        Ok(Question {
            prompt: prompt.to_owned(),
            choices: self.choices,
            correct_index,
            hint,
        })
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// `correct_index` always indexes into `choices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
    hint: Option<String>,
}

impl Question {
    pub const MIN_CHOICES: usize = 2;

    /// Build a question directly from parts.
    ///
    /// # Errors
    ///
    /// Same rules as `QuestionRecord::validate`.
    pub fn new(
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_index: usize,
        hint: Option<String>,
    ) -> Result<Self, QuestionError> {
        QuestionRecord {
            question: prompt.into(),
            choices,
            correct: i64::try_from(correct_index).unwrap_or(i64::MAX),
            hint,
        }
        .validate()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    #[must_use]
    pub fn to_record(&self) -> QuestionRecord {
        QuestionRecord {
            question: self.prompt.clone(),
            choices: self.choices.clone(),
            correct: i64::try_from(self.correct_index).unwrap_or(i64::MAX),
            hint: self.hint.clone(),
        }
    }
}

//
// ─── QUESTION SET ─────────────────────────────────────────────────────────────
//

/// Immutable bank of questions for one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Wrap already-validated questions. The list may be empty.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Validate every record, failing on the first bad one.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` for an empty list and
    /// `QuestionSetError::InvalidQuestion` with the zero-based position otherwise.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, QuestionSetError> {
        if records.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let questions = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                record
                    .validate()
                    .map_err(|source| QuestionSetError::InvalidQuestion { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { questions })
    }

    /// Parse and validate a question file.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Parse` for malformed JSON, otherwise see
    /// [`QuestionSet::from_records`].
    pub fn from_json_str(raw: &str) -> Result<Self, QuestionSetError> {
        let file: QuestionSetFile =
            serde_json::from_str(raw).map_err(|err| QuestionSetError::Parse(err.to_string()))?;
        Self::from_records(file.questions)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn to_file(&self) -> QuestionSetFile {
        QuestionSetFile {
            questions: self.questions.iter().map(Question::to_record).collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn record(correct: i64) -> QuestionRecord {
        QuestionRecord {
            question: "3 + 4 = ?".into(),
            choices: vec!["6".into(), "7".into(), "8".into()],
            correct,
            hint: None,
        }
    }

    #[test]
    fn valid_record_becomes_question() {
        let q = QuestionRecord {
            hint: Some("count up from 3".into()),
            ..record(1)
        }
        .validate()
        .unwrap();
        assert_eq!(q.prompt(), "3 + 4 = ?");
        assert_eq!(q.correct_index(), 1);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert_eq!(q.hint(), Some("count up from 3"));
    }

    #[test]
    fn correct_index_must_be_in_bounds() {
        assert!(matches!(
            record(3).validate().unwrap_err(),
            QuestionError::CorrectOutOfRange { correct: 3, choices: 3 }
        ));
        assert!(matches!(
            record(-1).validate().unwrap_err(),
            QuestionError::CorrectOutOfRange { .. }
        ));
    }

    #[test]
    fn rejects_blank_prompt_and_short_choices() {
        let blank = QuestionRecord {
            question: "  ".into(),
            ..record(0)
        };
        assert_eq!(blank.validate().unwrap_err(), QuestionError::EmptyPrompt);

        let short = QuestionRecord {
            choices: vec!["only".into()],
            ..record(0)
        };
        assert!(matches!(
            short.validate().unwrap_err(),
            QuestionError::TooFewChoices { min: 2, found: 1 }
        ));

        let empty_choice = QuestionRecord {
            choices: vec!["a".into(), " ".into()],
            ..record(0)
        };
        assert_eq!(
            empty_choice.validate().unwrap_err(),
            QuestionError::EmptyChoice { index: 1 }
        );
    }

    #[test]
    fn blank_hint_is_dropped() {
        let q = QuestionRecord {
            hint: Some("   ".into()),
            ..record(0)
        }
        .validate()
        .unwrap();
        assert_eq!(q.hint(), None);
    }

    #[test]
    fn parses_question_file() {
        let raw = r#"{
            "questions": [
                { "question": "1 + 1 = ?", "choices": ["1", "2"], "correct": 1 },
                { "question": "2 + 2 = ?", "choices": ["4", "5"], "correct": 0, "hint": "double 2" }
            ]
        }"#;
        let set = QuestionSet::from_json_str(raw).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.questions()[1].hint(), Some("double 2"));
    }

    #[test]
    fn empty_and_invalid_files_are_rejected() {
        assert_eq!(
            QuestionSet::from_json_str(r#"{ "questions": [] }"#).unwrap_err(),
            QuestionSetError::Empty
        );

        let raw = r#"{ "questions": [
            { "question": "ok", "choices": ["a", "b"], "correct": 0 },
            { "question": "bad", "choices": ["a", "b"], "correct": 2 }
        ] }"#;
        let err = QuestionSet::from_json_str(raw).unwrap_err();
        assert!(matches!(
            err,
            QuestionSetError::InvalidQuestion { position: 1, .. }
        ));

        assert!(matches!(
            QuestionSet::from_json_str("{ not json").unwrap_err(),
            QuestionSetError::Parse(_)
        ));
        assert!(matches!(
            QuestionSet::from_json_str(r#"{ "items": [] }"#).unwrap_err(),
            QuestionSetError::Parse(_)
        ));
    }

    #[test]
    fn file_shape_survives_serialization() {
        let set = QuestionSet::from_records(vec![record(2)]).unwrap();
        let json = serde_json::to_string(&set.to_file()).unwrap();
        assert!(!json.contains("hint"));
        assert_eq!(QuestionSet::from_json_str(&json).unwrap(), set);
    }
}
