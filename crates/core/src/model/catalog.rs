use thiserror::Error;

use crate::model::ids::{SubjectId, UnitId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("invalid identifier: {0:?}")]
    InvalidSlug(String),

    #[error("unknown subject: {0}")]
    UnknownSubject(SubjectId),

    #[error("unknown unit {unit} in subject {subject}")]
    UnknownUnit { subject: SubjectId, unit: UnitId },
}

//
// ─── UNITS & SUBJECTS ─────────────────────────────────────────────────────────
//

/// A sub-topic within a subject, backed by one question set resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    name: String,
    resource: String,
}

impl Unit {
    #[must_use]
    pub fn new(id: UnitId, name: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resource: resource.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative path of the unit's question set, e.g. `questions/math/addition.json`.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    name: String,
    unit_prompt: String,
    units: Vec<Unit>,
}

impl Subject {
    #[must_use]
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        unit_prompt: impl Into<String>,
        units: Vec<Unit>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_prompt: unit_prompt.into(),
            units,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Heading shown above the unit picker.
    #[must_use]
    pub fn unit_prompt(&self) -> &str {
        &self.unit_prompt
    }

    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }
}

//
// ─── CATALOG ──────────────────────────────────────────────────────────────────
//

/// Ordered list of subjects and their units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    subjects: Vec<Subject>,
}

const BUILTIN: &[(&str, &str, &str, &[(&str, &str)])] = &[
    (
        "math",
        "Math",
        "Pick a math unit!",
        &[
            ("addition", "Addition"),
            ("subtraction", "Subtraction"),
            ("multiplication", "Multiplication"),
            ("division", "Division"),
            ("word-problems", "Word problems"),
        ],
    ),
    (
        "japanese",
        "Japanese",
        "Pick a Japanese unit!",
        &[
            ("kanji-reading", "Kanji reading"),
            ("kanji-writing", "Kanji writing"),
            ("vocabulary", "Vocabulary"),
            ("proverbs", "Proverbs"),
        ],
    ),
    (
        "science",
        "Science",
        "Pick a science unit!",
        &[
            ("plants", "Plants"),
            ("animals", "Animals"),
            ("weather", "Weather"),
            ("body", "Human body"),
            ("experiments", "Experiments"),
        ],
    ),
    (
        "social",
        "Social studies",
        "Pick a social studies unit!",
        &[
            ("geography", "Geography"),
            ("local-study", "Local study"),
            ("history", "History"),
            ("life", "Daily life"),
        ],
    ),
];

impl Catalog {
    #[must_use]
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// The four school subjects shipped with the game.
    ///
    /// Each unit's resource lives at `questions/<subject>/<unit>.json`.
    #[must_use]
    pub fn builtin() -> Self {
        let subjects = BUILTIN
            .iter()
            .map(|(subject, name, prompt, units)| {
                let units = units
                    .iter()
                    .map(|(unit, unit_name)| {
                        Unit::new(
                            UnitId::from_static(*unit),
                            *unit_name,
                            format!("questions/{subject}/{unit}.json"),
                        )
                    })
                    .collect();
                Subject::new(SubjectId::from_static(*subject), *name, *prompt, units)
            })
            .collect();
        Self { subjects }
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id() == id)
    }

    /// Resolve a unit within a subject.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownSubject` or `CatalogError::UnknownUnit`.
    pub fn unit(&self, subject: &SubjectId, unit: &UnitId) -> Result<&Unit, CatalogError> {
        let found = self
            .subject(subject)
            .ok_or_else(|| CatalogError::UnknownSubject(subject.clone()))?;
        found
            .units()
            .iter()
            .find(|u| u.id() == unit)
            .ok_or_else(|| CatalogError::UnknownUnit {
                subject: subject.clone(),
                unit: unit.clone(),
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
