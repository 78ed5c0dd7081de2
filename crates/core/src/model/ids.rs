use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::catalog::CatalogError;

fn is_valid_slug(raw: &str) -> bool {
    !raw.is_empty()
        && !raw.starts_with('-')
        && !raw.ends_with('-')
        && raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Identifier for a subject such as `math` or `science`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Builds an id from a slug literal known to be valid.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(is_valid_slug(id));
        Self(id.to_owned())
    }

    /// Creates a new `SubjectId` from a lowercase slug.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSlug` if the value is not a slug.
    pub fn new(id: impl Into<String>) -> Result<Self, CatalogError> {
        let id = id.into();
        if is_valid_slug(&id) {
            Ok(Self(id))
        } else {
            Err(CatalogError::InvalidSlug(id))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier for a unit within a subject, e.g. `kanji-reading`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitId(String);

impl UnitId {
    /// Builds an id from a slug literal known to be valid.
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(is_valid_slug(id));
        Self(id.to_owned())
    }

    /// Creates a new `UnitId` from a lowercase slug.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSlug` if the value is not a slug.
    pub fn new(id: impl Into<String>) -> Result<Self, CatalogError> {
        let id = id.into();
        if is_valid_slug(&id) {
            Ok(Self(id))
        } else {
            Err(CatalogError::InvalidSlug(id))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for UnitId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl From<UnitId> for String {
    fn from(value: UnitId) -> Self {
        value.0
    }
}

impl FromStr for SubjectId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl FromStr for UnitId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectId({})", self.0)
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
