//! The `Problem` document and its value types.
//!
//! A problem is a single competitive-programming task record. Its `id` is an
//! opaque store-assigned identifier; its `problem_id` is the generated
//! identity hash derived from `(source, platform_problem_id)` (see
//! [`crate::identity`]), which serves as the external-facing lookup key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Source platform for a problem.
///
/// A closed enum at any given version; new platforms are added as variants.
/// Wire values are the platform tags used by clients (`"CODEFORCES"`,
/// `"OTHER"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "CODEFORCES")]
    Codeforces,
    #[serde(rename = "OTHER")]
    Other,
}

impl Platform {
    /// Returns the wire tag for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Codeforces => "CODEFORCES",
            Platform::Other => "OTHER",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CODEFORCES" => Ok(Platform::Codeforces),
            "OTHER" => Ok(Platform::Other),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Difficulty label for a problem. Lowercase wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Returns the wire label for this difficulty.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(CoreError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Platform-native metadata nested inside a problem document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemMetadata {
    /// The platform's own identifier for the problem (e.g. `"123A"`).
    pub platform_problem_id: String,
    /// Difficulty label.
    pub difficulty: Difficulty,
}

/// A stored problem document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Store-assigned opaque identifier (primary key).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Source platform tag.
    pub source: Platform,
    /// Informational URL pointing at the problem on its platform.
    pub source_link: String,
    /// Generated identity hash of `(source, platform_problem_id)`.
    ///
    /// Recomputed by the service on every create and update; never
    /// client-settable. Used as the external lookup key, distinct from `id`.
    pub problem_id: String,
    /// Identifiers of the problem sets this problem belongs to.
    ///
    /// Duplicates are not meaningful and order is irrelevant for
    /// correctness; the list is stored as given.
    pub problem_set_ids: Vec<String>,
    /// Platform-native metadata.
    pub problem_metadata: ProblemMetadata,
    /// Creation timestamp, maintained by the store.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp, maintained by the store.
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Returns the distinct problem-set ids in first-occurrence order.
    ///
    /// Count propagation recomputes each referenced set exactly once per
    /// call, so duplicate membership entries must collapse here.
    pub fn distinct_set_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for id in &self.problem_set_ids {
            if !seen.contains(&id.as_str()) {
                seen.push(id.as_str());
            }
        }
        seen
    }
}

/// Write-model for a problem: everything except store-owned fields.
///
/// The service fills in `problem_id` from the identity hash before handing
/// the draft to the store; the store assigns `id` and both timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDraft {
    pub title: String,
    pub source: Platform,
    pub source_link: String,
    pub problem_id: String,
    pub problem_set_ids: Vec<String>,
    pub problem_metadata: ProblemMetadata,
}
