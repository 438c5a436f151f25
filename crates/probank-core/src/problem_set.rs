//! The `ProblemSet` document.
//!
//! A problem set is a named collection; membership is recorded on the
//! problems themselves (`Problem::problem_set_ids`), not here. The set's
//! `problem_count` is a denormalized cache of that membership, recomputed
//! by count propagation after membership-affecting mutations -- it is never
//! incremented or decremented ad hoc and must not be treated as
//! authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored problem-set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSet {
    /// Store-assigned opaque identifier (primary key).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Informational labels.
    pub tags: Vec<String>,
    /// Cached number of problems whose membership list contains this set.
    pub problem_count: i64,
    /// Creation timestamp, maintained by the store.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp, maintained by the store.
    pub updated_at: DateTime<Utc>,
}

/// Write-model for a problem set.
///
/// `problem_count` is deliberately absent: it starts at zero on create and
/// is only ever touched by count propagation afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSetDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}
