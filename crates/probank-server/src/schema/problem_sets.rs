//! Problem-set request/response types.

use probank_core::{Problem, ProblemSet};
use serde::{Deserialize, Serialize};

/// Loosely-typed problem-set payload as received from clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProblemSetPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Response for listing problem sets.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemSetListResponse {
    /// All problem sets, newest first.
    pub problem_sets: Vec<ProblemSet>,
}

/// Response for listing the problems belonging to a set.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemSetMembersResponse {
    /// The set's identifier.
    pub problem_set_id: String,
    /// Problems whose membership list contains the set.
    pub problems: Vec<Problem>,
}
