//! Problem request/response types.
//!
//! Incoming payloads are deliberately loose -- every field optional -- so
//! that shape validation can report per-field failures instead of a single
//! opaque deserialization error. [`crate::validation`] turns a payload into
//! a [`ValidProblem`] or a failure list; only valid payloads reach the
//! service.

use probank_core::{Platform, Problem, ProblemMetadata};
use serde::{Deserialize, Serialize};

/// Loosely-typed problem payload as received from clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProblemPayload {
    pub title: Option<String>,
    pub source: Option<String>,
    pub source_link: Option<String>,
    pub problem_set_ids: Option<Vec<String>>,
    pub problem_metadata: Option<ProblemMetadataPayload>,
}

/// Loosely-typed nested metadata payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProblemMetadataPayload {
    pub platform_problem_id: Option<String>,
    pub difficulty: Option<String>,
}

/// A problem payload that passed shape validation.
///
/// Carries everything the service needs to build a store draft; the
/// generated `problem_id` is *not* here -- the service always computes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProblem {
    pub title: String,
    pub source: Platform,
    pub source_link: String,
    pub problem_set_ids: Vec<String>,
    pub problem_metadata: ProblemMetadata,
}

/// Response for listing problems.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemListResponse {
    /// All problems, newest first.
    pub problems: Vec<Problem>,
}
