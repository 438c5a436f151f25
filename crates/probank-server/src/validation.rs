//! Request-shape validation.
//!
//! A capability boundary in front of the service: each function takes a
//! loosely-typed payload and returns either the typed, valid form or an
//! ordered list of field-level [`ValidationFailure`]s. Handlers
//! short-circuit on any failure without touching the service or the store;
//! no exceptions-as-control-flow inside the core.

use std::str::FromStr;

use probank_core::{Difficulty, Platform, ProblemMetadata, ProblemSetDraft};

use crate::schema::diagnostics::ValidationFailure;
use crate::schema::problems::{ProblemPayload, ValidProblem};
use crate::schema::problem_sets::ProblemSetPayload;

/// Validates a problem payload (create and update share the same shape).
///
/// Required: `title`, `source` (a known platform tag),
/// `problem_metadata.platform_problem_id`, `problem_metadata.difficulty`
/// (a known label). Optional with defaults: `source_link` (empty),
/// `problem_set_ids` (empty list).
pub fn validate_problem(
    payload: &ProblemPayload,
) -> Result<ValidProblem, Vec<ValidationFailure>> {
    let mut failures = Vec::new();

    let title = non_empty(payload.title.as_deref(), "title", &mut failures);
    let source = parse_field::<Platform>(payload.source.as_deref(), "source", &mut failures);

    let (platform_problem_id, difficulty) = match &payload.problem_metadata {
        Some(metadata) => (
            non_empty(
                metadata.platform_problem_id.as_deref(),
                "problem_metadata.platform_problem_id",
                &mut failures,
            ),
            parse_field::<Difficulty>(
                metadata.difficulty.as_deref(),
                "problem_metadata.difficulty",
                &mut failures,
            ),
        ),
        None => {
            failures.push(ValidationFailure::invalid("body", "problem_metadata"));
            (None, None)
        }
    };

    match (title, source, platform_problem_id, difficulty) {
        (Some(title), Some(source), Some(platform_problem_id), Some(difficulty))
            if failures.is_empty() =>
        {
            Ok(ValidProblem {
                title,
                source,
                source_link: payload.source_link.clone().unwrap_or_default(),
                problem_set_ids: payload.problem_set_ids.clone().unwrap_or_default(),
                problem_metadata: ProblemMetadata {
                    platform_problem_id,
                    difficulty,
                },
            })
        }
        _ => Err(failures),
    }
}

/// Validates a problem-set payload. Only `title` is required.
pub fn validate_problem_set(
    payload: &ProblemSetPayload,
) -> Result<ProblemSetDraft, Vec<ValidationFailure>> {
    let mut failures = Vec::new();
    match non_empty(payload.title.as_deref(), "title", &mut failures) {
        Some(title) if failures.is_empty() => Ok(ProblemSetDraft {
            title,
            description: payload.description.clone().unwrap_or_default(),
            tags: payload.tags.clone().unwrap_or_default(),
        }),
        _ => Err(failures),
    }
}

/// Validates a path identifier: present and non-blank.
pub fn validate_identifier(
    field: &str,
    value: &str,
) -> Result<(), Vec<ValidationFailure>> {
    if value.trim().is_empty() {
        return Err(vec![ValidationFailure::invalid("params", field)]);
    }
    Ok(())
}

/// Records a failure unless `value` is a non-blank string.
fn non_empty(
    value: Option<&str>,
    field: &str,
    failures: &mut Vec<ValidationFailure>,
) -> Option<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Some(s.to_string()),
        _ => {
            failures.push(ValidationFailure::invalid("body", field));
            None
        }
    }
}

/// Records a failure unless `value` parses into `T`.
fn parse_field<T: FromStr>(
    value: Option<&str>,
    field: &str,
    failures: &mut Vec<ValidationFailure>,
) -> Option<T> {
    match value.and_then(|s| s.parse::<T>().ok()) {
        Some(parsed) => Some(parsed),
        None => {
            failures.push(ValidationFailure::invalid("body", field));
            None
        }
    }
}
