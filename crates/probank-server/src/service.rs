//! CatalogService: the single coordinator between HTTP handlers and the
//! store.
//!
//! All catalogue mutations flow through [`CatalogService`]; handlers are
//! thin wrappers that delegate to these methods. The service owns the two
//! non-trivial protocols of the system:
//!
//! - **Identity**: a problem's `problem_id` is always the hash of its
//!   current `(source, platform_problem_id)` pair. The service recomputes it
//!   on every create and update -- it is never taken from the client.
//! - **Count propagation**: after every membership-affecting problem
//!   mutation, the service asks the store to recompute `problem_count` for
//!   the sets the problem references. The problem write always completes
//!   first; a propagation failure is logged and never rolls back or fails
//!   the mutation (problem data is authoritative, the count is a cache).
//!
//! There are no transactions across these steps and no cross-request
//! serialization beyond the state mutex, so `problem_count` is eventually
//! consistent, not a strongly-consistent counter.

use probank_core::{
    problem_identity, Problem, ProblemDraft, ProblemSet, ProblemSetDraft,
};
use probank_storage::{CatalogStore, InMemoryStore, SqliteStore};

use crate::error::ApiError;
use crate::schema::diagnostics::ValidationFailure;
use crate::schema::problems::ValidProblem;

/// Problems rewritten per membership-cleanup batch.
const DETACH_BATCH: usize = 100;

/// The central service coordinating problem and problem-set workflows.
///
/// Holds the store behind the [`CatalogStore`] trait so backends are
/// swappable and tests can inject instrumented stores.
pub struct CatalogService {
    store: Box<dyn CatalogStore + Send>,
}

impl CatalogService {
    /// Creates a service backed by a SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(Self::with_store(Box::new(store)))
    }

    /// Creates a service backed by the in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(InMemoryStore::new()))
    }

    /// Creates a service over an arbitrary store implementation.
    pub fn with_store(store: Box<dyn CatalogStore + Send>) -> Self {
        CatalogService { store }
    }

    // -----------------------------------------------------------------------
    // Problem workflows
    // -----------------------------------------------------------------------

    /// Creates a problem.
    ///
    /// Computes the identity hash, writes the document, then propagates
    /// counts to every set the stored document references.
    pub fn create_problem(&mut self, input: &ValidProblem) -> Result<Problem, ApiError> {
        Self::check_critical(input)?;
        let draft = Self::draft_with_identity(input);
        let created = self.store.create_problem(&draft)?;
        self.propagate_counts(&created);
        Ok(created)
    }

    /// Updates a problem by store id.
    ///
    /// The identity hash is recomputed unconditionally (recomputation is
    /// idempotent when the identity fields did not change). Counts are
    /// propagated over the *updated* membership; a set removed by this
    /// update is not recomputed here and keeps a stale count until the next
    /// mutation that touches it.
    pub fn update_problem(
        &mut self,
        id: &str,
        input: &ValidProblem,
    ) -> Result<Problem, ApiError> {
        Self::check_critical(input)?;
        if self.store.find_problem(id)?.is_none() {
            return Err(ApiError::NotFound(format!("problem not found: {}", id)));
        }
        let draft = Self::draft_with_identity(input);
        let updated = self.store.update_problem(id, &draft)?;
        self.propagate_counts(&updated);
        Ok(updated)
    }

    /// Deletes a problem by store id.
    ///
    /// Counts are propagated from the pre-deletion snapshot of the document,
    /// since the membership list is gone after the delete.
    pub fn delete_problem(&mut self, id: &str) -> Result<(), ApiError> {
        let Some(snapshot) = self.store.find_problem(id)? else {
            return Err(ApiError::NotFound(format!("problem not found: {}", id)));
        };
        self.store.delete_problem(id)?;
        self.propagate_counts(&snapshot);
        Ok(())
    }

    /// Looks up a problem by store id.
    pub fn get_problem(&self, id: &str) -> Result<Problem, ApiError> {
        self.store
            .find_problem(id)?
            .ok_or_else(|| ApiError::NotFound(format!("problem not found: {}", id)))
    }

    /// Looks up a problem by its generated identity hash.
    ///
    /// Not-found is a first-class outcome here: clients call this before
    /// creating to avoid cataloguing the same platform problem twice.
    pub fn find_by_generated_id(&self, generated_id: &str) -> Result<Problem, ApiError> {
        self.store
            .find_problem_by_generated_id(generated_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("problem not found: {}", generated_id))
            })
    }

    /// Lists all problems, newest first.
    pub fn list_problems(&self) -> Result<Vec<Problem>, ApiError> {
        Ok(self.store.list_problems()?)
    }

    /// Lists the problems belonging to a set.
    pub fn list_problems_in_set(&self, set_id: &str) -> Result<Vec<Problem>, ApiError> {
        if self.store.find_problem_set(set_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "problem set not found: {}",
                set_id
            )));
        }
        Ok(self.store.list_problems_in_set(set_id)?)
    }

    // -----------------------------------------------------------------------
    // Problem-set workflows
    // -----------------------------------------------------------------------

    /// Creates a problem set (`problem_count` starts at zero).
    pub fn create_problem_set(
        &mut self,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, ApiError> {
        Ok(self.store.create_problem_set(draft)?)
    }

    /// Looks up a problem set by store id.
    pub fn get_problem_set(&self, id: &str) -> Result<ProblemSet, ApiError> {
        self.store
            .find_problem_set(id)?
            .ok_or_else(|| ApiError::NotFound(format!("problem set not found: {}", id)))
    }

    /// Lists all problem sets, newest first.
    pub fn list_problem_sets(&self) -> Result<Vec<ProblemSet>, ApiError> {
        Ok(self.store.list_problem_sets()?)
    }

    /// Updates a problem set's display fields (`problem_count` untouched).
    pub fn update_problem_set(
        &mut self,
        id: &str,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, ApiError> {
        if self.store.find_problem_set(id)?.is_none() {
            return Err(ApiError::NotFound(format!("problem set not found: {}", id)));
        }
        Ok(self.store.update_problem_set(id, draft)?)
    }

    /// Deletes a problem set, then detaches its id from every problem's
    /// membership list.
    ///
    /// Cleanup runs in bounded batches and partial completion is acceptable:
    /// a failed batch is logged and aborts the loop without failing the
    /// deletion, and re-running the cleanup is safe (removing an absent id
    /// is a no-op).
    pub fn delete_problem_set(&mut self, id: &str) -> Result<(), ApiError> {
        if self.store.find_problem_set(id)?.is_none() {
            return Err(ApiError::NotFound(format!("problem set not found: {}", id)));
        }
        self.store.delete_problem_set(id)?;
        self.detach_memberships(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Re-checks the invariant-critical fields of an already shape-validated
    /// input. The upstream validator is expected to have caught these; the
    /// service refuses to hash or write from a blank identity field.
    fn check_critical(input: &ValidProblem) -> Result<(), ApiError> {
        let mut failures = Vec::new();
        if input.title.trim().is_empty() {
            failures.push(ValidationFailure::invalid("body", "title"));
        }
        if input.problem_metadata.platform_problem_id.trim().is_empty() {
            failures.push(ValidationFailure::invalid(
                "body",
                "problem_metadata.platform_problem_id",
            ));
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationFailed(failures))
        }
    }

    /// Builds a store draft from a valid input, computing the identity hash.
    fn draft_with_identity(input: &ValidProblem) -> ProblemDraft {
        let problem_id = problem_identity(
            input.source.as_str(),
            &input.problem_metadata.platform_problem_id,
        );
        ProblemDraft {
            title: input.title.clone(),
            source: input.source,
            source_link: input.source_link.clone(),
            problem_id,
            problem_set_ids: input.problem_set_ids.clone(),
            problem_metadata: input.problem_metadata.clone(),
        }
    }

    /// Recomputes set counts for the given problem's membership.
    ///
    /// Invoked exactly once per mutation; the store iterates the distinct
    /// set ids (an empty membership makes it a no-op). Best-effort: the
    /// triggering mutation has already committed, so a failure here is
    /// logged and swallowed.
    fn propagate_counts(&mut self, problem: &Problem) {
        if let Err(e) = self.store.update_problem_count(problem) {
            tracing::warn!(
                problem = %problem.id,
                error = %e,
                "problem count propagation failed; counts refresh on the next mutation"
            );
        }
    }

    /// Removes `set_id` from every problem's membership list, in batches.
    fn detach_memberships(&mut self, set_id: &str) {
        loop {
            match self.store.detach_problem_set(set_id, DETACH_BATCH) {
                Ok(0) => break,
                Ok(n) => {
                    tracing::debug!(set = %set_id, detached = n, "detached problem set from membership lists");
                }
                Err(e) => {
                    tracing::warn!(
                        set = %set_id,
                        error = %e,
                        "membership cleanup aborted; re-running it is safe"
                    );
                    break;
                }
            }
        }
    }
}
