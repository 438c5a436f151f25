//! The [`CatalogStore`] trait defining the storage contract for the
//! problem catalogue.
//!
//! One trait covers both document families (problems and problem sets) plus
//! the consistency operations, so backends are fully swappable without
//! changing service logic. The trait is synchronous (not async): each
//! operation is a single store call and the server serializes access behind
//! an async-aware mutex.
//!
//! Store-owned fields: backends assign the opaque document `id` and both
//! timestamps on create, and refresh `updated_at` on update (preserving
//! `created_at`). Callers never supply these.

use probank_core::{Problem, ProblemDraft, ProblemSet, ProblemSetDraft};

use crate::error::StorageError;

/// The storage contract for the problem catalogue.
///
/// Implementations provide document-style persistence with exact-key and
/// membership-filtered lookups. There are no cross-document transactions;
/// the consistency operations are idempotent so the service can re-drive
/// them after partial failure.
pub trait CatalogStore {
    // -------------------------------------------------------------------
    // Problem CRUD
    // -------------------------------------------------------------------

    /// Persists a new problem, assigning its id and timestamps.
    fn create_problem(&mut self, draft: &ProblemDraft) -> Result<Problem, StorageError>;

    /// Looks up a problem by store id.
    fn find_problem(&self, id: &str) -> Result<Option<Problem>, StorageError>;

    /// Looks up a problem by its generated identity hash.
    fn find_problem_by_generated_id(
        &self,
        generated_id: &str,
    ) -> Result<Option<Problem>, StorageError>;

    /// Replaces the document stored under `id` with `draft`.
    ///
    /// Preserves `created_at`, refreshes `updated_at`. Errors with
    /// [`StorageError::ProblemNotFound`] if no such document exists.
    fn update_problem(&mut self, id: &str, draft: &ProblemDraft)
        -> Result<Problem, StorageError>;

    /// Deletes a problem by store id.
    ///
    /// Errors with [`StorageError::ProblemNotFound`] if no such document
    /// exists.
    fn delete_problem(&mut self, id: &str) -> Result<(), StorageError>;

    /// Lists all problems, newest first (`created_at` descending).
    fn list_problems(&self) -> Result<Vec<Problem>, StorageError>;

    /// Lists the problems whose membership list contains `set_id`.
    fn list_problems_in_set(&self, set_id: &str) -> Result<Vec<Problem>, StorageError>;

    /// Counts the problems whose membership list contains `set_id`.
    fn count_problems_in_set(&self, set_id: &str) -> Result<i64, StorageError>;

    // -------------------------------------------------------------------
    // Problem-set CRUD
    // -------------------------------------------------------------------

    /// Persists a new problem set with `problem_count` starting at zero.
    fn create_problem_set(
        &mut self,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, StorageError>;

    /// Looks up a problem set by store id.
    fn find_problem_set(&self, id: &str) -> Result<Option<ProblemSet>, StorageError>;

    /// Lists all problem sets, newest first.
    fn list_problem_sets(&self) -> Result<Vec<ProblemSet>, StorageError>;

    /// Replaces the display fields of the set stored under `id`.
    ///
    /// `problem_count` keeps its stored value: only count propagation may
    /// touch it. Errors with [`StorageError::ProblemSetNotFound`] if no such
    /// document exists.
    fn update_problem_set(
        &mut self,
        id: &str,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, StorageError>;

    /// Deletes a problem set by store id.
    ///
    /// Membership cleanup on the problems is the caller's responsibility
    /// (see [`CatalogStore::detach_problem_set`]). Errors with
    /// [`StorageError::ProblemSetNotFound`] if no such document exists.
    fn delete_problem_set(&mut self, id: &str) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Consistency operations
    // -------------------------------------------------------------------

    /// Recomputes and persists `problem_count` for every distinct set the
    /// given problem references.
    ///
    /// The count is derived by counting problems whose membership list
    /// currently contains the set's id. A referenced set that no longer
    /// exists is skipped. Idempotent and safe to call redundantly.
    fn update_problem_count(&mut self, problem: &Problem) -> Result<(), StorageError>;

    /// Removes `set_id` from the membership list of up to `limit` problems.
    ///
    /// Returns the number of problems rewritten; callers loop until zero.
    /// Removing an id that no problem references is a no-op, so the
    /// operation is safely re-runnable after partial failure.
    fn detach_problem_set(&mut self, set_id: &str, limit: usize)
        -> Result<usize, StorageError>;
}
