//! In-memory implementation of [`CatalogStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral use.
//! It stores documents in HashMaps with semantics identical to the SQLite
//! backend: store-assigned UUID ids, store-maintained timestamps, newest-
//! first listings, and the same consistency-operation behavior.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use probank_core::{Problem, ProblemDraft, ProblemSet, ProblemSetDraft};

use crate::error::StorageError;
use crate::traits::CatalogStore;

/// HashMap-backed implementation of [`CatalogStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    problems: HashMap<String, Problem>,
    problem_sets: HashMap<String, ProblemSet>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// True if any membership entry of `problem` equals `set_id`.
    fn is_member(problem: &Problem, set_id: &str) -> bool {
        problem.problem_set_ids.iter().any(|s| s == set_id)
    }
}

impl CatalogStore for InMemoryStore {
    // -------------------------------------------------------------------
    // Problem CRUD
    // -------------------------------------------------------------------

    fn create_problem(&mut self, draft: &ProblemDraft) -> Result<Problem, StorageError> {
        let now = Utc::now();
        let problem = Problem {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            source: draft.source,
            source_link: draft.source_link.clone(),
            problem_id: draft.problem_id.clone(),
            problem_set_ids: draft.problem_set_ids.clone(),
            problem_metadata: draft.problem_metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        self.problems.insert(problem.id.clone(), problem.clone());
        Ok(problem)
    }

    fn find_problem(&self, id: &str) -> Result<Option<Problem>, StorageError> {
        Ok(self.problems.get(id).cloned())
    }

    fn find_problem_by_generated_id(
        &self,
        generated_id: &str,
    ) -> Result<Option<Problem>, StorageError> {
        Ok(self
            .problems
            .values()
            .find(|p| p.problem_id == generated_id)
            .cloned())
    }

    fn update_problem(
        &mut self,
        id: &str,
        draft: &ProblemDraft,
    ) -> Result<Problem, StorageError> {
        let existing = self
            .problems
            .get(id)
            .ok_or_else(|| StorageError::ProblemNotFound(id.to_string()))?;
        let updated = Problem {
            id: existing.id.clone(),
            title: draft.title.clone(),
            source: draft.source,
            source_link: draft.source_link.clone(),
            problem_id: draft.problem_id.clone(),
            problem_set_ids: draft.problem_set_ids.clone(),
            problem_metadata: draft.problem_metadata.clone(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.problems.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    fn delete_problem(&mut self, id: &str) -> Result<(), StorageError> {
        self.problems
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::ProblemNotFound(id.to_string()))
    }

    fn list_problems(&self) -> Result<Vec<Problem>, StorageError> {
        let mut problems: Vec<Problem> = self.problems.values().cloned().collect();
        problems.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(problems)
    }

    fn list_problems_in_set(&self, set_id: &str) -> Result<Vec<Problem>, StorageError> {
        let mut problems: Vec<Problem> = self
            .problems
            .values()
            .filter(|p| Self::is_member(p, set_id))
            .cloned()
            .collect();
        problems.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(problems)
    }

    fn count_problems_in_set(&self, set_id: &str) -> Result<i64, StorageError> {
        Ok(self
            .problems
            .values()
            .filter(|p| Self::is_member(p, set_id))
            .count() as i64)
    }

    // -------------------------------------------------------------------
    // Problem-set CRUD
    // -------------------------------------------------------------------

    fn create_problem_set(
        &mut self,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, StorageError> {
        let now = Utc::now();
        let set = ProblemSet {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            problem_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.problem_sets.insert(set.id.clone(), set.clone());
        Ok(set)
    }

    fn find_problem_set(&self, id: &str) -> Result<Option<ProblemSet>, StorageError> {
        Ok(self.problem_sets.get(id).cloned())
    }

    fn list_problem_sets(&self) -> Result<Vec<ProblemSet>, StorageError> {
        let mut sets: Vec<ProblemSet> = self.problem_sets.values().cloned().collect();
        sets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sets)
    }

    fn update_problem_set(
        &mut self,
        id: &str,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, StorageError> {
        let existing = self
            .problem_sets
            .get(id)
            .ok_or_else(|| StorageError::ProblemSetNotFound(id.to_string()))?;
        let updated = ProblemSet {
            id: existing.id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            problem_count: existing.problem_count,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.problem_sets.insert(id.to_string(), updated.clone());
        Ok(updated)
    }

    fn delete_problem_set(&mut self, id: &str) -> Result<(), StorageError> {
        self.problem_sets
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::ProblemSetNotFound(id.to_string()))
    }

    // -------------------------------------------------------------------
    // Consistency operations
    // -------------------------------------------------------------------

    fn update_problem_count(&mut self, problem: &Problem) -> Result<(), StorageError> {
        for set_id in problem.distinct_set_ids() {
            let count = self.count_problems_in_set(set_id)?;
            // A referenced set that no longer exists is skipped.
            if let Some(set) = self.problem_sets.get_mut(set_id) {
                set.problem_count = count;
            }
        }
        Ok(())
    }

    fn detach_problem_set(
        &mut self,
        set_id: &str,
        limit: usize,
    ) -> Result<usize, StorageError> {
        // Collect matching ids first (sorted for deterministic batching).
        let mut member_ids: Vec<String> = self
            .problems
            .values()
            .filter(|p| Self::is_member(p, set_id))
            .map(|p| p.id.clone())
            .collect();
        member_ids.sort();
        member_ids.truncate(limit);

        for id in &member_ids {
            if let Some(problem) = self.problems.get_mut(id) {
                problem.problem_set_ids.retain(|s| s != set_id);
            }
        }
        Ok(member_ids.len())
    }
}
