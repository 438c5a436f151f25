//! SQLite implementation of [`CatalogStore`].
//!
//! [`SqliteStore`] persists catalogue documents in a SQLite database with
//! WAL mode and automatic schema migrations. List and nested fields
//! (`problem_set_ids`, `problem_metadata`, `tags`) are stored as JSON TEXT
//! columns via serde_json; membership predicates use SQLite's `json_each`.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexicographic `ORDER BY created_at` is chronological.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use probank_core::{
    Problem, ProblemDraft, ProblemMetadata, ProblemSet, ProblemSetDraft,
};

use crate::error::StorageError;
use crate::traits::CatalogStore;

/// Membership predicate shared by count, listing, and detach queries.
const MEMBER_PREDICATE: &str =
    "EXISTS (SELECT 1 FROM json_each(problems.problem_set_ids) WHERE json_each.value = ?1)";

/// SQLite-backed implementation of [`CatalogStore`].
///
/// Multi-row writes are wrapped in a transaction; single-document writes are
/// single statements and need none. There are no cross-document
/// transactions, matching the trait contract.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Current time truncated to the stored precision, so a freshly created
    /// document round-trips bit-identical through the database.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }

    /// Serializes a timestamp to its fixed-width TEXT form.
    fn timestamp_to_sql(t: &DateTime<Utc>) -> String {
        t.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Deserializes a timestamp from TEXT.
    fn timestamp_from_sql(s: &str) -> Result<DateTime<Utc>, StorageError> {
        DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StorageError::Integrity {
                reason: format!("bad timestamp '{}': {}", s, e),
            })
    }

    /// Decodes a raw problems row into a [`Problem`].
    fn decode_problem(row: RawProblem) -> Result<Problem, StorageError> {
        let source = row
            .source
            .parse()
            .map_err(|e| StorageError::Integrity {
                reason: format!("problem {}: {}", row.id, e),
            })?;
        let problem_set_ids: Vec<String> = serde_json::from_str(&row.problem_set_ids)?;
        let problem_metadata: ProblemMetadata = serde_json::from_str(&row.problem_metadata)?;
        Ok(Problem {
            id: row.id,
            title: row.title,
            source,
            source_link: row.source_link,
            problem_id: row.problem_id,
            problem_set_ids,
            problem_metadata,
            created_at: Self::timestamp_from_sql(&row.created_at)?,
            updated_at: Self::timestamp_from_sql(&row.updated_at)?,
        })
    }

    /// Decodes a raw problem_sets row into a [`ProblemSet`].
    fn decode_problem_set(row: RawProblemSet) -> Result<ProblemSet, StorageError> {
        let tags: Vec<String> = serde_json::from_str(&row.tags)?;
        Ok(ProblemSet {
            id: row.id,
            title: row.title,
            description: row.description,
            tags,
            problem_count: row.problem_count,
            created_at: Self::timestamp_from_sql(&row.created_at)?,
            updated_at: Self::timestamp_from_sql(&row.updated_at)?,
        })
    }

    /// Runs a problems query returning full rows, decoding each.
    fn query_problems(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Problem>, StorageError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok(RawProblem {
                id: row.get(0)?,
                title: row.get(1)?,
                source: row.get(2)?,
                source_link: row.get(3)?,
                problem_id: row.get(4)?,
                problem_set_ids: row.get(5)?,
                problem_metadata: row.get(6)?,
                created_at: row.get(7)?,
                updated_at: row.get(8)?,
            })
        })?;
        let mut problems = Vec::new();
        for row in rows {
            problems.push(Self::decode_problem(row?)?);
        }
        Ok(problems)
    }
}

/// All problems columns in select order.
const PROBLEM_COLUMNS: &str = "id, title, source, source_link, problem_id, \
     problem_set_ids, problem_metadata, created_at, updated_at";

/// All problem_sets columns in select order.
const PROBLEM_SET_COLUMNS: &str =
    "id, title, description, tags, problem_count, created_at, updated_at";

/// Undecoded problems row (TEXT columns as stored).
struct RawProblem {
    id: String,
    title: String,
    source: String,
    source_link: String,
    problem_id: String,
    problem_set_ids: String,
    problem_metadata: String,
    created_at: String,
    updated_at: String,
}

/// Undecoded problem_sets row.
struct RawProblemSet {
    id: String,
    title: String,
    description: String,
    tags: String,
    problem_count: i64,
    created_at: String,
    updated_at: String,
}

impl CatalogStore for SqliteStore {
    // -------------------------------------------------------------------
    // Problem CRUD
    // -------------------------------------------------------------------

    fn create_problem(&mut self, draft: &ProblemDraft) -> Result<Problem, StorageError> {
        let now = Self::now();
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
        self.conn.execute(
            "INSERT INTO problems (id, title, source, source_link, problem_id, \
             problem_set_ids, problem_metadata, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                problem.id,
                problem.title,
                problem.source.as_str(),
                problem.source_link,
                problem.problem_id,
                serde_json::to_string(&problem.problem_set_ids)?,
                serde_json::to_string(&problem.problem_metadata)?,
                Self::timestamp_to_sql(&problem.created_at),
                Self::timestamp_to_sql(&problem.updated_at),
            ],
        )?;
        Ok(problem)
    }

    fn find_problem(&self, id: &str) -> Result<Option<Problem>, StorageError> {
        let sql = format!("SELECT {} FROM problems WHERE id = ?1", PROBLEM_COLUMNS);
        let mut problems = self.query_problems(&sql, &[&id])?;
        Ok(problems.pop())
    }

    fn find_problem_by_generated_id(
        &self,
        generated_id: &str,
    ) -> Result<Option<Problem>, StorageError> {
        let sql = format!(
            "SELECT {} FROM problems WHERE problem_id = ?1 LIMIT 1",
            PROBLEM_COLUMNS
        );
        let mut problems = self.query_problems(&sql, &[&generated_id])?;
        Ok(problems.pop())
    }

    fn update_problem(
        &mut self,
        id: &str,
        draft: &ProblemDraft,
    ) -> Result<Problem, StorageError> {
        let created_at: Option<String> = self
            .conn
            .query_row(
                "SELECT created_at FROM problems WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let created_at = match created_at {
            Some(s) => Self::timestamp_from_sql(&s)?,
            None => return Err(StorageError::ProblemNotFound(id.to_string())),
        };

        let updated = Problem {
            id: id.to_string(),
            title: draft.title.clone(),
            source: draft.source,
            source_link: draft.source_link.clone(),
            problem_id: draft.problem_id.clone(),
            problem_set_ids: draft.problem_set_ids.clone(),
            problem_metadata: draft.problem_metadata.clone(),
            created_at,
            updated_at: Self::now(),
        };
        self.conn.execute(
            "UPDATE problems SET title = ?1, source = ?2, source_link = ?3, \
             problem_id = ?4, problem_set_ids = ?5, problem_metadata = ?6, \
             updated_at = ?7 WHERE id = ?8",
            params![
                updated.title,
                updated.source.as_str(),
                updated.source_link,
                updated.problem_id,
                serde_json::to_string(&updated.problem_set_ids)?,
                serde_json::to_string(&updated.problem_metadata)?,
                Self::timestamp_to_sql(&updated.updated_at),
                updated.id,
            ],
        )?;
        Ok(updated)
    }

    fn delete_problem(&mut self, id: &str) -> Result<(), StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM problems WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::ProblemNotFound(id.to_string()));
        }
        Ok(())
    }

    fn list_problems(&self) -> Result<Vec<Problem>, StorageError> {
        let sql = format!(
            "SELECT {} FROM problems ORDER BY created_at DESC, id",
            PROBLEM_COLUMNS
        );
        self.query_problems(&sql, &[])
    }

    fn list_problems_in_set(&self, set_id: &str) -> Result<Vec<Problem>, StorageError> {
        let sql = format!(
            "SELECT {} FROM problems WHERE {} ORDER BY created_at DESC, id",
            PROBLEM_COLUMNS, MEMBER_PREDICATE
        );
        self.query_problems(&sql, &[&set_id])
    }

    fn count_problems_in_set(&self, set_id: &str) -> Result<i64, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM problems WHERE {}", MEMBER_PREDICATE);
        let count: i64 = self
            .conn
            .query_row(&sql, params![set_id], |row| row.get(0))?;
        Ok(count)
    }

    // -------------------------------------------------------------------
    // Problem-set CRUD
    // -------------------------------------------------------------------

    fn create_problem_set(
        &mut self,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, StorageError> {
        let now = Self::now();
        let set = ProblemSet {
            id: Uuid::new_v4().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            problem_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO problem_sets (id, title, description, tags, problem_count, \
             created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                set.id,
                set.title,
                set.description,
                serde_json::to_string(&set.tags)?,
                set.problem_count,
                Self::timestamp_to_sql(&set.created_at),
                Self::timestamp_to_sql(&set.updated_at),
            ],
        )?;
        Ok(set)
    }

    fn find_problem_set(&self, id: &str) -> Result<Option<ProblemSet>, StorageError> {
        let sql = format!(
            "SELECT {} FROM problem_sets WHERE id = ?1",
            PROBLEM_SET_COLUMNS
        );
        let raw = self
            .conn
            .query_row(&sql, params![id], |row| {
                Ok(RawProblemSet {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    tags: row.get(3)?,
                    problem_count: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })
            .optional()?;
        raw.map(Self::decode_problem_set).transpose()
    }

    fn list_problem_sets(&self) -> Result<Vec<ProblemSet>, StorageError> {
        let sql = format!(
            "SELECT {} FROM problem_sets ORDER BY created_at DESC, id",
            PROBLEM_SET_COLUMNS
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(RawProblemSet {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                tags: row.get(3)?,
                problem_count: row.get(4)?,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        })?;
        let mut sets = Vec::new();
        for row in rows {
            sets.push(Self::decode_problem_set(row?)?);
        }
        Ok(sets)
    }

    fn update_problem_set(
        &mut self,
        id: &str,
        draft: &ProblemSetDraft,
    ) -> Result<ProblemSet, StorageError> {
        let existing = self
            .find_problem_set(id)?
            .ok_or_else(|| StorageError::ProblemSetNotFound(id.to_string()))?;
        let updated = ProblemSet {
            id: existing.id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            problem_count: existing.problem_count,
            created_at: existing.created_at,
            updated_at: Self::now(),
        };
        self.conn.execute(
            "UPDATE problem_sets SET title = ?1, description = ?2, tags = ?3, \
             updated_at = ?4 WHERE id = ?5",
            params![
                updated.title,
                updated.description,
                serde_json::to_string(&updated.tags)?,
                Self::timestamp_to_sql(&updated.updated_at),
                updated.id,
            ],
        )?;
        Ok(updated)
    }

    fn delete_problem_set(&mut self, id: &str) -> Result<(), StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM problem_sets WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::ProblemSetNotFound(id.to_string()));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Consistency operations
    // -------------------------------------------------------------------

    fn update_problem_count(&mut self, problem: &Problem) -> Result<(), StorageError> {
        let count_sql = format!("SELECT COUNT(*) FROM problems WHERE {}", MEMBER_PREDICATE);
        let tx = self.conn.transaction()?;
        for set_id in problem.distinct_set_ids() {
            let count: i64 = tx.query_row(&count_sql, params![set_id], |row| row.get(0))?;
            // Affects zero rows when the set no longer exists -- skipped.
            tx.execute(
                "UPDATE problem_sets SET problem_count = ?1 WHERE id = ?2",
                params![count, set_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn detach_problem_set(
        &mut self,
        set_id: &str,
        limit: usize,
    ) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let mut rewritten = 0usize;
        {
            let select_sql = format!(
                "SELECT id, problem_set_ids FROM problems WHERE {} ORDER BY id LIMIT ?2",
                MEMBER_PREDICATE
            );
            let mut stmt = tx.prepare(&select_sql)?;
            let rows = stmt.query_map(params![set_id, limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut batch = Vec::new();
            for row in rows {
                batch.push(row?);
            }

            for (id, memberships_json) in batch {
                let mut memberships: Vec<String> = serde_json::from_str(&memberships_json)?;
                memberships.retain(|s| s != set_id);
                tx.execute(
                    "UPDATE problems SET problem_set_ids = ?1 WHERE id = ?2",
                    params![serde_json::to_string(&memberships)?, id],
                )?;
                rewritten += 1;
            }
        }
        tx.commit()?;
        Ok(rewritten)
    }
}
