//! Storage abstraction for the problem catalogue.
//!
//! Provides the [`CatalogStore`] trait defining the storage contract that all
//! backends implement, plus [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! The store exposes document-style CRUD for the two document families
//! (problems and problem sets), exact-key lookups (store id and generated
//! identity hash), membership-filtered queries, and the two consistency
//! operations the service layer drives:
//!
//! - `update_problem_count`: recompute-and-persist the denormalized
//!   `problem_count` cache for every set a problem references.
//! - `detach_problem_set`: batched removal of a deleted set's id from
//!   problem membership lists.
//!
//! There are no cross-document transactions; each operation is an
//! independent store call and the consistency operations are idempotent so
//! they can be re-driven after partial failure.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: CatalogStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema constants and migration setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::CatalogStore;
