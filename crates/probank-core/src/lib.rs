pub mod error;
pub mod identity;
pub mod problem;
pub mod problem_set;

// Re-export commonly used types
pub use error::CoreError;
pub use identity::problem_identity;
pub use problem::{Difficulty, Platform, Problem, ProblemDraft, ProblemMetadata};
pub use problem_set::{ProblemSet, ProblemSetDraft};
