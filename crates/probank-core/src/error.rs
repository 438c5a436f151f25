//! Core error types for probank-core.
//!
//! Uses `thiserror` for structured, matchable error variants. The core data
//! model is small, so the only failure modes are enum parse failures on
//! wire values.

use thiserror::Error;

/// Core errors produced by the probank-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A platform tag did not match any known platform.
    #[error("unknown platform: '{0}'")]
    UnknownPlatform(String),

    /// A difficulty label did not match any known difficulty.
    #[error("unknown difficulty: '{0}'")]
    UnknownDifficulty(String),
}
