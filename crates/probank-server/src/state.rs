//! Application state with shared `CatalogService` for concurrent access.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without blocking
//! the tokio runtime.
//!
//! Note: `tokio::sync::RwLock` would allow concurrent reads, but the SQLite
//! backend contains `rusqlite::Connection` which is `!Sync`, preventing it
//! from being held behind an `RwLock`. The `Mutex` approach is correct and
//! non-blocking.

use std::sync::Arc;

use crate::error::ApiError;
use crate::service::CatalogService;

/// Shared application state for the HTTP server.
///
/// Wraps `CatalogService` in `Arc<tokio::sync::Mutex<>>` so it can be shared
/// across async handler tasks. All handlers acquire the lock via
/// `.lock().await` (non-blocking to the tokio runtime, unlike
/// `std::sync::Mutex`).
#[derive(Clone)]
pub struct AppState {
    /// The shared catalogue service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<CatalogService>>,
}

impl AppState {
    /// Creates a new `AppState` with a `CatalogService` backed by the given
    /// SQLite database path.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let service = CatalogService::new(db_path)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }

    /// Creates a new `AppState` with an in-memory store (for testing).
    pub fn in_memory() -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(CatalogService::in_memory())),
        }
    }
}
