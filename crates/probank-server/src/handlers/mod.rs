//! HTTP handlers, one module per API domain.
//!
//! Handlers are deliberately thin: validate the request shape, acquire the
//! service lock, delegate. All identity and count-propagation logic lives in
//! [`crate::service::CatalogService`].

pub mod problem_sets;
pub mod problems;
