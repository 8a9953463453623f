//! Observability infrastructure.
//!
//! Provides structured tracing for storage and service operations.

pub mod tracing;
