//! Shared helpers for the runnable demos.
#![warn(missing_docs)]

/// Connector selection for demos.
pub mod common;
