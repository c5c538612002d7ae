//! Shared error taxonomy for the CodeMend gating core.

#![warn(missing_docs)]

pub mod error;

pub use error::{GateError, GateResult};
