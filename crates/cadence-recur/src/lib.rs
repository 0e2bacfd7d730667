//! Recurrence schedule evaluation.
//!
//! Given a declarative recurring-schedule definition and a reference instant,
//! this crate deterministically computes the sequence of calendar instants at
//! which the associated task is expected to run. The evaluator is a pure
//! function of its inputs: it performs no I/O, never reads a wall clock, and
//! keeps all mutable state in a caller-owned cursor.

pub mod error;
pub mod recur;

pub use error::{RecurError, RecurResult};
