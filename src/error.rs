//! Library error type.
//!
//! Only failures that abort the pipeline live here. Solver outcomes such
//! as infeasibility or a time limit are not errors; they travel in the
//! [`Schedule`](crate::models::Schedule) statuses.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while building a model or extracting a schedule.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The instance is not internally consistent.
    #[error("inconsistent instance data: {}", summarize(.0))]
    DataInconsistency(Vec<ValidationError>),

    /// The solver returned a value vector that does not match the program.
    #[error("solver returned {got} values for {expected} variables")]
    AssignmentShape { expected: usize, got: usize },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
