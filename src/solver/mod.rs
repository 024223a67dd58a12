//! Solver adapters.
//!
//! The formulation never solves anything itself. It hands a
//! [`LinearProgram`] to an injected [`MilpSolver`] and reads back a
//! [`SolverOutcome`]: one value per variable plus statuses.
//!
//! # Implementations
//!
//! | Solver | Backend | Intended for |
//! |--------|---------|--------------|
//! | [`MicroLpSolver`] | `good_lp` + `microlp` (pure Rust) | Real instances |
//! | [`BruteForceSolver`] | Exhaustive enumeration | Tiny fixtures, tests |

mod brute_force;
mod microlp;

pub use brute_force::BruteForceSolver;
pub use microlp::MicroLpSolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::lp::LinearProgram;

/// How the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolutionStatus {
    /// Proven optimal assignment.
    Optimal,
    /// Feasible assignment without optimality proof (e.g. time limit).
    Feasible,
    /// No assignment available.
    NoSolution,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => f.write_str("Optimal"),
            SolutionStatus::Feasible => f.write_str("Feasible"),
            SolutionStatus::NoSolution => f.write_str("NoSolution"),
        }
    }
}

/// What the solver established about the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelStatus {
    /// At least one feasible assignment exists.
    Feasible,
    /// No feasible assignment exists.
    Infeasible,
    /// The objective is unbounded below.
    Unbounded,
    /// The solver stopped before deciding.
    Unknown,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStatus::Feasible => f.write_str("Feasible"),
            ModelStatus::Infeasible => f.write_str("Infeasible"),
            ModelStatus::Unbounded => f.write_str("Unbounded"),
            ModelStatus::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget (ms). `None` = unlimited. Solvers may ignore it.
    pub time_limit_ms: Option<u64>,
    /// Absolute tolerance for constraint satisfaction.
    pub feasibility_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: None,
            feasibility_tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    /// Sets the time limit.
    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = Some(time_limit_ms);
        self
    }

    /// Sets the feasibility tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    /// Time limit as a [`Duration`].
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Raw result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    /// How the solver terminated.
    pub solution_status: SolutionStatus,
    /// What the solver established about the model.
    pub model_status: ModelStatus,
    /// One value per program variable, when an assignment is available.
    pub values: Option<Vec<f64>>,
    /// Objective value of `values`.
    pub objective_value: Option<f64>,
    /// Free-form diagnostic.
    pub message: Option<String>,
}

impl SolverOutcome {
    /// An optimal assignment.
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            solution_status: SolutionStatus::Optimal,
            model_status: ModelStatus::Feasible,
            values: Some(values),
            objective_value: Some(objective_value),
            message: None,
        }
    }

    /// A feasible assignment without optimality proof.
    pub fn feasible(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            solution_status: SolutionStatus::Feasible,
            model_status: ModelStatus::Feasible,
            values: Some(values),
            objective_value: Some(objective_value),
            message: None,
        }
    }

    /// No assignment, with what is known about the model.
    pub fn no_solution(model_status: ModelStatus) -> Self {
        Self {
            solution_status: SolutionStatus::NoSolution,
            model_status,
            values: None,
            objective_value: None,
            message: None,
        }
    }

    /// Attaches a diagnostic.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// An optimization engine for mixed-integer linear programs.
///
/// Implementations minimize the program's objective and must return
/// either no values or exactly one value per variable.
pub trait MilpSolver {
    /// Engine name for logs.
    fn name(&self) -> &'static str;

    /// Solves `program` within the budget of `config`.
    fn solve(&self, program: &LinearProgram, config: &SolverConfig) -> SolverOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_ms, None);
        assert!(config.time_limit().is_none());
        assert!((config.feasibility_tolerance - 1e-6).abs() < 1e-15);

        let config = config.with_time_limit_ms(1500).with_tolerance(1e-4);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
        assert!((config.feasibility_tolerance - 1e-4).abs() < 1e-15);
    }

    #[test]
    fn test_config_partial_json() {
        let config: SolverConfig = serde_json::from_str(r#"{ "time_limit_ms": 250 }"#).unwrap();
        assert_eq!(config.time_limit_ms, Some(250));
        assert!((config.feasibility_tolerance - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn test_outcome_constructors() {
        let o = SolverOutcome::optimal(vec![1.0], 2.0);
        assert_eq!(o.solution_status, SolutionStatus::Optimal);
        assert_eq!(o.model_status, ModelStatus::Feasible);

        let o = SolverOutcome::no_solution(ModelStatus::Infeasible).with_message("no way");
        assert_eq!(o.solution_status, SolutionStatus::NoSolution);
        assert!(o.values.is_none());
        assert_eq!(o.message.as_deref(), Some("no way"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolutionStatus::Optimal.to_string(), "Optimal");
        assert_eq!(ModelStatus::Infeasible.to_string(), "Infeasible");
    }
}
