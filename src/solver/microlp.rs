//! `good_lp` adapter backed by the pure-Rust `microlp` engine.
//!
//! Translates a [`LinearProgram`] into a `good_lp` problem, solves it
//! with branch-and-bound in `microlp`, and maps the result back onto
//! [`SolverOutcome`]. `microlp` has no time limit; a configured limit is
//! logged and ignored.

use good_lp::solvers::microlp::microlp;
use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel};
use tracing::{debug, info, warn};

use super::{MilpSolver, ModelStatus, SolverConfig, SolverOutcome};
use crate::lp::{LinearExpr, LinearProgram, Relation, VarKind};

/// MILP solver using `good_lp` with the `microlp` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, program: &LinearProgram, config: &SolverConfig) -> SolverOutcome {
        if let Some(limit) = config.time_limit_ms {
            warn!(time_limit_ms = limit, "microlp does not support time limits; solving without one");
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<good_lp::Variable> = program
            .variables()
            .iter()
            .map(|v| {
                let mut def = variable().name(v.name.clone());
                match v.kind {
                    VarKind::Binary => def = def.binary(),
                    VarKind::Integer => def = def.integer(),
                    VarKind::Continuous => {}
                }
                if v.kind != VarKind::Binary {
                    if v.lower.is_finite() {
                        def = def.min(v.lower);
                    }
                    if v.upper.is_finite() {
                        def = def.max(v.upper);
                    }
                }
                vars.add(def)
            })
            .collect();

        let to_expression = |expr: &LinearExpr| {
            let mut out = Expression::from(expr.constant);
            for &(var, coef) in &expr.terms {
                out.add_mul(coef, handles[var.index()]);
            }
            out
        };

        let mut problem = vars
            .minimise(to_expression(program.objective()))
            .using(microlp);
        for c in program.constraints() {
            let lhs = to_expression(&c.expr);
            let rhs = c.rhs;
            problem = match c.relation {
                Relation::Le => problem.with(constraint!(lhs <= rhs)),
                Relation::Ge => problem.with(constraint!(lhs >= rhs)),
                Relation::Eq => problem.with(constraint!(lhs == rhs)),
            };
        }

        debug!(
            variables = program.variable_count(),
            constraints = program.constraint_count(),
            "microlp solve started"
        );

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
                let objective = program.objective_value(&values);
                info!(objective, "microlp found an optimal solution");
                SolverOutcome::optimal(values, objective)
            }
            Err(ResolutionError::Infeasible) => {
                info!("microlp proved the model infeasible");
                SolverOutcome::no_solution(ModelStatus::Infeasible)
            }
            Err(ResolutionError::Unbounded) => {
                warn!("microlp reports an unbounded objective");
                SolverOutcome::no_solution(ModelStatus::Unbounded)
            }
            Err(other) => {
                warn!(error = %other, "microlp failed");
                SolverOutcome::no_solution(ModelStatus::Unknown).with_message(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{LinearConstraint, Variable};
    use crate::solver::SolutionStatus;

    #[test]
    fn test_small_milp() {
        // min 3a + 2b + v  s.t.  a + b = 1,  v >= 4b - 1
        let mut lp = LinearProgram::new("small");
        let a = lp.add_variable(Variable::binary("a"));
        let b = lp.add_variable(Variable::binary("b"));
        let v = lp.add_variable(Variable::non_negative("v"));
        lp.add_constraint(LinearConstraint::new("xor", LinearExpr::sum([a, b]), Relation::Eq, LinearExpr::constant(1.0)));
        lp.add_constraint(LinearConstraint::new(
            "delay",
            LinearExpr::var(v),
            Relation::Ge,
            LinearExpr::term(b, 4.0).plus_constant(-1.0),
        ));
        lp.set_objective(LinearExpr::term(a, 3.0).plus(b, 2.0).plus(v, 1.0));

        let outcome = MicroLpSolver::new().solve(&lp, &SolverConfig::default());
        assert_eq!(outcome.solution_status, SolutionStatus::Optimal);
        let values = outcome.values.unwrap();
        assert!((values[0] - 1.0).abs() < 1e-6);
        assert!(values[1].abs() < 1e-6);
        assert!((outcome.objective_value.unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_limit_does_not_stop_solve() {
        let mut lp = LinearProgram::new("budget");
        let a = lp.add_variable(Variable::binary("a"));
        let b = lp.add_variable(Variable::binary("b"));
        lp.add_constraint(LinearConstraint::new("xor", LinearExpr::sum([a, b]), Relation::Eq, LinearExpr::constant(1.0)));
        lp.set_objective(LinearExpr::term(a, 2.0).plus(b, 1.0));

        let config = SolverConfig::default().with_time_limit_ms(1);
        let outcome = MicroLpSolver::new().solve(&lp, &config);
        assert_eq!(outcome.solution_status, SolutionStatus::Optimal);
        assert!((outcome.objective_value.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_model() {
        let mut lp = LinearProgram::new("infeasible");
        let a = lp.add_variable(Variable::binary("a"));
        lp.add_constraint(LinearConstraint::new("up", LinearExpr::var(a), Relation::Ge, LinearExpr::constant(2.0)));
        lp.set_objective(LinearExpr::var(a));

        let outcome = MicroLpSolver::new().solve(&lp, &SolverConfig::default());
        assert_eq!(outcome.solution_status, SolutionStatus::NoSolution);
        assert_eq!(outcome.model_status, ModelStatus::Infeasible);
    }
}
