//! Exhaustive enumeration solver for tiny programs.
//!
//! # Algorithm
//!
//! 1. Group binaries: every equality `Σ b = 1` over fresh binaries with unit
//!    coefficients becomes a one-hot group; remaining binaries branch on
//!    {0, 1}.
//! 2. Depth-first over groups. After each assignment, prune when some
//!    constraint cannot be met by any completion (interval bounds) or the
//!    objective bound cannot beat the incumbent.
//! 3. At a leaf every binary is fixed. Non-binary variables start at their
//!    lower bound and are raised until every constraint holds: the least
//!    solution of the lower-bound system, which is optimal for fixed
//!    binaries because their objective coefficients are non-negative.
//!
//! # Complexity
//! O(Π group sizes · terms) in the worst case. Only meant for fixtures
//! with a handful of pairs and a short horizon.
//!
//! # Limitations
//! Non-binary variables need a finite lower bound and a non-negative
//! objective coefficient; otherwise the solver reports `Unknown`.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, warn};

use super::{MilpSolver, ModelStatus, SolverConfig, SolverOutcome};
use crate::lp::{LinearProgram, Relation, VarId, VarKind};

/// Deadline is polled every this many nodes.
const DEADLINE_POLL: u64 = 256;

/// Exhaustive reference solver.
///
/// # Example
/// ```
/// use u_provision::lp::{LinearConstraint, LinearExpr, LinearProgram, Relation, Variable};
/// use u_provision::solver::{BruteForceSolver, MilpSolver, SolutionStatus, SolverConfig};
///
/// let mut lp = LinearProgram::new("pick");
/// let a = lp.add_variable(Variable::binary("a"));
/// let b = lp.add_variable(Variable::binary("b"));
/// lp.add_constraint(LinearConstraint::new(
///     "one", LinearExpr::sum([a, b]), Relation::Eq, LinearExpr::constant(1.0),
/// ));
/// lp.set_objective(LinearExpr::term(a, 3.0).plus(b, 2.0));
///
/// let outcome = BruteForceSolver::new().solve(&lp, &SolverConfig::default());
/// assert_eq!(outcome.solution_status, SolutionStatus::Optimal);
/// assert_eq!(outcome.values, Some(vec![0.0, 1.0]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BruteForceSolver {
    node_limit: Option<u64>,
}

impl BruteForceSolver {
    /// Creates a solver without a node limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after visiting `node_limit` search nodes.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }
}

impl MilpSolver for BruteForceSolver {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn solve(&self, program: &LinearProgram, config: &SolverConfig) -> SolverOutcome {
        let mut objective = vec![0.0; program.variable_count()];
        for &(var, coef) in &program.objective().terms {
            objective[var.index()] += coef;
        }

        for (i, var) in program.variables().iter().enumerate() {
            if var.is_binary() {
                continue;
            }
            if !var.lower.is_finite() || objective[i] < 0.0 {
                warn!(variable = %var.name, "brute-force solver cannot complete variable");
                return SolverOutcome::no_solution(ModelStatus::Unknown).with_message(format!(
                    "variable '{}' needs a finite lower bound and a non-negative objective coefficient",
                    var.name
                ));
            }
        }

        let branches = collect_branches(program);
        debug!(
            variables = program.variable_count(),
            constraints = program.constraint_count(),
            branches = branches.len(),
            "brute-force search started"
        );

        let mut search = Search {
            program,
            objective,
            tolerance: config.feasibility_tolerance,
            deadline: config.time_limit().map(|limit| Instant::now() + limit),
            node_limit: self.node_limit,
            values: program
                .variables()
                .iter()
                .map(|v| if v.is_binary() { 0.0 } else { v.lower })
                .collect(),
            fixed: vec![false; program.variable_count()],
            best: None,
            nodes: 0,
            stopped: false,
        };

        if search.is_promising() {
            search.descend(&branches, 0);
        }

        debug!(nodes = search.nodes, stopped = search.stopped, "brute-force search finished");

        match (search.best, search.stopped) {
            (Some((objective, values)), false) => SolverOutcome::optimal(values, objective),
            (Some((objective, values)), true) => {
                SolverOutcome::feasible(values, objective).with_message("search budget exhausted")
            }
            (None, false) => SolverOutcome::no_solution(ModelStatus::Infeasible),
            (None, true) => SolverOutcome::no_solution(ModelStatus::Unknown)
                .with_message("search budget exhausted before a feasible assignment was found"),
        }
    }
}

#[derive(Debug)]
enum Branch {
    /// Exactly one member is 1.
    OneHot(Vec<VarId>),
    /// 0 or 1.
    Free(VarId),
}

impl Branch {
    fn width(&self) -> usize {
        match self {
            Branch::OneHot(vars) => vars.len(),
            Branch::Free(_) => 2,
        }
    }
}

fn collect_branches(program: &LinearProgram) -> Vec<Branch> {
    let variables = program.variables();
    let mut grouped: HashSet<VarId> = HashSet::new();
    let mut branches = Vec::new();

    for c in program.constraints() {
        if c.relation != Relation::Eq || (c.rhs - 1.0).abs() > f64::EPSILON || c.expr.terms.is_empty() {
            continue;
        }
        let mut members = HashSet::new();
        let is_group = c.expr.terms.iter().all(|&(var, coef)| {
            variables[var.index()].is_binary()
                && coef == 1.0
                && !grouped.contains(&var)
                && members.insert(var)
        });
        if is_group {
            grouped.extend(members);
            branches.push(Branch::OneHot(c.expr.terms.iter().map(|&(v, _)| v).collect()));
        }
    }

    for (i, var) in variables.iter().enumerate() {
        if var.is_binary() && !grouped.contains(&VarId(i)) {
            branches.push(Branch::Free(VarId(i)));
        }
    }

    branches
}

struct Search<'a> {
    program: &'a LinearProgram,
    objective: Vec<f64>,
    tolerance: f64,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    /// Binary values (meaningful where `fixed`) and non-binary lower bounds.
    values: Vec<f64>,
    fixed: Vec<bool>,
    best: Option<(f64, Vec<f64>)>,
    nodes: u64,
    stopped: bool,
}

impl Search<'_> {
    fn descend(&mut self, branches: &[Branch], depth: usize) {
        self.nodes += 1;
        if self.out_of_budget() {
            self.stopped = true;
            return;
        }

        let Some(branch) = branches.get(depth) else {
            self.evaluate_leaf();
            return;
        };

        for k in 0..branch.width() {
            self.assign(branch, k);
            if self.is_promising() {
                self.descend(branches, depth + 1);
            }
            if self.stopped {
                break;
            }
        }
        self.release(branch);
    }

    fn out_of_budget(&self) -> bool {
        if self.node_limit.is_some_and(|limit| self.nodes > limit) {
            return true;
        }
        match self.deadline {
            Some(deadline) if self.nodes % DEADLINE_POLL == 0 => Instant::now() >= deadline,
            _ => false,
        }
    }

    fn assign(&mut self, branch: &Branch, k: usize) {
        match branch {
            Branch::OneHot(vars) => {
                for (i, var) in vars.iter().enumerate() {
                    self.values[var.index()] = if i == k { 1.0 } else { 0.0 };
                    self.fixed[var.index()] = true;
                }
            }
            Branch::Free(var) => {
                self.values[var.index()] = k as f64;
                self.fixed[var.index()] = true;
            }
        }
    }

    fn release(&mut self, branch: &Branch) {
        match branch {
            Branch::OneHot(vars) => {
                for var in vars {
                    self.fixed[var.index()] = false;
                }
            }
            Branch::Free(var) => self.fixed[var.index()] = false,
        }
    }

    /// Range of `coef · var` under the current partial assignment.
    fn term_range(&self, var: VarId, coef: f64) -> (f64, f64) {
        if coef == 0.0 {
            return (0.0, 0.0);
        }
        let i = var.index();
        let v = &self.program.variables()[i];
        let (lo, hi) = if self.fixed[i] {
            (self.values[i], self.values[i])
        } else {
            (v.lower, v.upper)
        };
        if coef > 0.0 {
            (coef * lo, coef * hi)
        } else {
            (coef * hi, coef * lo)
        }
    }

    fn is_promising(&self) -> bool {
        if let Some((best, _)) = &self.best {
            let bound: f64 = self
                .objective
                .iter()
                .enumerate()
                .map(|(i, &coef)| self.term_range(VarId(i), coef).0)
                .sum::<f64>()
                + self.program.objective().constant;
            if bound >= best - self.tolerance {
                return false;
            }
        }

        self.program.constraints().iter().all(|c| {
            let (min, max) = c.expr.terms.iter().fold((0.0, 0.0), |(min, max), &(var, coef)| {
                let (lo, hi) = self.term_range(var, coef);
                (min + lo, max + hi)
            });
            match c.relation {
                Relation::Le => min <= c.rhs + self.tolerance,
                Relation::Ge => max >= c.rhs - self.tolerance,
                Relation::Eq => min <= c.rhs + self.tolerance && max >= c.rhs - self.tolerance,
            }
        })
    }

    fn evaluate_leaf(&mut self) {
        let mut values = self.values.clone();
        if !self.complete(&mut values) || !self.program.is_feasible(&values, self.tolerance) {
            return;
        }
        let objective = self.program.objective_value(&values);
        let improves = match &self.best {
            Some((best, _)) => objective < best - self.tolerance,
            None => true,
        };
        if improves {
            self.best = Some((objective, values));
        }
    }

    /// Raises non-binary variables from their lower bounds until every
    /// constraint holds. Returns `false` when that is impossible.
    fn complete(&self, values: &mut [f64]) -> bool {
        let variables = self.program.variables();
        let free_count = variables.iter().filter(|v| !v.is_binary()).count();
        if free_count == 0 {
            return true;
        }

        // Each round settles at least one more variable of an acyclic chain.
        for _ in 0..=free_count {
            let mut changed = false;
            for c in self.program.constraints() {
                let senses: &[f64] = match c.relation {
                    Relation::Ge => &[1.0],
                    Relation::Le => &[-1.0],
                    Relation::Eq => &[1.0, -1.0],
                };
                for &sign in senses {
                    let deficit = sign * c.rhs - sign * c.expr.evaluate(values);
                    if deficit <= self.tolerance {
                        continue;
                    }
                    let Some(&(var, coef)) = c
                        .expr
                        .terms
                        .iter()
                        .find(|&&(var, coef)| !variables[var.index()].is_binary() && sign * coef > 0.0)
                    else {
                        return false;
                    };
                    let v = &variables[var.index()];
                    let mut raised = values[var.index()] + deficit / (sign * coef);
                    if v.kind == VarKind::Integer {
                        raised = (raised - self.tolerance).ceil();
                    }
                    if raised > v.upper + self.tolerance {
                        return false;
                    }
                    values[var.index()] = raised;
                    changed = true;
                }
            }
            if !changed {
                return true;
            }
        }
        false
    }
}
