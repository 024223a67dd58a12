//! Solver-agnostic mixed-integer linear program.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LinearExpr, VarId};

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// 0 or 1.
    Binary,
    /// Integral value within the bounds.
    Integer,
    /// Real value within the bounds.
    Continuous,
}

/// A decision variable declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Debug name, e.g. `z_a0_c1_p5`.
    pub name: String,
    /// Domain.
    pub kind: VarKind,
    /// Lower bound (may be `-inf`).
    pub lower: f64,
    /// Upper bound (may be `+inf`).
    pub upper: f64,
}

impl Variable {
    /// A binary variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }

    /// A continuous variable bounded below by zero.
    pub fn non_negative(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// An integer variable bounded below by zero.
    pub fn non_negative_integer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Integer,
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// Sets the upper bound.
    pub fn with_upper(mut self, upper: f64) -> Self {
        self.upper = upper;
        self
    }

    /// Whether the variable is binary.
    #[inline]
    pub fn is_binary(&self) -> bool {
        self.kind == VarKind::Binary
    }
}

/// Comparison of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
    /// `expr == rhs`
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => f.write_str("<="),
            Relation::Ge => f.write_str(">="),
            Relation::Eq => f.write_str("=="),
        }
    }
}

/// `expr (<=|>=|==) rhs`, with the expression constant folded into `rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Name; the prefix before the first `[` identifies the family.
    pub name: String,
    /// Left-hand side without constant.
    pub expr: LinearExpr,
    /// Comparison.
    pub relation: Relation,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Creates `lhs relation rhs`, moving every constant to the right.
    pub fn new(name: impl Into<String>, lhs: LinearExpr, relation: Relation, rhs: LinearExpr) -> Self {
        let mut expr = lhs;
        expr.add_scaled(&rhs, -1.0);
        let rhs = -expr.constant;
        expr.constant = 0.0;
        Self {
            name: name.into(),
            expr,
            relation,
            rhs,
        }
    }

    /// Constraint family (name prefix before `[`).
    pub fn family(&self) -> &str {
        self.name.split('[').next().unwrap_or(&self.name)
    }

    /// Whether `values` satisfies the constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A minimization problem over typed variables and linear constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearProgram {
    /// Problem name.
    pub name: String,
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl LinearProgram {
    /// Creates an empty program with a zero objective.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declares a variable and returns its handle.
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(variable);
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Sets the expression to minimize.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Declared variables, indexed by [`VarId`].
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Variable declaration.
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective (minimized).
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of binary variables.
    pub fn binary_count(&self) -> usize {
        self.variables.iter().filter(|v| v.is_binary()).count()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of constraints whose family is `family`.
    pub fn family_count(&self, family: &str) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.family() == family)
            .count()
    }

    /// Objective value of an assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Constraints violated by `values`, including bound and integrality
    /// violations reported under the variable's name.
    pub fn violations<'a>(&'a self, values: &[f64], tolerance: f64) -> Vec<&'a str> {
        let mut violated = Vec::new();
        for (var, &value) in self.variables.iter().zip(values) {
            let out_of_bounds = value < var.lower - tolerance || value > var.upper + tolerance;
            let fractional = var.kind != VarKind::Continuous && (value - value.round()).abs() > tolerance;
            if out_of_bounds || fractional {
                violated.push(var.name.as_str());
            }
        }
        for c in &self.constraints {
            if !c.is_satisfied(values, tolerance) {
                violated.push(c.name.as_str());
            }
        }
        violated
    }

    /// Whether `values` satisfies every bound, integrality requirement and
    /// constraint.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variables.len() && self.violations(values, tolerance).is_empty()
    }
}
