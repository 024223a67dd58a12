//! Linear program representation.
//!
//! The submission format between the model builder and any solver
//! adapter: typed variables, sparse linear constraints and a linear
//! objective to minimize. Nothing in here knows about assets or
//! components, and nothing in here solves anything.

mod expr;
mod program;

pub use expr::{LinearExpr, VarId};
pub use program::{LinearConstraint, LinearProgram, Relation, VarKind, Variable};
