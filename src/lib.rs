//! Repair-or-order provisioning planner.
//!
//! For each component of each complex asset, decides whether to repair
//! the existing unit or order a replacement, and in which period the
//! action starts. The decision is a mixed-integer linear program that
//! minimizes order costs plus delay penalties, subject to release dates
//! and one shared repair slot per component type.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Asset`, `Component`, `Instance`,
//!   `Parameters`, `Schedule`
//! - **`lp`**: Solver-agnostic linear program representation
//! - **`formulation`**: MILP builder and solution extractor
//! - **`solver`**: `MilpSolver` trait, exhaustive and `microlp` backends
//! - **`planner`**: End-to-end pipeline and plan KPIs
//! - **`validation`**: Instance integrity checks and schedule audit
//!
//! # Pipeline
//!
//! ```text
//! Instance → RepairOrderModelBuilder → LinearProgram → MilpSolver
//!          → SolverOutcome → extract_schedule → Schedule
//! ```
//!
//! # References
//!
//! - Pochet & Wolsey (2006), "Production Planning by Mixed Integer Programming"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod error;
pub mod formulation;
pub mod logging;
pub mod lp;
pub mod models;
pub mod planner;
pub mod solver;
pub mod validation;

pub use error::PlanningError;
pub use planner::{PlanKpi, Planner};
