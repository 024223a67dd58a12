//! End-to-end planning and plan metrics.
//!
//! `Planner` runs the full pipeline for one instance:
//! validate, build the MILP, solve with an injected [`MilpSolver`](crate::solver::MilpSolver),
//! and extract the schedule.
//!
//! # KPI
//!
//! `PlanKpi` summarizes a schedule: how many units are repaired or
//! ordered, what ordering costs, how late each asset is and what that
//! lateness costs.
//!
//! # References
//!
//! - Pochet & Wolsey (2006), "Production Planning by Mixed Integer Programming"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

mod kpi;
mod pipeline;

pub use kpi::PlanKpi;
pub use pipeline::Planner;
