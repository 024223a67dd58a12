//! Repair-or-order MILP formulation.
//!
//! Translates an [`Instance`](crate::models::Instance) into a
//! [`LinearProgram`](crate::lp::LinearProgram) and turns a solver's
//! assignment back into a [`Schedule`](crate::models::Schedule).
//!
//! # Variables
//!
//! | Name | Domain | Meaning |
//! |------|--------|---------|
//! | `z[a,c,p]` | binary | repair of asset a's unit of component c starts at p |
//! | `y[a,c,p]` | binary | replacement order for that unit starts at p |
//! | `x[a,c]` | ≥ 0, ≤ horizon when gated | finish period of the chosen action |
//! | `v[a]` | ≥ 0 | delay of asset a beyond its due date |
//!
//! # Objective
//!
//! `min Σ_a delay_costs[a]·v[a] + Σ_{a,c,p} order_costs[c]·y[a,c,p]`
//!
//! Repair has no direct cost; only ordering and lateness are penalized.
//!
//! # Constraints
//!
//! | Family | Form |
//! |--------|------|
//! | `delay_link` | `v[a] ≥ x[a,c] − due[a]` |
//! | `finish_after_repair` | `x[a,c] ≥ start + repair_duration` (see [`FinishLinkage`]) |
//! | `finish_after_order` | `x[a,c] ≥ start + order_duration` |
//! | `repair_xor_order` | `Σ_p z[a,c,p] + y[a,c,p] = 1` |
//! | `availability` | `Σ_{p < release} z[a,c,p] = 0` |
//! | `horizon_repair` / `horizon_order` | actions end inside the horizon |
//! | `capacity` | at most one repair per component type and period |
//!
//! # Reference
//! Pochet & Wolsey (2006), "Production Planning by Mixed Integer Programming"

mod builder;
mod extract;
mod layout;
pub mod one_hot;

pub use builder::{RepairOrderModel, RepairOrderModelBuilder};
pub use extract::extract_schedule;
pub use layout::VarLayout;

use serde::{Deserialize, Serialize};

/// How finish periods are tied to the start indicators.
///
/// `Aggregated` emits one row per family,
/// `x ≥ Σ_p (p + d)·ind[p]`. It is a valid lower bound only because
/// `repair_xor_order` forces exactly one indicator to 1: if that equality
/// were ever relaxed, the bound of an unchosen family collapses to zero
/// and a chosen one could sum several starts.
///
/// `PerPeriod` emits `x ≥ (p + d)·ind[p]` for every p, which bounds the
/// finish correctly for any number of active indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishLinkage {
    /// One summed row per (asset, component, family).
    Aggregated,
    /// One row per (asset, component, family, period).
    #[default]
    PerPeriod,
}

/// Formulation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Form of the finish linkage rows.
    pub finish_linkage: FinishLinkage,
    /// Forbid actions that would end after the last period.
    pub horizon_gating: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            finish_linkage: FinishLinkage::PerPeriod,
            horizon_gating: true,
        }
    }
}

impl ModelOptions {
    /// Sets the finish linkage form.
    pub fn with_finish_linkage(mut self, linkage: FinishLinkage) -> Self {
        self.finish_linkage = linkage;
        self
    }

    /// Enables or disables horizon gating.
    pub fn with_horizon_gating(mut self, enabled: bool) -> Self {
        self.horizon_gating = enabled;
        self
    }
}
