//! Schedule (solution) model.
//!
//! A schedule records, for every (asset, component) pair, which action
//! was chosen and when it starts, together with the solver's statuses.
//! When the solver returned no assignment (infeasible, unbounded, out of
//! time) the plan table is empty and only the statuses are meaningful.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AssetId, ComponentId};
use crate::solver::{ModelStatus, SolutionStatus};

/// Action taken for one asset's unit of a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionChoice {
    /// Restore the existing unit in place.
    Repair,
    /// Procure a replacement unit in "good as new" state.
    Order,
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionChoice::Repair => f.write_str("Repair"),
            ActionChoice::Order => f.write_str("Order"),
        }
    }
}

/// The decided action for one (asset, component) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPlan {
    /// Asset the unit belongs to.
    pub asset: AssetId,
    /// Component type.
    pub component: ComponentId,
    /// Repair or order.
    pub choice: ActionChoice,
    /// Period the action starts.
    pub start: u32,
    /// Period the action is finished (`start + duration`).
    pub finish: u32,
}

impl ComponentPlan {
    /// Action duration in periods.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.finish - self.start
    }

    /// Whether the unit is under repair during `period`.
    pub fn is_repairing_at(&self, period: u32) -> bool {
        self.choice == ActionChoice::Repair && self.start <= period && period < self.finish
    }
}

/// Why a solve did not produce a proven optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveFailure {
    /// The model has no feasible assignment.
    Infeasible,
    /// Time limit, unbounded objective, or another non-optimal stop.
    NonOptimal,
}

/// Result of one build → solve → extract run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Number of assets in the solved instance.
    pub asset_count: usize,
    /// Number of component types in the solved instance.
    pub component_count: usize,
    /// Plans, asset-major. Empty when the solver returned no values.
    pub plans: Vec<ComponentPlan>,
    /// Delay per asset as reported by the delay variables.
    pub asset_delays: Vec<u32>,
    /// Objective value of the returned assignment.
    pub objective_value: Option<f64>,
    /// How the solver terminated.
    pub solution_status: SolutionStatus,
    /// What the solver proved about the model.
    pub model_status: ModelStatus,
    /// Free-form solver diagnostic.
    pub solver_message: Option<String>,
}

impl Schedule {
    /// Creates a schedule without any plans (no assignment available).
    pub fn without_solution(
        asset_count: usize,
        component_count: usize,
        solution_status: SolutionStatus,
        model_status: ModelStatus,
    ) -> Self {
        Self {
            asset_count,
            component_count,
            plans: Vec::new(),
            asset_delays: Vec::new(),
            objective_value: None,
            solution_status,
            model_status,
            solver_message: None,
        }
    }

    /// Sets the solver diagnostic.
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.solver_message = message;
        self
    }

    /// Whether the solver returned an assignment.
    pub fn has_solution(&self) -> bool {
        self.objective_value.is_some()
    }

    /// Whether the solver proved optimality.
    pub fn is_optimal(&self) -> bool {
        self.solution_status == SolutionStatus::Optimal
    }

    /// Classifies a non-optimal outcome.
    pub fn failure(&self) -> Option<SolveFailure> {
        match (self.solution_status, self.model_status) {
            (SolutionStatus::Optimal, _) => None,
            (_, ModelStatus::Infeasible) => Some(SolveFailure::Infeasible),
            _ => Some(SolveFailure::NonOptimal),
        }
    }

    /// Plan for a pair.
    pub fn get(&self, asset: AssetId, component: ComponentId) -> Option<&ComponentPlan> {
        if asset.index() >= self.asset_count || component.index() >= self.component_count {
            return None;
        }
        self.plans
            .get(asset.index() * self.component_count + component.index())
    }

    /// Plans of every component of an asset.
    pub fn plans_for_asset(&self, asset: AssetId) -> Vec<&ComponentPlan> {
        self.plans.iter().filter(|p| p.asset == asset).collect()
    }

    /// Plans of every asset's unit of a component type.
    pub fn plans_for_component(&self, component: ComponentId) -> Vec<&ComponentPlan> {
        self.plans
            .iter()
            .filter(|p| p.component == component)
            .collect()
    }

    /// Completion period of an asset: latest finish over its components.
    pub fn completion(&self, asset: AssetId) -> Option<u32> {
        self.plans_for_asset(asset).iter().map(|p| p.finish).max()
    }

    /// Reported delay of an asset.
    pub fn delay(&self, asset: AssetId) -> Option<u32> {
        self.asset_delays.get(asset.index()).copied()
    }

    /// Number of pairs with the given action.
    pub fn count(&self, choice: ActionChoice) -> usize {
        self.plans.iter().filter(|p| p.choice == choice).count()
    }
}
