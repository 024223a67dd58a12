//! Model builder.
//!
//! Builds the repair-or-order MILP for one instance and owns it until
//! one solve has been extracted.

use tracing::{debug, info, warn};

use super::one_hot::weighted_sum;
use super::{extract_schedule, FinishLinkage, ModelOptions, VarLayout};
use crate::error::PlanningError;
use crate::lp::{LinearConstraint, LinearExpr, LinearProgram, Relation, Variable};
use crate::models::{AssetId, ComponentId, Instance, Parameters, Schedule};
use crate::solver::{MilpSolver, SolutionStatus, SolverConfig};

/// Builds a [`RepairOrderModel`] from an instance.
///
/// # Example
/// ```
/// use u_provision::formulation::RepairOrderModelBuilder;
/// use u_provision::models::{Asset, Component, Instance};
/// use u_provision::solver::{BruteForceSolver, SolverConfig};
///
/// let instance = Instance::new(
///     vec![Asset::new(10, 1.0)],
///     vec![Component::new(1, 3.0).with_asset(1, 3)],
///     12,
/// );
/// let model = RepairOrderModelBuilder::new(&instance).build().unwrap();
/// let schedule = model
///     .solve(&BruteForceSolver::new(), &SolverConfig::default())
///     .unwrap();
/// assert!(schedule.is_optimal());
/// ```
pub struct RepairOrderModelBuilder<'a> {
    instance: &'a Instance,
    options: ModelOptions,
}

impl<'a> RepairOrderModelBuilder<'a> {
    /// Creates a builder with default options.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            options: ModelOptions::default(),
        }
    }

    /// Sets formulation options.
    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the instance and builds the program.
    ///
    /// # Errors
    /// [`PlanningError::DataInconsistency`] if the instance fails validation.
    pub fn build(&self) -> Result<RepairOrderModel, PlanningError> {
        let params = Parameters::resolve(self.instance)?;
        let layout = VarLayout::new(
            params.asset_count(),
            params.component_count(),
            self.instance.period_count(),
        );

        let mut program = LinearProgram::new("repair_or_order");
        // Under horizon gating every action ends by the horizon, so finish
        // periods never need to exceed it.
        let finish_upper = self.options.horizon_gating.then_some(f64::from(params.horizon));
        declare_variables(&mut program, &layout, finish_upper);
        debug_assert_eq!(program.variable_count(), layout.variable_count());

        program.set_objective(objective(&params, &layout));
        add_pair_constraints(&mut program, &params, &layout, &self.options);
        add_capacity_constraints(&mut program, &params, &layout);

        debug!(
            variables = program.variable_count(),
            binaries = program.binary_count(),
            constraints = program.constraint_count(),
            linkage = ?self.options.finish_linkage,
            "repair-or-order model built"
        );

        Ok(RepairOrderModel {
            program,
            layout,
            params,
            options: self.options.clone(),
        })
    }
}

/// A built model, ready for exactly one solve.
#[derive(Debug)]
pub struct RepairOrderModel {
    program: LinearProgram,
    layout: VarLayout,
    params: Parameters,
    options: ModelOptions,
}

impl RepairOrderModel {
    /// The emitted program.
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// Variable layout.
    pub fn layout(&self) -> &VarLayout {
        &self.layout
    }

    /// Resolved instance parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Options the model was built with.
    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Solves the model and extracts the schedule.
    ///
    /// Consumes the model; the program is released on every path.
    /// Infeasible or non-optimal outcomes are not errors: they are
    /// reported in the schedule's statuses.
    ///
    /// # Errors
    /// [`PlanningError::AssignmentShape`] if the solver returns a value
    /// vector of the wrong length.
    pub fn solve<S: MilpSolver + ?Sized>(
        self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<Schedule, PlanningError> {
        info!(solver = solver.name(), "solving repair-or-order model");
        let outcome = solver.solve(&self.program, config);

        if outcome.solution_status != SolutionStatus::Optimal {
            warn!(
                solution_status = %outcome.solution_status,
                model_status = %outcome.model_status,
                detail = outcome.message.as_deref().unwrap_or(""),
                "solver did not prove optimality"
            );
        }

        extract_schedule(&self.program, &self.layout, &self.params, outcome)
    }
}

fn declare_variables(program: &mut LinearProgram, layout: &VarLayout, finish_upper: Option<f64>) {
    let periods = layout.period_count() as u32;
    for prefix in ["z", "y"] {
        for a in 0..layout.asset_count() {
            for c in 0..layout.component_count() {
                let (a, c) = (AssetId(a), ComponentId(c));
                for p in 0..periods {
                    program.add_variable(Variable::binary(format!("{prefix}_{a}_{c}_p{p}")));
                }
            }
        }
    }
    for a in 0..layout.asset_count() {
        for c in 0..layout.component_count() {
            let (a, c) = (AssetId(a), ComponentId(c));
            let mut finish = Variable::non_negative(format!("x_{a}_{c}"));
            if let Some(upper) = finish_upper {
                finish = finish.with_upper(upper);
            }
            program.add_variable(finish);
        }
    }
    for a in 0..layout.asset_count() {
        program.add_variable(Variable::non_negative(format!("v_{}", AssetId(a))));
    }
}

fn objective(params: &Parameters, layout: &VarLayout) -> LinearExpr {
    let mut expr = LinearExpr::new();
    for a in 0..layout.asset_count() {
        expr.add_term(layout.delay(AssetId(a)), params.delay_costs[a]);
    }
    for a in 0..layout.asset_count() {
        for c in 0..layout.component_count() {
            let cost = params.order_costs[c];
            for p in 0..layout.period_count() as u32 {
                expr.add_term(layout.order_start(AssetId(a), ComponentId(c), p), cost);
            }
        }
    }
    expr
}

fn add_pair_constraints(
    program: &mut LinearProgram,
    params: &Parameters,
    layout: &VarLayout,
    options: &ModelOptions,
) {
    let horizon = params.horizon;

    for a in (0..layout.asset_count()).map(AssetId) {
        for c in (0..layout.component_count()).map(ComponentId) {
            let x = layout.finish(a, c);
            let repair_duration = params.repair_duration.get(a, c);
            let order_duration = params.order_duration[c.index()];
            let repairs = || (0..horizon).map(move |p| layout.repair_start(a, c, p));
            let orders = || (0..horizon).map(move |p| layout.order_start(a, c, p));

            program.add_constraint(LinearConstraint::new(
                format!("delay_link[{a},{c}]"),
                LinearExpr::var(layout.delay(a)),
                Relation::Ge,
                LinearExpr::var(x).plus_constant(-f64::from(params.due_date[a.index()])),
            ));

            for (family, starts, duration) in [
                ("finish_after_repair", repairs().collect::<Vec<_>>(), repair_duration),
                ("finish_after_order", orders().collect::<Vec<_>>(), order_duration),
            ] {
                let finish_at = |p: usize| p as f64 + f64::from(duration);
                match options.finish_linkage {
                    FinishLinkage::Aggregated => program.add_constraint(LinearConstraint::new(
                        format!("{family}[{a},{c}]"),
                        LinearExpr::var(x),
                        Relation::Ge,
                        weighted_sum(starts, finish_at),
                    )),
                    FinishLinkage::PerPeriod => {
                        for (p, start) in starts.into_iter().enumerate() {
                            program.add_constraint(LinearConstraint::new(
                                format!("{family}[{a},{c},{p}]"),
                                LinearExpr::var(x),
                                Relation::Ge,
                                LinearExpr::term(start, finish_at(p)),
                            ));
                        }
                    }
                }
            }

            program.add_constraint(LinearConstraint::new(
                format!("repair_xor_order[{a},{c}]"),
                LinearExpr::sum(repairs().chain(orders())),
                Relation::Eq,
                LinearExpr::constant(1.0),
            ));

            let release = params.release_date.get(a, c).min(horizon);
            if release > 0 {
                program.add_constraint(LinearConstraint::new(
                    format!("availability[{a},{c}]"),
                    LinearExpr::sum((0..release).map(|p| layout.repair_start(a, c, p))),
                    Relation::Eq,
                    LinearExpr::constant(0.0),
                ));
            }

            if options.horizon_gating {
                let late_repairs = late_starts(horizon, repair_duration).map(|p| layout.repair_start(a, c, p));
                let late_orders = late_starts(horizon, order_duration).map(|p| layout.order_start(a, c, p));
                for (family, expr) in [
                    ("horizon_repair", LinearExpr::sum(late_repairs)),
                    ("horizon_order", LinearExpr::sum(late_orders)),
                ] {
                    if !expr.is_constant() {
                        program.add_constraint(LinearConstraint::new(
                            format!("{family}[{a},{c}]"),
                            expr,
                            Relation::Eq,
                            LinearExpr::constant(0.0),
                        ));
                    }
                }
            }
        }
    }
}

/// Start periods whose action would finish after `horizon`.
fn late_starts(horizon: u32, duration: u32) -> std::ops::Range<u32> {
    horizon.saturating_add(1).saturating_sub(duration)..horizon
}

/// At most one asset's unit of each component type under repair per period.
///
/// A repair starting at τ with duration d occupies `[τ, τ + d − 1]`, so it
/// is active at p iff `τ ∈ [p − d + 1, p]`.
fn add_capacity_constraints(program: &mut LinearProgram, params: &Parameters, layout: &VarLayout) {
    for c in (0..layout.component_count()).map(ComponentId) {
        for p in 0..params.horizon {
            let mut active = LinearExpr::new();
            for a in (0..layout.asset_count()).map(AssetId) {
                let duration = params.repair_duration.get(a, c);
                if duration == 0 {
                    continue;
                }
                let first = (p + 1).saturating_sub(duration);
                for tau in first..=p {
                    active.add_term(layout.repair_start(a, c, tau), 1.0);
                }
            }
            if !active.is_constant() {
                program.add_constraint(LinearConstraint::new(
                    format!("capacity[{c},{p}]"),
                    active,
                    Relation::Le,
                    LinearExpr::constant(1.0),
                ));
            }
        }
    }
}
