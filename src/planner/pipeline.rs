//! Build → solve → extract pipeline.

use tracing::info;

use crate::error::PlanningError;
use crate::formulation::{ModelOptions, RepairOrderModelBuilder};
use crate::models::{ActionChoice, Instance, Schedule};
use crate::solver::{MilpSolver, SolverConfig};

/// Plans repairs and orders for an instance.
///
/// # Example
///
/// ```
/// use u_provision::planner::Planner;
/// use u_provision::models::{ActionChoice, Asset, AssetId, Component, ComponentId, Instance};
/// use u_provision::solver::BruteForceSolver;
///
/// let instance = Instance::new(
///     vec![Asset::new(10, 1.0)],
///     vec![Component::new(1, 3.0).with_asset(1, 3)],
///     100,
/// );
/// let schedule = Planner::new().plan(&instance, &BruteForceSolver::new()).unwrap();
/// let plan = schedule.get(AssetId(0), ComponentId(0)).unwrap();
/// assert_eq!(plan.choice, ActionChoice::Repair);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: ModelOptions,
    config: SolverConfig,
}

impl Planner {
    /// Creates a planner with default options and solver configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets formulation options.
    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Formulation options in use.
    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Solver configuration in use.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Builds, solves and extracts a schedule.
    ///
    /// # Errors
    /// Fails on inconsistent instance data or a malformed solver result.
    /// Infeasibility is reported through the schedule's statuses.
    pub fn plan<S: MilpSolver + ?Sized>(&self, instance: &Instance, solver: &S) -> Result<Schedule, PlanningError> {
        let model = RepairOrderModelBuilder::new(instance)
            .with_options(self.options.clone())
            .build()?;
        let schedule = model.solve(solver, &self.config)?;

        info!(
            solution_status = %schedule.solution_status,
            model_status = %schedule.model_status,
            objective = schedule.objective_value,
            repairs = schedule.count(ActionChoice::Repair),
            orders = schedule.count(ActionChoice::Order),
            "planning finished"
        );
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::FinishLinkage;
    use crate::models::{Asset, AssetId, Component, ComponentId};
    use crate::solver::{BruteForceSolver, MicroLpSolver, ModelStatus, SolutionStatus};
    use crate::planner::PlanKpi;
    use crate::validation::{check_schedule, ValidationErrorKind};
    use proptest::prelude::*;

    fn solve(instance: &Instance) -> Schedule {
        crate::logging::init_test();
        Planner::new().plan(instance, &BruteForceSolver::new()).unwrap()
    }

    #[test]
    fn test_scenario_single_repair() {
        let instance = Instance::new(
            vec![Asset::new(10, 1.0)],
            vec![Component::new(1, 3.0).with_asset(1, 3)],
            100,
        );
        let schedule = solve(&instance);

        assert!(schedule.is_optimal());
        let plan = schedule.get(AssetId(0), ComponentId(0)).unwrap();
        assert_eq!(plan.choice, ActionChoice::Repair);
        assert!(plan.start >= 1);
        assert!(plan.finish <= 10);
        assert_eq!(schedule.delay(AssetId(0)), Some(0));
        assert!(schedule.objective_value.unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_scenario_overlapping_windows_infeasible() {
        // Both repairs must start at 1 to fit the horizon, and ordering
        // takes longer than the horizon.
        let instance = Instance::new(
            vec![Asset::new(4, 1.0), Asset::new(4, 1.0)],
            vec![Component::from_tables(vec![1, 1], vec![3, 3], 10, 1.0)],
            4,
        );
        let schedule = solve(&instance);

        assert_eq!(schedule.solution_status, SolutionStatus::NoSolution);
        assert_eq!(schedule.model_status, ModelStatus::Infeasible);
        assert!(!schedule.has_solution());
        assert!(schedule.plans.is_empty());
    }

    #[test]
    fn test_scenario_unavoidable_delay() {
        // Repair from 1 finishes at 4 (2 late, cost 2). Ordering finishes
        // at 5 at best and costs 10 on top of its delay.
        let instance = Instance::new(
            vec![Asset::new(2, 1.0)],
            vec![Component::new(5, 10.0).with_asset(1, 3)],
            20,
        );
        let schedule = solve(&instance);

        assert!(schedule.is_optimal());
        let plan = schedule.get(AssetId(0), ComponentId(0)).unwrap();
        assert_eq!(plan.choice, ActionChoice::Repair);
        assert_eq!((plan.start, plan.finish), (1, 4));
        assert_eq!(schedule.delay(AssetId(0)), Some(2));
        assert!((schedule.objective_value.unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_scenario_forced_late_order() {
        // Release at the horizon rules out repair; the order takes 4
        // periods against a due date of 2.
        let instance = Instance::new(
            vec![Asset::new(2, 1.5)],
            vec![Component::new(4, 3.0).with_asset(10, 1)],
            10,
        );
        let schedule = solve(&instance);

        assert!(schedule.is_optimal());
        let plan = schedule.get(AssetId(0), ComponentId(0)).unwrap();
        assert_eq!(plan.choice, ActionChoice::Order);
        assert_eq!((plan.start, plan.finish), (0, 4));
        assert_eq!(schedule.delay(AssetId(0)), Some(plan.finish - 2));
        // 3.0 order + 1.5 * 2 late periods
        assert!((schedule.objective_value.unwrap() - 6.0).abs() < 1e-6);

        let kpi = PlanKpi::calculate(&schedule, &instance);
        assert!((kpi.order_cost - 3.0).abs() < 1e-10);
        assert!((kpi.delay_cost - 3.0).abs() < 1e-10);
        assert!((kpi.total_cost - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_delay_cost_versus_order_cost() {
        // Repair finishes 3 late (cost 3 * 4.0); ordering is on time for 5.0.
        let instance = Instance::new(
            vec![Asset::new(3, 4.0)],
            vec![Component::new(2, 5.0).with_asset(0, 6)],
            20,
        );
        let schedule = solve(&instance);

        let plan = schedule.get(AssetId(0), ComponentId(0)).unwrap();
        assert_eq!(plan.choice, ActionChoice::Order);
        assert!(plan.finish <= 3);
        assert_eq!(schedule.delay(AssetId(0)), Some(0));
        assert!((schedule.objective_value.unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_shared_capacity_sequences_repairs() {
        let instance = Instance::new(
            vec![Asset::new(6, 1.0), Asset::new(6, 1.0)],
            vec![Component::from_tables(vec![0, 0], vec![3, 3], 1, 50.0)],
            12,
        );
        let schedule = solve(&instance);

        assert!(schedule.is_optimal());
        let first = schedule.get(AssetId(0), ComponentId(0)).unwrap();
        let second = schedule.get(AssetId(1), ComponentId(0)).unwrap();
        assert_eq!(first.choice, ActionChoice::Repair);
        assert_eq!(second.choice, ActionChoice::Repair);
        assert!(first.finish <= second.start || second.finish <= first.start);
        assert!(check_schedule(&schedule, &instance, Planner::new().options()).is_empty());
    }

    #[test]
    fn test_linkage_forms_agree() {
        let instance = Instance::new(
            vec![Asset::new(5, 1.5), Asset::new(4, 2.0)],
            vec![
                Component::from_tables(vec![1, 0], vec![2, 3], 1, 3.0),
                Component::from_tables(vec![0, 2], vec![1, 2], 2, 1.0),
            ],
            8,
        );
        let per_period = solve(&instance);
        let aggregated = Planner::new()
            .with_options(ModelOptions::default().with_finish_linkage(FinishLinkage::Aggregated))
            .plan(&instance, &BruteForceSolver::new())
            .unwrap();

        assert!(per_period.is_optimal());
        assert!(aggregated.is_optimal());
        let (a, b) = (per_period.objective_value.unwrap(), aggregated.objective_value.unwrap());
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_microlp_matches_brute_force() {
        let instance = Instance::new(
            vec![Asset::new(5, 1.5), Asset::new(4, 2.0)],
            vec![Component::from_tables(vec![1, 0], vec![2, 3], 1, 3.0)],
            8,
        );
        let exact = solve(&instance);
        let milp = Planner::new().plan(&instance, &MicroLpSolver::new()).unwrap();

        assert!(milp.is_optimal());
        let (a, b) = (exact.objective_value.unwrap(), milp.objective_value.unwrap());
        assert!((a - b).abs() < 1e-6);
        assert!(check_schedule(&milp, &instance, Planner::new().options()).is_empty());
    }

    #[test]
    fn test_invalid_instance_is_error() {
        let instance = Instance::new(
            vec![Asset::new(5, 1.0), Asset::new(5, 1.0)],
            vec![Component::new(1, 3.0).with_asset(0, 2)],
            8,
        );
        let result = Planner::new().plan(&instance, &BruteForceSolver::new());
        assert!(matches!(result, Err(PlanningError::DataInconsistency(_))));
    }

    #[test]
    fn test_overflowing_duration_is_error() {
        let instance = Instance::new(
            vec![Asset::new(3, 0.0)],
            vec![Component::new(1, 1e9).with_asset(5, u32::MAX - 2)],
            10,
        );
        let planner = Planner::new().with_options(ModelOptions::default().with_horizon_gating(false));
        let result = planner.plan(&instance, &BruteForceSolver::new());

        match result {
            Err(PlanningError::DataInconsistency(errors)) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::DurationOverflow));
            }
            other => panic!("expected inconsistent data, got {other:?}"),
        }
    }

    fn small_instance() -> impl Strategy<Value = Instance> {
        (1usize..=2, 1usize..=2, 4u32..=7).prop_flat_map(|(assets, components, horizon)| {
            let asset = (0..=horizon, 0.0f64..3.0).prop_map(|(due, cost)| Asset::new(due, cost));
            let component = (
                prop::collection::vec(0..horizon, assets),
                prop::collection::vec(0..=3u32, assets),
                1..=3u32,
                0.0f64..4.0,
            )
                .prop_map(|(release, repair, order_duration, order_costs)| {
                    Component::from_tables(release, repair, order_duration, order_costs)
                });
            (
                prop::collection::vec(asset, assets),
                prop::collection::vec(component, components),
                Just(horizon),
            )
                .prop_map(|(assets, components, horizon)| Instance::new(assets, components, horizon))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_schedule_properties(instance in small_instance()) {
            let planner = Planner::new();
            let schedule = planner.plan(&instance, &BruteForceSolver::new()).unwrap();

            // Ordering is always possible: order durations fit every horizon here.
            prop_assert!(schedule.is_optimal());
            prop_assert_eq!(schedule.plans.len(), instance.asset_count() * instance.component_count());

            for plan in &schedule.plans {
                let component = &instance.components[plan.component.index()];
                let duration = match plan.choice {
                    ActionChoice::Repair => component.repair_durations[plan.asset.index()],
                    ActionChoice::Order => component.order_duration,
                };
                prop_assert_eq!(plan.finish, plan.start + duration);
                if plan.choice == ActionChoice::Repair {
                    prop_assert!(plan.start >= component.release_dates[plan.asset.index()]);
                }
            }

            for (id, asset) in instance.asset_ids().zip(&instance.assets) {
                if asset.delay_costs > 0.0 {
                    let completion = schedule.completion(id).unwrap_or(0);
                    prop_assert_eq!(schedule.delay(id), Some(asset.delay_at(completion)));
                }
            }

            let kpi = PlanKpi::calculate(&schedule, &instance);
            prop_assert!((kpi.total_cost - schedule.objective_value.unwrap_or(f64::NAN)).abs() < 1e-6);

            prop_assert!(check_schedule(&schedule, &instance, planner.options()).is_empty());
        }
    }
}
