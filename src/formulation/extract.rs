//! Solution extraction.

use tracing::debug;

use super::one_hot;
use super::VarLayout;
use crate::error::PlanningError;
use crate::lp::LinearProgram;
use crate::models::{ActionChoice, AssetId, ComponentId, ComponentPlan, Parameters, Schedule};
use crate::solver::SolverOutcome;

/// Turns a solver outcome into a [`Schedule`].
///
/// Statuses are passed through unchanged. When the outcome carries no
/// assignment the schedule has no plans. Otherwise each pair is decided
/// by its repair indicators: `Σ_p z[a,c,p] > 0.5` means repair, else order.
/// The start period is the decoded one-hot index of the chosen family.
///
/// # Errors
/// [`PlanningError::AssignmentShape`] if the value vector does not match
/// the program.
pub fn extract_schedule(
    program: &LinearProgram,
    layout: &VarLayout,
    params: &Parameters,
    outcome: SolverOutcome,
) -> Result<Schedule, PlanningError> {
    let assets = layout.asset_count();
    let components = layout.component_count();

    let Some(values) = outcome.values else {
        return Ok(Schedule::without_solution(
            assets,
            components,
            outcome.solution_status,
            outcome.model_status,
        )
        .with_message(outcome.message));
    };

    if values.len() != program.variable_count() {
        return Err(PlanningError::AssignmentShape {
            expected: program.variable_count(),
            got: values.len(),
        });
    }

    let mut plans = Vec::with_capacity(assets * components);
    for a in (0..assets).map(AssetId) {
        for c in (0..components).map(ComponentId) {
            let repairs = &values[layout.repair_block(a, c)];
            let (choice, hot, duration) = if repairs.iter().sum::<f64>() > one_hot::SET_THRESHOLD {
                (ActionChoice::Repair, one_hot::decode(repairs), params.repair_duration.get(a, c))
            } else {
                let order = one_hot::decode(&values[layout.order_block(a, c)]);
                (ActionChoice::Order, order, params.order_duration[c.index()])
            };
            if hot.index().is_none() {
                debug!(asset = %a, component = %c, active = hot.active, "indicator family is not one-hot");
            }
            let start = hot.weighted_index.max(0.0) as u32;
            plans.push(ComponentPlan {
                asset: a,
                component: c,
                choice,
                start,
                finish: start.saturating_add(duration),
            });
        }
    }

    let asset_delays = (0..assets)
        .map(|a| values[layout.delay(AssetId(a)).index()].round().max(0.0) as u32)
        .collect();

    let objective_value = outcome
        .objective_value
        .unwrap_or_else(|| program.objective_value(&values));

    Ok(Schedule {
        asset_count: assets,
        component_count: components,
        plans,
        asset_delays,
        objective_value: Some(objective_value),
        solution_status: outcome.solution_status,
        model_status: outcome.model_status,
        solver_message: outcome.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::RepairOrderModelBuilder;
    use crate::models::{Asset, Component, Instance};
    use crate::solver::{ModelStatus, SolutionStatus};

    fn instance() -> Instance {
        Instance::new(
            vec![Asset::new(4, 2.0), Asset::new(6, 1.0)],
            vec![Component::from_tables(vec![1, 0], vec![2, 3], 1, 5.0)],
            8,
        )
    }

    #[test]
    fn test_extract_assignment() {
        let inst = instance();
        let model = RepairOrderModelBuilder::new(&inst).build().unwrap();
        let layout = *model.layout();
        let mut values = vec![0.0; layout.variable_count()];
        let c = ComponentId(0);
        // Asset 0 repairs at 1 (finish 3); asset 1 orders at 5 (finish 6).
        values[layout.repair_start(AssetId(0), c, 1).index()] = 1.0;
        values[layout.order_start(AssetId(1), c, 5).index()] = 0.9999999;
        values[layout.finish(AssetId(0), c).index()] = 3.0;
        values[layout.finish(AssetId(1), c).index()] = 6.0;

        let outcome = SolverOutcome::optimal(values, 5.0);
        let schedule = extract_schedule(model.program(), &layout, model.parameters(), outcome).unwrap();

        let first = schedule.get(AssetId(0), c).unwrap();
        assert_eq!(first.choice, ActionChoice::Repair);
        assert_eq!((first.start, first.finish), (1, 3));
        let second = schedule.get(AssetId(1), c).unwrap();
        assert_eq!(second.choice, ActionChoice::Order);
        assert_eq!((second.start, second.finish), (5, 6));
        assert_eq!(schedule.asset_delays, vec![0, 0]);
        assert_eq!(schedule.objective_value, Some(5.0));
        assert!(schedule.is_optimal());
    }

    #[test]
    fn test_extract_delay_rounding() {
        let inst = instance();
        let model = RepairOrderModelBuilder::new(&inst).build().unwrap();
        let layout = *model.layout();
        let mut values = vec![0.0; layout.variable_count()];
        values[layout.delay(AssetId(0)).index()] = 2.0000001;
        values[layout.delay(AssetId(1)).index()] = -1e-9;

        let outcome = SolverOutcome::feasible(values, 4.0);
        let schedule = extract_schedule(model.program(), &layout, model.parameters(), outcome).unwrap();
        assert_eq!(schedule.asset_delays, vec![2, 0]);
        assert_eq!(schedule.solution_status, SolutionStatus::Feasible);
    }

    #[test]
    fn test_extract_no_solution() {
        let inst = instance();
        let model = RepairOrderModelBuilder::new(&inst).build().unwrap();
        let outcome = SolverOutcome::no_solution(ModelStatus::Infeasible).with_message("proved infeasible");
        let schedule =
            extract_schedule(model.program(), model.layout(), model.parameters(), outcome).unwrap();

        assert!(!schedule.has_solution());
        assert!(schedule.plans.is_empty());
        assert_eq!(schedule.solution_status, SolutionStatus::NoSolution);
        assert_eq!(schedule.model_status, ModelStatus::Infeasible);
        assert_eq!(schedule.solver_message.as_deref(), Some("proved infeasible"));
    }

    #[test]
    fn test_extract_computes_missing_objective() {
        let inst = instance();
        let model = RepairOrderModelBuilder::new(&inst).build().unwrap();
        let layout = *model.layout();
        let mut values = vec![0.0; layout.variable_count()];
        values[layout.order_start(AssetId(0), ComponentId(0), 0).index()] = 1.0;
        values[layout.delay(AssetId(1)).index()] = 3.0;

        let mut outcome = SolverOutcome::feasible(values, 0.0);
        outcome.objective_value = None;
        let schedule = extract_schedule(model.program(), &layout, model.parameters(), outcome).unwrap();
        // order 5.0 + delay 3 * 1.0
        assert!((schedule.objective_value.unwrap() - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_extract_wrong_length() {
        let inst = instance();
        let model = RepairOrderModelBuilder::new(&inst).build().unwrap();
        let outcome = SolverOutcome::optimal(vec![0.0; 3], 0.0);
        let result = extract_schedule(model.program(), model.layout(), model.parameters(), outcome);
        assert!(matches!(
            result,
            Err(PlanningError::AssignmentShape { got: 3, .. })
        ));
    }
}
