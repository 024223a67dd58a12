//! Plan quality metrics (KPIs).
//!
//! Computes cost and lateness indicators from an extracted schedule and
//! its input instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Repairs / Orders | Number of (asset, component) pairs per action |
//! | Order Cost | Sum of order costs of ordered units |
//! | Total Delay | Sum of per-asset delays (periods) |
//! | Delay Cost | Sum of delay × delay cost |
//! | Max Delay | Largest single asset delay |
//! | On-Time Rate | Fraction of assets with zero delay |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::Serialize;

use crate::models::{ActionChoice, Instance, Schedule};

/// Plan performance indicators.
///
/// All time values are in periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanKpi {
    /// Pairs decided as repair.
    pub repairs: usize,
    /// Pairs decided as order.
    pub orders: usize,
    /// Sum of order costs.
    pub order_cost: f64,
    /// Sum of per-asset delays.
    pub total_delay: u32,
    /// Sum of per-asset delay penalties.
    pub delay_cost: f64,
    /// `order_cost + delay_cost`.
    pub total_cost: f64,
    /// Largest per-asset delay.
    pub max_delay: u32,
    /// Fraction of assets finishing by their due date (0.0..1.0).
    pub on_time_rate: f64,
    /// Completion period per asset (latest component finish).
    pub completions: Vec<Option<u32>>,
}

impl PlanKpi {
    /// Computes KPIs from a schedule and its instance.
    ///
    /// Delays are the ones read from the solution. A schedule without a
    /// solution yields zero counts and costs, and an on-time rate of 0.
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let mut order_cost = 0.0;
        for plan in &schedule.plans {
            if plan.choice == ActionChoice::Order {
                if let Some(component) = instance.component(plan.component) {
                    order_cost += component.order_costs;
                }
            }
        }

        let mut total_delay: u32 = 0;
        let mut max_delay: u32 = 0;
        let mut delay_cost = 0.0;
        let mut on_time_count: usize = 0;
        let mut completions = Vec::with_capacity(instance.asset_count());

        for (id, asset) in instance.asset_ids().zip(&instance.assets) {
            completions.push(schedule.completion(id));
            let Some(delay) = schedule.delay(id) else {
                continue;
            };
            total_delay += delay;
            max_delay = max_delay.max(delay);
            delay_cost += f64::from(delay) * asset.delay_costs;
            if delay == 0 {
                on_time_count += 1;
            }
        }

        let on_time_rate = if !schedule.has_solution() {
            0.0
        } else if instance.asset_count() == 0 {
            1.0
        } else {
            on_time_count as f64 / instance.asset_count() as f64
        };

        Self {
            repairs: schedule.count(ActionChoice::Repair),
            orders: schedule.count(ActionChoice::Order),
            order_cost,
            total_delay,
            delay_cost,
            total_cost: order_cost + delay_cost,
            max_delay,
            on_time_rate,
            completions,
        }
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_delay: u32, max_total_cost: f64) -> bool {
        self.max_delay <= max_delay && self.total_cost <= max_total_cost
    }
}
