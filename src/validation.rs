//! Input validation and schedule audit.
//!
//! [`validate_instance`] checks structural integrity of an instance before
//! a model is built. Detects:
//! - Components missing per-asset entries (or carrying surplus ones)
//! - An empty planning horizon
//! - Negative or non-finite costs
//! - Durations whose finish period would overflow
//!
//! [`check_schedule`] re-verifies an extracted schedule against the
//! instance, independently of the solver: release dates, horizon,
//! one repair at a time per component type, and reported delays.

use serde::{Deserialize, Serialize};

use crate::formulation::ModelOptions;
use crate::models::{ActionChoice, AssetId, Instance, Schedule};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A component has no release date or repair duration for an asset.
    MissingAssetEntry,
    /// A component has per-asset entries beyond the last asset.
    SurplusAssetEntry,
    /// The horizon has no periods.
    EmptyHorizon,
    /// A delay or order cost is negative, NaN or infinite.
    InvalidCost,
    /// A duration so long that its finish period does not fit in `u32`.
    DurationOverflow,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data of a provisioning problem.
///
/// Checks:
/// 1. Every component has exactly one release date per asset
/// 2. Every component has exactly one repair duration per asset
/// 3. The horizon has at least one period
/// 4. Delay costs and order costs are finite and non-negative
/// 5. `horizon + duration` fits in `u32` for every repair and order
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();
    let asset_count = instance.asset_count();

    if instance.horizon == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHorizon,
            "planning horizon has no periods",
        ));
    }

    for (a, asset) in instance.assets.iter().enumerate() {
        if !is_valid_cost(asset.delay_costs) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCost,
                format!("asset {a} has invalid delay costs {}", asset.delay_costs),
            ));
        }
    }

    for (c, component) in instance.components.iter().enumerate() {
        for (table, len) in [
            ("release date", component.release_dates.len()),
            ("repair duration", component.repair_durations.len()),
        ] {
            if len < asset_count {
                for a in len..asset_count {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingAssetEntry,
                        format!("component {c} has no {table} for asset {a}"),
                    ));
                }
            } else if len > asset_count {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SurplusAssetEntry,
                    format!("component {c} has {len} {table} entries for {asset_count} assets"),
                ));
            }
        }

        let longest_repair = component.repair_durations.iter().copied().max().unwrap_or(0);
        for (action, duration) in [("repair", longest_repair), ("order", component.order_duration)] {
            if instance.horizon.checked_add(duration).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DurationOverflow,
                    format!(
                        "component {c} has {action} duration {duration} that overflows past horizon {}",
                        instance.horizon
                    ),
                ));
            }
        }

        if !is_valid_cost(component.order_costs) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCost,
                format!("component {c} has invalid order costs {}", component.order_costs),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_cost(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// A rule broken by an extracted schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related asset.
    pub asset: AssetId,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Repair starts before the unit is released.
    ReleaseViolation,
    /// Action finishes after the last period.
    HorizonExceeded,
    /// Two repairs of the same component type overlap.
    CapacityExceeded,
    /// Reported delay differs from the delay implied by the plans.
    DelayMismatch,
}

impl Violation {
    fn new(violation_type: ViolationType, asset: AssetId, message: String, severity: i32) -> Self {
        Self {
            violation_type,
            asset,
            message,
            severity,
        }
    }
}

/// Audits a schedule against its instance.
///
/// Returns an empty list for schedules without a solution. Horizon
/// overruns are only reported when `options.horizon_gating` is set, and
/// delays are only compared for optimal schedules of assets with a
/// positive delay cost (otherwise the delay variable is not pinned).
pub fn check_schedule(schedule: &Schedule, instance: &Instance, options: &ModelOptions) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !schedule.has_solution() {
        return violations;
    }

    for plan in &schedule.plans {
        let Some(component) = instance.component(plan.component) else {
            continue;
        };

        if plan.choice == ActionChoice::Repair {
            if let Some(release) = component.release_date(plan.asset) {
                if plan.start < release {
                    violations.push(Violation::new(
                        ViolationType::ReleaseViolation,
                        plan.asset,
                        format!(
                            "repair of {} on {} starts at {} before release {}",
                            plan.component, plan.asset, plan.start, release
                        ),
                        95,
                    ));
                }
            }
        }

        if options.horizon_gating && plan.finish > instance.horizon {
            violations.push(Violation::new(
                ViolationType::HorizonExceeded,
                plan.asset,
                format!(
                    "{} of {} on {} finishes at {} after horizon {}",
                    plan.choice, plan.component, plan.asset, plan.finish, instance.horizon
                ),
                80,
            ));
        }
    }

    for component in instance.component_ids() {
        let repairs: Vec<_> = schedule
            .plans_for_component(component)
            .into_iter()
            .filter(|p| p.choice == ActionChoice::Repair && p.finish > p.start)
            .collect();
        for i in 0..repairs.len() {
            for j in (i + 1)..repairs.len() {
                let (a, b) = (repairs[i], repairs[j]);
                if a.start < b.finish && b.start < a.finish {
                    violations.push(Violation::new(
                        ViolationType::CapacityExceeded,
                        b.asset,
                        format!(
                            "repairs of {component} overlap: {} [{}, {}) and {} [{}, {})",
                            a.asset, a.start, a.finish, b.asset, b.start, b.finish
                        ),
                        90,
                    ));
                }
            }
        }
    }

    if schedule.is_optimal() {
        for (id, asset) in instance.asset_ids().zip(&instance.assets) {
            if asset.delay_costs <= 0.0 {
                continue;
            }
            let (Some(completion), Some(reported)) = (schedule.completion(id), schedule.delay(id)) else {
                continue;
            };
            let expected = asset.delay_at(completion);
            if expected != reported {
                violations.push(Violation::new(
                    ViolationType::DelayMismatch,
                    id,
                    format!("{id} reports delay {reported}, plans imply {expected}"),
                    60,
                ));
            }
        }
    }

    violations
}
