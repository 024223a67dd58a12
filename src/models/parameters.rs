//! Flat per-(asset, component) parameter tables.
//!
//! The model builder, the extractor and the audit all look up release
//! dates and durations per pair. [`Parameters::resolve`] validates the
//! instance once and lays the per-asset vectors of every component out
//! row-major by asset, so a lookup is a single index computation.

use super::{AssetId, ComponentId, Instance};
use crate::error::PlanningError;
use crate::validation::validate_instance;

/// Dense table with one value per (asset, component) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable<T> {
    component_count: usize,
    values: Vec<T>,
}

impl<T: Copy> ParameterTable<T> {
    /// Builds a table by evaluating `f` for every pair, asset-major.
    pub fn from_fn(
        asset_count: usize,
        component_count: usize,
        mut f: impl FnMut(AssetId, ComponentId) -> T,
    ) -> Self {
        let mut values = Vec::with_capacity(asset_count * component_count);
        for a in 0..asset_count {
            for c in 0..component_count {
                values.push(f(AssetId(a), ComponentId(c)));
            }
        }
        Self {
            component_count,
            values,
        }
    }

    /// Value for a pair.
    ///
    /// # Panics
    /// Panics if the pair lies outside the table dimensions.
    #[inline]
    pub fn get(&self, asset: AssetId, component: ComponentId) -> T {
        self.values[asset.index() * self.component_count + component.index()]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validated, index-addressed view of an [`Instance`].
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Release date per pair.
    pub release_date: ParameterTable<u32>,
    /// Repair duration per pair.
    pub repair_duration: ParameterTable<u32>,
    /// Order duration per component type.
    pub order_duration: Vec<u32>,
    /// Order price per component type.
    pub order_costs: Vec<f64>,
    /// Due date per asset.
    pub due_date: Vec<u32>,
    /// Delay penalty rate per asset.
    pub delay_costs: Vec<f64>,
    /// Number of periods.
    pub horizon: u32,
}

impl Parameters {
    /// Validates the instance and builds the lookup tables.
    ///
    /// # Errors
    /// [`PlanningError::DataInconsistency`] when a component lacks (or has
    /// surplus) per-asset entries, the horizon is empty, a cost is not a
    /// finite non-negative number, or a duration overflows past the horizon.
    pub fn resolve(instance: &Instance) -> Result<Self, PlanningError> {
        validate_instance(instance).map_err(PlanningError::DataInconsistency)?;

        let asset_count = instance.asset_count();
        let component_count = instance.component_count();

        // Entries are present for every pair after validation.
        let release_date = ParameterTable::from_fn(asset_count, component_count, |a, c| {
            instance.components[c.index()].release_dates[a.index()]
        });
        let repair_duration = ParameterTable::from_fn(asset_count, component_count, |a, c| {
            instance.components[c.index()].repair_durations[a.index()]
        });

        Ok(Self {
            release_date,
            repair_duration,
            order_duration: instance.components.iter().map(|c| c.order_duration).collect(),
            order_costs: instance.components.iter().map(|c| c.order_costs).collect(),
            due_date: instance.assets.iter().map(|a| a.due_date).collect(),
            delay_costs: instance.assets.iter().map(|a| a.delay_costs).collect(),
            horizon: instance.horizon,
        })
    }

    /// Number of assets.
    pub fn asset_count(&self) -> usize {
        self.due_date.len()
    }

    /// Number of component types.
    pub fn component_count(&self) -> usize {
        self.order_duration.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, Component};
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_table_layout() {
        let table = ParameterTable::from_fn(2, 3, |a, c| a.index() * 10 + c.index());
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(AssetId(0), ComponentId(2)), 2);
        assert_eq!(table.get(AssetId(1), ComponentId(0)), 10);
        assert_eq!(table.get(AssetId(1), ComponentId(2)), 12);
    }

    #[test]
    fn test_resolve() {
        let inst = Instance::new(
            vec![Asset::new(10, 0.5), Asset::new(5, 1.0)],
            vec![
                Component::from_tables(vec![1, 2], vec![3, 4], 1, 3.0),
                Component::from_tables(vec![3, 4], vec![5, 2], 2, 2.5),
            ],
            30,
        );
        let params = Parameters::resolve(&inst).unwrap();
        assert_eq!(params.asset_count(), 2);
        assert_eq!(params.component_count(), 2);
        assert_eq!(params.release_date.get(AssetId(1), ComponentId(0)), 2);
        assert_eq!(params.repair_duration.get(AssetId(0), ComponentId(1)), 5);
        assert_eq!(params.order_duration, vec![1, 2]);
        assert_eq!(params.due_date, vec![10, 5]);
        assert_eq!(params.horizon, 30);
    }

    #[test]
    fn test_resolve_missing_entry() {
        let inst = Instance::new(
            vec![Asset::new(10, 0.5), Asset::new(5, 1.0)],
            vec![Component::from_tables(vec![1], vec![3, 4], 1, 3.0)],
            30,
        );
        match Parameters::resolve(&inst) {
            Err(PlanningError::DataInconsistency(errors)) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::MissingAssetEntry));
            }
            other => panic!("expected data inconsistency, got {other:?}"),
        }
    }
}
