//! Asset model.
//!
//! An asset is a complex good (turbine, engine, vehicle) built out of
//! several components. It is handed back to its owner once every
//! component has been repaired or replaced. Finishing after the
//! contractual due date costs a penalty for every late period.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an asset within [`Instance::assets`](super::Instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub usize);

impl AssetId {
    /// Zero-based position in the instance.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// A complex good whose components must all be provisioned before delivery.
///
/// # Time Representation
/// Dates are period indices into the planning horizon (period 0 = first
/// period). The consumer decides what a period means (day, shift, week).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Contractual delivery period.
    pub due_date: u32,
    /// Penalty per period of delivery after `due_date`.
    pub delay_costs: f64,
}

impl Asset {
    /// Creates an asset with a due date and a delay penalty rate.
    pub fn new(due_date: u32, delay_costs: f64) -> Self {
        Self {
            name: String::new(),
            due_date,
            delay_costs,
        }
    }

    /// Sets the asset name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Delay in periods when the asset is completed at `completion`.
    #[inline]
    pub fn delay_at(&self, completion: u32) -> u32 {
        completion.saturating_sub(self.due_date)
    }

    /// Penalty incurred when the asset is completed at `completion`.
    pub fn delay_penalty_at(&self, completion: u32) -> f64 {
        self.delay_costs * f64::from(self.delay_at(completion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_builder() {
        let asset = Asset::new(10, 0.5).with_name("Turbine 1");
        assert_eq!(asset.name, "Turbine 1");
        assert_eq!(asset.due_date, 10);
        assert!((asset.delay_costs - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_delay_at() {
        let asset = Asset::new(10, 2.0);
        assert_eq!(asset.delay_at(8), 0);
        assert_eq!(asset.delay_at(10), 0);
        assert_eq!(asset.delay_at(13), 3);
        assert!((asset.delay_penalty_at(13) - 6.0).abs() < 1e-10);
        assert!((asset.delay_penalty_at(4) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_asset_id_display() {
        assert_eq!(AssetId(3).to_string(), "a3");
        assert_eq!(AssetId(3).index(), 3);
    }
}
