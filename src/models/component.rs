//! Component model.
//!
//! A component is one module type of an asset (fan, compressor, turbine
//! stage). Every asset carries its own physical unit of each component
//! type. Some attributes depend on the parent asset:
//! - **Release date**: first period the unit is available after disassembly
//! - **Repair duration**: periods needed to repair that asset's unit
//!
//! Ordering a replacement unit in "good as new" state is asset
//! independent: one order duration, one order price.
//!
//! Per-asset attributes are parallel vectors indexed by [`AssetId`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AssetId;

/// Index of a component type within [`Instance::components`](super::Instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub usize);

impl ComponentId {
    /// Zero-based position in the instance.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A component type shared by all assets of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// First period the unit of asset `i` is available, at index `i`.
    pub release_dates: Vec<u32>,
    /// Repair duration (periods) of the unit of asset `i`, at index `i`.
    pub repair_durations: Vec<u32>,
    /// Lead time (periods) of one replacement unit.
    pub order_duration: u32,
    /// Price of one replacement unit.
    pub order_costs: f64,
}

impl Component {
    /// Creates a component without per-asset data.
    ///
    /// Per-asset entries are appended with [`with_asset`](Self::with_asset)
    /// in asset order.
    pub fn new(order_duration: u32, order_costs: f64) -> Self {
        Self {
            name: String::new(),
            release_dates: Vec::new(),
            repair_durations: Vec::new(),
            order_duration,
            order_costs,
        }
    }

    /// Creates a component from per-asset tables.
    ///
    /// `release_dates[i]` and `repair_durations[i]` belong to asset `i`.
    pub fn from_tables(
        release_dates: Vec<u32>,
        repair_durations: Vec<u32>,
        order_duration: u32,
        order_costs: f64,
    ) -> Self {
        Self {
            name: String::new(),
            release_dates,
            repair_durations,
            order_duration,
            order_costs,
        }
    }

    /// Sets the component name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends the release date and repair duration of the next asset.
    pub fn with_asset(mut self, release_date: u32, repair_duration: u32) -> Self {
        self.release_dates.push(release_date);
        self.repair_durations.push(repair_duration);
        self
    }

    /// Release date of the given asset's unit, if recorded.
    #[inline]
    pub fn release_date(&self, asset: AssetId) -> Option<u32> {
        self.release_dates.get(asset.index()).copied()
    }

    /// Repair duration of the given asset's unit, if recorded.
    #[inline]
    pub fn repair_duration(&self, asset: AssetId) -> Option<u32> {
        self.repair_durations.get(asset.index()).copied()
    }
}
