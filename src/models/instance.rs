//! Problem instance.
//!
//! Bundles the assets, the component types, and the planning horizon.
//! Periods are the dense range `0..horizon`.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::{Asset, AssetId, Component, ComponentId};

/// A provisioning problem: assets × components over a discrete horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Assets, addressed by [`AssetId`].
    pub assets: Vec<Asset>,
    /// Component types, addressed by [`ComponentId`].
    pub components: Vec<Component>,
    /// Number of periods. Periods are `0..horizon`.
    pub horizon: u32,
}

impl Instance {
    /// Creates an instance.
    pub fn new(assets: Vec<Asset>, components: Vec<Component>, horizon: u32) -> Self {
        Self {
            assets,
            components,
            horizon,
        }
    }

    /// Number of assets.
    #[inline]
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Number of component types.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of periods.
    #[inline]
    pub fn period_count(&self) -> usize {
        self.horizon as usize
    }

    /// The period range `0..horizon`.
    pub fn periods(&self) -> Range<u32> {
        0..self.horizon
    }

    /// Asset identifiers in instance order.
    pub fn asset_ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        (0..self.assets.len()).map(AssetId)
    }

    /// Component identifiers in instance order.
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        (0..self.components.len()).map(ComponentId)
    }

    /// Looks up an asset.
    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(id.index())
    }

    /// Looks up a component type.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.index())
    }
}
