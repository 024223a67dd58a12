//! Dense variable layout.
//!
//! Variables are declared family by family: all `z`, all `y`, all `x`,
//! then all `v`. Within `z` and `y` the period index runs fastest, so the
//! indicators of one (asset, component) pair form a contiguous block.

use std::ops::Range;

use crate::lp::VarId;
use crate::models::{AssetId, ComponentId};

/// Maps model indices to [`VarId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLayout {
    assets: usize,
    components: usize,
    periods: usize,
}

impl VarLayout {
    /// Layout for the given dimensions.
    pub fn new(assets: usize, components: usize, periods: usize) -> Self {
        Self {
            assets,
            components,
            periods,
        }
    }

    /// Number of assets.
    pub fn asset_count(&self) -> usize {
        self.assets
    }

    /// Number of component types.
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Number of periods.
    pub fn period_count(&self) -> usize {
        self.periods
    }

    #[inline]
    fn pair(&self, asset: AssetId, component: ComponentId) -> usize {
        asset.index() * self.components + component.index()
    }

    #[inline]
    fn indicator_family_len(&self) -> usize {
        self.assets * self.components * self.periods
    }

    /// Total number of variables.
    pub fn variable_count(&self) -> usize {
        2 * self.indicator_family_len() + self.assets * self.components + self.assets
    }

    /// Positions of `z[a,c,·]`.
    pub fn repair_block(&self, asset: AssetId, component: ComponentId) -> Range<usize> {
        let start = self.pair(asset, component) * self.periods;
        start..start + self.periods
    }

    /// Positions of `y[a,c,·]`.
    pub fn order_block(&self, asset: AssetId, component: ComponentId) -> Range<usize> {
        let start = self.indicator_family_len() + self.pair(asset, component) * self.periods;
        start..start + self.periods
    }

    /// `z[a,c,p]`.
    #[inline]
    pub fn repair_start(&self, asset: AssetId, component: ComponentId, period: u32) -> VarId {
        VarId(self.repair_block(asset, component).start + period as usize)
    }

    /// `y[a,c,p]`.
    #[inline]
    pub fn order_start(&self, asset: AssetId, component: ComponentId, period: u32) -> VarId {
        VarId(self.order_block(asset, component).start + period as usize)
    }

    /// `x[a,c]`.
    #[inline]
    pub fn finish(&self, asset: AssetId, component: ComponentId) -> VarId {
        VarId(2 * self.indicator_family_len() + self.pair(asset, component))
    }

    /// `v[a]`.
    #[inline]
    pub fn delay(&self, asset: AssetId) -> VarId {
        VarId(2 * self.indicator_family_len() + self.assets * self.components + asset.index())
    }
}
