//! Provisioning domain models.
//!
//! Problem data (assets, component types, horizon) and the schedule
//! produced from a solved model.
//!
//! # Domain Mappings
//!
//! | u-provision | Aviation MRO | Rail | Energy |
//! |-------------|--------------|------|--------|
//! | Asset | Aircraft engine | Locomotive | Gas turbine |
//! | Component | Engine module | Bogie / traction unit | Turbine stage |
//! | Repair | Shop visit | Workshop overhaul | Refurbishment |
//! | Order | Spare module purchase | New unit | Replacement stage |

mod asset;
mod component;
mod instance;
mod parameters;
mod schedule;

pub use asset::{Asset, AssetId};
pub use component::{Component, ComponentId};
pub use instance::Instance;
pub use parameters::{ParameterTable, Parameters};
pub use schedule::{ActionChoice, ComponentPlan, Schedule, SolveFailure};
