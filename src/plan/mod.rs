//! Plan designs under test and plan loading

mod data;
pub mod loader;

pub use data::{CostSharingType, PlanInput, PlanType, TierDesign, TIER_COUNT};
pub use loader::{load_plans, load_plans_from_reader};
