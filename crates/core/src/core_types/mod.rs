//! Core types and utilities

pub mod fuel_category;
pub mod ids;
pub mod phase;

pub use fuel_category::{
    classify_residual, translate_consume_category, valid_fuel_categories,
    valid_fuel_sub_categories, ResidualClass,
};
pub use ids::{CoverTypeId, EfGroupId, FuelbedId, RegionId, Species};
pub use phase::{BurnType, Phase, UnknownPhase};
