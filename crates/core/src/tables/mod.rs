//! In-memory reference tables
//!
//! The four mappings behind every lookup. They are loaded once, then shared
//! read-only by every resolver through an [`Arc<EfTables>`].

pub mod cover_type;
pub mod ef_set;
pub mod loader;
pub mod overrides;

pub use cover_type::{CoverTypeEfGroups, CoverTypeRecord, FuelbedCoverTypes};
pub use ef_set::{EfGroupTable, EfSet, DUFF_RSC_GROUP, WOODY_RSC_GROUP};
pub use overrides::{Override, OverrideTable};

use crate::config::TableFiles;
use crate::error::LoadError;
use tracing::info;

/// Immutable bundle of the reference tables
#[derive(Debug, Clone, Default)]
pub struct EfTables {
    pub fuelbed_cover_types: FuelbedCoverTypes,
    pub cover_type_ef_groups: CoverTypeEfGroups,
    pub overrides: OverrideTable,
    pub ef_groups: EfGroupTable,
}

impl EfTables {
    pub fn new(
        fuelbed_cover_types: FuelbedCoverTypes,
        cover_type_ef_groups: CoverTypeEfGroups,
        overrides: OverrideTable,
        ef_groups: EfGroupTable,
    ) -> Self {
        Self {
            fuelbed_cover_types,
            cover_type_ef_groups,
            overrides,
            ef_groups,
        }
    }

    /// Load all four tables from CSV files
    ///
    /// # Errors
    /// Returns the first table that fails to load
    pub fn load(files: &TableFiles) -> Result<Self, LoadError> {
        let tables = Self::new(
            FuelbedCoverTypes::from_path(&files.fccs_2_cover_type)?,
            CoverTypeEfGroups::from_path(&files.cover_type_2_ef_group)?,
            OverrideTable::from_path(&files.cat_phase_2_ef_group)?,
            EfGroupTable::from_path(&files.ef_group_2_ef)?,
        );
        info!(
            fuelbeds = tables.fuelbed_cover_types.len(),
            cover_types = tables.cover_type_ef_groups.len(),
            overrides = tables.overrides.len(),
            ef_groups = tables.ef_groups.len(),
            "Loaded emission factor tables"
        );
        Ok(tables)
    }
}
