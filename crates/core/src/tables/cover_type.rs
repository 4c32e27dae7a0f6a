//! Fuelbed → cover type and cover type → EF group mappings

use crate::core_types::{BurnType, CoverTypeId, EfGroupId, FuelbedId, RegionId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Many-to-one assignment of FCCS fuelbeds to cover types
#[derive(Debug, Clone, Default)]
pub struct FuelbedCoverTypes {
    mappings: FxHashMap<FuelbedId, CoverTypeId>,
}

impl FuelbedCoverTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fuelbed to a cover type, returning the previous assignment
    pub fn insert(
        &mut self,
        fuelbed_id: impl Into<FuelbedId>,
        cover_type_id: impl Into<CoverTypeId>,
    ) -> Option<CoverTypeId> {
        self.mappings.insert(fuelbed_id.into(), cover_type_id.into())
    }

    /// Cover type for a fuelbed
    ///
    /// An empty cover type cell counts as unassigned.
    pub fn cover_type(&self, fuelbed_id: &str) -> Option<&CoverTypeId> {
        self.mappings.get(fuelbed_id).filter(|ct| !ct.is_empty())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl<F: Into<FuelbedId>, C: Into<CoverTypeId>> FromIterator<(F, C)> for FuelbedCoverTypes {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (fuelbed_id, cover_type_id) in iter {
            table.insert(fuelbed_id, cover_type_id);
        }
        table
    }
}

/// EF group and region columns of one cover type
///
/// Wildfire and prescribed burns select different EF group columns. The
/// override region always comes from the prescribed-burn column. A missing
/// or empty cell is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverTypeRecord {
    /// Flaming/smoldering EF group for wildfires
    pub wf: Option<EfGroupId>,
    /// Flaming/smoldering EF group for prescribed burns
    pub rx: Option<EfGroupId>,
    /// Wildfire region as listed in the source table; lookups use
    /// `regional_rx` for both burn types
    pub regional_wf: Option<RegionId>,
    /// Override region for prescribed burns
    pub regional_rx: Option<RegionId>,
}

impl CoverTypeRecord {
    /// Flaming/smoldering EF group for the burn type
    pub fn ef_group(&self, burn: BurnType) -> Option<&EfGroupId> {
        let cell = match burn {
            BurnType::Wildfire => self.wf.as_ref(),
            BurnType::Prescribed => self.rx.as_ref(),
        };
        cell.filter(|g| !g.is_empty())
    }

    /// Override region, shared by wildfire and prescribed lookups
    pub fn region(&self) -> Option<&RegionId> {
        self.regional_rx.as_ref().filter(|r| !r.is_empty())
    }
}

/// Cover type → EF group assignment
#[derive(Debug, Clone, Default)]
pub struct CoverTypeEfGroups {
    records: FxHashMap<CoverTypeId, CoverTypeRecord>,
}

impl CoverTypeEfGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record of a cover type
    pub fn insert(
        &mut self,
        cover_type_id: impl Into<CoverTypeId>,
        record: CoverTypeRecord,
    ) -> Option<CoverTypeRecord> {
        self.records.insert(cover_type_id.into(), record)
    }

    pub fn get(&self, cover_type_id: &str) -> Option<&CoverTypeRecord> {
        self.records.get(cover_type_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
