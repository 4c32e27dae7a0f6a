//! Region/category/phase specific EF group overrides
//!
//! Some fuel categories burn differently from the rest of their cover type
//! (or do not emit at all in a phase). The override table records those
//! exceptions per region, keyed by fuel category, sub-category and phase.

use crate::core_types::{EfGroupId, Phase, RegionId};
use rustc_hash::FxHashMap;

/// Outcome of probing the override table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override<'a> {
    /// No entry; fall through to the cover type's own EF groups
    Unset,
    /// Explicit null; this combination produces no emissions
    Suppressed,
    /// Use this EF group instead of the cover type's default
    Redirect(&'a EfGroupId),
}

type PhaseEntries = FxHashMap<Phase, Option<EfGroupId>>;
type SubCategoryEntries = FxHashMap<String, PhaseEntries>;
type CategoryEntries = FxHashMap<String, SubCategoryEntries>;

/// `region → fuel_category → fuel_sub_category → phase → Option<EfGroupId>`
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    regions: FxHashMap<RegionId, CategoryEntries>,
    entries: usize,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an override; `None` suppresses emissions for the combination
    ///
    /// Returns the previous entry if one existed.
    pub fn insert(
        &mut self,
        region: impl Into<RegionId>,
        fuel_category: impl Into<String>,
        fuel_sub_category: impl Into<String>,
        phase: Phase,
        ef_group: Option<EfGroupId>,
    ) -> Option<Option<EfGroupId>> {
        let previous = self
            .regions
            .entry(region.into())
            .or_default()
            .entry(fuel_category.into())
            .or_default()
            .entry(fuel_sub_category.into())
            .or_default()
            .insert(phase, ef_group);
        if previous.is_none() {
            self.entries += 1;
        }
        previous
    }

    /// Look up the override for one combination
    pub fn probe(
        &self,
        region: &str,
        fuel_category: &str,
        fuel_sub_category: &str,
        phase: Phase,
    ) -> Override<'_> {
        let entry = self
            .regions
            .get(region)
            .and_then(|categories| categories.get(fuel_category))
            .and_then(|subs| subs.get(fuel_sub_category))
            .and_then(|phases| phases.get(&phase));

        match entry {
            None => Override::Unset,
            Some(None) => Override::Suppressed,
            Some(Some(ef_group)) => Override::Redirect(ef_group),
        }
    }

    /// Number of (region, category, sub-category, phase) entries
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}
