//! Per-species emission factor sets and the EF group table

use crate::core_types::{EfGroupId, Species};
use crate::error::LoadError;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Reserved EF group holding residual emission factors for woody fuels
pub const WOODY_RSC_GROUP: &str = "residual rsc woody";
/// Reserved EF group holding residual emission factors for duff
pub const DUFF_RSC_GROUP: &str = "residual rsc duff";

/// Emission factors of one EF group, keyed by species
///
/// Only species with a measured value are stored; an empty cell in the
/// source table and an absent column are the same thing here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EfSet {
    values: FxHashMap<Species, f64>,
}

impl EfSet {
    /// Build a set from already parsed values
    pub fn new(values: impl IntoIterator<Item = (Species, f64)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Build a set from raw table cells
    ///
    /// Empty (or whitespace only) cells are skipped.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidEfValue`] if a cell is not a finite,
    /// non-negative number
    pub fn from_raw<'a>(
        origin: &str,
        ef_group: &str,
        cells: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, LoadError> {
        let mut values = FxHashMap::default();
        for (species, raw) in cells {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| LoadError::InvalidEfValue {
                    origin: origin.to_owned(),
                    ef_group: ef_group.to_owned(),
                    species: species.to_owned(),
                    value: raw.to_owned(),
                })?;
            values.insert(Species::from(species), value);
        }
        Ok(Self { values })
    }

    /// Emission factor for a species, if measured
    pub fn get(&self, species: &str) -> Option<f64> {
        self.values.get(species).copied()
    }

    /// Species with a measured value
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(Species::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// EF group id → emission factor set
#[derive(Debug, Clone, Default)]
pub struct EfGroupTable {
    groups: FxHashMap<EfGroupId, Arc<EfSet>>,
}

impl EfGroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a group
    pub fn insert(&mut self, ef_group: impl Into<EfGroupId>, set: EfSet) {
        self.groups.insert(ef_group.into(), Arc::new(set));
    }

    pub fn get(&self, ef_group: &str) -> Option<&Arc<EfSet>> {
        self.groups.get(ef_group)
    }

    pub fn contains(&self, ef_group: &str) -> bool {
        self.groups.contains_key(ef_group)
    }

    /// Residual emission factors for woody fuels
    pub fn woody_rsc(&self) -> Option<&Arc<EfSet>> {
        self.get(WOODY_RSC_GROUP)
    }

    /// Residual emission factors for duff
    pub fn duff_rsc(&self) -> Option<&Arc<EfSet>> {
        self.get(DUFF_RSC_GROUP)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
