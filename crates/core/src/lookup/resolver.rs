//! Emission factor resolution for a single cover type
//!
//! A [`FuelbedResolver`] is bound to one cover type and burn type. It holds
//! the cover type's flaming/smoldering EF set, the two residual EF sets and
//! the override region, all fixed at construction.
//!
//! # Resolution order
//!
//! 1. If the cover type has an override region, probe the override table at
//!    `(region, fuel_category, fuel_sub_category, phase)`:
//!    - explicit null: no emission factor, stop
//!    - EF group: read the species from that group instead, stop
//!    - no entry: continue
//! 2. Flaming and smoldering read the cover type's EF set; fuel category is
//!    ignored.
//! 3. Residual reads the woody or duff residual set depending on the fuel
//!    category pair, or finds nothing for other fuels.
//!
//! The override is consulted before the residual classification, so an
//! override redirect wins even for woody and duff fuels.

use crate::core_types::{
    classify_residual, BurnType, CoverTypeId, EfGroupId, Phase, RegionId, ResidualClass,
};
use crate::error::LookupError;
use crate::tables::{EfSet, EfTables, Override, DUFF_RSC_GROUP, WOODY_RSC_GROUP};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Emission factor lookup bound to one cover type
#[derive(Debug)]
pub struct FuelbedResolver {
    cover_type_id: CoverTypeId,
    burn: BurnType,
    ef_group: EfGroupId,
    region: Option<RegionId>,
    ef_set: Arc<EfSet>,
    residual_woody: Arc<EfSet>,
    residual_duff: Arc<EfSet>,
    tables: Arc<EfTables>,
}

impl FuelbedResolver {
    /// Bind a resolver to a cover type
    ///
    /// # Errors
    /// - [`LookupError::InvalidCoverTypeId`] if the cover type has no EF
    ///   group row
    /// - [`LookupError::InvalidEfGroup`] if the row lacks the EF group column
    ///   for the burn type, or an EF group it needs has no values
    pub fn new(
        cover_type_id: CoverTypeId,
        burn: BurnType,
        tables: Arc<EfTables>,
    ) -> Result<Self, LookupError> {
        let record = tables
            .cover_type_ef_groups
            .get(&cover_type_id)
            .ok_or_else(|| LookupError::InvalidCoverTypeId(cover_type_id.clone()))?;

        let ef_group = record
            .ef_group(burn)
            .cloned()
            .ok_or_else(|| LookupError::InvalidEfGroup {
                cover_type_id: cover_type_id.clone(),
                reason: format!("no flaming/smoldering EF group for {burn:?} burns"),
            })?;
        let region = record.region().cloned();

        let groups = &tables.ef_groups;
        let missing = |id: &str| LookupError::missing_group(&cover_type_id, id);
        let ef_set = groups
            .get(&ef_group)
            .cloned()
            .ok_or_else(|| missing(&ef_group))?;
        let residual_woody = groups
            .woody_rsc()
            .cloned()
            .ok_or_else(|| missing(WOODY_RSC_GROUP))?;
        let residual_duff = groups
            .duff_rsc()
            .cloned()
            .ok_or_else(|| missing(DUFF_RSC_GROUP))?;

        debug!(
            cover_type = %cover_type_id,
            ef_group = %ef_group,
            region = region.as_ref().map(RegionId::as_str),
            ?burn,
            "Created cover type resolver"
        );

        Ok(Self {
            cover_type_id,
            burn,
            ef_group,
            region,
            ef_set,
            residual_woody,
            residual_duff,
            tables,
        })
    }

    pub fn cover_type_id(&self) -> &CoverTypeId {
        &self.cover_type_id
    }

    pub fn burn_type(&self) -> BurnType {
        self.burn
    }

    /// Flaming/smoldering EF group of the cover type
    pub fn ef_group(&self) -> &EfGroupId {
        &self.ef_group
    }

    /// Override region, if the cover type has one for this burn type
    pub fn region(&self) -> Option<&RegionId> {
        self.region.as_ref()
    }

    /// Look up an emission factor
    ///
    /// Returns `Ok(None)` when there is no emission factor for the
    /// combination: unknown species, unrecognised phase, a residual fuel that
    /// is neither woody nor duff, or an override suppressing emissions.
    ///
    /// # Errors
    /// Returns [`LookupError::MissingLookupKey`] if any argument is empty
    ///
    /// # Examples
    /// ```
    /// # use fccs2ef_core::tables::*;
    /// # use fccs2ef_core::core_types::{BurnType, Species};
    /// # use fccs2ef_core::FuelbedResolver;
    /// # use std::sync::Arc;
    /// # let mut groups = CoverTypeEfGroups::new();
    /// # groups.insert("118", CoverTypeRecord { wf: Some("G7".into()), ..Default::default() });
    /// # let mut ef_groups = EfGroupTable::new();
    /// # ef_groups.insert("G7", EfSet::new([(Species::from("CO2"), 1655.0)]));
    /// # ef_groups.insert(WOODY_RSC_GROUP, EfSet::default());
    /// # ef_groups.insert(DUFF_RSC_GROUP, EfSet::default());
    /// # let overrides = OverrideTable::new();
    /// # let tables = EfTables::new(FuelbedCoverTypes::new(), groups, overrides, ef_groups);
    /// # let tables = Arc::new(tables);
    /// let resolver = FuelbedResolver::new("118".into(), BurnType::Wildfire, tables)?;
    /// let co2 = resolver.get("flaming", "woody fuels", "100-hr fuels", "CO2")?;
    /// assert_eq!(co2, Some(1655.0));
    /// # Ok::<(), fccs2ef_core::LookupError>(())
    /// ```
    pub fn get(
        &self,
        phase: &str,
        fuel_category: &str,
        fuel_sub_category: &str,
        species: &str,
    ) -> Result<Option<f64>, LookupError> {
        require_key("phase", phase)?;
        require_key("fuel_category", fuel_category)?;
        require_key("fuel_sub_category", fuel_sub_category)?;
        require_key("species", species)?;

        let Ok(phase) = phase.parse::<Phase>() else {
            trace!(phase, "Unrecognised phase, no emission factor");
            return Ok(None);
        };

        let value = self
            .ef_set_for(phase, fuel_category, fuel_sub_category)
            .and_then(|set| set.get(species));
        trace!(
            cover_type = %self.cover_type_id,
            %phase,
            fuel_category,
            fuel_sub_category,
            species,
            ?value,
            "EF lookup"
        );
        Ok(value)
    }

    /// EF set a combination reads from, or `None` if it has no emissions
    pub fn ef_set_for(
        &self,
        phase: Phase,
        fuel_category: &str,
        fuel_sub_category: &str,
    ) -> Option<&EfSet> {
        if let Some(region) = &self.region {
            match self
                .tables
                .overrides
                .probe(region, fuel_category, fuel_sub_category, phase)
            {
                Override::Suppressed => return None,
                // An override naming an unknown group has nothing to offer
                Override::Redirect(group) => {
                    return self.tables.ef_groups.get(group).map(|set| &**set);
                }
                Override::Unset => {}
            }
        }

        let set = match phase {
            Phase::Flaming | Phase::Smoldering => &self.ef_set,
            Phase::Residual => match classify_residual(fuel_category, fuel_sub_category)? {
                ResidualClass::Woody => &self.residual_woody,
                ResidualClass::Duff => &self.residual_duff,
            },
        };
        Some(&**set)
    }

    /// Species with a defined emission factor in a phase
    ///
    /// Residual combines the woody and duff sets. Overrides are not
    /// considered.
    pub fn species(&self, phase: Phase) -> BTreeSet<&str> {
        match phase {
            Phase::Residual => self
                .residual_woody
                .species()
                .chain(self.residual_duff.species())
                .collect(),
            Phase::Flaming | Phase::Smoldering => self.ef_set.species().collect(),
        }
    }
}

fn require_key(name: &'static str, value: &str) -> Result<(), LookupError> {
    if value.is_empty() {
        Err(LookupError::MissingLookupKey(name))
    } else {
        Ok(())
    }
}
