//! Memoizing registry of cover type resolvers
//!
//! A registry is created once per burn type and reused for a whole batch of
//! lookups. Fuelbeds are translated to cover types and exactly one
//! [`FuelbedResolver`] is built per distinct cover type, so fuelbeds sharing
//! a cover type share a resolver.
//!
//! # Thread Safety
//! The resolver cache sits behind an `RwLock`. Hits only take the read
//! lock; a miss re-checks under the write lock before inserting, which keeps
//! one resolver per cover type even when threads race on the same miss.

use super::FuelbedResolver;
use crate::config::LookupConfig;
use crate::core_types::{BurnType, CoverTypeId, FuelbedId, Phase};
use crate::error::{ConfigError, LookupError};
use crate::tables::EfTables;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// What a lookup is keyed by: an FCCS fuelbed or a cover type directly
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Fuelbed(FuelbedId),
    CoverType(CoverTypeId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Fuelbed(id) => write!(f, "fuelbed {id}"),
            Subject::CoverType(id) => write!(f, "cover type {id}"),
        }
    }
}

/// One entry of a batch lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub subject: Subject,
    pub phase: String,
    pub fuel_category: String,
    pub fuel_sub_category: String,
    pub species: String,
}

/// Per burn type cache of [`FuelbedResolver`]s
#[derive(Debug)]
pub struct ResolverRegistry {
    tables: Arc<EfTables>,
    burn: BurnType,
    resolvers: RwLock<FxHashMap<CoverTypeId, Arc<FuelbedResolver>>>,
}

impl ResolverRegistry {
    pub fn new(tables: Arc<EfTables>, burn: BurnType) -> Self {
        Self {
            tables,
            burn,
            resolvers: RwLock::new(FxHashMap::default()),
        }
    }

    /// Load the tables named by a config and create a registry for its
    /// burn type
    ///
    /// # Errors
    /// Returns error if any table fails to load
    pub fn from_config(config: &LookupConfig) -> Result<Self, ConfigError> {
        let tables = EfTables::load(&config.tables)?;
        Ok(Self::new(Arc::new(tables), config.burn_type()))
    }

    pub fn burn_type(&self) -> BurnType {
        self.burn
    }

    pub fn tables(&self) -> &Arc<EfTables> {
        &self.tables
    }

    /// Translate a subject to its cover type
    ///
    /// # Errors
    /// Returns [`LookupError::InvalidFuelbedId`] if a fuelbed has no cover
    /// type assignment
    pub fn cover_type_id(&self, subject: &Subject) -> Result<CoverTypeId, LookupError> {
        match subject {
            Subject::CoverType(id) => Ok(id.clone()),
            Subject::Fuelbed(id) => self
                .tables
                .fuelbed_cover_types
                .cover_type(id)
                .cloned()
                .ok_or_else(|| LookupError::InvalidFuelbedId(id.clone())),
        }
    }

    /// Resolver for a subject, built on first use and cached by cover type
    ///
    /// # Errors
    /// Returns error if the subject does not translate to a cover type with
    /// usable EF groups. Failures are not cached.
    pub fn resolver(&self, subject: &Subject) -> Result<Arc<FuelbedResolver>, LookupError> {
        let cover_type_id = self.cover_type_id(subject)?;

        if let Some(resolver) = self
            .resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cover_type_id)
        {
            return Ok(Arc::clone(resolver));
        }

        let mut resolvers = self
            .resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(resolver) = resolvers.get(&cover_type_id) {
            return Ok(Arc::clone(resolver));
        }

        let resolver = Arc::new(FuelbedResolver::new(
            cover_type_id.clone(),
            self.burn,
            Arc::clone(&self.tables),
        )?);
        resolvers.insert(cover_type_id, Arc::clone(&resolver));
        debug!(%subject, cached = resolvers.len(), "Cached new resolver");
        Ok(resolver)
    }

    /// Look up an emission factor for a fuelbed or cover type
    ///
    /// Subjects that do not resolve give `Ok(None)` so a batch of mixed
    /// fuelbeds is not aborted by one bad id.
    ///
    /// # Errors
    /// Returns [`LookupError::MissingLookupKey`] if any lookup key is empty
    pub fn get(
        &self,
        subject: &Subject,
        phase: &str,
        fuel_category: &str,
        fuel_sub_category: &str,
        species: &str,
    ) -> Result<Option<f64>, LookupError> {
        let resolver = match self.resolver(subject) {
            Ok(resolver) => resolver,
            Err(err) if err.is_identifier_error() => {
                warn!(%subject, error = %err, "Unresolvable lookup subject");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        resolver.get(phase, fuel_category, fuel_sub_category, species)
    }

    /// Evaluate a batch of lookups in parallel
    ///
    /// Results are in request order.
    pub fn get_many(&self, requests: &[LookupRequest]) -> Vec<Result<Option<f64>, LookupError>> {
        requests
            .par_iter()
            .map(|r| {
                self.get(
                    &r.subject,
                    &r.phase,
                    &r.fuel_category,
                    &r.fuel_sub_category,
                    &r.species,
                )
            })
            .collect()
    }

    /// Number of cover types with a cached resolver
    pub fn cached_resolvers(&self) -> usize {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A registry bound to a single fuelbed or cover type
#[derive(Debug, Clone)]
pub struct EfLookup {
    subject: Subject,
    registry: Arc<ResolverRegistry>,
}

impl EfLookup {
    pub fn new(subject: Subject, registry: Arc<ResolverRegistry>) -> Self {
        Self { subject, registry }
    }

    /// Lookup keyed by FCCS fuelbed id
    pub fn fuelbed(id: impl Into<FuelbedId>, registry: Arc<ResolverRegistry>) -> Self {
        Self::new(Subject::Fuelbed(id.into()), registry)
    }

    /// Lookup keyed by cover type id
    pub fn cover_type(id: impl Into<CoverTypeId>, registry: Arc<ResolverRegistry>) -> Self {
        Self::new(Subject::CoverType(id.into()), registry)
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn registry(&self) -> &Arc<ResolverRegistry> {
        &self.registry
    }

    /// # Errors
    /// See [`ResolverRegistry::resolver`]
    pub fn resolver(&self) -> Result<Arc<FuelbedResolver>, LookupError> {
        self.registry.resolver(&self.subject)
    }

    /// # Errors
    /// See [`ResolverRegistry::get`]
    pub fn get(
        &self,
        phase: &str,
        fuel_category: &str,
        fuel_sub_category: &str,
        species: &str,
    ) -> Result<Option<f64>, LookupError> {
        self.registry
            .get(&self.subject, phase, fuel_category, fuel_sub_category, species)
    }

    /// Species with a defined emission factor in a phase; empty if the
    /// subject does not resolve
    pub fn species(&self, phase: Phase) -> BTreeSet<String> {
        self.resolver()
            .map(|resolver| {
                resolver
                    .species(phase)
                    .into_iter()
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::fixtures::sample_tables;

    fn registry(burn: BurnType) -> ResolverRegistry {
        ResolverRegistry::new(Arc::new(sample_tables()), burn)
    }

    fn fuelbed(id: &str) -> Subject {
        Subject::Fuelbed(id.into())
    }

    #[test]
    fn test_fuelbeds_sharing_cover_type_share_resolver() {
        let registry = registry(BurnType::Wildfire);
        let a = registry.resolver(&fuelbed("52")).unwrap();
        let b = registry.resolver(&fuelbed("53")).unwrap();
        let c = registry
            .resolver(&Subject::CoverType("118".into()))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(registry.cached_resolvers(), 1);

        let d = registry.resolver(&fuelbed("70")).unwrap();
        assert!(!Arc::ptr_eq(&a, &d));
        assert_eq!(registry.cached_resolvers(), 2);
    }

    #[test]
    fn test_identifier_errors_from_resolver() {
        let registry = registry(BurnType::Wildfire);
        assert_eq!(
            registry.resolver(&fuelbed("1")).unwrap_err(),
            LookupError::InvalidFuelbedId("1".into())
        );
        // Empty cover type cell
        assert_eq!(
            registry.resolver(&fuelbed("99")).unwrap_err(),
            LookupError::InvalidFuelbedId("99".into())
        );
        assert_eq!(
            registry.resolver(&fuelbed("80")).unwrap_err(),
            LookupError::InvalidCoverTypeId("999".into())
        );
        assert!(matches!(
            registry.resolver(&fuelbed("81")).unwrap_err(),
            LookupError::InvalidEfGroup { .. }
        ));
        assert_eq!(registry.cached_resolvers(), 0);
    }

    #[test]
    fn test_get_swallows_identifier_errors() {
        let registry = registry(BurnType::Wildfire);
        for id in ["1", "80", "81", "99"] {
            assert_eq!(
                registry.get(&fuelbed(id), "flaming", "canopy", "overstory", "CO2"),
                Ok(None)
            );
        }
        assert_eq!(
            registry.get(
                &Subject::CoverType("nope".into()),
                "flaming",
                "canopy",
                "overstory",
                "CO2"
            ),
            Ok(None)
        );
    }

    #[test]
    fn test_get_propagates_missing_key() {
        let registry = registry(BurnType::Wildfire);
        assert_eq!(
            registry.get(&fuelbed("52"), "flaming", "canopy", "overstory", ""),
            Err(LookupError::MissingLookupKey("species"))
        );
    }

    #[test]
    fn test_burn_type_selects_group() {
        let wf = registry(BurnType::Wildfire);
        let rx = registry(BurnType::Prescribed);
        let subject = fuelbed("70");
        assert_eq!(
            wf.get(&subject, "flaming", "woody fuels", "100-hr fuels", "CO2"),
            Ok(Some(1655.0))
        );
        assert_eq!(
            rx.get(&subject, "flaming", "woody fuels", "100-hr fuels", "CO2"),
            Ok(Some(1600.0))
        );
    }

    #[test]
    fn test_get_many_preserves_order_and_shares_cache() {
        let registry = registry(BurnType::Wildfire);
        let request = |id: &str, phase: &str, species: &str| LookupRequest {
            subject: fuelbed(id),
            phase: phase.to_owned(),
            fuel_category: "woody fuels".to_owned(),
            fuel_sub_category: "stumps rotten".to_owned(),
            species: species.to_owned(),
        };
        let mut requests = Vec::new();
        for _ in 0..50 {
            requests.push(request("52", "flaming", "CO2"));
            requests.push(request("53", "residual", "CO2"));
            requests.push(request("70", "residual", "CO"));
            requests.push(request("1", "flaming", "CO2"));
            requests.push(request("70", "flaming", ""));
        }

        let results = registry.get_many(&requests);
        assert_eq!(results.len(), requests.len());
        for chunk in results.chunks(5) {
            assert_eq!(chunk[0], Ok(Some(1655.0)));
            assert_eq!(chunk[1], Ok(Some(1500.0)));
            assert_eq!(chunk[2], Ok(Some(229.0)));
            assert_eq!(chunk[3], Ok(None));
            assert_eq!(chunk[4], Err(LookupError::MissingLookupKey("species")));
        }
        assert_eq!(registry.cached_resolvers(), 2);
    }

    #[test]
    fn test_ef_lookup_bound_to_subject() {
        let registry = Arc::new(registry(BurnType::Wildfire));
        let lookup = EfLookup::fuelbed("52", Arc::clone(&registry));
        assert_eq!(
            lookup.get("flaming", "woody fuels", "100-hr fuels", "CO2"),
            Ok(Some(1655.0))
        );
        assert_eq!(lookup.subject(), &fuelbed("52"));
        assert!(lookup.species(Phase::Residual).contains("NH3"));

        let by_cover_type = EfLookup::cover_type("118", Arc::clone(&registry));
        assert!(Arc::ptr_eq(
            &lookup.resolver().unwrap(),
            &by_cover_type.resolver().unwrap()
        ));

        let missing = EfLookup::fuelbed("1", registry);
        assert!(missing.species(Phase::Flaming).is_empty());
        assert_eq!(missing.get("flaming", "canopy", "overstory", "CO2"), Ok(None));
    }

    #[test]
    fn test_subject_serde_and_display() {
        let subject: Subject = serde_json::from_str(r#"{"fuelbed":"52"}"#).unwrap();
        assert_eq!(subject, fuelbed("52"));
        assert_eq!(subject.to_string(), "fuelbed 52");
        assert_eq!(
            Subject::CoverType("118".into()).to_string(),
            "cover type 118"
        );
    }
}
