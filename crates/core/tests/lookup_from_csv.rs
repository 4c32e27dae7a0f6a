//! Integration tests loading the reference tables from CSV files
use approx::assert_relative_eq;
use fccs2ef_core::core_types::translate_consume_category;
use fccs2ef_core::{
    BurnType, EfLookup, EfTables, LookupConfig, LookupError, Phase, ResolverRegistry, Subject,
    TableFiles,
};
use std::path::PathBuf;
use std::sync::Arc;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

fn registry(is_rx: bool) -> Arc<ResolverRegistry> {
    let config = LookupConfig::new(TableFiles::in_dir(data_dir()), is_rx);
    Arc::new(ResolverRegistry::from_config(&config).expect("tables load"))
}

#[test]
fn test_tables_load() {
    let tables = EfTables::load(&TableFiles::in_dir(data_dir())).unwrap();
    assert_eq!(tables.fuelbed_cover_types.len(), 6);
    assert_eq!(tables.cover_type_ef_groups.len(), 3);
    assert_eq!(tables.overrides.len(), 5);
    assert_eq!(tables.ef_groups.len(), 7);
}

#[test]
fn test_fuelbed_52_flaming_co2() {
    let lookup = EfLookup::fuelbed("52", registry(false));
    let co2 = lookup
        .get("flaming", "woody fuels", "100-hr fuels", "CO2")
        .unwrap()
        .unwrap();
    assert_relative_eq!(co2, 1655.0);
}

#[test]
fn test_numeric_string_values_round_trip() {
    let lookup = EfLookup::fuelbed("52", registry(false));
    assert_eq!(lookup.get("smoldering", "shrub", "primary dead", "PM2.5"), Ok(Some(0.012)));
    // Empty cell is no EF, not zero
    assert_eq!(lookup.get("smoldering", "shrub", "primary dead", "CH4"), Ok(None));
    // Column absent entirely
    assert_eq!(lookup.get("smoldering", "shrub", "primary dead", "SO2"), Ok(None));
}

#[test]
fn test_override_region_shared_by_burn_types() {
    // Cover type 200 lists its region only in the prescribed-burn column;
    // wildfire lookups still see that region's overrides
    let wf = EfLookup::fuelbed("70", registry(false));
    let rx = EfLookup::fuelbed("70", registry(true));

    assert_eq!(wf.get("flaming", "woody fuels", "piles", "CO2"), Ok(Some(1500.0)));
    assert_eq!(rx.get("flaming", "woody fuels", "piles", "CO2"), Ok(Some(1500.0)));

    // Outside the overrides each burn type keeps its own EF group
    assert_eq!(wf.get("flaming", "woody fuels", "1-hr fuels", "CO2"), Ok(Some(1600.0)));
    assert_eq!(rx.get("flaming", "woody fuels", "1-hr fuels", "CO2"), Ok(Some(1590.0)));

    // Redirected to G9, which has no CO
    assert_eq!(wf.get("residual", "woody fuels", "stumps lightered", "CO"), Ok(None));
    assert_eq!(rx.get("residual", "woody fuels", "stumps lightered", "CO"), Ok(None));
    assert_eq!(wf.get("residual", "woody fuels", "stumps rotten", "CO"), Ok(Some(229.0)));
}

#[test]
fn test_empty_override_cell_suppresses() {
    let lookup = EfLookup::fuelbed("52", registry(false));
    assert_eq!(lookup.get("flaming", "litter-lichen-moss", "moss", "CO2"), Ok(None));
    assert_eq!(lookup.get("flaming", "litter-lichen-moss", "litter", "CO2"), Ok(Some(1655.0)));
    // The row only covers flaming
    assert_eq!(lookup.get("smoldering", "litter-lichen-moss", "moss", "CO2"), Ok(Some(1655.0)));
}

#[test]
fn test_suppressed_combination_has_no_species() {
    let lookup = EfLookup::fuelbed("53", registry(false));
    for species in lookup.species(Phase::Smoldering) {
        assert_eq!(
            lookup.get("smoldering", "canopy", "overstory", &species),
            Ok(None),
            "{species} should be suppressed"
        );
        assert!(lookup
            .get("smoldering", "canopy", "midstory", &species)
            .unwrap()
            .is_some());
    }
}

#[test]
fn test_residual_with_consume_codes() {
    let lookup = EfLookup::fuelbed("1", registry(false));
    let get = |code: &str, species: &str| {
        let (category, sub) = translate_consume_category(code).unwrap();
        lookup.get("residual", category, sub, species).unwrap()
    };
    assert_eq!(get("C_stump_rotten", "CO2"), Some(1408.0));
    assert_eq!(get("C_wood_S1000hr", "CH4"), Some(11.3));
    assert_eq!(get("C_basal_accum", "NH3"), Some(1.48));
    assert_eq!(get("C_lowerduff", "CO"), Some(271.0));
    assert_eq!(get("C_wood_100hr", "CO2"), None);
    assert_eq!(get("C_litter", "CO2"), None);
    assert_eq!(get("C_stump_sound", "CO2"), None);
}

#[test]
fn test_species_listing() {
    let lookup = EfLookup::cover_type("13", registry(false));
    let flaming: Vec<String> = lookup.species(Phase::Flaming).into_iter().collect();
    assert_eq!(flaming, vec!["CH4", "CO", "CO2", "PM2.5"]);

    let residual: Vec<String> = lookup.species(Phase::Residual).into_iter().collect();
    assert_eq!(residual, vec!["CH4", "CO", "CO2", "NH3", "PM2.5"]);
}

#[test]
fn test_missing_ef_group_surfaces_from_resolver_only() {
    let registry = registry(false);
    let subject = Subject::Fuelbed("88".into());
    assert_eq!(
        registry.resolver(&subject).unwrap_err(),
        LookupError::InvalidCoverTypeId("404".into())
    );
    assert_eq!(registry.get(&subject, "flaming", "canopy", "overstory", "CO2"), Ok(None));
    assert_eq!(registry.burn_type(), BurnType::Wildfire);
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("fccs2ef.json");
    let config = LookupConfig::new(TableFiles::in_dir(data_dir()), true);
    std::fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = LookupConfig::load(&config_path).unwrap();
    assert_eq!(loaded, config);

    let registry = ResolverRegistry::from_config(&loaded).unwrap();
    assert_eq!(registry.burn_type(), BurnType::Prescribed);
    assert_eq!(
        registry.get(
            &Subject::Fuelbed("52".into()),
            "flaming",
            "woody fuels",
            "100-hr fuels",
            "CO2"
        ),
        Ok(Some(1590.0))
    );
}
