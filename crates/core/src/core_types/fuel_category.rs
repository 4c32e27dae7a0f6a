//! Fuel category vocabulary
//!
//! Consume reports consumption per fuel category column (`C_wood_1hr`,
//! `C_upperduff`, ...). The EF tables are keyed by the human readable
//! `(fuel_category, fuel_sub_category)` pair instead, so callers translate
//! with [`translate_consume_category`] before looking up.
//!
//! Lookups never validate against this vocabulary; unknown pairs simply
//! find no emission factor.

/// Consume column code → `(fuel_category, fuel_sub_category)`
pub static CONSUME_FUEL_CATEGORY_TRANSLATIONS: &[(&str, (&str, &str))] = &[
    // Canopy
    ("C_over_crown", ("canopy", "overstory")),
    ("C_mid_crown", ("canopy", "midstory")),
    ("C_under_crown", ("canopy", "understory")),
    ("C_snagc1f_crown", ("canopy", "snags class 1 foliage")),
    ("C_snagc1f_wood", ("canopy", "snags class 1 wood")),
    ("C_snagc1nf_wood", ("canopy", "snags class 1 no foliage")),
    ("C_snagc2_wood", ("canopy", "snags class 2")),
    ("C_snagc3_wood", ("canopy", "snags class 3")),
    ("C_ladder", ("canopy", "ladder fuels")),
    // Shrub
    ("C_shrub_1live", ("shrub", "primary live")),
    ("C_shrub_1dead", ("shrub", "primary dead")),
    ("C_shrub_2live", ("shrub", "secondary live")),
    ("C_shrub_2dead", ("shrub", "secondary dead")),
    // Herbaceous
    ("C_herb_1live", ("nonwoody", "primary live")),
    ("C_herb_1dead", ("nonwoody", "primary dead")),
    ("C_herb_2live", ("nonwoody", "secondary live")),
    ("C_herb_2dead", ("nonwoody", "secondary dead")),
    // Woody
    ("C_wood_1hr", ("woody fuels", "1-hr fuels")),
    ("C_wood_10hr", ("woody fuels", "10-hr fuels")),
    ("C_wood_100hr", ("woody fuels", "100-hr fuels")),
    ("C_wood_S1000hr", ("woody fuels", "1000-hr fuels sound")),
    ("C_wood_R1000hr", ("woody fuels", "1000-hr fuels rotten")),
    ("C_wood_S10khr", ("woody fuels", "10000-hr fuels sound")),
    ("C_wood_R10khr", ("woody fuels", "10000-hr fuels rotten")),
    ("C_wood_S+10khr", ("woody fuels", "10k+-hr fuels sound")),
    ("C_wood_R+10khr", ("woody fuels", "10k+-hr fuels rotten")),
    ("C_stump_sound", ("woody fuels", "stumps sound")),
    ("C_stump_rotten", ("woody fuels", "stumps rotten")),
    ("C_stump_lightered", ("woody fuels", "stumps lightered")),
    // Litter-lichen-moss
    ("C_litter", ("litter-lichen-moss", "litter")),
    ("C_lichen", ("litter-lichen-moss", "lichen")),
    ("C_moss", ("litter-lichen-moss", "moss")),
    // Ground fuels
    ("C_upperduff", ("ground fuels", "duff upper")),
    ("C_lowerduff", ("ground fuels", "duff lower")),
    ("C_basal_accum", ("ground fuels", "basal accumulations")),
    ("C_squirrel", ("ground fuels", "squirrel middens")),
];

/// Categories whose listed sub-categories emit from the woody residual table
const WOODY_RESIDUAL_CATEGORIES: [&str; 2] = ["canopy", "woody fuels"];

/// Sub-categories that keep smoldering as woody residual combustion
const WOODY_RESIDUAL_SUB_CATEGORIES: [&str; 10] = [
    "snags class 2",
    "snags class 3",
    "1000-hr fuels sound",
    "1000-hr fuels rotten",
    "10000-hr fuels sound",
    "10000-hr fuels rotten",
    "10k+-hr fuels sound",
    "10k+-hr fuels rotten",
    "stumps rotten",
    "stumps lightered",
];

/// Every sub-category of this category emits from the duff residual table
const DUFF_RESIDUAL_CATEGORY: &str = "ground fuels";

/// Which residual EF table a fuel category pair draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidualClass {
    Woody,
    Duff,
}

/// Classify a fuel category pair for the residual phase
///
/// Returns `None` for fuels that produce no residual emissions.
///
/// # Examples
/// ```
/// use fccs2ef_core::core_types::{classify_residual, ResidualClass};
///
/// assert_eq!(classify_residual("woody fuels", "stumps rotten"), Some(ResidualClass::Woody));
/// assert_eq!(classify_residual("ground fuels", "duff upper"), Some(ResidualClass::Duff));
/// assert_eq!(classify_residual("woody fuels", "1-hr fuels"), None);
/// ```
pub fn classify_residual(fuel_category: &str, fuel_sub_category: &str) -> Option<ResidualClass> {
    if WOODY_RESIDUAL_CATEGORIES.contains(&fuel_category)
        && WOODY_RESIDUAL_SUB_CATEGORIES.contains(&fuel_sub_category)
    {
        Some(ResidualClass::Woody)
    } else if fuel_category == DUFF_RESIDUAL_CATEGORY {
        Some(ResidualClass::Duff)
    } else {
        None
    }
}

/// Translate a Consume column code into its `(category, sub-category)` pair
pub fn translate_consume_category(code: &str) -> Option<(&'static str, &'static str)> {
    CONSUME_FUEL_CATEGORY_TRANSLATIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, pair)| *pair)
}

/// Distinct fuel categories, in table order
pub fn valid_fuel_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for &(_, (category, _)) in CONSUME_FUEL_CATEGORY_TRANSLATIONS {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

/// Distinct fuel sub-categories, in table order
pub fn valid_fuel_sub_categories() -> Vec<&'static str> {
    let mut sub_categories: Vec<&'static str> = Vec::new();
    for &(_, (_, sub_category)) in CONSUME_FUEL_CATEGORY_TRANSLATIONS {
        if !sub_categories.contains(&sub_category) {
            sub_categories.push(sub_category);
        }
    }
    sub_categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_woody_requires_listed_sub_category() {
        assert_eq!(
            classify_residual("woody fuels", "stumps rotten"),
            Some(ResidualClass::Woody)
        );
        assert_eq!(
            classify_residual("canopy", "snags class 3"),
            Some(ResidualClass::Woody)
        );
        assert_eq!(classify_residual("woody fuels", "stumps sound"), None);
        assert_eq!(classify_residual("canopy", "overstory"), None);
    }

    #[test]
    fn test_woody_sub_category_under_other_category_is_not_woody() {
        assert_eq!(classify_residual("shrub", "stumps rotten"), None);
    }

    #[test]
    fn test_ground_fuels_always_duff() {
        for sub in ["duff upper", "duff lower", "basal accumulations", "anything"] {
            assert_eq!(classify_residual("ground fuels", sub), Some(ResidualClass::Duff));
        }
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        assert_eq!(classify_residual("Ground Fuels", "duff upper"), None);
    }

    #[test]
    fn test_translate_consume_codes() {
        assert_eq!(
            translate_consume_category("C_wood_R+10khr"),
            Some(("woody fuels", "10k+-hr fuels rotten"))
        );
        assert_eq!(
            translate_consume_category("C_upperduff"),
            Some(("ground fuels", "duff upper"))
        );
        assert_eq!(translate_consume_category("C_unknown"), None);
    }

    #[test]
    fn test_vocabulary_is_deduplicated() {
        let categories = valid_fuel_categories();
        assert_eq!(
            categories,
            vec![
                "canopy",
                "shrub",
                "nonwoody",
                "woody fuels",
                "litter-lichen-moss",
                "ground fuels"
            ]
        );

        let subs = valid_fuel_sub_categories();
        assert_eq!(subs.iter().filter(|s| **s == "primary live").count(), 1);
        for woody in WOODY_RESIDUAL_SUB_CATEGORIES {
            assert!(subs.contains(&woody), "{woody} missing from vocabulary");
        }
    }
}
