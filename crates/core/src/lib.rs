//! FCCS Emission Factor Lookup Core Library
//!
//! Resolves the emission factor of a chemical species for a vegetation
//! fuelbed, combustion phase, fuel category and burn type (prescribed or
//! wildfire). Downstream emissions pipelines multiply these factors by the
//! fuel consumed in each category.
//!
//! ## Lookup chain
//!
//! - FCCS fuelbed → cover type
//! - cover type → flaming/smoldering EF group and override region
//! - region/category/phase override → EF group redirect or suppression
//! - EF group → per-species emission factors, plus the reserved woody and
//!   duff residual groups
//!
//! ## Usage
//! ```no_run
//! use fccs2ef_core::{EfLookup, LookupConfig, ResolverRegistry};
//! use std::sync::Arc;
//!
//! let config = LookupConfig::load("fccs2ef.json")?;
//! let registry = Arc::new(ResolverRegistry::from_config(&config)?);
//!
//! let lookup = EfLookup::fuelbed("52", registry);
//! let co2 = lookup.get("flaming", "woody fuels", "100-hr fuels", "CO2")?;
//! println!("CO2: {co2:?}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core_types;
pub mod error;
pub mod lookup;
pub mod tables;

pub use config::{LookupConfig, TableFiles};
pub use core_types::{BurnType, CoverTypeId, EfGroupId, FuelbedId, Phase, RegionId, Species};
pub use error::{ConfigError, LoadError, LookupError};
pub use lookup::{EfLookup, FuelbedResolver, LookupRequest, ResolverRegistry, Subject};
pub use tables::{EfSet, EfTables, Override};
