//! Error types for table loading, configuration and lookups
//!
//! "No emission factor" is never an error: lookups return `Ok(None)` for
//! unknown species, unclassified residual fuels and suppressed overrides.
//! The variants here cover broken identifier chains and contract
//! violations only.

use crate::core_types::{CoverTypeId, FuelbedId};
use std::path::PathBuf;

/// Errors raised while resolving a fuelbed or performing a lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Fuelbed id has no cover type assignment
    #[error("invalid fuelbed id '{0}': no cover type assignment")]
    InvalidFuelbedId(FuelbedId),
    /// Cover type id has no EF group row
    #[error("invalid cover type id '{0}': no EF group assignment")]
    InvalidCoverTypeId(CoverTypeId),
    /// Cover type row lacks the EF group column for the burn type, or the
    /// group it names has no EF values
    #[error("invalid EF group for cover type '{cover_type_id}': {reason}")]
    InvalidEfGroup {
        cover_type_id: CoverTypeId,
        reason: String,
    },
    /// One of phase, fuel category, fuel sub-category or species was empty
    #[error("specify phase, fuel_category, fuel_sub_category, and species (missing {0})")]
    MissingLookupKey(&'static str),
}

impl LookupError {
    pub(crate) fn missing_group(cover_type_id: &CoverTypeId, ef_group: &str) -> Self {
        LookupError::InvalidEfGroup {
            cover_type_id: cover_type_id.clone(),
            reason: format!("EF group '{ef_group}' has no EF values"),
        }
    }

    /// True for errors caused by an identifier that does not translate
    /// through the fuelbed → cover type → EF group chain
    pub fn is_identifier_error(&self) -> bool {
        !matches!(self, LookupError::MissingLookupKey(_))
    }
}

/// Errors that can occur while reading a reference table
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read or decode CSV input
    #[error("failed to read {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
    /// A required header column is absent
    #[error("{origin} is missing the '{column}' column")]
    MissingColumn { origin: String, column: &'static str },
    /// Phase cell is not flaming, smoldering or residual
    #[error("{origin}: unknown phase '{phase}'")]
    InvalidPhase { origin: String, phase: String },
    /// EF cell is neither empty nor a non-negative number
    #[error("{origin}: EF group '{ef_group}' has invalid value '{value}' for {species}")]
    InvalidEfValue {
        origin: String,
        ef_group: String,
        species: String,
        value: String,
    },
    /// The same key appears twice in one table
    #[error("{origin}: duplicate key {key}")]
    DuplicateKey { origin: String, key: String },
}

/// Errors that can occur while loading a lookup configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse config file contents
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Config parsed but one of its tables failed to load
    #[error(transparent)]
    Load(#[from] LoadError),
}
